//! CSV export of activity rows.
//!
//! Every field is quoted, embedded quotes are doubled, and the header row
//! names the columns. There is no index column.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::FeedError;
use crate::model::ActivityRow;

pub const HEADER: [&str; 5] = ["activity_type", "user_id", "date", "user", "articles"];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write one fully quoted CSV record.
pub fn write_record<W: Write, S: AsRef<str>>(mut w: W, fields: &[S]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        write!(w, "\"{}\"", field.as_ref().replace('"', "\"\""))?;
    }
    w.write_all(b"\n")
}

/// Field values of one row, in [`HEADER`] order.
pub fn row_fields(row: &ActivityRow) -> [String; 5] {
    [
        row.activity_type.clone(),
        row.user_id.to_string(),
        row.date.format(DATE_FORMAT).to_string(),
        row.user.clone(),
        row.article.clone().unwrap_or_default(),
    ]
}

/// Write header and rows to `w`.
pub fn write_csv<W: Write>(mut w: W, rows: &[ActivityRow]) -> io::Result<()> {
    write_record(&mut w, &HEADER)?;
    for row in rows {
        write_record(&mut w, &row_fields(row))?;
    }
    w.flush()
}

/// Write `rows` to `path`.
///
/// The file is first written next to its destination and renamed into place,
/// so a failed export never leaves a truncated CSV behind.
pub fn export_csv(path: &Path, rows: &[ActivityRow]) -> Result<(), FeedError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let partial = partial_path(path);
    let written = File::create(&partial)
        .and_then(|file| write_csv(BufWriter::new(file), rows))
        .and_then(|()| fs::rename(&partial, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }

    info!(path = %path.display(), rows = rows.len(), "Exported activity rows");
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn row(index: usize, user: &str, article: Option<&str>) -> ActivityRow {
        ActivityRow {
            index,
            activity_type: "translation".to_string(),
            user_id: 12,
            date: DateTime::from_timestamp(1_650_000_000, 0).unwrap(),
            user: user.to_string(),
            article: article.map(str::to_string),
        }
    }

    fn to_string(rows: &[ActivityRow]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_for_no_rows() {
        assert_eq!(
            to_string(&[]),
            "\"activity_type\",\"user_id\",\"date\",\"user\",\"articles\"\n"
        );
    }

    #[test]
    fn test_all_fields_quoted() {
        let csv = to_string(&[row(0, "alice", Some("intro/summary"))]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "\"translation\",\"12\",\"2022-04-15 05:20:00\",\"alice\",\"intro/summary\""
        );
    }

    #[test]
    fn test_empty_article_and_escaping() {
        let csv = to_string(&[row(0, "Bob \"the\" Builder, Jr", None)]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.ends_with(",\"Bob \"\"the\"\" Builder, Jr\",\"\""));
    }

    #[test]
    fn test_export_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("activity.csv");

        export_csv(&path, &[row(0, "a", Some("x")), row(1, "a", Some("y"))]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_partial_path_is_sibling() {
        let path = Path::new("/tmp/export/activity.csv");
        assert_eq!(partial_path(path), Path::new("/tmp/export/activity.csv.partial"));
    }
}
