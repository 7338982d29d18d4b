//! End-to-end run over an already opened activity stream page.

use crowdin_activity_config::Config;
use tracing::info;
use url::Url;

use crate::error::{FeedError, ItemError, Stage};
use crate::expander::{DetailExpander, ExpansionReport};
use crate::extractor::ActivityExtractor;
use crate::model::ActivityRow;
use crate::normalizer::Normalizer;
use crate::page::FeedPage;
use crate::pager::{Pager, PagingReport};
use crate::table;

/// Everything a successful run produced.
#[derive(Debug)]
pub struct FeedRun {
    pub rows: Vec<ActivityRow>,
    pub paging: PagingReport,
    pub expansion: ExpansionReport,
    /// Items left out under the skip policy.
    pub skipped: Vec<ItemError>,
}

/// `<base_url>/project/<project>/activity_stream`.
pub fn activity_stream_url(base_url: &str, project: &str) -> Result<Url, FeedError> {
    if project.is_empty() || project.contains('/') {
        return Err(FeedError::InvalidTarget(format!(
            "invalid project name {:?}",
            project
        )));
    }

    let mut url = Url::parse(base_url)
        .map_err(|e| FeedError::InvalidTarget(format!("{}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|()| FeedError::InvalidTarget(format!("{} cannot be a base URL", base_url)))?
        .pop_if_empty()
        .extend(["project", project, "activity_stream"]);
    Ok(url)
}

/// Load the full history, expand details, extract and flatten.
///
/// Paging or expansion failures end the run before anything is extracted;
/// there is no partial result.
pub async fn run_feed<P: FeedPage + ?Sized>(
    page: &P,
    config: &Config,
) -> Result<FeedRun, FeedError> {
    let selectors = &config.selectors;

    let paging = Pager::new(page, selectors, &config.feed).run().await?;

    let expansion = DetailExpander::new(page, &selectors.detail_control, config.feed.detail_settle())
        .run()
        .await?;

    let items = page
        .read_items(selectors)
        .await
        .map_err(FeedError::during(Stage::Extraction))?
        .ok_or_else(|| FeedError::MissingListContainer(selectors.list_container.clone()))?;

    let extractor = ActivityExtractor::new(Normalizer::new(&config.normalizer));
    let extraction = extractor.extract_all(&items, config.feed.on_malformed_item)?;

    let rows = table::build(&extraction.records)?;
    info!(
        records = extraction.records.len(),
        rows = rows.len(),
        "Flattened activities into rows"
    );

    Ok(FeedRun {
        rows,
        paging,
        expansion,
        skipped: extraction.skipped,
    })
}
