//! Page scripts evaluated through `Runtime.evaluate`.
//!
//! Selectors are embedded as JSON string literals so that quotes and
//! backslashes inside them survive.

use crowdin_activity_config::SelectorConfig;
use crowdin_activity_core::DetailControl;
use serde_json::Value;

fn literal(s: &str) -> String {
    Value::from(s).to_string()
}

pub(super) fn is_interactable(selector: &str) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelector({sel});
  if (!el || el.disabled || el.getAttribute('aria-disabled') === 'true') return false;
  const style = window.getComputedStyle(el);
  if (style.display === 'none' || style.visibility === 'hidden') return false;
  const rect = el.getBoundingClientRect();
  return rect.width > 0 && rect.height > 0;
}})()"#,
        sel = literal(selector)
    )
}

/// Scrolls the first match into view and returns its center, or `null`.
pub(super) fn click_point(selector: &str) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelector({sel});
  if (!el) return null;
  el.scrollIntoView({{block: 'center', inline: 'center'}});
  const rect = el.getBoundingClientRect();
  return {{x: rect.left + rect.width / 2, y: rect.top + rect.height / 2}};
}})()"#,
        sel = literal(selector)
    )
}

/// Enumerates controls with their closest identified item and their
/// position among that item's own controls.
pub(super) fn detail_controls(selector: &str) -> String {
    format!(
        r#"(() => {{
  const seen = new Map();
  return Array.from(document.querySelectorAll({sel})).map((el, i) => {{
    const item = el.closest('li[id]');
    const owner = item && item.id ? item.id : null;
    let indexInOwner = 0;
    if (owner !== null) {{
      indexInOwner = seen.get(owner) || 0;
      seen.set(owner, indexInOwner + 1);
    }}
    return {{ordinal: i, owner: owner, indexInOwner: indexInOwner}};
  }});
}})()"#,
        sel = literal(selector)
    )
}

/// Finds the control again in the live document and clicks it.
///
/// Controls of nested identified items are excluded when indexing within
/// the owner, matching how [`detail_controls`] counted them.
pub(super) fn activate(selector: &str, control: &DetailControl) -> String {
    let owner = control
        .owner
        .as_deref()
        .map(literal)
        .unwrap_or_else(|| "null".to_string());
    format!(
        r#"(() => {{
  const owner = {owner};
  let el = null;
  if (owner !== null) {{
    const item = document.getElementById(owner);
    el = item
      ? Array.from(item.querySelectorAll({sel}))
          .filter((c) => c.closest('li[id]') === item)[{index_in_owner}] || null
      : null;
  }} else {{
    el = document.querySelectorAll({sel})[{ordinal}] || null;
  }}
  if (!el) return false;
  el.click();
  return true;
}})()"#,
        owner = owner,
        sel = literal(selector),
        index_in_owner = control.index_in_owner,
        ordinal = control.ordinal
    )
}

/// Reads the direct `<li>` children of the list container, or `null` when
/// the container is missing.
pub(super) fn read_items(selectors: &SelectorConfig) -> String {
    format!(
        r#"(() => {{
  const list = document.querySelector({list});
  if (!list) return null;
  const text = (el) => el ? el.innerText.trim() : null;
  return Array.from(list.children)
    .filter((li) => li.tagName === 'LI')
    .map((li) => {{
      const rows = Array.from(li.querySelectorAll(':scope ' + {rows}));
      return {{
        id: li.getAttribute('id'),
        user: text(li.querySelector({user})),
        detailFiles: rows.map((tr) => text(tr.querySelector({detail_file}))),
        inlineFiles: rows.length > 0
          ? []
          : Array.from(li.querySelectorAll({inline_file})).map(text),
      }};
    }});
}})()"#,
        list = literal(&selectors.list_container),
        rows = literal(&selectors.detail_rows),
        user = literal(&selectors.user_link),
        detail_file = literal(&selectors.detail_file),
        inline_file = literal(&selectors.inline_file),
    )
}
