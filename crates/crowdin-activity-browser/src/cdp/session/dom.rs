//! Selector queries against the page's DOM.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::DomNode;

use super::core::PageSession;

impl PageSession {
    /// Document root node. Fetched per query since the feed re-renders.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;
        Ok(serde_json::from_value(result["root"].clone())?)
    }

    /// Node id of the first match, if any.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let result = self.query("DOM.querySelector", selector).await?;
        Ok(result["nodeId"].as_i64().filter(|&id| id != 0))
    }

    /// Node ids of all matches, in document order.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<i64>, CdpError> {
        let result = self.query("DOM.querySelectorAll", selector).await?;
        Ok(Self::node_ids(&result))
    }

    async fn query(&self, method: &str, selector: &str) -> Result<Value, CdpError> {
        let root = self.get_document().await?;
        self.call(
            method,
            Some(json!({
                "nodeId": root.node_id,
                "selector": selector,
            })),
        )
        .await
    }

    pub(super) fn node_ids(result: &Value) -> Vec<i64> {
        result["nodeIds"]
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default()
    }
}
