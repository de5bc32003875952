//! `file-data` section of the manifest (spec §4.7).
//!
//! Stamped at write time from [`crate::config::tool_info`] plus the
//! current unix timestamp, ignored for correctness during reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub tool: Option<String>,
    #[serde(rename = "tool-version")]
    pub tool_version: Option<String>,
    #[serde(rename = "creation-date")]
    pub creation_date: Option<u64>,
    pub parameters: Option<serde_json::Value>,
}

impl FileData {
    pub fn stamp_now() -> Self {
        let info = crate::config::tool_info();
        let creation_date = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            tool: Some(info.toolname.clone()),
            tool_version: Some(info.version.clone()),
            creation_date: Some(creation_date),
            parameters: None,
        }
    }
}
