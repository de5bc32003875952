//! `model-data` section of the manifest (spec §4.7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub name: Option<String>,
    pub version: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}
