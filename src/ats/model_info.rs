//! Façade-level model metadata (spec §3.5), mirroring `index::ModelData`
//! one-to-one but named the way `original_source/umbi/ats/model_info.py`
//! names its dataclass.

use crate::index::ModelData;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}

impl From<ModelData> for ModelInfo {
    fn from(data: ModelData) -> Self {
        Self {
            name: data.name,
            version: data.version,
            authors: data.authors.unwrap_or_default(),
            description: data.description,
            comment: data.comment,
            doi: data.doi,
            url: data.url,
        }
    }
}

impl From<ModelInfo> for ModelData {
    fn from(info: ModelInfo) -> Self {
        Self {
            name: info.name,
            version: info.version,
            authors: (!info.authors.is_empty()).then_some(info.authors),
            description: info.description,
            comment: info.comment,
            doi: info.doi,
            url: info.url,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_model_data() {
        let info = ModelInfo {
            name: Some("grid-world".to_string()),
            authors: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        let data: ModelData = info.clone().into();
        let back: ModelInfo = data.into();
        assert_eq!(info, back);
    }

    #[test]
    fn empty_authors_round_trip_to_none() {
        let data: ModelData = ModelInfo::default().into();
        assert!(data.authors.is_none());
    }
}
