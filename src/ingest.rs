//! Loads a JSON dataset document into a [`MetricStore`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::record::{AudienceInput, RecordInput};
use crate::store::MetricStore;

/// On-disk dataset layout. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub posts: Vec<RecordInput>,

    #[serde(default)]
    pub audience: Vec<AudienceInput>,
}

/// Reads and validates a dataset file.
pub fn load_dataset(path: &Path) -> Result<MetricStore> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;

    let store =
        parse_dataset(&data).with_context(|| format!("loading dataset {}", path.display()))?;

    info!(
        path = %path.display(),
        posts = store.len(),
        audience = store.audience().len(),
        "dataset loaded",
    );

    Ok(store)
}

/// Parses a dataset document. Any invalid post rejects the whole document.
pub fn parse_dataset(data: &str) -> Result<MetricStore> {
    let dataset: Dataset = serde_json::from_str(data).context("decoding dataset JSON")?;

    let mut store = MetricStore::new();
    store
        .extend(dataset.posts)
        .context("validating post records")?;
    for event in dataset.audience {
        store.add_audience(event);
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContentKind, Gender};
    use crate::store::ValidationError;

    const SAMPLE: &str = r##"{
        "posts": [
            {
                "id": "p1",
                "timestamp": "2024-01-01T09:00:00Z",
                "kind": "image",
                "likes": 120,
                "comments": 14,
                "hashtags": ["#launch", "tech"]
            },
            {
                "id": "p2",
                "timestamp": "2024-01-02T18:30:00Z",
                "kind": "carousel",
                "engagement_score": 4.2
            }
        ],
        "audience": [
            { "timestamp": "2024-01-01T10:00:00Z", "age_group": "25-34", "gender": "female" }
        ]
    }"##;

    #[test]
    fn test_parse_dataset() {
        let store = parse_dataset(SAMPLE).expect("valid dataset");
        assert_eq!(store.len(), 2);
        assert_eq!(store.audience().len(), 1);
        assert_eq!(store.audience()[0].gender, Gender::Female);

        let first = &store.load_all()[0];
        assert_eq!(first.kind, ContentKind::Image);
        assert_eq!(first.engagement_score, 134.0);
        assert!(first.hashtags.contains("launch"));

        let second = &store.load_all()[1];
        assert_eq!(second.likes, 0);
        assert_eq!(second.engagement_score, 4.2);
    }

    #[test]
    fn test_parse_empty_document() {
        let store = parse_dataset("{}").expect("empty dataset");
        assert!(store.is_empty());
        assert!(store.audience().is_empty());
    }

    #[test]
    fn test_parse_rejects_negative_counts() {
        let doc = r#"{"posts": [
            {"id": "p1", "timestamp": "2024-01-01T00:00:00Z", "kind": "video", "likes": -5}
        ]}"#;
        let err = parse_dataset(doc).unwrap_err();
        let validation = err
            .downcast_ref::<ValidationError>()
            .expect("validation error in chain");
        assert!(matches!(
            validation,
            ValidationError::NegativeCount { field: "likes", .. }
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_dataset("{\"posts\": [").unwrap_err();
        assert!(err.to_string().contains("decoding dataset JSON"));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, SAMPLE).expect("write dataset");

        let store = load_dataset(&path).expect("load dataset");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dataset.json"));
    }
}
