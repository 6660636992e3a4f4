//! In-memory holder of the raw, unfiltered dataset.
//!
//! The store is the only ingestion surface of the pipeline. Every record is
//! validated on the way in and is immutable afterwards; readers only ever get
//! shared slices.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::record::{AudienceEvent, AudienceInput, MetricRecord, RecordInput};

/// Errors raised when a record fails ingestion checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("record id must not be empty")]
    EmptyId,

    #[error("duplicate record id: {id}")]
    DuplicateId { id: String },

    #[error("record {id}: {field} must be non-negative, got {value}")]
    NegativeCount {
        id: String,
        field: &'static str,
        value: i64,
    },

    #[error("record {id}: engagement_score must be a finite non-negative number, got {value}")]
    InvalidEngagementScore { id: String, value: f64 },

    #[error("record {id}: hashtags must not be empty")]
    EmptyHashtag { id: String },
}

/// Holds post records and audience events for the lifetime of a dataset load.
#[derive(Debug, Default)]
pub struct MetricStore {
    posts: Vec<MetricRecord>,
    audience: Vec<AudienceEvent>,
    ids: HashSet<String>,
}

impl MetricStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every post record. Callers must not rely on the order.
    pub fn load_all(&self) -> &[MetricRecord] {
        &self.posts
    }

    /// Returns every audience event.
    pub fn audience(&self) -> &[AudienceEvent] {
        &self.audience
    }

    /// Number of post records.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the store holds no post records.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Validates and appends a single post record.
    pub fn add(&mut self, input: RecordInput) -> Result<&MetricRecord, ValidationError> {
        let record = validate(input)?;
        if self.ids.contains(&record.id) {
            return Err(ValidationError::DuplicateId { id: record.id });
        }
        Ok(self.insert(record))
    }

    /// Appends an audience event. Audience events carry no free-form fields,
    /// so every deserialized input is accepted.
    pub fn add_audience(&mut self, input: AudienceInput) {
        self.audience.push(input.into());
    }

    /// Bulk-loads post records. Every input is validated before any is
    /// inserted, so a failed load leaves the store unchanged.
    pub fn extend<I>(&mut self, inputs: I) -> Result<usize, ValidationError>
    where
        I: IntoIterator<Item = RecordInput>,
    {
        let mut batch_ids = HashSet::new();
        let mut batch = Vec::new();

        for input in inputs {
            let record = validate(input)?;
            if self.ids.contains(&record.id) || !batch_ids.insert(record.id.clone()) {
                return Err(ValidationError::DuplicateId { id: record.id });
            }
            batch.push(record);
        }

        let added = batch.len();
        for record in batch {
            self.insert(record);
        }

        debug!(added, total = self.posts.len(), "loaded post records");

        Ok(added)
    }

    fn insert(&mut self, record: MetricRecord) -> &MetricRecord {
        self.ids.insert(record.id.clone());
        self.posts.push(record);
        &self.posts[self.posts.len() - 1]
    }
}

fn validate(input: RecordInput) -> Result<MetricRecord, ValidationError> {
    let id = input.id.trim().to_string();
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }

    let likes = non_negative(&id, "likes", input.likes)?;
    let comments = non_negative(&id, "comments", input.comments)?;

    let engagement_score = match input.engagement_score {
        Some(score) if !score.is_finite() || score < 0.0 => {
            return Err(ValidationError::InvalidEngagementScore { id, value: score });
        }
        Some(score) => score,
        None => likes.saturating_add(comments) as f64,
    };

    let mut hashtags = BTreeSet::new();
    for tag in &input.hashtags {
        let tag = tag.trim().trim_start_matches('#');
        if tag.is_empty() {
            return Err(ValidationError::EmptyHashtag { id });
        }
        hashtags.insert(tag.to_string());
    }

    Ok(MetricRecord {
        id,
        timestamp: input.timestamp,
        kind: input.kind,
        likes,
        comments,
        engagement_score,
        hashtags,
    })
}

fn non_negative(id: &str, field: &'static str, value: i64) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeCount {
        id: id.to_string(),
        field,
        value,
    })
}
