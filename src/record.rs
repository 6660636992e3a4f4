use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ContentKind identifies the format of a published post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Image,
    Video,
    Story,
    Carousel,
}

impl ContentKind {
    /// Returns the canonical display label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Story => "Story",
            Self::Carousel => "Carousel",
        }
    }

    /// Return all content kinds in declaration order.
    pub fn all() -> &'static [Self] {
        &[Self::Image, Self::Video, Self::Story, Self::Carousel]
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age bracket of an audience member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::Over55 => "55+",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::From18To24,
            Self::From25To34,
            Self::From35To44,
            Self::From45To54,
            Self::Over55,
        ]
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported gender of an audience member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Male, Self::Female, Self::Other]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published post and its observed performance.
/// Built only through [`crate::store::MetricStore::add`], which validates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ContentKind,
    pub likes: u64,
    pub comments: u64,
    pub engagement_score: f64,
    /// Hashtags without the leading `#`.
    pub hashtags: BTreeSet<String>,
}

/// One interaction by an audience member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudienceEvent {
    pub timestamp: DateTime<Utc>,
    pub age_group: AgeGroup,
    pub gender: Gender,
}

/// Post record as supplied by a data-loading collaborator, before validation.
///
/// Counts are signed so that malformed upstream values can be reported
/// instead of failing deserialization with an opaque overflow.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordInput {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ContentKind,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
    /// Derived as `likes + comments` when absent.
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Audience event as supplied by a data-loading collaborator.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AudienceInput {
    pub timestamp: DateTime<Utc>,
    pub age_group: AgeGroup,
    pub gender: Gender,
}

impl From<AudienceInput> for AudienceEvent {
    fn from(input: AudienceInput) -> Self {
        Self {
            timestamp: input.timestamp,
            age_group: input.age_group,
            gender: input.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_labels() {
        let labels: Vec<String> = ContentKind::all().iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["Image", "Video", "Story", "Carousel"]);
        let parsed: ContentKind = serde_json::from_str("\"carousel\"").expect("parse");
        assert_eq!(parsed, ContentKind::Carousel);
    }

    #[test]
    fn test_age_group_serde_labels() {
        let parsed: AgeGroup = serde_json::from_str("\"55+\"").expect("parse");
        assert_eq!(parsed, AgeGroup::Over55);
        assert_eq!(
            serde_json::to_string(&AgeGroup::From25To34).expect("serialize"),
            "\"25-34\""
        );
    }

    #[test]
    fn test_record_input_defaults() {
        let input: RecordInput = serde_json::from_str(
            r#"{"id":"a","timestamp":"2024-01-01T00:00:00Z","kind":"story"}"#,
        )
        .expect("parse");
        assert_eq!(input.likes, 0);
        assert_eq!(input.comments, 0);
        assert!(input.engagement_score.is_none());
        assert!(input.hashtags.is_empty());
    }
}
