pub mod payload;
pub mod router;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::DateWindow;

pub use self::payload::{slots, RenderPayload};
pub use self::router::{RenderSettings, ViewRouter};

/// View identifies one dashboard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Overview,
    Engagement,
    Content,
    Audience,
}

impl View {
    /// Returns the canonical config/CLI name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Engagement => "engagement",
            Self::Content => "content",
            Self::Audience => "audience",
        }
    }

    /// Returns the page heading.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Engagement => "Engagement Analysis",
            Self::Content => "Content Analysis",
            Self::Audience => "Audience Insights",
        }
    }

    /// Convert from the canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(Self::Overview),
            "engagement" => Some(Self::Engagement),
            "content" => Some(Self::Content),
            "audience" => Some(Self::Audience),
            _ => None,
        }
    }

    /// Return all views in navigation order.
    pub fn all() -> &'static [Self] {
        &[Self::Overview, Self::Engagement, Self::Content, Self::Audience]
    }

    /// Names of the payload slots this view fills.
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            Self::Overview => &[
                slots::HEADLINE_METRICS,
                slots::ENGAGEMENT_TIME_SERIES,
                slots::TOP_CONTENT,
            ],
            Self::Engagement => &[slots::ENGAGEMENT_BY_TYPE, slots::ENGAGEMENT_DISTRIBUTION],
            Self::Content => &[
                slots::CONTENT_CALENDAR,
                slots::HASHTAG_USAGE,
                slots::HASHTAG_ENGAGEMENT,
            ],
            Self::Audience => &[
                slots::AGE_BREAKDOWN,
                slots::GENDER_BREAKDOWN,
                slots::HOURLY_ACTIVITY,
            ],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the session's view state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub active_view: View,
    pub window: Arc<DateWindow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_from_name_round_trip() {
        for view in View::all() {
            assert_eq!(View::from_name(view.as_str()), Some(*view));
        }
        assert_eq!(View::from_name("settings"), None);
    }

    #[test]
    fn test_view_default_is_overview() {
        assert_eq!(View::default(), View::Overview);
    }

    #[test]
    fn test_view_slots_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for view in View::all() {
            for slot in view.slots() {
                assert!(seen.insert(*slot), "slot {slot} reused");
            }
        }
    }
}
