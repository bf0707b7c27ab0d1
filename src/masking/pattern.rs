// Replacement patterns — the concrete field overrides used to mask content.
//
// Every accessor returns `None` for "leave this field untouched". `Some("")`
// is a real override that clears the field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::Visibility;

pub const PLACEHOLDER_PROFILE_IMAGE: &str = "/profile/00000000-0000-0000-0000-000000000000.jpeg";
pub const PLACEHOLDER_BIOGRAPHY: &str = "/userData/00000000-0000-0000-0000-000000000000.txt";
pub const PLACEHOLDER_POST_MEDIA: &str = "/image/00000000-0000-0000-0000-000000000000.jpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPattern {
    /// No overrides at all, label included. Wins the priority race so
    /// nothing below it masks.
    #[serde(rename = "as_is")]
    AsIs,
    /// Shown unmasked and reported as `normal`.
    Normal,
    Hidden,
    Illegal,
    Deleted,
}

impl ReplacementPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplacementPattern::AsIs => "as_is",
            ReplacementPattern::Normal => "normal",
            ReplacementPattern::Hidden => "hidden",
            ReplacementPattern::Illegal => "illegal",
            ReplacementPattern::Deleted => "deleted",
        }
    }

    /// Visibility label reported back to the caller after masking.
    pub fn visibility_label(&self) -> Option<Visibility> {
        match self {
            ReplacementPattern::AsIs => None,
            ReplacementPattern::Normal => Some(Visibility::Normal),
            ReplacementPattern::Hidden => Some(Visibility::Hidden),
            ReplacementPattern::Illegal => Some(Visibility::Illegal),
            ReplacementPattern::Deleted => None,
        }
    }

    pub fn username(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden => Some("hidden_account"),
            ReplacementPattern::Illegal => Some("illegal_account"),
            ReplacementPattern::Deleted => Some("Deleted_Account"),
        }
    }

    pub fn profile_image(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden
            | ReplacementPattern::Illegal
            | ReplacementPattern::Deleted => Some(PLACEHOLDER_PROFILE_IMAGE),
        }
    }

    pub fn biography(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden
            | ReplacementPattern::Illegal
            | ReplacementPattern::Deleted => Some(PLACEHOLDER_BIOGRAPHY),
        }
    }

    pub fn post_title(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden => Some("this post is hidden"),
            ReplacementPattern::Illegal => Some("this post is illegal"),
            ReplacementPattern::Deleted => Some("this post is deleted"),
        }
    }

    pub fn post_description(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden
            | ReplacementPattern::Illegal
            | ReplacementPattern::Deleted => Some(""),
        }
    }

    pub fn post_media(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden
            | ReplacementPattern::Illegal
            | ReplacementPattern::Deleted => Some(PLACEHOLDER_POST_MEDIA),
        }
    }

    pub fn post_cover(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden
            | ReplacementPattern::Illegal
            | ReplacementPattern::Deleted => Some(PLACEHOLDER_POST_MEDIA),
        }
    }

    pub fn comment_content(&self) -> Option<&'static str> {
        match self {
            ReplacementPattern::AsIs | ReplacementPattern::Normal => None,
            ReplacementPattern::Hidden => Some("this comment is hidden"),
            ReplacementPattern::Illegal => Some("this comment is illegal"),
            ReplacementPattern::Deleted => Some("this comment is deleted"),
        }
    }

    /// True when applying this pattern changes nothing.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, ReplacementPattern::AsIs)
    }
}

impl fmt::Display for ReplacementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
