// Policy vocabulary — the closed enums every other module speaks.
//
// Wire names match what the API layer and the database store: content types
// are upper-case (USER/POST/COMMENT), visibility statuses are lower-case
// (normal/hidden/illegal), application cases are camelCase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseError;

/// The kind of entity being judged or displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    User,
    Post,
    Comment,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::User, ContentType::Post, ContentType::Comment];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::User => "USER",
            ContentType::Post => "POST",
            ContentType::Comment => "COMMENT",
        }
    }

    /// Alias the read queries use for this content's main table.
    pub fn alias(&self) -> &'static str {
        match self {
            ContentType::User => "u",
            ContentType::Post => "p",
            ContentType::Comment => "c",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            ContentType::User => "users",
            ContentType::Post => "posts",
            ContentType::Comment => "comments",
        }
    }

    /// Primary key column of the main table.
    pub fn id_column(&self) -> &'static str {
        match self {
            ContentType::User => "uid",
            ContentType::Post => "postid",
            ContentType::Comment => "commentid",
        }
    }

    /// Column holding the owning user id. Users own themselves.
    pub fn owner_column(&self) -> &'static str {
        match self {
            ContentType::User => "uid",
            ContentType::Post | ContentType::Comment => "userid",
        }
    }

    /// Table carrying the active report count, keyed like the main table.
    pub fn info_table(&self) -> &'static str {
        match self {
            ContentType::User => "users_info",
            ContentType::Post => "post_info",
            ContentType::Comment => "comment_info",
        }
    }

    pub fn info_key_column(&self) -> &'static str {
        match self {
            ContentType::User => "userid",
            ContentType::Post => "postid",
            ContentType::Comment => "commentid",
        }
    }

    /// `u.uid`, `p.userid`, `c.userid` — the owner expression of the aliased row.
    pub fn owner_expr(&self) -> String {
        format!("{}.{}", self.alias(), self.owner_column())
    }

    /// `u.uid`, `p.postid`, `c.commentid` — the key expression of the aliased row.
    pub fn key_expr(&self) -> String {
        format!("{}.{}", self.alias(), self.id_column())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(ContentType::User),
            "POST" => Ok(ContentType::Post),
            "COMMENT" => Ok(ContentType::Comment),
            _ => Err(ParseError::ContentType(s.to_string())),
        }
    }
}

/// Moderation state attached to a user, post or comment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Normal,
    /// Soft and reversible, usually driven by report counts.
    Hidden,
    /// Hard state set through moderation. Always wins.
    Illegal,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::Normal, Visibility::Hidden, Visibility::Illegal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Normal => "normal",
            Visibility::Hidden => "hidden",
            Visibility::Illegal => "illegal",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Visibility::Normal),
            "hidden" => Ok(Visibility::Hidden),
            "illegal" => Ok(Visibility::Illegal),
            _ => Err(ParseError::Visibility(s.to_string())),
        }
    }
}

/// Outcome of a matrix lookup. Absence (`None`) means "show as-is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilteringAction {
    /// Exclude the row from the SQL result set.
    HideContent,
    /// Keep the row but mask its sensitive fields.
    ReplaceWithPlaceholder,
}

impl FilteringAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilteringAction::HideContent => "hideContent",
            FilteringAction::ReplaceWithPlaceholder => "replaceWithPlaceholder",
        }
    }
}

impl fmt::Display for FilteringAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why content is being fetched. Each case selects a different matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationCase {
    PostFeed,
    SearchById,
    SearchByMeta,
    MyProfile,
    /// Administrative strict mode.
    HideAll,
}

impl ApplicationCase {
    pub const ALL: [ApplicationCase; 5] = [
        ApplicationCase::PostFeed,
        ApplicationCase::SearchById,
        ApplicationCase::SearchByMeta,
        ApplicationCase::MyProfile,
        ApplicationCase::HideAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationCase::PostFeed => "postFeed",
            ApplicationCase::SearchById => "searchById",
            ApplicationCase::SearchByMeta => "searchByMeta",
            ApplicationCase::MyProfile => "myProfile",
            ApplicationCase::HideAll => "hideAll",
        }
    }

    /// Case used when fetching a single profile: the viewer's own profile
    /// shows true state, anyone else's is a lookup by id.
    pub fn for_profile(viewer_id: &str, target_user_id: &str) -> Self {
        if !viewer_id.is_empty() && viewer_id == target_user_id {
            ApplicationCase::MyProfile
        } else {
            ApplicationCase::SearchById
        }
    }
}

impl fmt::Display for ApplicationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationCase {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationCase::ALL
            .into_iter()
            .find(|case| case.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::ApplicationCase(s.to_string()))
    }
}

/// Viewer-chosen severity threshold for reported content.
///
/// Only the strictest level turns the hidden-content rules on; relaxed
/// viewers see reported content as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentFilterLevel {
    #[default]
    #[serde(rename = "MYGRANDMALIKES")]
    Strict,
    #[serde(rename = "MYGRANDMAHATES")]
    Relaxed,
}

impl ContentFilterLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFilterLevel::Strict => "MYGRANDMALIKES",
            ContentFilterLevel::Relaxed => "MYGRANDMAHATES",
        }
    }
}

impl fmt::Display for ContentFilterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentFilterLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MYGRANDMALIKES" => Ok(ContentFilterLevel::Strict),
            "MYGRANDMAHATES" => Ok(ContentFilterLevel::Relaxed),
            _ => Err(ParseError::ContentFilterLevel(s.to_string())),
        }
    }
}
