// Data models — Rust structs that map to database rows.
//
// These are the objects the read paths hand to the replacer. Queries build
// them from rows; the masking layer only ever sees these structs.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::policy::{ContentType, Visibility};

// Visibility is stored as its lowercase name in `visibility_status`.
impl FromSql for Visibility {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: crate::policy::ParseError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Visibility {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Account lifecycle status stored in `users.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
    Deleted,
}

impl AccountStatus {
    /// Integer code stored in the database (0 is the only active code).
    pub fn code(&self) -> i64 {
        match self {
            AccountStatus::Active => 0,
            AccountStatus::Suspended => 1,
            AccountStatus::Deleted => 6,
        }
    }

    /// Unknown codes are treated as deleted so they never render as live accounts.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => AccountStatus::Active,
            1 => AccountStatus::Suspended,
            _ => AccountStatus::Deleted,
        }
    }
}

/// A user profile as returned by profile lookups and author joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub uid: String,
    pub username: String,
    pub img: Option<String>,
    pub biography: Option<String>,
    pub status: AccountStatus,
    pub visibility: Visibility,
    /// Active report count from `users_info`.
    pub reports: i64,
}

/// A post row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub postid: String,
    pub userid: String,
    pub title: String,
    pub media: String,
    pub cover: Option<String>,
    pub description: String,
    pub visibility: Visibility,
    pub reports: i64,
}

/// A comment row. Carries its parent post's visibility so illegality can be
/// inherited without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub commentid: String,
    pub postid: String,
    pub userid: String,
    pub content: String,
    pub visibility: Visibility,
    pub post_visibility: Visibility,
    pub reports: i64,
}

/// A post together with its author, as shown in feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub post: Post,
    pub author: Profile,
}

/// A comment together with its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Profile,
}

/// Row counts per visibility for one content type, shown by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibilityCount {
    pub content_type: ContentType,
    pub normal: i64,
    pub hidden: i64,
    pub illegal: i64,
}

impl VisibilityCount {
    pub fn total(&self) -> i64 {
        self.normal + self.hidden + self.illegal
    }
}
