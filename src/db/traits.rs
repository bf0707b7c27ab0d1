// Database trait — backend-agnostic async interface for all DB operations.
//
// Implementor: SqliteDatabase (wraps rusqlite). All methods are async so a
// natively async backend could sit behind the same interface; callers hold
// an `Arc<dyn Database>`.
//
// The trait mirrors the queries.rs function signatures.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Comment, CommentView, Post, PostView, Profile, VisibilityCount};
use crate::policy::{ContentType, Visibility};
use crate::specs::SqlFilter;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Seeding and moderation ---

    async fn insert_profile(&self, profile: &Profile) -> Result<()>;

    async fn insert_post(&self, post: &Post) -> Result<()>;

    async fn insert_comment(&self, comment: &Comment) -> Result<()>;

    /// Record that `blocker` blocked `blocked`.
    async fn block_user(&self, blocker: &str, blocked: &str) -> Result<()>;

    /// Schedule a post as an advertisement; returns the slot id.
    async fn insert_advertisement(&self, postid: &str, timestart: &str, timeend: &str) -> Result<i64>;

    /// Change a row's moderation label. False if the id is unknown.
    async fn set_visibility(
        &self,
        content_type: ContentType,
        id: &str,
        visibility: Visibility,
    ) -> Result<bool>;

    async fn set_reports(&self, content_type: ContentType, id: &str, reports: i64) -> Result<()>;

    /// Set an account's role mask and sign-up state. False if the uid is unknown.
    async fn set_account_roles(&self, uid: &str, roles_mask: i64, verified: bool) -> Result<bool>;

    // --- Filtered reads ---

    async fn list_profiles(&self, filter: &SqlFilter, limit: i64) -> Result<Vec<Profile>>;

    async fn get_profile(&self, uid: &str, filter: &SqlFilter) -> Result<Option<Profile>>;

    async fn list_posts(
        &self,
        posts: &SqlFilter,
        authors: &SqlFilter,
        limit: i64,
    ) -> Result<Vec<PostView>>;

    async fn list_comments(
        &self,
        postid: &str,
        comments: &SqlFilter,
        authors: &SqlFilter,
    ) -> Result<Vec<CommentView>>;

    // --- Interaction checks ---

    /// True when any of the predicates holds.
    async fn any_predicate_holds(&self, predicates: &SqlFilter) -> Result<bool>;

    async fn content_exists(&self, content_type: ContentType, id: &str) -> Result<bool>;

    // --- Status ---

    async fn visibility_counts(&self) -> Result<Vec<VisibilityCount>>;

    async fn block_count(&self) -> Result<i64>;
}
