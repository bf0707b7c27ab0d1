// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.
//
// The free functions in queries.rs stay usable on a bare Connection, which
// is what the unit tests exercise.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Comment, CommentView, Post, PostView, Profile, VisibilityCount};
use super::traits::Database;
use crate::policy::{ContentType, Visibility};
use crate::specs::SqlFilter;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Fresh in-memory database with the schema applied.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::create_tables(&conn)?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_profile(&conn, profile)
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_post(&conn, post)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_comment(&conn, comment)
    }

    async fn block_user(&self, blocker: &str, blocked: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::block_user(&conn, blocker, blocked)
    }

    async fn insert_advertisement(&self, postid: &str, timestart: &str, timeend: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_advertisement(&conn, postid, timestart, timeend)
    }

    async fn set_visibility(
        &self,
        content_type: ContentType,
        id: &str,
        visibility: Visibility,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::set_visibility(&conn, content_type, id, visibility)
    }

    async fn set_reports(&self, content_type: ContentType, id: &str, reports: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_reports(&conn, content_type, id, reports)
    }

    async fn set_account_roles(&self, uid: &str, roles_mask: i64, verified: bool) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::set_account_roles(&conn, uid, roles_mask, verified)
    }

    async fn list_profiles(&self, filter: &SqlFilter, limit: i64) -> Result<Vec<Profile>> {
        let conn = self.conn.lock().await;
        super::queries::list_profiles(&conn, filter, limit)
    }

    async fn get_profile(&self, uid: &str, filter: &SqlFilter) -> Result<Option<Profile>> {
        let conn = self.conn.lock().await;
        super::queries::get_profile(&conn, uid, filter)
    }

    async fn list_posts(
        &self,
        posts: &SqlFilter,
        authors: &SqlFilter,
        limit: i64,
    ) -> Result<Vec<PostView>> {
        let conn = self.conn.lock().await;
        super::queries::list_posts(&conn, posts, authors, limit)
    }

    async fn list_comments(
        &self,
        postid: &str,
        comments: &SqlFilter,
        authors: &SqlFilter,
    ) -> Result<Vec<CommentView>> {
        let conn = self.conn.lock().await;
        super::queries::list_comments(&conn, postid, comments, authors)
    }

    async fn any_predicate_holds(&self, predicates: &SqlFilter) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::any_predicate_holds(&conn, predicates)
    }

    async fn content_exists(&self, content_type: ContentType, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::content_exists(&conn, content_type, id)
    }

    async fn visibility_counts(&self) -> Result<Vec<VisibilityCount>> {
        let conn = self.conn.lock().await;
        super::queries::visibility_counts(&conn)
    }

    async fn block_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::block_count(&conn)
    }
}
