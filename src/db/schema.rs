// Database schema — table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.
//
// The content tables carry `visibility_status` ('normal' / 'hidden' /
// 'illegal'); active report counts live in the matching *_info table so the
// hidden-content predicates can join on them.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            uid TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            img TEXT,
            biography TEXT,
            status INTEGER NOT NULL DEFAULT 0,            -- 0 active, 1 suspended, 6 deleted
            visibility_status TEXT NOT NULL DEFAULT 'normal',
            createdat TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users_info (
            userid TEXT PRIMARY KEY REFERENCES users(uid),
            reports INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS posts (
            postid TEXT PRIMARY KEY,
            userid TEXT NOT NULL REFERENCES users(uid),
            title TEXT NOT NULL,
            media TEXT NOT NULL DEFAULT '',
            cover TEXT,
            mediadescription TEXT NOT NULL DEFAULT '',
            visibility_status TEXT NOT NULL DEFAULT 'normal',
            createdat TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS post_info (
            postid TEXT PRIMARY KEY REFERENCES posts(postid),
            reports INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS comments (
            commentid TEXT PRIMARY KEY,
            postid TEXT NOT NULL REFERENCES posts(postid),
            userid TEXT NOT NULL REFERENCES users(uid),
            content TEXT NOT NULL,
            visibility_status TEXT NOT NULL DEFAULT 'normal',
            createdat TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS comment_info (
            commentid TEXT PRIMARY KEY REFERENCES comments(commentid),
            reports INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_posts_user ON posts(userid);
        CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(postid);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: block relationships between users.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE TABLE user_block_user (
                blockerid TEXT NOT NULL REFERENCES users(uid),
                blockedid TEXT NOT NULL REFERENCES users(uid),
                createdat TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (blockerid, blockedid)
            );
            CREATE INDEX idx_block_blocked ON user_block_user(blockedid);",
        )
    })?;

    // Migration v3: advertisement slots. Times use '%Y-%m-%d %H:%M:%S' in UTC
    // so they compare correctly as text.
    run_migration(conn, 3, |c| {
        c.execute_batch(
            "CREATE TABLE advertisements (
                advertisementid INTEGER PRIMARY KEY AUTOINCREMENT,
                postid TEXT NOT NULL REFERENCES posts(postid),
                timestart TEXT NOT NULL,
                timeend TEXT NOT NULL
            );
            CREATE INDEX idx_ads_post ON advertisements(postid);",
        )
    })?;

    // Migration v4: account roles (bit mask) and verification. Existing
    // accounts become plain verified users.
    run_migration(conn, 4, |c| {
        c.execute_batch(
            "ALTER TABLE users ADD COLUMN roles_mask INTEGER NOT NULL DEFAULT 0;
            ALTER TABLE users ADD COLUMN verified INTEGER NOT NULL DEFAULT 1;",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
