// Database queries — reads that accept composed visibility filters, plus the
// writes used to seed and moderate content.
//
// Every database interaction goes through this module. Read queries alias
// their tables as `u` (users), `p` (posts) and `c` (comments) so predicates
// generated by the specifications can be dropped straight into the WHERE
// clause.

use anyhow::{Context, Result};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{AccountStatus, Comment, CommentView, Post, PostView, Profile, VisibilityCount};
use crate::policy::{ContentType, Visibility};
use crate::specs::{SqlFilter, SqlValue};

/// Columns of an aliased `u` row joined with `users_info ui`.
const PROFILE_COLUMNS: &str =
    "u.uid, u.username, u.img, u.biography, u.status, u.visibility_status, COALESCE(ui.reports, 0)";

/// Read a profile starting at column `offset`.
fn profile_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Profile> {
    Ok(Profile {
        uid: row.get(offset)?,
        username: row.get(offset + 1)?,
        img: row.get(offset + 2)?,
        biography: row.get(offset + 3)?,
        status: AccountStatus::from_code(row.get(offset + 4)?),
        visibility: row.get(offset + 5)?,
        reports: row.get(offset + 6)?,
    })
}

/// Prepare `sql`, bind every named parameter of `filter`, and collect rows.
fn query_filtered<T, F>(conn: &Connection, sql: &str, filter: &SqlFilter, map: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let named = filter.named_params();
    let bound: Vec<(&str, &dyn ToSql)> = named
        .iter()
        .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
        .collect();

    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("Failed to prepare filtered query: {sql}"))?;
    let rows = stmt.query_map(bound.as_slice(), map)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn where_or_true(filter: &SqlFilter) -> String {
    filter.where_sql().unwrap_or_else(|| "1 = 1".to_string())
}

// --- Seeding and moderation writes ---

/// Insert a user and their report counter.
pub fn insert_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    conn.execute(
        "INSERT INTO users (uid, username, img, biography, status, visibility_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            profile.uid,
            profile.username,
            profile.img,
            profile.biography,
            profile.status.code(),
            profile.visibility,
        ],
    )
    .with_context(|| format!("Failed to insert user {}", profile.uid))?;
    conn.execute(
        "INSERT INTO users_info (userid, reports) VALUES (?1, ?2)",
        params![profile.uid, profile.reports],
    )?;
    Ok(())
}

/// Insert a post and its report counter.
pub fn insert_post(conn: &Connection, post: &Post) -> Result<()> {
    conn.execute(
        "INSERT INTO posts (postid, userid, title, media, cover, mediadescription, visibility_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            post.postid,
            post.userid,
            post.title,
            post.media,
            post.cover,
            post.description,
            post.visibility,
        ],
    )
    .with_context(|| format!("Failed to insert post {}", post.postid))?;
    conn.execute(
        "INSERT INTO post_info (postid, reports) VALUES (?1, ?2)",
        params![post.postid, post.reports],
    )?;
    Ok(())
}

/// Insert a comment and its report counter. `post_visibility` is derived
/// from the parent post on read, so it is not stored.
pub fn insert_comment(conn: &Connection, comment: &Comment) -> Result<()> {
    conn.execute(
        "INSERT INTO comments (commentid, postid, userid, content, visibility_status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            comment.commentid,
            comment.postid,
            comment.userid,
            comment.content,
            comment.visibility,
        ],
    )
    .with_context(|| format!("Failed to insert comment {}", comment.commentid))?;
    conn.execute(
        "INSERT INTO comment_info (commentid, reports) VALUES (?1, ?2)",
        params![comment.commentid, comment.reports],
    )?;
    Ok(())
}

/// Record that `blocker` blocked `blocked`. Re-blocking is a no-op.
pub fn block_user(conn: &Connection, blocker: &str, blocked: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO user_block_user (blockerid, blockedid) VALUES (?1, ?2)",
        params![blocker, blocked],
    )?;
    Ok(())
}

/// Schedule `postid` as an advertisement between two `%Y-%m-%d %H:%M:%S` times.
pub fn insert_advertisement(conn: &Connection, postid: &str, timestart: &str, timeend: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO advertisements (postid, timestart, timeend) VALUES (?1, ?2, ?3)",
        params![postid, timestart, timeend],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Change the moderation label of one row. Returns false if the id is unknown.
pub fn set_visibility(
    conn: &Connection,
    content_type: ContentType,
    id: &str,
    visibility: Visibility,
) -> Result<bool> {
    let sql = format!(
        "UPDATE {} SET visibility_status = ?1 WHERE {} = ?2",
        content_type.table(),
        content_type.id_column()
    );
    let changed = conn.execute(&sql, params![visibility, id])?;
    Ok(changed > 0)
}

/// Set an account's role mask and sign-up state. False if the uid is unknown.
pub fn set_account_roles(conn: &Connection, uid: &str, roles_mask: i64, verified: bool) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE users SET roles_mask = ?1, verified = ?2 WHERE uid = ?3",
        params![roles_mask, verified, uid],
    )?;
    Ok(changed > 0)
}

/// Overwrite the active report count of one row.
pub fn set_reports(conn: &Connection, content_type: ContentType, id: &str, reports: i64) -> Result<()> {
    let sql = format!(
        "INSERT INTO {info} ({key}, reports) VALUES (?1, ?2)
         ON CONFLICT({key}) DO UPDATE SET reports = ?2",
        info = content_type.info_table(),
        key = content_type.info_key_column(),
    );
    conn.execute(&sql, params![id, reports])?;
    Ok(())
}

// --- Filtered reads ---

/// All profiles surviving `filter` (aliased `u`), ordered by username.
pub fn list_profiles(conn: &Connection, filter: &SqlFilter, limit: i64) -> Result<Vec<Profile>> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS}
         FROM users u
         LEFT JOIN users_info ui ON ui.userid = u.uid
         WHERE {where_sql}
         ORDER BY u.username, u.uid
         LIMIT :limit",
        where_sql = where_or_true(filter),
    );
    let mut bound = filter.clone();
    bound.params.insert("limit".into(), SqlValue::Integer(limit));
    query_filtered(conn, &sql, &bound, |row| profile_from_row(row, 0))
}

/// One profile by uid, if it survives `filter`.
pub fn get_profile(conn: &Connection, uid: &str, filter: &SqlFilter) -> Result<Option<Profile>> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS}
         FROM users u
         LEFT JOIN users_info ui ON ui.userid = u.uid
         WHERE u.uid = :target_uid AND {where_sql}",
        where_sql = where_or_true(filter),
    );
    let mut bound = filter.clone();
    bound.params.insert("target_uid".into(), SqlValue::from(uid));
    let mut rows = query_filtered(conn, &sql, &bound, |row| profile_from_row(row, 0))?;
    Ok(rows.pop())
}

/// Newest posts with their authors. `posts` filters the `p` rows and
/// `authors` the joined `u` rows.
pub fn list_posts(
    conn: &Connection,
    posts: &SqlFilter,
    authors: &SqlFilter,
    limit: i64,
) -> Result<Vec<PostView>> {
    let mut bound = posts.clone();
    bound.merge(authors.clone());
    let sql = format!(
        "SELECT p.postid, p.userid, p.title, p.media, p.cover, p.mediadescription,
                p.visibility_status, COALESCE(pi.reports, 0),
                {PROFILE_COLUMNS}
         FROM posts p
         JOIN users u ON u.uid = p.userid
         LEFT JOIN post_info pi ON pi.postid = p.postid
         LEFT JOIN users_info ui ON ui.userid = u.uid
         WHERE {where_sql}
         ORDER BY p.createdat DESC, p.postid
         LIMIT :limit",
        where_sql = where_or_true(&bound),
    );
    bound.params.insert("limit".into(), SqlValue::Integer(limit));
    query_filtered(conn, &sql, &bound, |row| {
        Ok(PostView {
            post: Post {
                postid: row.get(0)?,
                userid: row.get(1)?,
                title: row.get(2)?,
                media: row.get(3)?,
                cover: row.get(4)?,
                description: row.get(5)?,
                visibility: row.get(6)?,
                reports: row.get(7)?,
            },
            author: profile_from_row(row, 8)?,
        })
    })
}

/// Comments of one post with their authors. `comments` filters the `c`
/// rows and `authors` the joined `u` rows.
pub fn list_comments(
    conn: &Connection,
    postid: &str,
    comments: &SqlFilter,
    authors: &SqlFilter,
) -> Result<Vec<CommentView>> {
    let mut bound = comments.clone();
    bound.merge(authors.clone());
    let sql = format!(
        "SELECT c.commentid, c.postid, c.userid, c.content, c.visibility_status,
                cp.visibility_status, COALESCE(ci.reports, 0),
                {PROFILE_COLUMNS}
         FROM comments c
         JOIN posts cp ON cp.postid = c.postid
         JOIN users u ON u.uid = c.userid
         LEFT JOIN comment_info ci ON ci.commentid = c.commentid
         LEFT JOIN users_info ui ON ui.userid = u.uid
         WHERE c.postid = :parent_postid AND {where_sql}
         ORDER BY c.createdat, c.commentid",
        where_sql = where_or_true(&bound),
    );
    bound.params.insert("parent_postid".into(), SqlValue::from(postid));
    query_filtered(conn, &sql, &bound, |row| {
        Ok(CommentView {
            comment: Comment {
                commentid: row.get(0)?,
                postid: row.get(1)?,
                userid: row.get(2)?,
                content: row.get(3)?,
                visibility: row.get(4)?,
                post_visibility: row.get(5)?,
                reports: row.get(6)?,
            },
            author: profile_from_row(row, 7)?,
        })
    })
}

/// Evaluate interaction predicates. True when any of them holds.
pub fn any_predicate_holds(conn: &Connection, predicates: &SqlFilter) -> Result<bool> {
    let Some(any_sql) = predicates.any_sql() else {
        return Ok(false);
    };
    let sql = format!("SELECT CASE WHEN {any_sql} THEN 1 ELSE 0 END");
    let mut rows = query_filtered(conn, &sql, predicates, |row| row.get::<_, i64>(0))?;
    Ok(rows.pop() == Some(1))
}

/// Whether a row with this id exists at all.
pub fn content_exists(conn: &Connection, content_type: ContentType, id: &str) -> Result<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ?1",
        content_type.table(),
        content_type.id_column()
    );
    let found: Option<i64> = conn.query_row(&sql, params![id], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

// --- Status ---

/// Row counts per visibility for every content type.
pub fn visibility_counts(conn: &Connection) -> Result<Vec<VisibilityCount>> {
    let mut counts = Vec::with_capacity(ContentType::ALL.len());
    for content_type in ContentType::ALL {
        let sql = format!(
            "SELECT
                COALESCE(SUM(visibility_status = 'normal'), 0),
                COALESCE(SUM(visibility_status = 'hidden'), 0),
                COALESCE(SUM(visibility_status = 'illegal'), 0)
             FROM {}",
            content_type.table()
        );
        let (normal, hidden, illegal) =
            conn.query_row(&sql, [], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        counts.push(VisibilityCount {
            content_type,
            normal,
            hidden,
            illegal,
        });
    }
    Ok(counts)
}

/// Number of block relationships recorded.
pub fn block_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM user_block_user", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn profile(uid: &str) -> Profile {
        Profile {
            uid: uid.into(),
            username: format!("user-{uid}"),
            img: None,
            biography: None,
            status: AccountStatus::Active,
            visibility: Visibility::Normal,
            reports: 0,
        }
    }

    fn post(postid: &str, owner: &str) -> Post {
        Post {
            postid: postid.into(),
            userid: owner.into(),
            title: format!("title {postid}"),
            media: "/image/a.jpeg".into(),
            cover: None,
            description: "desc".into(),
            visibility: Visibility::Normal,
            reports: 0,
        }
    }

    #[test]
    fn test_profile_roundtrip_through_store() {
        let conn = setup();
        let mut p = profile("u1");
        p.reports = 4;
        p.visibility = Visibility::Hidden;
        insert_profile(&conn, &p).unwrap();

        let loaded = get_profile(&conn, "u1", &SqlFilter::default()).unwrap().unwrap();
        assert_eq!(loaded, p);
        assert!(get_profile(&conn, "missing", &SqlFilter::default()).unwrap().is_none());
    }

    #[test]
    fn test_list_posts_applies_filter() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();
        insert_post(&conn, &post("p1", "u1")).unwrap();
        insert_post(&conn, &post("p2", "u1")).unwrap();

        let only_p2 = SqlFilter::clause("p.postid = :only", [("only", SqlValue::from("p2"))]);
        let rows = list_posts(&conn, &only_p2, &SqlFilter::default(), 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].post.postid, "p2");
        assert_eq!(rows[0].author.uid, "u1");
    }

    #[test]
    fn test_comments_carry_parent_visibility() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();
        let mut parent = post("p1", "u1");
        parent.visibility = Visibility::Illegal;
        insert_post(&conn, &parent).unwrap();
        insert_comment(
            &conn,
            &Comment {
                commentid: "c1".into(),
                postid: "p1".into(),
                userid: "u1".into(),
                content: "hello".into(),
                visibility: Visibility::Normal,
                post_visibility: Visibility::Normal,
                reports: 2,
            },
        )
        .unwrap();

        let rows = list_comments(&conn, "p1", &SqlFilter::default(), &SqlFilter::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment.post_visibility, Visibility::Illegal);
        assert_eq!(rows[0].comment.reports, 2);
    }

    #[test]
    fn test_set_visibility_and_reports() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();
        insert_post(&conn, &post("p1", "u1")).unwrap();

        assert!(set_visibility(&conn, ContentType::Post, "p1", Visibility::Hidden).unwrap());
        assert!(!set_visibility(&conn, ContentType::Post, "nope", Visibility::Hidden).unwrap());
        set_reports(&conn, ContentType::Post, "p1", 9).unwrap();

        let rows = list_posts(&conn, &SqlFilter::default(), &SqlFilter::default(), 10).unwrap();
        assert_eq!(rows[0].post.visibility, Visibility::Hidden);
        assert_eq!(rows[0].post.reports, 9);
    }

    #[test]
    fn test_set_account_roles() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();

        assert!(set_account_roles(&conn, "u1", 32, false).unwrap());
        assert!(!set_account_roles(&conn, "nobody", 32, false).unwrap());

        let (roles, verified): (i64, i64) = conn
            .query_row("SELECT roles_mask, verified FROM users WHERE uid = 'u1'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((roles, verified), (32, 0));
    }

    #[test]
    fn test_any_predicate_holds() {
        let conn = setup();
        assert!(!any_predicate_holds(&conn, &SqlFilter::default()).unwrap());

        let mut predicates = SqlFilter::clause("1 = :one", [("one", SqlValue::from(2))]);
        assert!(!any_predicate_holds(&conn, &predicates).unwrap());
        predicates.merge(SqlFilter::clause("2 = :two", [("two", SqlValue::from(2))]));
        assert!(any_predicate_holds(&conn, &predicates).unwrap());
    }

    #[test]
    fn test_visibility_counts() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();
        let mut hidden = post("p1", "u1");
        hidden.visibility = Visibility::Hidden;
        insert_post(&conn, &hidden).unwrap();
        insert_post(&conn, &post("p2", "u1")).unwrap();

        let counts = visibility_counts(&conn).unwrap();
        let posts = counts
            .iter()
            .find(|c| c.content_type == ContentType::Post)
            .unwrap();
        assert_eq!((posts.normal, posts.hidden, posts.illegal), (1, 1, 0));
        assert_eq!(posts.total(), 2);
    }

    #[test]
    fn test_block_user_is_idempotent() {
        let conn = setup();
        insert_profile(&conn, &profile("u1")).unwrap();
        insert_profile(&conn, &profile("u2")).unwrap();
        block_user(&conn, "u1", "u2").unwrap();
        block_user(&conn, "u1", "u2").unwrap();
        assert_eq!(block_count(&conn).unwrap(), 1);
        assert!(content_exists(&conn, ContentType::User, "u2").unwrap());
        assert!(!content_exists(&conn, ContentType::Post, "p1").unwrap());
    }
}
