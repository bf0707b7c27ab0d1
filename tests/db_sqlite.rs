// End-to-end read paths against an in-memory SQLite store.
//
// Every test seeds the same small community and checks what a given viewer
// actually gets back: rows dropped by the composed SQL filter, and rows
// masked by the replacer afterwards.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use shroud::config::ReportThresholds;
use shroud::db::models::{AccountStatus, Comment, Post, Profile};
use shroud::db::sqlite::SqliteDatabase;
use shroud::db::Database;
use shroud::interaction::{InteractionDenied, InteractionGate};
use shroud::pipeline::{feed, profiles};
use shroud::policy::{ApplicationCase, ContentFilterLevel, ContentType, Visibility};
use shroud::specs::{SpecsFactory, ViewerRequest};

fn factory() -> SpecsFactory {
    SpecsFactory::new(
        ReportThresholds {
            user: 5,
            post: 3,
            comment: 5,
        },
        ContentFilterLevel::Strict,
    )
}

fn profile(uid: &str, status: AccountStatus, visibility: Visibility, reports: i64) -> Profile {
    Profile {
        uid: uid.into(),
        username: uid.into(),
        img: Some(format!("/profile/{uid}.jpeg")),
        biography: Some(format!("/userData/{uid}.txt")),
        status,
        visibility,
        reports,
    }
}

fn post(postid: &str, owner: &str, visibility: Visibility, reports: i64) -> Post {
    Post {
        postid: postid.into(),
        userid: owner.into(),
        title: postid.into(),
        media: format!("/image/{postid}.jpeg"),
        cover: None,
        description: format!("by {owner}"),
        visibility,
        reports,
    }
}

fn comment(commentid: &str, postid: &str, owner: &str, reports: i64) -> Comment {
    Comment {
        commentid: commentid.into(),
        postid: postid.into(),
        userid: owner.into(),
        content: format!("{owner} says hi"),
        visibility: Visibility::Normal,
        post_visibility: Visibility::Normal,
        reports,
    }
}

/// The ad window used by `seeded`: all of 2026-01-01.
fn during_ad() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn after_ad() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
}

/// ada: plain account, blocked cyd
/// bob: reported past the user threshold
/// cyd: illegal account
/// dee: deleted account
async fn seeded() -> Arc<dyn Database> {
    let db: Arc<dyn Database> = Arc::new(SqliteDatabase::in_memory().unwrap());

    for p in [
        profile("ada", AccountStatus::Active, Visibility::Normal, 0),
        profile("bob", AccountStatus::Active, Visibility::Normal, 7),
        profile("cyd", AccountStatus::Active, Visibility::Illegal, 0),
        profile("dee", AccountStatus::Deleted, Visibility::Normal, 0),
    ] {
        db.insert_profile(&p).await.unwrap();
    }

    for p in [
        post("sunrise", "ada", Visibility::Normal, 0),
        post("flagged", "ada", Visibility::Hidden, 0),
        post("promo", "ada", Visibility::Normal, 0),
        post("rant", "bob", Visibility::Normal, 9),
        post("quiet", "bob", Visibility::Normal, 2),
        post("contraband", "cyd", Visibility::Illegal, 0),
        post("farewell", "dee", Visibility::Normal, 0),
    ] {
        db.insert_post(&p).await.unwrap();
    }

    for c in [
        comment("c1", "sunrise", "bob", 0),
        comment("c2", "sunrise", "ada", 6),
        comment("c3", "contraband", "bob", 0),
    ] {
        db.insert_comment(&c).await.unwrap();
    }

    db.block_user("ada", "cyd").await.unwrap();
    db.insert_advertisement("promo", "2026-01-01 00:00:00", "2026-01-02 00:00:00")
        .await
        .unwrap();

    db
}

fn sorted_ids(posts: &[shroud::db::models::PostView]) -> Vec<String> {
    let mut ids: Vec<String> = posts.iter().map(|v| v.post.postid.clone()).collect();
    ids.sort();
    ids
}

// ============================================================
// Feed
// ============================================================

#[tokio::test]
async fn feed_for_known_viewer() {
    let db = seeded().await;
    let request = ViewerRequest::new("ada", ApplicationCase::PostFeed);
    let posts = feed::load_feed(&db, &factory(), &request, during_ad(), 50)
        .await
        .unwrap();

    // rant: over threshold, contraband: illegal and blocked, farewell:
    // deleted author, promo: running ad. bob's profile is over the user
    // threshold but authors are only masked, never dropped.
    assert_eq!(sorted_ids(&posts), vec!["flagged", "quiet", "sunrise"]);

    // ada still sees her own hidden post untouched
    let flagged = posts.iter().find(|v| v.post.postid == "flagged").unwrap();
    assert_eq!(flagged.post.title, "flagged");
    assert_eq!(flagged.post.visibility, Visibility::Hidden);

    let quiet = posts.iter().find(|v| v.post.postid == "quiet").unwrap();
    assert_eq!(quiet.post.title, "quiet");
    assert_eq!(quiet.author.username, "hidden_account");
    assert_eq!(quiet.author.visibility, Visibility::Hidden);
}

#[tokio::test]
async fn feed_for_anonymous_viewer() {
    let db = seeded().await;
    let request = ViewerRequest::new("", ApplicationCase::PostFeed);
    let posts = feed::load_feed(&db, &factory(), &request, during_ad(), 50)
        .await
        .unwrap();
    // No owner exception without a viewer
    assert_eq!(sorted_ids(&posts), vec!["quiet", "sunrise"]);
}

#[tokio::test]
async fn expired_ad_returns_to_the_feed() {
    let db = seeded().await;
    let request = ViewerRequest::new("", ApplicationCase::PostFeed);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50)
        .await
        .unwrap();
    assert!(posts.iter().any(|v| v.post.postid == "promo"));
}

#[tokio::test]
async fn report_threshold_boundary() {
    let db = seeded().await;
    let request = ViewerRequest::new("ada", ApplicationCase::PostFeed);

    let before = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    assert!(before.iter().any(|v| v.post.postid == "quiet"));

    db.set_reports(ContentType::Post, "quiet", 3).await.unwrap();
    let after = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    assert!(!after.iter().any(|v| v.post.postid == "quiet"));
}

#[tokio::test]
async fn relabelling_as_illegal_removes_from_feed() {
    let db = seeded().await;
    assert!(db
        .set_visibility(ContentType::Post, "sunrise", Visibility::Illegal)
        .await
        .unwrap());
    assert!(!db
        .set_visibility(ContentType::Post, "missing", Visibility::Illegal)
        .await
        .unwrap());

    let request = ViewerRequest::new("ada", ApplicationCase::PostFeed);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    assert!(!posts.iter().any(|v| v.post.postid == "sunrise"));
}

#[tokio::test]
async fn relaxed_filter_shows_reported_posts() {
    let db = seeded().await;
    let request =
        ViewerRequest::new("dee", ApplicationCase::PostFeed).with_filter(ContentFilterLevel::Relaxed);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    let ids = sorted_ids(&posts);
    assert!(ids.contains(&"rant".to_string()));
    assert!(!ids.contains(&"contraband".to_string()));

    let rant = posts.iter().find(|v| v.post.postid == "rant").unwrap();
    assert_eq!(rant.post.title, "rant");
    assert_eq!(rant.author.username, "bob");
}

#[tokio::test]
async fn search_by_meta_masks_instead_of_dropping() {
    let db = seeded().await;
    let request = ViewerRequest::new("dee", ApplicationCase::SearchByMeta);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();

    // Illegal posts are still dropped, hidden ones are masked in place
    assert!(!posts.iter().any(|v| v.post.postid == "contraband"));
    let rant = posts.iter().find(|v| v.post.postid == "rant").unwrap();
    assert_eq!(rant.post.title, "this post is hidden");
    assert_eq!(rant.post.visibility, Visibility::Hidden);
}

#[tokio::test]
async fn limit_caps_the_feed() {
    let db = seeded().await;
    let request = ViewerRequest::new("", ApplicationCase::SearchById);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 2).await.unwrap();
    assert_eq!(posts.len(), 2);
}

#[tokio::test]
async fn shop_and_system_accounts_stay_out_of_the_feed() {
    let db = seeded().await;
    for (uid, postid) in [("eve", "storefront"), ("sys", "payout"), ("fay", "hello")] {
        db.insert_profile(&profile(uid, AccountStatus::Active, Visibility::Normal, 0))
            .await
            .unwrap();
        db.insert_post(&post(postid, uid, Visibility::Normal, 0)).await.unwrap();
    }
    // eve runs a shop, sys is a service account, fay never finished sign-up
    assert!(db.set_account_roles("eve", 32, true).await.unwrap());
    assert!(db.set_account_roles("sys", 64, true).await.unwrap());
    assert!(db.set_account_roles("fay", 0, false).await.unwrap());

    let request = ViewerRequest::new("ada", ApplicationCase::PostFeed);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    let ids = sorted_ids(&posts);
    assert_eq!(ids, vec!["flagged", "promo", "quiet", "sunrise"]);

    // A lookup by id still returns them
    let request = ViewerRequest::new("ada", ApplicationCase::SearchById);
    let posts = feed::load_feed(&db, &factory(), &request, after_ad(), 50).await.unwrap();
    let ids = sorted_ids(&posts);
    for postid in ["storefront", "payout", "hello"] {
        assert!(ids.contains(&postid.to_string()), "{postid}");
    }
    let storefront = posts.iter().find(|v| v.post.postid == "storefront").unwrap();
    assert_eq!(storefront.post.title, "storefront");
    assert_eq!(storefront.author.username, "eve");
}

#[tokio::test]
async fn shop_accounts_are_left_out_of_profile_search() {
    let db = seeded().await;
    db.insert_profile(&profile("eve", AccountStatus::Active, Visibility::Normal, 0))
        .await
        .unwrap();
    db.set_account_roles("eve", 32, true).await.unwrap();

    let request = ViewerRequest::new("bob", ApplicationCase::SearchByMeta);
    let found = profiles::search_profiles(&db, &factory(), &request, 50).await.unwrap();
    assert!(!found.iter().any(|p| p.uid == "eve"));

    let eve = profiles::load_profile(&db, &factory(), "bob", "eve", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(eve.username, "eve");
}

// ============================================================
// Comments
// ============================================================

#[tokio::test]
async fn comments_are_masked_for_others_and_kept_for_owner() {
    let db = seeded().await;

    let request = ViewerRequest::new("bob", ApplicationCase::PostFeed);
    let rows = feed::load_comments(&db, &factory(), &request, "sunrise").await.unwrap();
    assert_eq!(rows.len(), 2);
    let c1 = rows.iter().find(|v| v.comment.commentid == "c1").unwrap();
    let c2 = rows.iter().find(|v| v.comment.commentid == "c2").unwrap();
    assert_eq!(c1.comment.content, "bob says hi");
    assert_eq!(c1.author.username, "bob");
    assert_eq!(c2.comment.content, "this comment is hidden");

    let request = ViewerRequest::new("ada", ApplicationCase::PostFeed);
    let rows = feed::load_comments(&db, &factory(), &request, "sunrise").await.unwrap();
    let c2 = rows.iter().find(|v| v.comment.commentid == "c2").unwrap();
    assert_eq!(c2.comment.content, "ada says hi");
    // bob is over the user threshold
    let c1 = rows.iter().find(|v| v.comment.commentid == "c1").unwrap();
    assert_eq!(c1.author.username, "hidden_account");
}

#[tokio::test]
async fn comment_under_illegal_post_is_illegal_even_for_its_author() {
    let db = seeded().await;
    let request = ViewerRequest::new("bob", ApplicationCase::SearchById);
    let rows = feed::load_comments(&db, &factory(), &request, "contraband").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment.post_visibility, Visibility::Illegal);
    assert_eq!(rows[0].comment.content, "this comment is illegal");
    assert_eq!(rows[0].comment.visibility, Visibility::Illegal);
}

#[tokio::test]
async fn blocked_viewer_does_not_see_blockers_comments() {
    let db = seeded().await;
    let request = ViewerRequest::new("cyd", ApplicationCase::SearchById);
    let rows = feed::load_comments(&db, &factory(), &request, "sunrise").await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|v| v.comment.commentid.as_str()).collect();
    assert_eq!(ids, vec!["c1"]);
}

// ============================================================
// Profiles
// ============================================================

#[tokio::test]
async fn profile_lookups() {
    let db = seeded().await;
    let f = factory();

    let bob = profiles::load_profile(&db, &f, "ada", "bob", None).await.unwrap().unwrap();
    assert_eq!(bob.username, "hidden_account");

    let me = profiles::load_profile(&db, &f, "bob", "bob", None).await.unwrap().unwrap();
    assert_eq!(me.username, "bob");
    assert_eq!(me.reports, 7);

    let cyd = profiles::load_profile(&db, &f, "bob", "cyd", None).await.unwrap().unwrap();
    assert_eq!(cyd.username, "illegal_account");
    assert_eq!(cyd.visibility, Visibility::Illegal);

    let dee = profiles::load_profile(&db, &f, "bob", "dee", None).await.unwrap().unwrap();
    assert_eq!(dee.username, "Deleted_Account");

    // ada blocked cyd
    assert!(profiles::load_profile(&db, &f, "ada", "cyd", None).await.unwrap().is_none());
    assert!(profiles::load_profile(&db, &f, "ada", "nobody", None).await.unwrap().is_none());
}

#[tokio::test]
async fn profile_search_by_meta() {
    let db = seeded().await;
    let request = ViewerRequest::new("bob", ApplicationCase::SearchByMeta);
    let found = profiles::search_profiles(&db, &factory(), &request, 50).await.unwrap();

    let uids: Vec<&str> = found.iter().map(|p| p.uid.as_str()).collect();
    assert_eq!(uids, vec!["ada", "bob", "cyd"]);
    assert_eq!(found[1].username, "bob");
    assert_eq!(found[2].username, "illegal_account");
}

// ============================================================
// Interaction gate
// ============================================================

fn gate(db: &Arc<dyn Database>, viewer: &str, judged: ContentType) -> InteractionGate {
    let request = ViewerRequest::new(viewer, ApplicationCase::SearchById);
    InteractionGate::new(db.clone(), factory().for_request(&request, judged))
}

#[tokio::test]
async fn gate_truth_table() {
    let db = seeded().await;

    let cases = [
        ("bob", ContentType::Post, "sunrise", true),
        ("bob", ContentType::Post, "contraband", false),
        ("bob", ContentType::Comment, "c3", false),
        ("bob", ContentType::User, "cyd", false),
        ("ada", ContentType::User, "bob", true),
        // ada blocked cyd: neither side may interact
        ("cyd", ContentType::Post, "sunrise", false),
        ("cyd", ContentType::Comment, "c2", false),
        ("ada", ContentType::Comment, "c1", true),
        ("", ContentType::Post, "flagged", true),
    ];
    for (viewer, target_type, id, expected) in cases {
        let allowed = gate(&db, viewer, target_type).can_interact(target_type, id).await.unwrap();
        assert_eq!(allowed, expected, "{viewer} -> {target_type} {id}");
    }
}

#[tokio::test]
async fn gate_ignores_case() {
    let db = seeded().await;
    for case in ApplicationCase::ALL {
        let request = ViewerRequest::new("bob", case);
        let g = InteractionGate::new(db.clone(), factory().for_request(&request, ContentType::Post));
        assert!(!g.can_interact(ContentType::Post, "contraband").await.unwrap(), "{case}");
        assert!(g.can_interact(ContentType::Post, "sunrise").await.unwrap(), "{case}");
    }
}

#[tokio::test]
async fn ensure_can_interact_returns_typed_error() {
    let db = seeded().await;
    let err = gate(&db, "bob", ContentType::Post)
        .ensure_can_interact(ContentType::Post, "contraband")
        .await
        .unwrap_err();
    let denied = err.downcast_ref::<InteractionDenied>().unwrap();
    assert_eq!(denied.target_id, "contraband");
    assert_eq!(denied.content_type, ContentType::Post);

    gate(&db, "bob", ContentType::Post)
        .ensure_can_interact(ContentType::Post, "sunrise")
        .await
        .unwrap();
}

// ============================================================
// Status
// ============================================================

#[tokio::test]
async fn visibility_counts_and_blocks() {
    let db = seeded().await;
    let counts = db.visibility_counts().await.unwrap();
    let posts = counts
        .iter()
        .find(|c| c.content_type == ContentType::Post)
        .unwrap();
    assert_eq!((posts.normal, posts.hidden, posts.illegal), (5, 1, 1));
    assert_eq!(posts.total(), 7);
    assert_eq!(db.block_count().await.unwrap(), 1);

    // Blocking twice is a no-op
    db.block_user("ada", "cyd").await.unwrap();
    assert_eq!(db.block_count().await.unwrap(), 1);
}
