// Post and comment read paths.
//
// Each read follows the same two steps: ask the specification set for one
// SQL filter per displayed table and run the query, then hand every fetched
// object to the replacer. Rows the SQL already dropped never reach step two.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::composer::SpecificationSet;
use crate::db::models::{CommentView, PostView};
use crate::db::Database;
use crate::masking::Replaceable;
use crate::policy::ContentType;
use crate::specs::{SpecsFactory, ViewerRequest};

/// Mask a post and its author in place. Returns how many objects changed.
pub fn mask_post_view(specs: &SpecificationSet, view: &mut PostView) -> usize {
    let mut masked = 0;
    if specs.apply_replacement(&mut Replaceable::from(&mut view.post)).is_some() {
        masked += 1;
    }
    if specs.apply_replacement(&mut Replaceable::from(&mut view.author)).is_some() {
        masked += 1;
    }
    masked
}

/// Mask a comment and its author in place. Returns how many objects changed.
pub fn mask_comment_view(specs: &SpecificationSet, view: &mut CommentView) -> usize {
    let mut masked = 0;
    if specs.apply_replacement(&mut Replaceable::from(&mut view.comment)).is_some() {
        masked += 1;
    }
    if specs.apply_replacement(&mut Replaceable::from(&mut view.author)).is_some() {
        masked += 1;
    }
    masked
}

/// Load the newest posts for a viewer, filtered and masked.
pub async fn load_feed(
    db: &Arc<dyn Database>,
    factory: &SpecsFactory,
    request: &ViewerRequest,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<PostView>> {
    let specs = factory.for_feed(request, now);
    let posts = specs.build_sql_filter(ContentType::Post);
    let authors = specs.build_sql_filter(ContentType::User);

    let mut rows = db.list_posts(&posts, &authors, limit).await?;
    let masked: usize = rows.iter_mut().map(|view| mask_post_view(&specs, view)).sum();

    info!(
        case = %request.case,
        returned = rows.len(),
        masked,
        "feed loaded"
    );
    Ok(rows)
}

/// Load the comments under one post, filtered and masked.
pub async fn load_comments(
    db: &Arc<dyn Database>,
    factory: &SpecsFactory,
    request: &ViewerRequest,
    postid: &str,
) -> Result<Vec<CommentView>> {
    let specs = factory.for_request(request, ContentType::Comment);
    let comments = specs.build_sql_filter(ContentType::Comment);
    let authors = specs.build_sql_filter(ContentType::User);

    let mut rows = db.list_comments(postid, &comments, &authors).await?;
    let masked: usize = rows
        .iter_mut()
        .map(|view| mask_comment_view(&specs, view))
        .sum();

    info!(postid, returned = rows.len(), masked, "comments loaded");
    Ok(rows)
}
