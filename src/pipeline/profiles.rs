// Profile read paths: a single profile by id, and a filtered profile search.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::db::models::Profile;
use crate::db::Database;
use crate::masking::Replaceable;
use crate::policy::{ContentFilterLevel, ContentType};
use crate::specs::{SpecsFactory, ViewerRequest};

/// Load `target_uid` as seen by `viewer_id`. The viewer's own profile is
/// never masked.
pub async fn load_profile(
    db: &Arc<dyn Database>,
    factory: &SpecsFactory,
    viewer_id: &str,
    target_uid: &str,
    content_filter: Option<ContentFilterLevel>,
) -> Result<Option<Profile>> {
    let specs = factory.for_profile(viewer_id, target_uid, content_filter);
    let filter = specs.build_sql_filter(ContentType::User);

    let Some(mut profile) = db.get_profile(target_uid, &filter).await? else {
        return Ok(None);
    };
    let pattern = specs.apply_replacement(&mut Replaceable::from(&mut profile));
    info!(
        target = target_uid,
        pattern = pattern.map(|p| p.as_str()).unwrap_or("none"),
        "profile loaded"
    );
    Ok(Some(profile))
}

/// Profiles surviving the request's filters, masked.
pub async fn search_profiles(
    db: &Arc<dyn Database>,
    factory: &SpecsFactory,
    request: &ViewerRequest,
    limit: i64,
) -> Result<Vec<Profile>> {
    let specs = factory.for_request(request, ContentType::User);
    let filter = specs.build_sql_filter(ContentType::User);

    let mut profiles = db.list_profiles(&filter, limit).await?;
    for profile in profiles.iter_mut() {
        specs.apply_replacement(&mut Replaceable::from(profile));
    }
    Ok(profiles)
}
