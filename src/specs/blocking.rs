// Blocking relationships between the viewer and content owners.
//
// `user_block_user(blockerid, blockedid)` holds one row per block. Both
// directions drop the owner's rows from lists and refuse direct
// interactions. Anonymous viewers have no relationships, so these
// specifications need a viewer id to say anything.

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::ContentType;

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

/// Which column of `user_block_user` holds the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ViewerIsBlocker,
    ViewerIsBlocked,
}

impl Direction {
    /// `(viewer column, owner column)`
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Direction::ViewerIsBlocker => ("blockerid", "blockedid"),
            Direction::ViewerIsBlocked => ("blockedid", "blockerid"),
        }
    }
}

fn block_exists(
    name: &str,
    direction: Direction,
    viewer_id: &str,
    content_type: ContentType,
    owner: &str,
) -> (String, Vec<(String, SqlValue)>) {
    let (viewer_col, owner_col) = direction.columns();
    let viewer = param_name(name, content_type, "viewer");
    let clause = format!(
        "EXISTS (SELECT 1 FROM user_block_user b WHERE b.{viewer_col} = :{viewer} AND b.{owner_col} = {owner})"
    );
    (clause, vec![(viewer, SqlValue::from(viewer_id))])
}

fn exclude_rows(name: &str, direction: Direction, viewer_id: &str, displayed: ContentType) -> SqlFilter {
    let (exists, params) = block_exists(name, direction, viewer_id, displayed, &displayed.owner_expr());
    SqlFilter::clause(format!("NOT {exists}"), params)
}

fn forbid(
    name: &str,
    direction: Direction,
    viewer_id: &str,
    target_type: ContentType,
    target_id: &str,
) -> SqlFilter {
    let target = param_name(name, target_type, "target");
    let owner = format!(
        "(SELECT t.{owner} FROM {table} t WHERE t.{id} = :{target})",
        owner = target_type.owner_column(),
        table = target_type.table(),
        id = target_type.id_column(),
    );
    let (exists, mut params) = block_exists(name, direction, viewer_id, target_type, &owner);
    params.push((target, SqlValue::from(target_id)));
    SqlFilter::clause(exists, params)
}

/// The viewer blocked the content owner.
#[derive(Debug, Clone)]
pub struct BlockedByViewerSpec {
    viewer_id: String,
}

impl BlockedByViewerSpec {
    const NAME: &'static str = "blocked_by_viewer";

    pub fn new(viewer_id: impl Into<String>) -> Self {
        Self {
            viewer_id: viewer_id.into(),
        }
    }
}

impl Specification for BlockedByViewerSpec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::FilterOnly
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if !self.has_required_context() {
            return None;
        }
        Some(exclude_rows(Self::NAME, Direction::ViewerIsBlocker, &self.viewer_id, displayed))
    }

    fn to_replacer(&self, _subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        None
    }

    fn forbid_interactions(&self, target_type: ContentType, target_id: &str) -> Option<SqlFilter> {
        if !self.has_required_context() {
            return None;
        }
        Some(forbid(
            Self::NAME,
            Direction::ViewerIsBlocker,
            &self.viewer_id,
            target_type,
            target_id,
        ))
    }

    fn has_required_context(&self) -> bool {
        !self.viewer_id.is_empty()
    }
}

/// The content owner blocked the viewer.
#[derive(Debug, Clone)]
pub struct ViewerBlockedSpec {
    viewer_id: String,
}

impl ViewerBlockedSpec {
    const NAME: &'static str = "viewer_blocked";

    pub fn new(viewer_id: impl Into<String>) -> Self {
        Self {
            viewer_id: viewer_id.into(),
        }
    }
}

impl Specification for ViewerBlockedSpec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::FilterOnly
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if !self.has_required_context() {
            return None;
        }
        Some(exclude_rows(Self::NAME, Direction::ViewerIsBlocked, &self.viewer_id, displayed))
    }

    fn to_replacer(&self, _subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        None
    }

    fn forbid_interactions(&self, target_type: ContentType, target_id: &str) -> Option<SqlFilter> {
        if !self.has_required_context() {
            return None;
        }
        Some(forbid(
            Self::NAME,
            Direction::ViewerIsBlocked,
            &self.viewer_id,
            target_type,
            target_id,
        ))
    }

    fn has_required_context(&self) -> bool {
        !self.viewer_id.is_empty()
    }
}
