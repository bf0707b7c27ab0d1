// Specifications — independent units of visibility policy.
//
// Each specification answers three questions for one request:
//   - which rows of a displayed table must never reach the caller (`to_sql`)
//   - how an already-fetched object must be masked (`to_replacer`)
//   - whether a direct write to a given id is forbidden (`forbid_interactions`)
//
// Specifications are built per request from a `ViewerRequest` and hold no
// state between calls, so the same instance can be asked about every
// displayed table of a joined query.

pub mod account;
pub mod advertisements;
pub mod blocking;
pub mod factory;
pub mod hidden;
pub mod illegal;
pub mod ownership;
pub mod relabel;
pub mod roles;
pub mod sql;

use std::fmt;

use serde::Serialize;

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::ContentType;

pub use self::account::DeletedAccountSpec;
pub use self::advertisements::ExcludeAdvertisementsSpec;
pub use self::blocking::{BlockedByViewerSpec, ViewerBlockedSpec};
pub use self::factory::{SpecsFactory, ViewerRequest};
pub use self::hidden::HiddenContentSpec;
pub use self::illegal::IllegalContentSpec;
pub use self::ownership::OwnContentSpec;
pub use self::relabel::NormalVisibilitySpec;
pub use self::roles::{PeerShopSpec, SystemUserSpec};
pub use self::sql::{SqlFilter, SqlValue};

/// Replacement precedence. Earlier variants win.
///
/// Illegal content outranks everything, including the viewer's own content.
/// Below that the owner sees their content as it is, then account and report
/// masks apply, then the relabel for viewers who opted out of hiding.
/// Filter-only specifications never produce a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Illegal,
    OwnershipRestore,
    Deleted,
    Hidden,
    Relabel,
    FilterOnly,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Illegal => "illegal",
            Priority::Deleted => "deleted",
            Priority::Hidden => "hidden",
            Priority::OwnershipRestore => "ownership_restore",
            Priority::Relabel => "relabel",
            Priority::FilterOnly => "filter_only",
        };
        write!(f, "{s}")
    }
}

/// One unit of visibility policy.
pub trait Specification: Send + Sync + fmt::Debug {
    /// Short name, also used as the SQL parameter prefix.
    fn name(&self) -> &'static str;

    fn priority(&self) -> Priority;

    /// Predicate that excludes rows of the `displayed` table, aliased as
    /// `ContentType::alias`. `None` means no opinion.
    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter>;

    /// Pattern to apply to an object already fetched. `None` means no opinion.
    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern>;

    /// Predicate that is true when a direct interaction with `target_id` must
    /// be refused.
    fn forbid_interactions(&self, _target_type: ContentType, _target_id: &str) -> Option<SqlFilter> {
        None
    }

    /// False when the request lacks something this specification needs
    /// (usually a viewer id). The composer skips it and logs a warning.
    fn has_required_context(&self) -> bool {
        true
    }
}
