// Role-based account policies.
//
// `users.roles_mask` is a bit mask of account roles and `users.verified`
// marks finished sign-ups. System accounts (liquidity, burn, bridge...) and
// unverified accounts are not part of the community; shop accounts are, but
// stay out of feeds and metadata search.

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{ApplicationCase, ContentType, FilteringAction, Strategy};

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

pub const ROLE_USER: i64 = 0;
pub const ROLE_COMPANY: i64 = 2;
pub const ROLE_ADMIN: i64 = 16;
pub const ROLE_PEER_SHOP: i64 = 32;

/// Roles whose content is shown like any other member's.
pub const BASIC_ROLES: [i64; 3] = [ROLE_USER, ROLE_COMPANY, ROLE_ADMIN];

/// Keeps only rows owned by verified accounts with a basic role.
#[derive(Debug, Clone)]
pub struct SystemUserSpec {
    action: FilteringAction,
}

impl SystemUserSpec {
    const NAME: &'static str = "system_user";

    pub fn new(action: FilteringAction) -> Self {
        Self { action }
    }
}

impl Specification for SystemUserSpec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::FilterOnly
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if self.action != FilteringAction::HideContent {
            return None;
        }
        let verified = param_name(Self::NAME, displayed, "verified");
        let roles = BASIC_ROLES
            .iter()
            .map(|role| role.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Some(SqlFilter::clause(
            format!(
                "EXISTS (SELECT 1 FROM users su WHERE su.uid = {owner} \
                 AND su.roles_mask IN ({roles}) AND su.verified = :{verified})",
                owner = displayed.owner_expr(),
            ),
            [(verified, SqlValue::from(1))],
        ))
    }

    fn to_replacer(&self, _subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        None
    }
}

/// Drops users and posts of shop accounts where the case hides them.
/// Comments written by shops are always kept.
#[derive(Debug, Clone)]
pub struct PeerShopSpec {
    case: ApplicationCase,
    judged: ContentType,
}

impl PeerShopSpec {
    const NAME: &'static str = "peer_shop";

    pub fn new(case: ApplicationCase, judged: ContentType) -> Self {
        Self { case, judged }
    }

    fn strategy(&self) -> Strategy {
        match self.case {
            ApplicationCase::MyProfile | ApplicationCase::SearchById => {
                Strategy::PlaceholderEverything
            }
            ApplicationCase::SearchByMeta | ApplicationCase::HideAll => Strategy::HideEverything,
            ApplicationCase::PostFeed => Strategy::PostFeed,
        }
    }
}

impl Specification for PeerShopSpec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::FilterOnly
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if displayed == ContentType::Comment
            || self.strategy().action(self.judged, displayed) != Some(FilteringAction::HideContent)
        {
            return None;
        }
        let shop = param_name(Self::NAME, displayed, "role");
        Some(SqlFilter::clause(
            format!(
                "EXISTS (SELECT 1 FROM users ps WHERE ps.uid = {owner} AND ps.roles_mask <> :{shop})",
                owner = displayed.owner_expr(),
            ),
            [(shop, SqlValue::from(ROLE_PEER_SHOP))],
        ))
    }

    fn to_replacer(&self, _subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        None
    }
}
