// Deleted-account policy.
//
// With `HideContent`, rows whose owner no longer has an active account are
// dropped from lists. With `ReplaceWithPlaceholder` they stay, and the
// profile itself is rendered as a deleted account. The replacer fires for
// inactive profiles under either action.

use crate::db::models::AccountStatus;
use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{ContentType, FilteringAction};

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

const NAME: &str = "deleted";

#[derive(Debug, Clone)]
pub struct DeletedAccountSpec {
    action: FilteringAction,
}

impl DeletedAccountSpec {
    pub fn new(action: FilteringAction) -> Self {
        Self { action }
    }
}

impl Specification for DeletedAccountSpec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> Priority {
        Priority::Deleted
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if self.action != FilteringAction::HideContent {
            return None;
        }
        let active = param_name(NAME, displayed, "active");
        let clause = match displayed {
            ContentType::User => format!("u.status = :{active}"),
            ContentType::Post | ContentType::Comment => format!(
                "EXISTS (SELECT 1 FROM users d WHERE d.uid = {owner} AND d.status = :{active})",
                owner = displayed.owner_expr(),
            ),
        };
        Some(SqlFilter::clause(
            clause,
            [(active, SqlValue::from(AccountStatus::Active.code()))],
        ))
    }

    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        match subject.account_status()? {
            AccountStatus::Active => None,
            AccountStatus::Suspended | AccountStatus::Deleted => Some(ReplacementPattern::Deleted),
        }
    }
}
