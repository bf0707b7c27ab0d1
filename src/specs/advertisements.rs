// Keep posts that are currently running as advertisements out of the normal
// feed. They are delivered through their own slot.

use chrono::{DateTime, Utc};

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::ContentType;

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

const NAME: &str = "ads";

/// Timestamp format of `advertisements.timestart` / `timeend`.
pub const AD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ExcludeAdvertisementsSpec {
    now: DateTime<Utc>,
}

impl ExcludeAdvertisementsSpec {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Specification for ExcludeAdvertisementsSpec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> Priority {
        Priority::FilterOnly
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if displayed != ContentType::Post {
            return None;
        }
        let now = param_name(NAME, displayed, "now");
        Some(SqlFilter::clause(
            format!(
                "NOT EXISTS (SELECT 1 FROM advertisements a WHERE a.postid = p.postid \
                 AND a.timestart <= :{now} AND a.timeend > :{now})"
            ),
            [(now, SqlValue::from(self.now.format(AD_TIME_FORMAT).to_string()))],
        ))
    }

    fn to_replacer(&self, _subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        None
    }
}
