// Relabel for viewers on the relaxed content filter.
//
// Those viewers get no hidden-content masks, so content labelled `hidden` is
// shown in full and reported back as `normal`.

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{ContentFilterLevel, ContentType, Visibility};

use super::sql::SqlFilter;
use super::{Priority, Specification};

#[derive(Debug, Clone)]
pub struct NormalVisibilitySpec {
    filter: ContentFilterLevel,
}

impl NormalVisibilitySpec {
    pub fn new(filter: ContentFilterLevel) -> Self {
        Self { filter }
    }
}

impl Specification for NormalVisibilitySpec {
    fn name(&self) -> &'static str {
        "normal_visibility"
    }

    fn priority(&self) -> Priority {
        Priority::Relabel
    }

    fn to_sql(&self, _displayed: ContentType) -> Option<SqlFilter> {
        None
    }

    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        (self.filter != ContentFilterLevel::Strict && subject.visibility() == Visibility::Hidden)
            .then_some(ReplacementPattern::Normal)
    }
}
