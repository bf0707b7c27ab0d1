// Ownership restore — the viewer's own content is shown as it really is.
//
// Only the illegal-content mask outranks it. Account and report masks, and
// the relabel, never touch an object the viewer owns.

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{ApplicationCase, ContentType};

use super::sql::SqlFilter;
use super::{Priority, Specification};

#[derive(Debug, Clone)]
pub struct OwnContentSpec {
    case: ApplicationCase,
    viewer_id: String,
}

impl OwnContentSpec {
    pub fn new(case: ApplicationCase, viewer_id: impl Into<String>) -> Self {
        Self {
            case,
            viewer_id: viewer_id.into(),
        }
    }
}

impl Specification for OwnContentSpec {
    fn name(&self) -> &'static str {
        "own"
    }

    fn priority(&self) -> Priority {
        Priority::OwnershipRestore
    }

    fn to_sql(&self, _displayed: ContentType) -> Option<SqlFilter> {
        None
    }

    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        if self.case == ApplicationCase::HideAll || self.viewer_id.is_empty() {
            return None;
        }
        (subject.owner_id() == self.viewer_id).then_some(ReplacementPattern::AsIs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Comment;
    use crate::policy::Visibility;

    fn comment(owner: &str) -> Comment {
        Comment {
            commentid: "c1".into(),
            postid: "p1".into(),
            userid: owner.into(),
            content: "hi".into(),
            visibility: Visibility::Hidden,
            post_visibility: Visibility::Normal,
            reports: 0,
        }
    }

    #[test]
    fn test_restores_only_own_content() {
        let spec = OwnContentSpec::new(ApplicationCase::PostFeed, "v");
        let mut mine = comment("v");
        let mut theirs = comment("u");
        assert_eq!(
            spec.to_replacer(&Replaceable::from(&mut mine)),
            Some(ReplacementPattern::AsIs)
        );
        assert_eq!(spec.to_replacer(&Replaceable::from(&mut theirs)), None);
    }

    #[test]
    fn test_anonymous_and_hide_all_never_restore() {
        let mut anon = comment("");
        assert_eq!(
            OwnContentSpec::new(ApplicationCase::SearchById, "")
                .to_replacer(&Replaceable::from(&mut anon)),
            None
        );
        let mut mine = comment("v");
        assert_eq!(
            OwnContentSpec::new(ApplicationCase::HideAll, "v")
                .to_replacer(&Replaceable::from(&mut mine)),
            None
        );
    }
}
