// Illegal-content policy.
//
// Illegal is the hard moderation state: it is masked or excluded for every
// viewer, the owner included. Only the viewer's own profile (the do-nothing
// matrix) shows it untouched. A comment under an illegal post counts as
// illegal too.

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{matrix, ApplicationCase, ContentType, FilteringAction, Visibility};

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

const NAME: &str = "illegal";

#[derive(Debug, Clone)]
pub struct IllegalContentSpec {
    case: ApplicationCase,
    judged: ContentType,
}

impl IllegalContentSpec {
    pub fn new(case: ApplicationCase, judged: ContentType) -> Self {
        Self { case, judged }
    }

    fn action(&self, displayed: ContentType) -> Option<FilteringAction> {
        matrix::resolve(self.case, Visibility::Illegal, self.judged, displayed)
    }

    /// Subquery condition matching an illegal row `i` (and, for comments, an
    /// illegal parent post `ip`). `status` is the bound parameter name.
    fn illegal_rows(displayed: ContentType, status: &str) -> String {
        match displayed {
            ContentType::User => format!(
                "SELECT 1 FROM users i WHERE i.uid = {{key}} AND i.visibility_status = :{status}"
            ),
            ContentType::Post => format!(
                "SELECT 1 FROM posts i WHERE i.postid = {{key}} AND i.visibility_status = :{status}"
            ),
            ContentType::Comment => format!(
                "SELECT 1 FROM comments i LEFT JOIN posts ip ON ip.postid = i.postid \
                 WHERE i.commentid = {{key}} \
                 AND (i.visibility_status = :{status} OR ip.visibility_status = :{status})"
            ),
        }
    }
}

impl Specification for IllegalContentSpec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> Priority {
        Priority::Illegal
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if self.action(displayed) != Some(FilteringAction::HideContent) {
            return None;
        }
        let status = param_name(NAME, displayed, "status");
        let rows = Self::illegal_rows(displayed, &status).replace("{key}", &displayed.key_expr());
        Some(SqlFilter::clause(
            format!("NOT EXISTS ({rows})"),
            [(status, SqlValue::from(Visibility::Illegal.as_str()))],
        ))
    }

    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        // Any action counts: a row the SQL should have dropped is still
        // masked if it reaches this stage some other way.
        self.action(subject.content_type())?;
        (subject.effective_visibility() == Visibility::Illegal).then_some(ReplacementPattern::Illegal)
    }

    fn forbid_interactions(&self, target_type: ContentType, target_id: &str) -> Option<SqlFilter> {
        let status = param_name(NAME, target_type, "status");
        let target = param_name(NAME, target_type, "target");
        let rows = Self::illegal_rows(target_type, &status).replace("{key}", &format!(":{target}"));
        Some(SqlFilter::clause(
            format!("EXISTS ({rows})"),
            [
                (status, SqlValue::from(Visibility::Illegal.as_str())),
                (target, SqlValue::from(target_id)),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Post;

    fn post(visibility: Visibility) -> Post {
        Post {
            postid: "p1".into(),
            userid: "u1".into(),
            title: "t".into(),
            media: "m".into(),
            cover: None,
            description: "d".into(),
            visibility,
            reports: 0,
        }
    }

    #[test]
    fn test_feed_excludes_illegal_posts_in_sql() {
        let spec = IllegalContentSpec::new(ApplicationCase::PostFeed, ContentType::Post);
        let filter = spec.to_sql(ContentType::Post).unwrap();
        assert!(filter.clauses[0].starts_with("NOT EXISTS"));
        assert!(filter.clauses[0].contains("i.postid = p.postid"));
        assert_eq!(
            filter.params.get("illegal_p_status"),
            Some(&SqlValue::Text("illegal".into()))
        );
        // Author and comments are masked, not dropped
        assert!(spec.to_sql(ContentType::User).is_none());
        assert!(spec.to_sql(ContentType::Comment).is_none());
    }

    #[test]
    fn test_comment_sql_checks_parent_post() {
        let spec = IllegalContentSpec::new(ApplicationCase::HideAll, ContentType::Comment);
        let filter = spec.to_sql(ContentType::Comment).unwrap();
        assert!(filter.clauses[0].contains("ip.visibility_status"));
        assert!(filter.clauses[0].contains("i.commentid = c.commentid"));
    }

    #[test]
    fn test_my_profile_never_masks() {
        let spec = IllegalContentSpec::new(ApplicationCase::MyProfile, ContentType::Post);
        let mut p = post(Visibility::Illegal);
        assert!(spec.to_sql(ContentType::Post).is_none());
        assert_eq!(spec.to_replacer(&Replaceable::from(&mut p)), None);
    }

    #[test]
    fn test_replacer_only_fires_for_illegal_objects() {
        let spec = IllegalContentSpec::new(ApplicationCase::SearchById, ContentType::Post);
        let mut illegal = post(Visibility::Illegal);
        let mut hidden = post(Visibility::Hidden);
        assert_eq!(
            spec.to_replacer(&Replaceable::from(&mut illegal)),
            Some(ReplacementPattern::Illegal)
        );
        assert_eq!(spec.to_replacer(&Replaceable::from(&mut hidden)), None);
    }

    #[test]
    fn test_forbid_interactions_binds_target() {
        let spec = IllegalContentSpec::new(ApplicationCase::MyProfile, ContentType::Post);
        let filter = spec.forbid_interactions(ContentType::Post, "p9").unwrap();
        assert!(filter.clauses[0].starts_with("EXISTS"));
        assert!(filter.clauses[0].contains("i.postid = :illegal_p_target"));
        assert_eq!(
            filter.params.get("illegal_p_target"),
            Some(&SqlValue::Text("p9".into()))
        );
    }
}
