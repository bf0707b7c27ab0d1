// Hidden-content policy.
//
// Content is hidden once it is explicitly labelled `hidden`, or while still
// `normal` once its active report count reaches the per-type threshold. The
// owner always sees the true state except in hide-all mode. The whole policy
// only applies to viewers on the strict content filter.

use crate::config::ReportThresholds;
use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::{
    matrix, ApplicationCase, ContentFilterLevel, ContentType, FilteringAction, Visibility,
};

use super::sql::{param_name, SqlFilter, SqlValue};
use super::{Priority, Specification};

const NAME: &str = "hidden";

#[derive(Debug, Clone)]
pub struct HiddenContentSpec {
    case: ApplicationCase,
    judged: ContentType,
    viewer_id: String,
    filter: ContentFilterLevel,
    thresholds: ReportThresholds,
}

impl HiddenContentSpec {
    pub fn new(
        case: ApplicationCase,
        judged: ContentType,
        viewer_id: impl Into<String>,
        filter: ContentFilterLevel,
        thresholds: ReportThresholds,
    ) -> Self {
        Self {
            case,
            judged,
            viewer_id: viewer_id.into(),
            filter,
            thresholds,
        }
    }

    fn action(&self, displayed: ContentType) -> Option<FilteringAction> {
        if self.filter != ContentFilterLevel::Strict {
            return None;
        }
        matrix::resolve(self.case, Visibility::Hidden, self.judged, displayed)
    }

    /// Whether the owner exception is in force for this request.
    fn owner_sees_true_state(&self) -> bool {
        self.case != ApplicationCase::HideAll && !self.viewer_id.is_empty()
    }

    fn is_owner(&self, owner_id: &str) -> bool {
        self.owner_sees_true_state() && owner_id == self.viewer_id
    }

    /// `(reports >= threshold AND status = normal) OR status = hidden`
    pub fn crosses_trigger(visibility: Visibility, reports: i64, threshold: i64) -> bool {
        match visibility {
            Visibility::Normal => reports >= threshold,
            Visibility::Hidden => true,
            Visibility::Illegal => false,
        }
    }
}

impl Specification for HiddenContentSpec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn priority(&self) -> Priority {
        Priority::Hidden
    }

    fn to_sql(&self, displayed: ContentType) -> Option<SqlFilter> {
        if self.action(displayed) != Some(FilteringAction::HideContent) {
            return None;
        }

        let threshold = param_name(NAME, displayed, "threshold");
        let mut params = vec![(
            threshold.clone(),
            SqlValue::from(self.thresholds.for_type(displayed)),
        )];

        let mut conditions = vec![
            format!("h.{} = {}", displayed.id_column(), displayed.key_expr()),
            format!(
                "((COALESCE(hi.reports, 0) >= :{threshold} AND h.visibility_status = '{normal}') \
                 OR h.visibility_status = '{hidden}')",
                normal = Visibility::Normal.as_str(),
                hidden = Visibility::Hidden.as_str(),
            ),
        ];
        if self.owner_sees_true_state() {
            let viewer = param_name(NAME, displayed, "viewer");
            conditions.push(format!("h.{} <> :{viewer}", displayed.owner_column()));
            params.push((viewer, SqlValue::from(self.viewer_id.as_str())));
        }

        let clause = format!(
            "NOT EXISTS (SELECT 1 FROM {table} h LEFT JOIN {info} hi ON hi.{info_key} = h.{id} WHERE {conditions})",
            table = displayed.table(),
            info = displayed.info_table(),
            info_key = displayed.info_key_column(),
            id = displayed.id_column(),
            conditions = conditions.join(" AND "),
        );
        Some(SqlFilter::clause(clause, params))
    }

    fn to_replacer(&self, subject: &Replaceable<'_>) -> Option<ReplacementPattern> {
        let displayed = subject.content_type();
        self.action(displayed)?;
        if self.is_owner(subject.owner_id()) {
            return None;
        }
        let threshold = self.thresholds.for_type(displayed);
        Self::crosses_trigger(subject.visibility(), subject.reports(), threshold)
            .then_some(ReplacementPattern::Hidden)
    }
}
