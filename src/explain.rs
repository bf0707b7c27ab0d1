// Decision explanations — what the engine would do for one
// (case, judged, displayed) combination, for the CLI and debugging.

use serde::Serialize;

use crate::policy::{matrix, ApplicationCase, ContentType, FilteringAction, Strategy, Visibility};
use crate::specs::{SpecsFactory, SqlFilter, ViewerRequest};

/// One row per visibility class.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityDecision {
    pub visibility: Visibility,
    pub strategy: &'static str,
    pub action: Option<FilteringAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub case: ApplicationCase,
    pub judged: ContentType,
    pub displayed: ContentType,
    pub viewer_id: String,
    pub decisions: Vec<VisibilityDecision>,
    /// Specification names in replacement priority order.
    pub replacement_order: Vec<&'static str>,
    /// The filter the standard set adds for the displayed table.
    pub sql: SqlFilter,
    pub where_sql: Option<String>,
}

pub fn explain(
    factory: &SpecsFactory,
    request: &ViewerRequest,
    judged: ContentType,
    displayed: ContentType,
) -> Explanation {
    let decisions = Visibility::ALL
        .into_iter()
        .map(|visibility| {
            let strategy = Strategy::select(request.case, visibility);
            VisibilityDecision {
                visibility,
                strategy: strategy.name(),
                action: matrix::resolve(request.case, visibility, judged, displayed),
            }
        })
        .collect();

    let specs = factory.for_request(request, judged);
    let sql = specs.build_sql_filter(displayed);
    let where_sql = sql.where_sql();

    Explanation {
        case: request.case,
        judged,
        displayed,
        viewer_id: request.viewer_id.clone(),
        decisions,
        replacement_order: specs.names(),
        sql,
        where_sql,
    }
}
