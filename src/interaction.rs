// Interaction gate — can the viewer write against this id at all?
//
// Write paths (comment, like, report, tip) call `ensure_can_interact` before
// any side effect. The answer only depends on the target itself and the
// viewer's relationships, never on the application case or what is being
// displayed.

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::composer::SpecificationSet;
use crate::db::Database;
use crate::policy::ContentType;

/// Returned when a write path targets content it must not touch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("interaction with {content_type} {target_id} is not permitted")]
pub struct InteractionDenied {
    pub content_type: ContentType,
    pub target_id: String,
}

pub struct InteractionGate {
    db: Arc<dyn Database>,
    specs: SpecificationSet,
}

impl InteractionGate {
    pub fn new(db: Arc<dyn Database>, specs: SpecificationSet) -> Self {
        Self { db, specs }
    }

    /// False if any specification forbids interacting with the target.
    pub async fn can_interact(&self, target_type: ContentType, target_id: &str) -> Result<bool> {
        let predicates = self.specs.forbid_interactions(target_type, target_id);
        let forbidden = self.db.any_predicate_holds(&predicates).await?;
        debug!(
            content_type = %target_type,
            target_id,
            checks = predicates.clauses.len(),
            forbidden,
            "interaction check"
        );
        Ok(!forbidden)
    }

    /// `can_interact` as an error, for `?` at the top of write paths.
    pub async fn ensure_can_interact(&self, target_type: ContentType, target_id: &str) -> Result<()> {
        if self.can_interact(target_type, target_id).await? {
            Ok(())
        } else {
            Err(InteractionDenied {
                content_type: target_type,
                target_id: target_id.to_string(),
            }
            .into())
        }
    }
}
