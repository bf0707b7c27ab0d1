// Specification composer — one SQL filter and one replacement decision per
// object out of many independent specifications.
//
// SQL fragments are ANDed: a row survives only if no specification excludes
// it. Replacement is first-non-null in `Priority` order, fixed when the set
// is built so insertion order never matters.

use tracing::{debug, warn};

use crate::masking::{Replaceable, ReplacementPattern};
use crate::policy::ContentType;
use crate::specs::{Specification, SqlFilter};

#[derive(Debug, Default)]
pub struct SpecificationSet {
    specs: Vec<Box<dyn Specification>>,
}

impl SpecificationSet {
    pub fn new(mut specs: Vec<Box<dyn Specification>>) -> Self {
        // Stable sort keeps declaration order among equal priorities
        specs.sort_by_key(|spec| spec.priority());
        Self { specs }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Specification names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Specification> {
        self.specs.iter().map(|spec| spec.as_ref())
    }

    /// Specifications that can run with the context they were given.
    fn usable(&self) -> impl Iterator<Item = &dyn Specification> {
        self.iter().filter(|spec| {
            if spec.has_required_context() {
                true
            } else {
                warn!(spec = spec.name(), "specification skipped: missing viewer context");
                false
            }
        })
    }

    /// Every exclusion predicate for rows of `displayed`.
    ///
    /// # Panics
    ///
    /// If two specifications bind the same parameter name to different values.
    pub fn build_sql_filter(&self, displayed: ContentType) -> SqlFilter {
        let mut filter = SqlFilter::default();
        for spec in self.usable() {
            if let Some(fragment) = spec.to_sql(displayed) {
                filter.merge(fragment);
            }
        }
        filter
    }

    /// The pattern the highest-priority specification asks for, if any.
    pub fn resolve_replacement(&self, subject: &Replaceable<'_>) -> Option<(&'static str, ReplacementPattern)> {
        self.usable()
            .find_map(|spec| spec.to_replacer(subject).map(|pattern| (spec.name(), pattern)))
    }

    /// Mask `subject` in place and return the pattern that was applied.
    pub fn apply_replacement(&self, subject: &mut Replaceable<'_>) -> Option<ReplacementPattern> {
        let (spec, pattern) = self.resolve_replacement(subject)?;
        if pattern.is_passthrough() {
            return Some(pattern);
        }
        debug!(
            spec,
            pattern = pattern.as_str(),
            content_type = %subject.content_type(),
            id = subject.id(),
            "replacement applied"
        );
        subject.apply(pattern);
        Some(pattern)
    }

    /// Predicates that are each true when an interaction must be refused.
    /// The caller ORs them.
    pub fn forbid_interactions(&self, target_type: ContentType, target_id: &str) -> SqlFilter {
        let mut filter = SqlFilter::default();
        for spec in self.usable() {
            if let Some(fragment) = spec.forbid_interactions(target_type, target_id) {
                filter.merge(fragment);
            }
        }
        filter
    }
}
