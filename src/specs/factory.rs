// Builds the standard specification sets for each kind of read.
//
// Read paths never assemble specifications by hand: they describe the
// request (`ViewerRequest`) and the content the request is about, and get
// back a composed, priority-ordered set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::composer::SpecificationSet;
use crate::config::{Config, ReportThresholds};
use crate::policy::{ApplicationCase, ContentFilterLevel, ContentType, FilteringAction};

use super::{
    BlockedByViewerSpec, DeletedAccountSpec, ExcludeAdvertisementsSpec, HiddenContentSpec,
    IllegalContentSpec, NormalVisibilitySpec, OwnContentSpec, PeerShopSpec, Specification,
    SystemUserSpec, ViewerBlockedSpec,
};

/// Request-scoped context every specification is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerRequest {
    /// Empty for anonymous viewers.
    pub viewer_id: String,
    pub case: ApplicationCase,
    /// The viewer's saved preference, if any.
    pub content_filter: Option<ContentFilterLevel>,
}

impl ViewerRequest {
    pub fn new(viewer_id: impl Into<String>, case: ApplicationCase) -> Self {
        Self {
            viewer_id: viewer_id.into(),
            case,
            content_filter: None,
        }
    }

    pub fn with_filter(mut self, filter: ContentFilterLevel) -> Self {
        self.content_filter = Some(filter);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpecsFactory {
    thresholds: ReportThresholds,
    default_filter: ContentFilterLevel,
}

impl SpecsFactory {
    pub fn new(thresholds: ReportThresholds, default_filter: ContentFilterLevel) -> Self {
        Self {
            thresholds,
            default_filter,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.report_thresholds, config.default_content_filter)
    }

    /// Lists drop content of inactive or system accounts; lookups by id keep
    /// the row and render an inactive account as deleted.
    fn account_action(case: ApplicationCase) -> FilteringAction {
        match case {
            ApplicationCase::PostFeed | ApplicationCase::SearchByMeta | ApplicationCase::HideAll => {
                FilteringAction::HideContent
            }
            ApplicationCase::SearchById | ApplicationCase::MyProfile => {
                FilteringAction::ReplaceWithPlaceholder
            }
        }
    }

    fn standard_specs(&self, request: &ViewerRequest, judged: ContentType) -> Vec<Box<dyn Specification>> {
        let filter = request.content_filter.unwrap_or(self.default_filter);
        let mut specs: Vec<Box<dyn Specification>> = vec![
            Box::new(IllegalContentSpec::new(request.case, judged)),
            Box::new(HiddenContentSpec::new(
                request.case,
                judged,
                request.viewer_id.clone(),
                filter,
                self.thresholds,
            )),
            Box::new(DeletedAccountSpec::new(Self::account_action(request.case))),
            Box::new(OwnContentSpec::new(request.case, request.viewer_id.clone())),
            Box::new(NormalVisibilitySpec::new(filter)),
            Box::new(SystemUserSpec::new(Self::account_action(request.case))),
            Box::new(PeerShopSpec::new(request.case, judged)),
        ];
        if !request.viewer_id.is_empty() {
            specs.push(Box::new(BlockedByViewerSpec::new(request.viewer_id.clone())));
            specs.push(Box::new(ViewerBlockedSpec::new(request.viewer_id.clone())));
        }
        specs
    }

    /// The standard set for a request about `judged` content.
    pub fn for_request(&self, request: &ViewerRequest, judged: ContentType) -> SpecificationSet {
        SpecificationSet::new(self.standard_specs(request, judged))
    }

    /// Set for a single profile fetch: the viewer's own profile is shown as-is,
    /// anyone else's is a lookup by id.
    pub fn for_profile(
        &self,
        viewer_id: &str,
        target_user_id: &str,
        content_filter: Option<ContentFilterLevel>,
    ) -> SpecificationSet {
        let request = ViewerRequest {
            viewer_id: viewer_id.to_string(),
            case: ApplicationCase::for_profile(viewer_id, target_user_id),
            content_filter,
        };
        self.for_request(&request, ContentType::User)
    }

    /// Set for a post feed, which also keeps running advertisements out.
    pub fn for_feed(&self, request: &ViewerRequest, now: DateTime<Utc>) -> SpecificationSet {
        let mut specs = self.standard_specs(request, ContentType::Post);
        specs.push(Box::new(ExcludeAdvertisementsSpec::new(now)));
        SpecificationSet::new(specs)
    }
}
