// Decision matrices and the strategy selector.
//
// A strategy answers "given the content this request is about (judged) and
// the content currently being rendered (displayed), what do we do?". Each
// strategy is an exhaustive match over the (judged, displayed) pair with no
// wildcard arms, so adding a content type refuses to compile until every
// strategy has an explicit decision for it.

use super::types::{ApplicationCase, ContentType, FilteringAction, Visibility};

use ContentType::{Comment, Post, User};
use FilteringAction::{HideContent, ReplaceWithPlaceholder};

/// One decision matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every cell resolves to no action. Used for the viewer's own profile.
    DoNothing,
    PlaceholderEverything,
    /// Illegal content found by metadata search: the post row itself is
    /// dropped, everything around it is masked.
    SearchByMetaIllegal,
    /// Feed: hide the post row, placeholder its author and comments.
    PostFeed,
    HideEverything,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::DoNothing,
        Strategy::PlaceholderEverything,
        Strategy::SearchByMetaIllegal,
        Strategy::PostFeed,
        Strategy::HideEverything,
    ];

    /// Pick the matrix for a case and the visibility class a policy targets.
    ///
    /// `MyProfile` and `HideAll` ignore visibility. The other cases only have
    /// an opinion about hidden or illegal content.
    pub fn select(case: ApplicationCase, visibility: Visibility) -> Self {
        match (case, visibility) {
            (ApplicationCase::MyProfile, _) => Strategy::DoNothing,
            (ApplicationCase::HideAll, _) => Strategy::HideEverything,
            (_, Visibility::Normal) => Strategy::DoNothing,
            (ApplicationCase::SearchById, Visibility::Hidden | Visibility::Illegal) => {
                Strategy::PlaceholderEverything
            }
            (ApplicationCase::SearchByMeta, Visibility::Hidden) => Strategy::PlaceholderEverything,
            (ApplicationCase::SearchByMeta, Visibility::Illegal) => Strategy::SearchByMetaIllegal,
            (ApplicationCase::PostFeed, Visibility::Hidden | Visibility::Illegal) => {
                Strategy::PostFeed
            }
        }
    }

    /// Look up the action for a (judged, displayed) pair.
    pub fn action(&self, judged: ContentType, displayed: ContentType) -> Option<FilteringAction> {
        match self {
            Strategy::DoNothing => match (judged, displayed) {
                (User, User) | (User, Post) | (User, Comment) => None,
                (Post, User) | (Post, Post) | (Post, Comment) => None,
                (Comment, User) | (Comment, Post) | (Comment, Comment) => None,
            },
            Strategy::PlaceholderEverything => match (judged, displayed) {
                (User, User) | (User, Post) | (User, Comment) => Some(ReplaceWithPlaceholder),
                (Post, User) | (Post, Post) | (Post, Comment) => Some(ReplaceWithPlaceholder),
                (Comment, User) | (Comment, Post) | (Comment, Comment) => {
                    Some(ReplaceWithPlaceholder)
                }
            },
            Strategy::SearchByMetaIllegal => match (judged, displayed) {
                (User, User) | (User, Post) | (User, Comment) => Some(ReplaceWithPlaceholder),
                (Post, Post) => Some(HideContent),
                (Post, User) | (Post, Comment) => Some(ReplaceWithPlaceholder),
                (Comment, Post) => None,
                (Comment, User) | (Comment, Comment) => Some(ReplaceWithPlaceholder),
            },
            Strategy::PostFeed => match (judged, displayed) {
                (Post, Post) => Some(HideContent),
                (Post, User) | (Post, Comment) => Some(ReplaceWithPlaceholder),
                (User, User) | (User, Post) | (User, Comment) => Some(ReplaceWithPlaceholder),
                (Comment, User) | (Comment, Post) | (Comment, Comment) => {
                    Some(ReplaceWithPlaceholder)
                }
            },
            Strategy::HideEverything => match (judged, displayed) {
                (User, User) | (User, Post) | (User, Comment) => Some(HideContent),
                (Post, User) | (Post, Post) | (Post, Comment) => Some(HideContent),
                (Comment, User) | (Comment, Post) | (Comment, Comment) => Some(HideContent),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DoNothing => "doNothing",
            Strategy::PlaceholderEverything => "placeholderEverything",
            Strategy::SearchByMetaIllegal => "searchByMetaIllegal",
            Strategy::PostFeed => "postFeed",
            Strategy::HideEverything => "hideEverything",
        }
    }
}

/// Shorthand for `Strategy::select(case, visibility).action(judged, displayed)`.
pub fn resolve(
    case: ApplicationCase,
    visibility: Visibility,
    judged: ContentType,
    displayed: ContentType,
) -> Option<FilteringAction> {
    Strategy::select(case, visibility).action(judged, displayed)
}

/// Walk every (case, visibility, judged, displayed) combination and return
/// how many cells were resolved.
///
/// The matches above are exhaustive, so this can only fail by panicking
/// inside a lookup. Binaries call it once at startup so a broken matrix is
/// caught before the first request rather than as a silent moderation leak.
pub fn validate_all() -> usize {
    let mut cells = 0;
    for case in ApplicationCase::ALL {
        for visibility in Visibility::ALL {
            let strategy = Strategy::select(case, visibility);
            for judged in ContentType::ALL {
                for displayed in ContentType::ALL {
                    let _ = strategy.action(judged, displayed);
                    cells += 1;
                }
            }
        }
    }
    tracing::debug!(cells, "decision matrices validated");
    cells
}
