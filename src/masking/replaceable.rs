// Replaceable — the capability surface a fetched object exposes to be masked.
//
// Specifications only read through the accessors here (visibility, reports,
// owner, content type). Type-specific mutation goes through `apply`, which
// matches on the concrete kind.

use crate::db::models::{AccountStatus, Comment, Post, Profile};
use crate::policy::{ContentType, Visibility};

use super::pattern::ReplacementPattern;

/// A mutable borrow of one fetched object, tagged by kind.
#[derive(Debug)]
pub enum Replaceable<'a> {
    Profile(&'a mut Profile),
    Post(&'a mut Post),
    Comment(&'a mut Comment),
}

impl Replaceable<'_> {
    pub fn content_type(&self) -> ContentType {
        match self {
            Replaceable::Profile(_) => ContentType::User,
            Replaceable::Post(_) => ContentType::Post,
            Replaceable::Comment(_) => ContentType::Comment,
        }
    }

    /// Identifier of the object (uid, postid or commentid).
    pub fn id(&self) -> &str {
        match self {
            Replaceable::Profile(p) => &p.uid,
            Replaceable::Post(p) => &p.postid,
            Replaceable::Comment(c) => &c.commentid,
        }
    }

    /// The visibility label currently carried by the object.
    pub fn visibility(&self) -> Visibility {
        match self {
            Replaceable::Profile(p) => p.visibility,
            Replaceable::Post(p) => p.visibility,
            Replaceable::Comment(c) => c.visibility,
        }
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        match self {
            Replaceable::Profile(p) => p.visibility = visibility,
            Replaceable::Post(p) => p.visibility = visibility,
            Replaceable::Comment(c) => c.visibility = visibility,
        }
    }

    /// Visibility used by the illegal-content policy: a comment under an
    /// illegal post is itself treated as illegal.
    pub fn effective_visibility(&self) -> Visibility {
        match self {
            Replaceable::Comment(c) if c.post_visibility == Visibility::Illegal => {
                Visibility::Illegal
            }
            other => other.visibility(),
        }
    }

    pub fn reports(&self) -> i64 {
        match self {
            Replaceable::Profile(p) => p.reports,
            Replaceable::Post(p) => p.reports,
            Replaceable::Comment(c) => c.reports,
        }
    }

    /// Account status, only known for profiles.
    pub fn account_status(&self) -> Option<AccountStatus> {
        match self {
            Replaceable::Profile(p) => Some(p.status),
            Replaceable::Post(_) | Replaceable::Comment(_) => None,
        }
    }

    /// Owning user id. A profile owns itself.
    pub fn owner_id(&self) -> &str {
        match self {
            Replaceable::Profile(p) => &p.uid,
            Replaceable::Post(p) => &p.userid,
            Replaceable::Comment(c) => &c.userid,
        }
    }

    /// Overwrite exactly the fields the pattern defines, then settle the
    /// visibility label.
    ///
    /// Label rule: an illegal object stays illegal. Otherwise the label
    /// becomes the pattern's label when the pattern carries one; `AsIs` and
    /// `Deleted` carry none and leave it as-is.
    pub fn apply(&mut self, pattern: ReplacementPattern) {
        match self {
            Replaceable::Profile(profile) => {
                if let Some(name) = pattern.username() {
                    profile.username = name.to_string();
                }
                if let Some(img) = pattern.profile_image() {
                    profile.img = Some(img.to_string());
                }
                if let Some(bio) = pattern.biography() {
                    profile.biography = Some(bio.to_string());
                }
            }
            Replaceable::Post(post) => {
                if let Some(title) = pattern.post_title() {
                    post.title = title.to_string();
                }
                if let Some(description) = pattern.post_description() {
                    post.description = description.to_string();
                }
                if let Some(media) = pattern.post_media() {
                    post.media = media.to_string();
                }
                if let Some(cover) = pattern.post_cover() {
                    post.cover = Some(cover.to_string());
                }
            }
            Replaceable::Comment(comment) => {
                if let Some(content) = pattern.comment_content() {
                    comment.content = content.to_string();
                }
            }
        }

        if self.visibility() == Visibility::Illegal {
            return;
        }
        if let Some(label) = pattern.visibility_label() {
            self.set_visibility(label);
        }
    }
}

impl<'a> From<&'a mut Profile> for Replaceable<'a> {
    fn from(profile: &'a mut Profile) -> Self {
        Replaceable::Profile(profile)
    }
}

impl<'a> From<&'a mut Post> for Replaceable<'a> {
    fn from(post: &'a mut Post) -> Self {
        Replaceable::Post(post)
    }
}

impl<'a> From<&'a mut Comment> for Replaceable<'a> {
    fn from(comment: &'a mut Comment) -> Self {
        Replaceable::Comment(comment)
    }
}
