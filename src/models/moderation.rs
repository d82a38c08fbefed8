use crate::models::{CommentView, PostView, ReviewView};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three collections that can hold flagged content. The tag is supplied by
/// the caller and never inferred from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Reviews,
    Posts,
    Comments,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Reviews, ContentType::Posts, ContentType::Comments];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Reviews => "reviews",
            ContentType::Posts => "posts",
            ContentType::Comments => "comments",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            ContentType::Reviews => "reviews",
            ContentType::Posts => "forumposts",
            ContentType::Comments => "forumcomments",
        }
    }

    /// Field holding the author's user `_id`
    pub fn author_field(&self) -> &'static str {
        match self {
            ContentType::Reviews => "reviewer",
            ContentType::Posts | ContentType::Comments => "author",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Reviews => "review",
            ContentType::Posts => "forum post",
            ContentType::Comments => "comment",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviews" => Ok(ContentType::Reviews),
            "posts" => Ok(ContentType::Posts),
            "comments" => Ok(ContentType::Comments),
            other => Err(format!(
                "Invalid content type: {}. Supported: reviews, posts, comments",
                other
            )),
        }
    }
}

/// `?type=` of the flagged content listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagFilter {
    All,
    Only(ContentType),
}

impl FlagFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(FlagFilter::All),
            Some(other) => other.parse::<ContentType>().map(FlagFilter::Only),
        }
    }

    pub fn content_types(&self) -> Vec<ContentType> {
        match self {
            FlagFilter::All => ContentType::ALL.to_vec(),
            FlagFilter::Only(content_type) => vec![*content_type],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Delete,
    Warn,
    Ignore,
}

impl FromStr for ModerationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(ModerationAction::Delete),
            "warn" => Ok(ModerationAction::Warn),
            "ignore" => Ok(ModerationAction::Ignore),
            other => Err(format!("Invalid action: {}. Supported: delete, warn, ignore", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentActionRequest {
    pub content_type: String,
    pub action: String,
}

/// A flagged document tagged with the collection it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlaggedItem {
    Reviews(ReviewView),
    Posts(PostView),
    Comments(CommentView),
}

impl FlaggedItem {
    pub fn content_type(&self) -> ContentType {
        match self {
            FlaggedItem::Reviews(_) => ContentType::Reviews,
            FlaggedItem::Posts(_) => ContentType::Posts,
            FlaggedItem::Comments(_) => ContentType::Comments,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            FlaggedItem::Reviews(r) => &r.id,
            FlaggedItem::Posts(p) => &p.id,
            FlaggedItem::Comments(c) => &c.id,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            FlaggedItem::Reviews(r) => r.created_at,
            FlaggedItem::Posts(p) => p.created_at,
            FlaggedItem::Comments(c) => c.created_at,
        }
    }
}
