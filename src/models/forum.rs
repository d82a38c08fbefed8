use crate::models::UserSummary;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Collection "forumposts"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author: ObjectId,
    pub title: String,
    pub content: String,
    /// Users who liked the post
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Collection "forumcomments"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumComment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post: ObjectId,
    pub author: ObjectId,
    pub content: String,
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub like_count: usize,
    pub is_liked: bool,
}

impl LikeState {
    pub fn of(likes: &[ObjectId], viewer: &ObjectId) -> Self {
        LikeState {
            like_count: likes.len(),
            is_liked: likes.contains(viewer),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: Option<UserSummary>,
    pub title: String,
    pub content: String,
    pub like_count: usize,
    pub is_liked: bool,
    pub views: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    pub flagged: bool,
    pub ai_analysis: Option<String>,
    pub created_at: i64,
}

impl PostView {
    pub fn new(post: &ForumPost, author: Option<UserSummary>, viewer: Option<&ObjectId>) -> Self {
        PostView {
            id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
            author,
            title: post.title.clone(),
            content: post.content.clone(),
            like_count: post.likes.len(),
            is_liked: viewer.map(|v| post.likes.contains(v)).unwrap_or(false),
            views: post.views,
            comment_count: None,
            flagged: post.flagged,
            ai_analysis: post.ai_analysis.clone(),
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: String,
    pub post: String,
    pub author: Option<UserSummary>,
    pub content: String,
    pub like_count: usize,
    pub is_liked: bool,
    pub flagged: bool,
    pub ai_analysis: Option<String>,
    pub created_at: i64,
}

impl CommentView {
    pub fn new(comment: &ForumComment, author: Option<UserSummary>, viewer: Option<&ObjectId>) -> Self {
        CommentView {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            post: comment.post.to_hex(),
            author,
            content: comment.content.clone(),
            like_count: comment.likes.len(),
            is_liked: viewer.map(|v| comment.likes.contains(v)).unwrap_or(false),
            flagged: comment.flagged,
            ai_analysis: comment.ai_analysis.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}

#[cfg(test)]
pub fn sample_post(author: ObjectId, flagged: bool) -> ForumPost {
    ForumPost {
        id: None,
        author,
        title: "Interview tips".into(),
        content: "Practice system design".into(),
        likes: vec![],
        views: 0,
        flagged,
        ai_analysis: None,
        created_at: crate::utils::time::now_millis(),
        updated_at: crate::utils::time::now_millis(),
    }
}

#[cfg(test)]
pub fn sample_comment(post: ObjectId, author: ObjectId, flagged: bool) -> ForumComment {
    ForumComment {
        id: None,
        post,
        author,
        content: "Thanks!".into(),
        likes: vec![],
        flagged,
        ai_analysis: None,
        created_at: crate::utils::time::now_millis(),
        updated_at: crate::utils::time::now_millis(),
    }
}
