use crate::{
    database::Store,
    models::{
        CommentView, CreateCommentRequest, CreatePostRequest, ForumComment, ForumPost, LikeState,
        PostView,
    },
    services::{auth_service::Claims, lookup},
    utils::{parse_object_id, time, AppError, AppResult},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub async fn list_posts(store: &dyn Store, claims: &Claims) -> AppResult<Vec<PostView>> {
    let viewer = claims.object_id()?;
    let posts = store.list_posts().await?;
    let authors = lookup::user_summaries(store, posts.iter().map(|p| p.author)).await?;

    let mut views = Vec::with_capacity(posts.len());
    for post in &posts {
        let mut view = PostView::new(post, authors.get(&post.author).cloned(), Some(&viewer));
        if let Some(id) = post.id {
            view.comment_count = Some(store.count_comments_for_post(&id).await?);
        }
        views.push(view);
    }
    Ok(views)
}

pub async fn create_post(
    store: &dyn Store,
    claims: &Claims,
    request: &CreatePostRequest,
) -> AppResult<PostView> {
    let (title, content) = match (non_blank(&request.title), non_blank(&request.content)) {
        (Some(title), Some(content)) => (title, content),
        _ => return Err(AppError::Validation("Title and content are required".into())),
    };

    let author = claims.object_id()?;
    let now = time::now_millis();
    let post = store
        .insert_post(ForumPost {
            id: None,
            author,
            title,
            content,
            likes: Vec::new(),
            views: 0,
            flagged: false,
            ai_analysis: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let authors = lookup::user_summaries(store, [author]).await?;
    let mut view = PostView::new(&post, authors.get(&author).cloned(), Some(&author));
    view.comment_count = Some(0);
    Ok(view)
}

/// Opening a post counts as a view.
pub async fn get_post(store: &dyn Store, claims: &Claims, post_id: &str) -> AppResult<PostDetail> {
    let id = parse_object_id(post_id, "post")?;
    let viewer = claims.object_id()?;

    let post = store
        .increment_post_views(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    let comments = store.comments_for_post(&id).await?;

    let authors = lookup::user_summaries(
        store,
        std::iter::once(post.author).chain(comments.iter().map(|c| c.author)),
    )
    .await?;

    let mut view = PostView::new(&post, authors.get(&post.author).cloned(), Some(&viewer));
    view.comment_count = Some(comments.len() as u64);

    Ok(PostDetail {
        post: view,
        comments: comments
            .iter()
            .map(|c| CommentView::new(c, authors.get(&c.author).cloned(), Some(&viewer)))
            .collect(),
    })
}

pub async fn toggle_post_like(store: &dyn Store, claims: &Claims, post_id: &str) -> AppResult<LikeState> {
    let id = parse_object_id(post_id, "post")?;
    store
        .toggle_post_like(&id, &claims.object_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

pub async fn toggle_comment_like(
    store: &dyn Store,
    claims: &Claims,
    comment_id: &str,
) -> AppResult<LikeState> {
    let id = parse_object_id(comment_id, "comment")?;
    store
        .toggle_comment_like(&id, &claims.object_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
}

pub async fn add_comment(
    store: &dyn Store,
    claims: &Claims,
    post_id: &str,
    request: &CreateCommentRequest,
) -> AppResult<CommentView> {
    let post = parse_object_id(post_id, "post")?;
    let content = non_blank(&request.content)
        .ok_or_else(|| AppError::Validation("Comment content is required".into()))?;

    if store.find_post(&post).await?.is_none() {
        return Err(AppError::NotFound("Post not found".into()));
    }

    let author = claims.object_id()?;
    let now = time::now_millis();
    let comment = store
        .insert_comment(ForumComment {
            id: None,
            post,
            author,
            content,
            likes: Vec::new(),
            flagged: false,
            ai_analysis: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let authors = lookup::user_summaries(store, [author]).await?;
    Ok(CommentView::new(&comment, authors.get(&author).cloned(), Some(&author)))
}
