use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::{CreateCommentRequest, CreatePostRequest};
use crate::services::{auth_service::Claims, forum_service};

#[utoipa::path(
    get,
    path = "/api/forum/posts",
    tag = "Forum",
    responses((status = 200, description = "Posts newest first with like and comment counts")),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("💬 GET /forum/posts - user: {}", claims.user_id);

    match forum_service::list_posts(db.get_ref(), &claims).await {
        Ok(posts) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "posts": posts
        })),
        Err(e) => failure("Listing posts failed", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/forum/posts",
    tag = "Forum",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Title and content are required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreatePostRequest>,
) -> HttpResponse {
    log::info!("📝 POST /forum/posts - user: {}", claims.user_id);

    match forum_service::create_post(db.get_ref(), &claims, &request).await {
        Ok(post) => {
            log::info!("✅ Post {} created", post.id);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "post": post
            }))
        }
        Err(e) => failure("Create post failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/forum/posts/{postId}",
    tag = "Forum",
    params(("postId" = String, Path, description = "Post ObjectId")),
    responses(
        (status = 200, description = "Post with its comments, oldest first"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_post(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    post_id: web::Path<String>,
) -> HttpResponse {
    log::info!("📄 GET /forum/posts/{} - user: {}", post_id, claims.user_id);

    match forum_service::get_post(db.get_ref(), &claims, &post_id).await {
        Ok(detail) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "post": detail.post,
            "comments": detail.comments
        })),
        Err(e) => failure(&format!("Post {} lookup failed", post_id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/forum/posts/{postId}/like",
    tag = "Forum",
    params(("postId" = String, Path, description = "Post ObjectId")),
    responses(
        (status = 200, description = "Like toggled; returns likeCount and isLiked"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_post_like(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    post_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👍 POST /forum/posts/{}/like - user: {}", post_id, claims.user_id);

    match forum_service::toggle_post_like(db.get_ref(), &claims, &post_id).await {
        Ok(state) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "likeCount": state.like_count,
            "isLiked": state.is_liked
        })),
        Err(e) => failure(&format!("Like post {} failed", post_id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/forum/comments/{commentId}/like",
    tag = "Forum",
    params(("commentId" = String, Path, description = "Comment ObjectId")),
    responses(
        (status = 200, description = "Like toggled; returns likeCount and isLiked"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_comment_like(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    comment_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👍 POST /forum/comments/{}/like - user: {}", comment_id, claims.user_id);

    match forum_service::toggle_comment_like(db.get_ref(), &claims, &comment_id).await {
        Ok(state) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "likeCount": state.like_count,
            "isLiked": state.is_liked
        })),
        Err(e) => failure(&format!("Like comment {} failed", comment_id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/forum/posts/{postId}/comments",
    tag = "Forum",
    params(("postId" = String, Path, description = "Post ObjectId")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added"),
        (status = 400, description = "Comment content is required"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_comment(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    post_id: web::Path<String>,
    request: web::Json<CreateCommentRequest>,
) -> HttpResponse {
    log::info!("💬 POST /forum/posts/{}/comments - user: {}", post_id, claims.user_id);

    match forum_service::add_comment(db.get_ref(), &claims, &post_id, &request).await {
        Ok(comment) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "comment": comment
        })),
        Err(e) => failure(&format!("Comment on {} failed", post_id), e),
    }
}
