//! `/api/admin/*`. The scope is wrapped with `RequireRole(Role::Admin)`, so
//! every handler here runs for an authenticated admin only.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::failure;
use crate::database::Store;
use crate::models::{ContentActionRequest, UserFilter};
use crate::services::{
    admin_service::{self, PlatformStats, SuspendRequest},
    auth_service::Claims,
};

#[derive(Debug, Deserialize)]
pub struct FlaggedQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

fn message(text: String) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": text
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Platform-wide counters", body = PlatformStats),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("📊 GET /admin/stats - admin: {}", claims.user_id);

    match admin_service::platform_stats(db.get_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "stats": stats
        })),
        Err(e) => failure("Platform stats failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/flagged-content",
    tag = "Admin",
    params(("type" = Option<String>, Query, description = "reviews, posts, comments or all (default)")),
    responses(
        (status = 200, description = "Flagged items tagged with their type: reviews, then posts, then comments"),
        (status = 400, description = "Unknown type filter"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_flagged(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    query: web::Query<FlaggedQuery>,
) -> HttpResponse {
    let filter = query.content_type.as_deref();
    log::info!(
        "🚩 GET /admin/flagged-content - type: {} admin: {}",
        filter.unwrap_or("all"),
        claims.user_id
    );

    match admin_service::list_flagged(db.get_ref(), filter).await {
        Ok(items) => {
            log::info!("✅ {} flagged items", items.len());
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "flaggedContent": items
            }))
        }
        Err(e) => failure("Listing flagged content failed", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/content/{id}/action",
    tag = "Admin",
    params(("id" = String, Path, description = "ObjectId of the flagged item")),
    request_body = ContentActionRequest,
    responses(
        (status = 200, description = "Action applied"),
        (status = 400, description = "Unknown content type or action"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Content not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn content_action(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    content_id: web::Path<String>,
    request: web::Json<ContentActionRequest>,
) -> HttpResponse {
    log::info!(
        "🛡️  POST /admin/content/{}/action - {} {} by {}",
        content_id,
        request.action,
        request.content_type,
        claims.user_id
    );

    match admin_service::apply_content_action(db.get_ref(), &content_id, &request).await {
        Ok(text) => {
            log::info!("✅ {} {}: {}", request.action, content_id, text);
            message(text)
        }
        Err(e) => failure(&format!("Content action on {} failed", content_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(
        ("search" = Option<String>, Query, description = "Matches name, email or userId"),
        ("role" = Option<String>, Query, description = "student, recruiter or admin")
    ),
    responses(
        (status = 200, description = "Users newest first, without passwords"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    query: web::Query<UserFilter>,
) -> HttpResponse {
    log::info!("👥 GET /admin/users - {:?} admin: {}", query, claims.user_id);

    match admin_service::list_users(db.get_ref(), &query).await {
        Ok(users) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "users": users
        })),
        Err(e) => failure("Listing users failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/details",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User with applications, jobs, reviews and stats"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn user_details(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔍 GET /admin/users/{}/details - admin: {}", user_id, claims.user_id);

    match admin_service::user_details(db.get_ref(), &user_id).await {
        Ok(details) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": details.user,
            "applications": details.applications,
            "jobs": details.jobs,
            "reviews": details.reviews,
            "stats": details.stats
        })),
        Err(e) => failure(&format!("User details {} failed", user_id), e),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/suspend",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = SuspendRequest,
    responses(
        (status = 200, description = "User suspended"),
        (status = 400, description = "days must be a positive integer"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn suspend_user(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
    request: web::Json<SuspendRequest>,
) -> HttpResponse {
    log::info!(
        "⏸️  PUT /admin/users/{}/suspend - days: {:?} admin: {}",
        user_id,
        request.days,
        claims.user_id
    );

    match admin_service::suspend_user(db.get_ref(), &user_id, &request).await {
        Ok(text) => {
            log::info!("✅ {}: {}", user_id, text);
            message(text)
        }
        Err(e) => failure(&format!("Suspend {} failed", user_id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /admin/users/{} - admin: {}", user_id, claims.user_id);

    match admin_service::delete_user(db.get_ref(), &user_id).await {
        Ok(text) => message(text),
        Err(e) => failure(&format!("Delete user {} failed", user_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/applicants",
    tag = "Admin",
    params(("id" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job, applications with applicants, and stats"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn job_applicants(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👥 GET /admin/jobs/{}/applicants - admin: {}", job_id, claims.user_id);

    match admin_service::job_applicants(db.get_ref(), &job_id).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "job": result.job,
            "applications": result.applications,
            "stats": result.stats
        })),
        Err(e) => failure(&format!("Applicants of {} failed", job_id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/jobs/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /admin/jobs/{} - admin: {}", job_id, claims.user_id);

    match admin_service::delete_job(db.get_ref(), &job_id).await {
        Ok(text) => message(text),
        Err(e) => failure(&format!("Delete job {} failed", job_id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Review ObjectId")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    review_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /admin/reviews/{} - admin: {}", review_id, claims.user_id);

    match admin_service::delete_review(db.get_ref(), &review_id).await {
        Ok(text) => message(text),
        Err(e) => failure(&format!("Delete review {} failed", review_id), e),
    }
}
