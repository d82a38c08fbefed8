use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::JobIdRequest;
use crate::services::{auth_service::Claims, dashboard_service};

#[utoipa::path(
    get,
    path = "/api/dashboard/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    responses(
        (status = 200, description = "Student info, recent applications, saved jobs and notifications"),
        (status = 403, description = "Not the caller's dashboard")
    ),
    security(("bearer_auth" = []))
)]
pub async fn overview(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("📊 GET /dashboard/{} - by {}", user_id, claims.user_id);

    match dashboard_service::overview(db.get_ref(), &claims, &user_id).await {
        Ok(data) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": data
        })),
        Err(e) => failure(&format!("Dashboard {} failed", user_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/applications/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    responses((status = 200, description = "All applications, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn applications(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("📋 GET /dashboard/applications/{}", user_id);

    match dashboard_service::applications(db.get_ref(), &claims, &user_id).await {
        Ok(applications) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "applications": applications
        })),
        Err(e) => failure(&format!("Dashboard applications {} failed", user_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/notifications/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    responses((status = 200, description = "All notifications, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn notifications(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔔 GET /dashboard/notifications/{}", user_id);

    match dashboard_service::notifications(db.get_ref(), &claims, &user_id).await {
        Ok(notifications) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "notifications": notifications
        })),
        Err(e) => failure(&format!("Dashboard notifications {} failed", user_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard/saved-jobs/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    responses((status = 200, description = "Saved jobs in the order they were saved")),
    security(("bearer_auth" = []))
)]
pub async fn saved_jobs(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("⭐ GET /dashboard/saved-jobs/{}", user_id);

    match dashboard_service::saved_jobs(db.get_ref(), &claims, &user_id).await {
        Ok(jobs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "savedJobs": jobs
        })),
        Err(e) => failure(&format!("Saved jobs {} failed", user_id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/dashboard/saved-jobs/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    request_body = JobIdRequest,
    responses(
        (status = 200, description = "Job saved"),
        (status = 400, description = "Job already saved"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
    request: web::Json<JobIdRequest>,
) -> HttpResponse {
    log::info!("⭐ POST /dashboard/saved-jobs/{} - job: {}", user_id, request.job_id);

    match dashboard_service::save_job(db.get_ref(), &claims, &user_id, &request).await {
        Ok(()) => {
            log::info!("✅ Job {} saved for {}", request.job_id, user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Job saved successfully"
            }))
        }
        Err(e) => failure(&format!("Save job failed: {}", request.job_id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/dashboard/saved-jobs/{userId}",
    tag = "Dashboard",
    params(("userId" = String, Path, description = "Caller's public handle")),
    request_body = JobIdRequest,
    responses((status = 200, description = "Job removed (idempotent)")),
    security(("bearer_auth" = []))
)]
pub async fn unsave_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
    request: web::Json<JobIdRequest>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /dashboard/saved-jobs/{} - job: {}", user_id, request.job_id);

    match dashboard_service::unsave_job(db.get_ref(), &claims, &user_id, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Job removed from saved"
        })),
        Err(e) => failure(&format!("Unsave job failed: {}", request.job_id), e),
    }
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    tag = "Dashboard",
    params(("id" = String, Path, description = "Notification ObjectId")),
    responses(
        (status = 200, description = "Notification marked read"),
        (status = 404, description = "Not one of the caller's notifications")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    notification_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔔 PATCH /notifications/{}/read - user: {}", notification_id, claims.user_id);

    match dashboard_service::mark_notification_read(db.get_ref(), &claims, &notification_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Notification marked as read"
        })),
        Err(e) => failure(&format!("Mark read failed: {}", notification_id), e),
    }
}
