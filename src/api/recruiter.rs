use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::JobRequest;
use crate::services::{
    auth_service::Claims,
    recruiter_service::{self, StatusUpdateRequest},
};

#[utoipa::path(
    get,
    path = "/api/recruiter/jobs",
    tag = "Recruiter",
    responses((status = 200, description = "Own jobs, newest first, with applicantCount")),
    security(("bearer_auth" = []))
)]
pub async fn my_jobs(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("💼 GET /recruiter/jobs - {}", claims.user_id);

    match recruiter_service::my_jobs(db.get_ref(), &claims).await {
        Ok(jobs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "jobs": jobs
        })),
        Err(e) => failure("Listing recruiter jobs failed", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/recruiter/jobs",
    tag = "Recruiter",
    request_body = JobRequest,
    responses(
        (status = 201, description = "Job created"),
        (status = 400, description = "Title, company and description are required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    request: web::Json<JobRequest>,
) -> HttpResponse {
    log::info!("➕ POST /recruiter/jobs - {}", claims.user_id);

    match recruiter_service::create_job(db.get_ref(), &claims, request.into_inner()).await {
        Ok(job) => {
            log::info!("✅ Job {} posted by {}", job.id, claims.user_id);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "Job posted successfully",
                "job": job
            }))
        }
        Err(e) => failure("Create job failed", e),
    }
}

#[utoipa::path(
    put,
    path = "/api/recruiter/jobs/{jobId}",
    tag = "Recruiter",
    params(("jobId" = String, Path, description = "Job ObjectId")),
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job updated"),
        (status = 403, description = "Not the caller's job"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
    request: web::Json<JobRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /recruiter/jobs/{} - {}", job_id, claims.user_id);

    match recruiter_service::update_job(db.get_ref(), &claims, &job_id, request.into_inner()).await {
        Ok(job) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Job updated successfully",
            "job": job
        })),
        Err(e) => failure(&format!("Update job {} failed", job_id), e),
    }
}

#[utoipa::path(
    patch,
    path = "/api/recruiter/jobs/{jobId}/mark-filled",
    tag = "Recruiter",
    params(("jobId" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job marked as filled"),
        (status = 403, description = "Not the caller's job"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_filled(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
) -> HttpResponse {
    log::info!("✔️  PATCH /recruiter/jobs/{}/mark-filled - {}", job_id, claims.user_id);

    match recruiter_service::mark_filled(db.get_ref(), &claims, &job_id).await {
        Ok(job) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Job marked as filled",
            "job": job
        })),
        Err(e) => failure(&format!("Mark filled {} failed", job_id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/recruiter/jobs/{jobId}",
    tag = "Recruiter",
    params(("jobId" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 403, description = "Not the caller's job"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_job(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /recruiter/jobs/{} - {}", job_id, claims.user_id);

    match recruiter_service::delete_job(db.get_ref(), &claims, &job_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Job deleted successfully"
        })),
        Err(e) => failure(&format!("Delete job {} failed", job_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/recruiter/jobs/{jobId}/applicants",
    tag = "Recruiter",
    params(("jobId" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job, applications with applicants, and stats"),
        (status = 403, description = "Not the caller's job"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn job_applicants(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    job_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👥 GET /recruiter/jobs/{}/applicants - {}", job_id, claims.user_id);

    match recruiter_service::job_applicants(db.get_ref(), &claims, &job_id).await {
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
    patch,
    path = "/api/recruiter/applications/{applicationId}/status",
    tag = "Recruiter",
    params(("applicationId" = String, Path, description = "Application ObjectId")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated and applicant notified"),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Application is for another recruiter's job"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_application_status(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    application_id: web::Path<String>,
    request: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    log::info!(
        "🔄 PATCH /recruiter/applications/{}/status -> {} - {}",
        application_id,
        request.status,
        claims.user_id
    );

    match recruiter_service::update_application_status(db.get_ref(), &claims, &application_id, &request).await {
        Ok(application) => {
            log::info!("✅ Application {} is now {}", application.id, application.status);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("Application status updated to {}", application.status),
                "application": application
            }))
        }
        Err(e) => failure(&format!("Status update {} failed", application_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/recruiter/reviews",
    tag = "Recruiter",
    responses((status = 200, description = "Unflagged reviews about the caller with averages")),
    security(("bearer_auth" = []))
)]
pub async fn my_reviews(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("⭐ GET /recruiter/reviews - {}", claims.user_id);

    match recruiter_service::my_reviews(db.get_ref(), &claims).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "reviews": result.reviews,
            "stats": result.stats
        })),
        Err(e) => failure("Listing recruiter reviews failed", e),
    }
}
