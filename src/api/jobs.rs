use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::JobSearch;
use crate::services::{
    auth_service::Claims,
    job_service::{self, ApplyRequest, ApplyResponse},
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    responses((status = 200, description = "All jobs, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn list_jobs(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("📋 GET /jobs - user: {}", claims.user_id);

    match job_service::list_jobs(db.get_ref()).await {
        Ok(jobs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": jobs.len(),
            "jobs": jobs
        })),
        Err(e) => failure("Listing jobs failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/jobs/search",
    tag = "Jobs",
    params(
        ("keyword" = Option<String>, Query, description = "Case-insensitive match on the title"),
        ("location" = Option<String>, Query, description = "Case-insensitive match on the location"),
        ("minSalary" = Option<f64>, Query, description = "Keep jobs paying at least this much"),
        ("maxSalary" = Option<f64>, Query, description = "Keep jobs starting at or below this")
    ),
    responses((status = 200, description = "Matching jobs, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn search_jobs(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    query: web::Query<JobSearch>,
) -> HttpResponse {
    log::info!("🔎 GET /jobs/search - user: {} query: {:?}", claims.user_id, query);

    match job_service::search_jobs(db.get_ref(), &query).await {
        Ok(jobs) => {
            log::info!("✅ Found {} jobs", jobs.len());
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "count": jobs.len(),
                "jobs": jobs
            }))
        }
        Err(e) => failure("Job search failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/jobs/{jobId}",
    tag = "Jobs",
    params(("jobId" = String, Path, description = "Job ObjectId")),
    responses(
        (status = 200, description = "Job details"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_job(db: web::Data<dyn Store>, job_id: web::Path<String>) -> HttpResponse {
    log::info!("📄 GET /jobs/{}", job_id);

    match job_service::get_job(db.get_ref(), &job_id).await {
        Ok(job) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "job": job
        })),
        Err(e) => failure(&format!("Job {} lookup failed", job_id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/jobs/apply",
    tag = "Jobs",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplyResponse),
        (status = 400, description = "Already applied or job filled"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn apply(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    request: web::Json<ApplyRequest>,
) -> HttpResponse {
    log::info!("📨 POST /jobs/apply - user: {} job: {}", claims.user_id, request.job_id);

    match job_service::apply(db.get_ref(), &claims, &request).await {
        Ok(response) => {
            log::info!("✅ Application {} created", response.application_id);
            HttpResponse::Created().json(response)
        }
        Err(e) => failure(&format!("Apply failed: {} -> {}", claims.user_id, request.job_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/applications/my-applications",
    tag = "Jobs",
    responses((status = 200, description = "Caller's applications with jobs, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn my_applications(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("📋 GET /applications/my-applications - user: {}", claims.user_id);

    match job_service::my_applications(db.get_ref(), &claims).await {
        Ok(applications) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "applications": applications
        })),
        Err(e) => failure("Listing applications failed", e),
    }
}
