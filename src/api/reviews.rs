use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::CreateReviewRequest;
use crate::services::{auth_service::Claims, review_service};

#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created"),
        (status = 400, description = "Invalid ratings or already reviewed"),
        (status = 403, description = "Only students can review"),
        (status = 404, description = "Recruiter not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreateReviewRequest>,
) -> HttpResponse {
    log::info!("⭐ POST /reviews - {} reviewing {}", claims.user_id, request.recruiter_id);

    match review_service::create_review(db.get_ref(), &claims, &request).await {
        Ok(review) => {
            log::info!("✅ Review {} created", review.id);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "Review submitted successfully",
                "review": review
            }))
        }
        Err(e) => failure(&format!("Review of {} failed", request.recruiter_id), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews/recruiter/{recruiterId}",
    tag = "Reviews",
    params(("recruiterId" = String, Path, description = "Recruiter ObjectId")),
    responses(
        (status = 200, description = "Unflagged reviews with average ratings"),
        (status = 404, description = "Recruiter not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn recruiter_reviews(db: web::Data<dyn Store>, recruiter_id: web::Path<String>) -> HttpResponse {
    log::info!("⭐ GET /reviews/recruiter/{}", recruiter_id);

    match review_service::recruiter_reviews(db.get_ref(), &recruiter_id).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "reviews": result.reviews,
            "stats": result.stats
        })),
        Err(e) => failure(&format!("Reviews of {} failed", recruiter_id), e),
    }
}
