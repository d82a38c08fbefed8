use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::database::Store;
use crate::models::UpdateProfileRequest;
use crate::services::{auth_service::Claims, profile_service};

#[utoipa::path(
    get,
    path = "/api/profile/status",
    tag = "Profile",
    responses((status = 200, description = "Whether the caller has completed their profile")),
    security(("bearer_auth" = []))
)]
pub async fn profile_status(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("🧾 GET /profile/status - {}", claims.user_id);

    match profile_service::has_profile(db.get_ref(), &claims).await {
        Ok(has_profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "hasProfile": has_profile
        })),
        Err(e) => failure("Profile status failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/profile/{userId}",
    tag = "Profile",
    params(("userId" = String, Path, description = "Public user handle")),
    responses(
        (status = 200, description = "User profile without password"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👤 GET /profile/{} - by {}", user_id, claims.user_id);

    match profile_service::get_profile(db.get_ref(), &user_id).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => failure(&format!("Profile {} lookup failed", user_id), e),
    }
}

#[utoipa::path(
    put,
    path = "/api/profile/{userId}",
    tag = "Profile",
    params(("userId" = String, Path, description = "Public user handle, must be the caller's")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 403, description = "Not the caller's profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    db: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    user_id: web::Path<String>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /profile/{} - by {}", user_id, claims.user_id);

    match profile_service::update_profile(db.get_ref(), &claims, &user_id, request.into_inner()).await {
        Ok(user) => {
            log::info!("✅ Profile updated: {}", user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Profile updated successfully",
                "user": user
            }))
        }
        Err(e) => failure(&format!("Profile update failed: {}", user_id), e),
    }
}
