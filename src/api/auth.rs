use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::config::Config;
use crate::database::Store;
use crate::services::auth_service::{self, AuthResponse, Claims, LoginRequest, RegisterRequest, RegisterResponse};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing fields, wrong email domain, or user already exists"),
        (status = 403, description = "Admin accounts cannot be self-registered")
    )
)]
pub async fn register(
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let email = request.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("📝 POST /auth/register - email: {}", email);

    match auth_service::register(db.get_ref(), &config, request.into_inner()).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {} ({})", email, response.user_id);
            HttpResponse::Created().json(response)
        }
        Err(e) => failure(&format!("Registration failed: {}", email), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account suspended")
    )
)]
pub async fn login(
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(db.get_ref(), &config.jwt, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => failure(&format!("Login failed: {}", request.email), e),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Caller's user document without password"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("👤 GET /auth/profile - user: {}", claims.user_id);

    match auth_service::get_profile(db.get_ref(), &claims).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => failure("Profile lookup failed", e),
    }
}
