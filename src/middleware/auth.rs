use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::{config::Config, models::Role, services::auth_service, utils::AppError};

pub use crate::services::auth_service::Claims;

const NO_TOKEN: &str = "Access denied. No token provided.";

/// Verifies the bearer token and stores the decoded `Claims` in the request
/// extensions for `web::ReqData<Claims>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Internal("Auth configuration missing".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized(NO_TOKEN.into()))?;

    auth_service::verify_token(token, &config.jwt)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Err(e) => {
                log::warn!("🔒 {} {} - {}", req.method(), req.path(), e);
                Box::pin(async move { Err(e.into()) })
            }
        }
    }
}

/// Rejects authenticated callers whose role differs. Must run after
/// `AuthMiddleware`, i.e. be registered with `.wrap()` before it.
pub struct RequireRole(pub Role);

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.0,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req.extensions().get::<Claims>().map(|claims| claims.role);

        match role {
            Some(role) if role == self.role => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Some(role) => {
                log::warn!(
                    "⛔ {} {} - role '{}' is not allowed, '{}' required",
                    req.method(),
                    req.path(),
                    role,
                    self.role
                );
                let error = AppError::Forbidden(format!("Access denied. {} only.", capitalize(self.role.as_str())));
                Box::pin(async move { Err(error.into()) })
            }
            None => Box::pin(async move { Err(AppError::Unauthorized(NO_TOKEN.into()).into()) }),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::models::sample_user;
    use actix_web::{test, App, HttpResponse, ResponseError};
    use mongodb::bson::oid::ObjectId;

    async fn whoami(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.user_id.clone())
    }

    fn token_for(user_id: &str, role: Role) -> String {
        let mut user = sample_user(user_id, role);
        user.id = Some(ObjectId::new());
        auth_service::generate_jwt(&user, &test_config().jwt).unwrap()
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/me").wrap(AuthMiddleware).route("", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token_for("zoe", Role::Student))))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "zoe");
    }

    #[actix_rt::test]
    async fn test_missing_and_bad_tokens_are_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/me").wrap(AuthMiddleware).route("", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);
    }

    #[actix_rt::test]
    async fn test_role_guard() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(test_config())).service(
                web::scope("/admin")
                    .wrap(RequireRole(Role::Admin))
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for("stu", Role::Student))))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 403);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for("root", Role::Admin))))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "root");
    }

    #[actix_rt::test]
    async fn test_forbidden_message() {
        assert_eq!(capitalize("recruiter"), "Recruiter");
        let err = AppError::Forbidden(format!("Access denied. {} only.", capitalize("admin")));
        assert_eq!(err.status_code(), 403);
    }
}
