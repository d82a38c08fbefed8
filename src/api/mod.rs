pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod forum;
pub mod health;
pub mod jobs;
pub mod metrics;
pub mod profile;
pub mod recruiter;
pub mod reviews;
pub mod swagger;

use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::{AuthMiddleware, RequireRole};
use crate::models::Role;
use crate::utils::AppError;

/// Logs a failed service call (warn for 4xx, error for 5xx) and renders the envelope.
pub(crate) fn failure(context: &str, e: AppError) -> HttpResponse {
    if e.is_client_error() {
        log::warn!("❌ {} - {}", context, e);
    } else {
        log::error!("❌ {} - {}", context, e);
    }
    e.error_response()
}

/// Malformed bodies, paths and query strings answer with the same 400 envelope as
/// service-level validation errors.
fn extractor_errors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("❌ {} {} - bad JSON body: {}", req.method(), req.path(), err);
        AppError::Validation(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, req| {
        log::warn!("❌ {} {} - bad path: {}", req.method(), req.path(), err);
        AppError::Validation(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, req| {
        log::warn!("❌ {} {} - bad query: {}", req.method(), req.path(), err);
        AppError::Validation(err.to_string()).into()
    }));
}

/// Every route of the service. Shared by `main` and the HTTP tests; the
/// store (`web::Data<dyn Store>`) and `web::Data<Config>` come from the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_errors(cfg);

    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/profile")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_profile)),
                ),
        )
        .service(
            web::scope("/api/profile")
                .wrap(AuthMiddleware)
                .route("/status", web::get().to(profile::profile_status))
                .route("/{userId}", web::get().to(profile::get_profile))
                .route("/{userId}", web::put().to(profile::update_profile)),
        )
        .service(
            web::scope("/api/jobs")
                .wrap(AuthMiddleware)
                .route("", web::get().to(jobs::list_jobs))
                .route("/search", web::get().to(jobs::search_jobs))
                .route("/apply", web::post().to(jobs::apply))
                .route("/{jobId}", web::get().to(jobs::get_job)), // catch-all, keep last
        )
        .service(
            web::scope("/api/applications")
                .wrap(AuthMiddleware)
                .route("/my-applications", web::get().to(jobs::my_applications)),
        )
        // ==================== STUDENT DASHBOARD ====================
        .service(
            web::scope("/api/dashboard")
                .wrap(AuthMiddleware)
                .route("/applications/{userId}", web::get().to(dashboard::applications))
                .route("/notifications/{userId}", web::get().to(dashboard::notifications))
                .route("/saved-jobs/{userId}", web::get().to(dashboard::saved_jobs))
                .route("/saved-jobs/{userId}", web::post().to(dashboard::save_job))
                .route("/saved-jobs/{userId}", web::delete().to(dashboard::unsave_job))
                .route("/{userId}", web::get().to(dashboard::overview)),
        )
        .service(
            web::scope("/api/notifications")
                .wrap(AuthMiddleware)
                .route("/{id}/read", web::patch().to(dashboard::mark_notification_read)),
        )
        // ==================== FORUM & REVIEWS ====================
        .service(
            web::scope("/api/forum")
                .wrap(AuthMiddleware)
                .route("/posts", web::get().to(forum::list_posts))
                .route("/posts", web::post().to(forum::create_post))
                .route("/posts/{postId}", web::get().to(forum::get_post))
                .route("/posts/{postId}/like", web::post().to(forum::toggle_post_like))
                .route("/posts/{postId}/comments", web::post().to(forum::add_comment))
                .route("/comments/{commentId}/like", web::post().to(forum::toggle_comment_like)),
        )
        .service(
            web::scope("/api/reviews")
                .wrap(AuthMiddleware)
                .route("", web::post().to(reviews::create_review))
                .route("/recruiter/{recruiterId}", web::get().to(reviews::recruiter_reviews)),
        )
        // ==================== RECRUITER (role: recruiter) ====================
        .service(
            web::scope("/api/recruiter")
                .wrap(RequireRole(Role::Recruiter))
                .wrap(AuthMiddleware)
                .route("/jobs", web::get().to(recruiter::my_jobs))
                .route("/jobs", web::post().to(recruiter::create_job))
                .route("/jobs/{jobId}", web::put().to(recruiter::update_job))
                .route("/jobs/{jobId}", web::delete().to(recruiter::delete_job))
                .route("/jobs/{jobId}/mark-filled", web::patch().to(recruiter::mark_filled))
                .route("/jobs/{jobId}/applicants", web::get().to(recruiter::job_applicants))
                .route(
                    "/applications/{applicationId}/status",
                    web::patch().to(recruiter::update_application_status),
                )
                .route("/reviews", web::get().to(recruiter::my_reviews)),
        )
        // ==================== ADMIN (role: admin) ====================
        .service(
            web::scope("/api/admin")
                .wrap(RequireRole(Role::Admin))
                .wrap(AuthMiddleware)
                .route("/stats", web::get().to(admin::get_stats))
                .route("/flagged-content", web::get().to(admin::list_flagged))
                .route("/content/{id}/action", web::post().to(admin::content_action))
                .route("/users", web::get().to(admin::list_users))
                .route("/users/{id}/details", web::get().to(admin::user_details))
                .route("/users/{id}/suspend", web::put().to(admin::suspend_user))
                .route("/users/{id}", web::delete().to(admin::delete_user))
                .route("/jobs/{id}/applicants", web::get().to(admin::job_applicants))
                .route("/jobs/{id}", web::delete().to(admin::delete_job))
                .route("/reviews/{id}", web::delete().to(admin::delete_review)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::database::memory::MemoryStore;
    use crate::database::{JobStore, ReviewStore, Store, UserStore};
    use crate::models::{sample_job, sample_review, sample_user, User};
    use crate::services::auth_service;
    use actix_web::{
        dev::ServiceResponse,
        http::{Method, StatusCode},
        test, App, Error,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($store.clone() as Arc<dyn Store>))
                    .app_data(web::Data::new(test_config()))
                    .configure(configure),
            )
            .await
        };
    }

    /// Status of a response, including errors raised by the auth middleware.
    fn status_of<B>(result: Result<ServiceResponse<B>, Error>) -> StatusCode {
        match result {
            Ok(res) => res.status(),
            Err(e) => e.as_response_error().status_code(),
        }
    }

    fn bearer(user: &User) -> (&'static str, String) {
        let token = auth_service::generate_jwt(user, &test_config().jwt).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    async fn seeded_user(store: &MemoryStore, user_id: &str, role: Role) -> User {
        store.insert_user(sample_user(user_id, role)).await.unwrap()
    }

    #[actix_rt::test]
    async fn test_health_and_metrics_are_public() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(store);

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body["status"], "healthy");

        let res = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_protected_routes_require_token() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(store);

        for uri in ["/api/admin/stats", "/api/jobs/search", "/api/forum/posts", "/api/auth/profile"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_rt::test]
    async fn test_non_admin_gets_403_without_side_effects() {
        let store = Arc::new(MemoryStore::new());
        let student = seeded_user(&store, "stu", Role::Student).await;
        let recruiter = seeded_user(&store, "rec", Role::Recruiter).await;
        let victim = seeded_user(&store, "victim", Role::Student).await;
        let job = store.insert_job(sample_job("Target", recruiter.id)).await.unwrap();
        let review = store
            .insert_review(sample_review(recruiter.id.unwrap(), student.id.unwrap(), true))
            .await
            .unwrap();
        let app = test_app!(store);

        let victim_id = victim.id_hex();
        let job_id = job.id_hex();
        let review_id = review.id_hex();
        let attempts: Vec<(Method, String, Option<Value>)> = vec![
            (Method::GET, "/api/admin/stats".into(), None),
            (Method::GET, "/api/admin/flagged-content".into(), None),
            (
                Method::POST,
                format!("/api/admin/content/{}/action", review_id),
                Some(json!({ "contentType": "reviews", "action": "delete" })),
            ),
            (Method::GET, "/api/admin/users".into(), None),
            (Method::GET, format!("/api/admin/users/{}/details", victim_id), None),
            (
                Method::PUT,
                format!("/api/admin/users/{}/suspend", victim_id),
                Some(json!({ "days": 30 })),
            ),
            (Method::DELETE, format!("/api/admin/users/{}", victim_id), None),
            (Method::GET, format!("/api/admin/jobs/{}/applicants", job_id), None),
            (Method::DELETE, format!("/api/admin/jobs/{}", job_id), None),
            (Method::DELETE, format!("/api/admin/reviews/{}", review_id), None),
        ];

        for caller in [&student, &recruiter] {
            for (method, uri, body) in &attempts {
                let mut req = test::TestRequest::default()
                    .method(method.clone())
                    .uri(uri)
                    .insert_header(bearer(caller));
                if let Some(body) = body {
                    req = req.set_json(body);
                }
                let status = status_of(test::try_call_service(&app, req.to_request()).await);
                assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
            }
        }

        let victim = store.find_user(&victim.id.unwrap()).await.unwrap().unwrap();
        assert!(victim.is_active);
        assert!(store.find_job(&job.id.unwrap()).await.unwrap().is_some());
        let review = store.find_review(&review.id.unwrap()).await.unwrap().unwrap();
        assert!(review.flagged);
    }

    #[actix_rt::test]
    async fn test_recruiter_scope_rejects_students() {
        let store = Arc::new(MemoryStore::new());
        let student = seeded_user(&store, "stu", Role::Student).await;
        let app = test_app!(store);

        let req = test::TestRequest::get()
            .uri("/api/recruiter/jobs")
            .insert_header(bearer(&student))
            .to_request();
        assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_register_login_profile() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(store);

        let register = json!({
            "name": "Nadia Rahman",
            "email": "nadia.rahman@g.bracu.ac.bd",
            "password": "hunter22"
        });
        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/auth/register").set_json(&register).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["userId"], "nadia.rahman");

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/auth/register").set_json(&register).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "success": false, "error": "User with this email already exists" }));

        let login: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "nadia.rahman@g.bracu.ac.bd", "password": "hunter22" }))
                .to_request(),
        )
        .await;
        let token = login["token"].as_str().unwrap().to_string();
        assert_eq!(login["user"]["role"], "student");

        let profile: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/profile")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(profile["user"]["userId"], "nadia.rahman");
        assert!(profile["user"].get("password").is_none());
    }

    #[actix_rt::test]
    async fn test_suspend_scenario() {
        let store = Arc::new(MemoryStore::new());
        let admin = seeded_user(&store, "root", Role::Admin).await;
        let app = test_app!(store);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({ "name": "U One", "email": "u1@g.bracu.ac.bd", "password": "pw123456" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let u1 = store.find_user_by_user_id("u1").await.unwrap().unwrap();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/admin/users/{}/suspend", u1.id_hex()))
                .insert_header(bearer(&admin))
                .set_json(json!({ "days": 30 }))
                .to_request(),
        )
        .await;
        assert_eq!(body["message"], "User suspended for 30 days");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/users?search=u1")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        let listed = body["users"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["userId"] == "u1")
            .cloned()
            .unwrap();
        assert_eq!(listed["isActive"], false);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "u1@g.bracu.ac.bd", "password": "pw123456" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_suspend_with_huge_days_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let admin = seeded_user(&store, "root", Role::Admin).await;
        let victim = seeded_user(&store, "u9", Role::Student).await;
        let app = test_app!(store);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/admin/users/{}/suspend", victim.id_hex()))
                .insert_header(bearer(&admin))
                .set_json(json!({ "days": 9_000_000_000_000_i64 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);

        let stored = store.find_user_by_user_id("u9").await.unwrap().unwrap();
        assert!(stored.is_active);
    }

    #[actix_rt::test]
    async fn test_flag_then_delete_scenario() {
        let store = Arc::new(MemoryStore::new());
        let admin = seeded_user(&store, "root", Role::Admin).await;
        let recruiter = seeded_user(&store, "hr", Role::Recruiter).await;
        let student = seeded_user(&store, "kid", Role::Student).await;
        let review = store
            .insert_review(sample_review(recruiter.id.unwrap(), student.id.unwrap(), true))
            .await
            .unwrap();
        let review_id = review.id_hex();
        let app = test_app!(store);

        let listed: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/flagged-content?type=all")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        let items = listed["flaggedContent"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["_id"], review_id.as_str());
        assert_eq!(items[0]["type"], "reviews");

        let done: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/admin/content/{}/action", review_id))
                .insert_header(bearer(&admin))
                .set_json(json!({ "contentType": "reviews", "action": "delete" }))
                .to_request(),
        )
        .await;
        assert_eq!(done["success"], true);

        let listed: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/flagged-content")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert!(listed["flaggedContent"].as_array().unwrap().is_empty());

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/admin/content/{}/action", review_id))
                .insert_header(bearer(&admin))
                .set_json(json!({ "contentType": "reviews", "action": "ignore" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_bad_input_uses_error_envelope() {
        let store = Arc::new(MemoryStore::new());
        let student = seeded_user(&store, "stu", Role::Student).await;
        let app = test_app!(store);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/jobs/not-an-id")
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "success": false, "error": "Invalid job ID" }));

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/jobs/apply")
                .insert_header(bearer(&student))
                .insert_header(("Content-Type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
    }

    #[actix_rt::test]
    async fn test_apply_twice_over_http() {
        let store = Arc::new(MemoryStore::new());
        let student = seeded_user(&store, "stu", Role::Student).await;
        let job = store.insert_job(sample_job("Intern", None)).await.unwrap();
        let app = test_app!(store);

        let apply = || {
            test::TestRequest::post()
                .uri("/api/jobs/apply")
                .insert_header(bearer(&student))
                .set_json(json!({ "jobId": job.id_hex() }))
                .to_request()
        };

        let res = test::call_service(&app, apply()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "Pending");

        let res = test::call_service(&app, apply()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_job_listing_and_profile_status() {
        let store = Arc::new(MemoryStore::new());
        let student = seeded_user(&store, "lia", Role::Student).await;
        let recruiter = seeded_user(&store, "hr.team", Role::Recruiter).await;
        store.insert_job(sample_job("Backend Intern", recruiter.id)).await.unwrap();
        let app = test_app!(store);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/jobs")
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["jobs"][0]["title"], "Backend Intern");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/profile/status")
                .insert_header(bearer(&recruiter))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["hasProfile"], false);
    }
}
