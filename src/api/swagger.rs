use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Placement Hub API",
        version = "1.0.0",
        description = "Campus placement portal: students find jobs and apply, recruiters post jobs and manage applicants, admins moderate flagged content.\n\n**Authentication:** every `/api/*` endpoint except register and login requires a JWT Bearer token.\n\n**Roles:** `/api/recruiter/*` is restricted to recruiters and `/api/admin/*` to admins.",
        contact(
            name = "Placement Hub Team"
        )
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_profile,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Profile
        crate::api::profile::profile_status,
        crate::api::profile::get_profile,
        crate::api::profile::update_profile,

        // Jobs & applications
        crate::api::jobs::list_jobs,
        crate::api::jobs::search_jobs,
        crate::api::jobs::get_job,
        crate::api::jobs::apply,
        crate::api::jobs::my_applications,

        // Dashboard
        crate::api::dashboard::overview,
        crate::api::dashboard::applications,
        crate::api::dashboard::notifications,
        crate::api::dashboard::saved_jobs,
        crate::api::dashboard::save_job,
        crate::api::dashboard::unsave_job,
        crate::api::dashboard::mark_notification_read,

        // Forum
        crate::api::forum::list_posts,
        crate::api::forum::create_post,
        crate::api::forum::get_post,
        crate::api::forum::toggle_post_like,
        crate::api::forum::toggle_comment_like,
        crate::api::forum::add_comment,

        // Reviews
        crate::api::reviews::create_review,
        crate::api::reviews::recruiter_reviews,

        // Recruiter
        crate::api::recruiter::my_jobs,
        crate::api::recruiter::create_job,
        crate::api::recruiter::update_job,
        crate::api::recruiter::mark_filled,
        crate::api::recruiter::delete_job,
        crate::api::recruiter::job_applicants,
        crate::api::recruiter::update_application_status,
        crate::api::recruiter::my_reviews,

        // Admin
        crate::api::admin::get_stats,
        crate::api::admin::list_flagged,
        crate::api::admin::content_action,
        crate::api::admin::list_users,
        crate::api::admin::user_details,
        crate::api::admin::suspend_user,
        crate::api::admin::delete_user,
        crate::api::admin::job_applicants,
        crate::api::admin::delete_job,
        crate::api::admin::delete_review,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::models::Role,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Profile
            crate::models::UpdateProfileRequest,
            crate::models::WorkExperience,
            crate::models::Education,

            // Jobs
            crate::models::JobRequest,
            crate::models::JobStatus,
            crate::models::JobIdRequest,
            crate::models::ApplicationStatus,
            crate::models::ApplicantStats,
            crate::services::job_service::ApplyRequest,
            crate::services::job_service::ApplyResponse,
            crate::services::recruiter_service::StatusUpdateRequest,

            // Forum & reviews
            crate::models::CreatePostRequest,
            crate::models::CreateCommentRequest,
            crate::models::CreateReviewRequest,
            crate::models::Ratings,
            crate::models::RatingSummary,

            // Admin
            crate::models::ContentActionRequest,
            crate::models::ContentType,
            crate::models::ModerationAction,
            crate::services::admin_service::SuspendRequest,
            crate::services::admin_service::PlatformStats,
            crate::services::admin_service::UserCounts,
            crate::services::admin_service::JobCounts,
            crate::services::admin_service::ApplicationCounts,
            crate::services::admin_service::FlaggedCounts,
        )
    ),
    tags(
        (name = "Auth", description = "Registration with an institutional email, login and the caller's own profile."),
        (name = "Health", description = "Health check and request counters for monitoring."),
        (name = "Profile", description = "View any profile; edit only your own."),
        (name = "Jobs", description = "Job search, job details and applications."),
        (name = "Dashboard", description = "Student dashboard: recent activity, saved jobs and notifications."),
        (name = "Forum", description = "Discussion posts, comments and likes."),
        (name = "Reviews", description = "Student reviews of recruiters."),
        (name = "Recruiter", description = "Job postings and applicant management for recruiters."),
        (name = "Admin", description = "Flagged-content moderation, user management and platform statistics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/auth/login"))
                        .build()
                ),
            );
        }
    }
}
