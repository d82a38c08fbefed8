//! Admin console: flagged-content moderation, user management and platform
//! statistics. Route-level role checks happen in the middleware; everything
//! here assumes an admin caller.

use crate::{
    database::Store,
    models::{
        ApplicantStats, ApplicationStatus, ApplicationView, CommentView, ContentActionRequest,
        ContentType, FlagFilter, FlaggedItem, JobStatus, JobView, ModerationAction, Notification,
        PostView, RatingSummary, ReviewView, Role, UserFilter, UserProfile,
    },
    services::lookup,
    utils::{parse_object_id, time, AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SuspendRequest {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobApplicants {
    pub job: JobView,
    pub applications: Vec<ApplicationView>,
    pub stats: ApplicantStats,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_applications: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub pending: u64,
    pub reviewed: u64,
    pub jobs_posted: u64,
    pub total_reviews: u64,
    pub overall: f64,
    pub work_culture: f64,
    pub salary: f64,
    pub career_growth: f64,
}

#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub user: UserProfile,
    pub applications: Vec<ApplicationView>,
    pub jobs: Vec<JobView>,
    pub reviews: Vec<ReviewView>,
    pub stats: UserStats,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct UserCounts {
    pub total: u64,
    pub students: u64,
    pub recruiters: u64,
    pub admins: u64,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct JobCounts {
    pub total: u64,
    pub open: u64,
    pub filled: u64,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ApplicationCounts {
    pub total: u64,
    pub pending: u64,
    pub accepted: u64,
    pub rejected: u64,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FlaggedCounts {
    pub reviews: u64,
    pub posts: u64,
    pub comments: u64,
    pub total: u64,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct PlatformStats {
    pub users: UserCounts,
    pub jobs: JobCounts,
    pub applications: ApplicationCounts,
    pub flagged: FlaggedCounts,
}

async fn flagged_of(store: &dyn Store, content_type: ContentType) -> AppResult<Vec<FlaggedItem>> {
    let items = match content_type {
        ContentType::Reviews => {
            let reviews = store.flagged_reviews().await?;
            let authors = lookup::user_summaries(store, reviews.iter().map(|r| r.reviewer)).await?;
            reviews
                .iter()
                .map(|r| FlaggedItem::Reviews(ReviewView::new(r, authors.get(&r.reviewer).cloned())))
                .collect()
        }
        ContentType::Posts => {
            let posts = store.flagged_posts().await?;
            let authors = lookup::user_summaries(store, posts.iter().map(|p| p.author)).await?;
            posts
                .iter()
                .map(|p| FlaggedItem::Posts(PostView::new(p, authors.get(&p.author).cloned(), None)))
                .collect()
        }
        ContentType::Comments => {
            let comments = store.flagged_comments().await?;
            let authors = lookup::user_summaries(store, comments.iter().map(|c| c.author)).await?;
            comments
                .iter()
                .map(|c| {
                    FlaggedItem::Comments(CommentView::new(c, authors.get(&c.author).cloned(), None))
                })
                .collect()
        }
    };
    Ok(items)
}

/// Flagged items tagged by source: reviews, then posts, then comments,
/// oldest first within each.
pub async fn list_flagged(store: &dyn Store, type_filter: Option<&str>) -> AppResult<Vec<FlaggedItem>> {
    let filter = FlagFilter::parse(type_filter).map_err(AppError::Validation)?;

    let mut items = Vec::new();
    for content_type in filter.content_types() {
        items.extend(flagged_of(store, content_type).await?);
    }
    Ok(items)
}

fn not_found(content_type: ContentType) -> AppError {
    let label = content_type.label();
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    AppError::NotFound(format!("{} not found", capitalized))
}

/// Applies delete/warn/ignore to one flagged item. The collection comes from
/// the caller's `contentType`, never from the document.
pub async fn apply_content_action(
    store: &dyn Store,
    content_id: &str,
    request: &ContentActionRequest,
) -> AppResult<String> {
    let content_type: ContentType = request.content_type.parse().map_err(AppError::Validation)?;
    let action: ModerationAction = request.action.parse().map_err(AppError::Validation)?;
    let id = parse_object_id(content_id, "content")?;

    match action {
        ModerationAction::Delete => {
            if !store.delete_content(content_type, &id).await? {
                return Err(not_found(content_type));
            }
            log::info!("🗑️  Deleted {} {}", content_type.label(), id);
            Ok("Content deleted successfully".into())
        }
        ModerationAction::Warn => {
            let author = store
                .content_author(content_type, &id)
                .await?
                .ok_or_else(|| not_found(content_type))?;
            if !store.clear_flag(content_type, &id).await? {
                return Err(not_found(content_type));
            }

            let message = format!(
                "⚠️ Your {} was reported and reviewed by a moderator. Please follow the community guidelines.",
                content_type.label()
            );
            if let Err(e) = store
                .insert_notification(Notification::new(author, message, time::now_millis()))
                .await
            {
                log::error!("❌ Failed to notify author {} of warning: {}", author, e);
            }
            Ok("Warning sent to the author".into())
        }
        ModerationAction::Ignore => {
            if !store.clear_flag(content_type, &id).await? {
                return Err(not_found(content_type));
            }
            Ok("Content marked as safe".into())
        }
    }
}

pub async fn list_users(store: &dyn Store, filter: &UserFilter) -> AppResult<Vec<UserProfile>> {
    let users = store.list_users(filter).await?;
    Ok(users.iter().map(UserProfile::from).collect())
}

pub async fn suspend_user(store: &dyn Store, user_id: &str, request: &SuspendRequest) -> AppResult<String> {
    let id = parse_object_id(user_id, "user")?;
    let days = match request.days {
        Some(days) if days > 0 => days,
        _ => {
            return Err(AppError::Validation(
                "Suspension days must be a positive integer".into(),
            ))
        }
    };

    let until = time::days_from_now(days).ok_or_else(|| {
        AppError::Validation("Suspension days is out of range".into())
    })?;

    if !store.set_user_active(&id, false, Some(until)).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(format!("User suspended for {} days", days))
}

pub async fn delete_user(store: &dyn Store, user_id: &str) -> AppResult<String> {
    let id = parse_object_id(user_id, "user")?;
    if !store.delete_user(&id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok("User deleted successfully".into())
}

pub async fn user_details(store: &dyn Store, user_id: &str) -> AppResult<UserDetails> {
    let id = parse_object_id(user_id, "user")?;
    let user = store
        .find_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let applications = store.applications_for_user(&id, None).await?;
    let jobs = store.jobs_by_recruiter(&id).await?;
    let reviews = store.reviews_for_recruiter(&id, true).await?;
    let reviewers = lookup::user_summaries(store, reviews.iter().map(|r| r.reviewer)).await?;

    let counts = ApplicantStats::from_applications(&applications);
    let reviewed = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::Reviewed)
        .count() as u64;
    let ratings = RatingSummary::from_reviews(&reviews);

    let stats = UserStats {
        total_applications: counts.total,
        accepted: counts.accepted,
        rejected: counts.rejected,
        pending: counts.pending - reviewed,
        reviewed,
        jobs_posted: jobs.len() as u64,
        total_reviews: ratings.total_reviews,
        overall: ratings.overall,
        work_culture: ratings.work_culture,
        salary: ratings.salary,
        career_growth: ratings.career_growth,
    };

    Ok(UserDetails {
        user: UserProfile::from(&user),
        applications: lookup::with_jobs(store, &applications).await?,
        jobs: jobs.iter().map(JobView::from).collect(),
        reviews: reviews
            .iter()
            .map(|r| ReviewView::new(r, reviewers.get(&r.reviewer).cloned()))
            .collect(),
        stats,
    })
}

/// Shared by the admin console and the owning recruiter.
pub async fn applicants_for(store: &dyn Store, job_id: &ObjectId) -> AppResult<JobApplicants> {
    let job = store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    let applications = store.applications_for_job(job_id).await?;

    Ok(JobApplicants {
        job: JobView::from(&job),
        stats: ApplicantStats::from_applications(&applications),
        applications: lookup::with_applicants(store, &applications).await?,
    })
}

pub async fn job_applicants(store: &dyn Store, job_id: &str) -> AppResult<JobApplicants> {
    applicants_for(store, &parse_object_id(job_id, "job")?).await
}

pub async fn platform_stats(store: &dyn Store) -> AppResult<PlatformStats> {
    let flagged = FlaggedCounts {
        reviews: store.count_flagged(ContentType::Reviews).await?,
        posts: store.count_flagged(ContentType::Posts).await?,
        comments: store.count_flagged(ContentType::Comments).await?,
        total: 0,
    };

    Ok(PlatformStats {
        users: UserCounts {
            total: store.count_users(None).await?,
            students: store.count_users(Some(Role::Student)).await?,
            recruiters: store.count_users(Some(Role::Recruiter)).await?,
            admins: store.count_users(Some(Role::Admin)).await?,
        },
        jobs: JobCounts {
            total: store.count_jobs(None).await?,
            open: store.count_jobs(Some(JobStatus::Open)).await?,
            filled: store.count_jobs(Some(JobStatus::Filled)).await?,
        },
        applications: ApplicationCounts {
            total: store.count_applications(None).await?,
            pending: store.count_applications(Some(ApplicationStatus::Pending)).await?,
            accepted: store.count_applications(Some(ApplicationStatus::Accepted)).await?,
            rejected: store.count_applications(Some(ApplicationStatus::Rejected)).await?,
        },
        flagged: FlaggedCounts {
            total: flagged.reviews + flagged.posts + flagged.comments,
            ..flagged
        },
    })
}

pub async fn delete_job(store: &dyn Store, job_id: &str) -> AppResult<String> {
    let id = parse_object_id(job_id, "job")?;
    if !store.delete_job(&id).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }
    Ok("Job deleted successfully".into())
}

pub async fn delete_review(store: &dyn Store, review_id: &str) -> AppResult<String> {
    let id = parse_object_id(review_id, "review")?;
    if !store.delete_content(ContentType::Reviews, &id).await? {
        return Err(AppError::NotFound("Review not found".into()));
    }
    Ok("Review deleted successfully".into())
}
