use crate::{
    database::Store,
    models::{ApplicationStatus, ApplicationView, JobIdRequest, JobView, NotificationView},
    services::{auth_service::Claims, lookup},
    utils::{parse_object_id, AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    pub id: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub user_id: String,
    pub student_info: StudentInfo,
    pub applications: Vec<RecentApplication>,
    pub saved_jobs_count: usize,
    pub saved_jobs: Vec<JobView>,
    pub notifications: Vec<NotificationView>,
}

/// Every dashboard route is addressed by the public userId and only serves the caller.
fn owner_id(claims: &Claims, user_id: &str) -> AppResult<ObjectId> {
    if claims.user_id != user_id {
        return Err(AppError::Forbidden(
            "Access denied. You can only access your own data.".into(),
        ));
    }
    claims.object_id()
}

async fn saved_job_views(store: &dyn Store, user: &ObjectId) -> AppResult<Vec<JobView>> {
    let ids = store.saved_job_ids(user).await?;
    let jobs = lookup::jobs_by_id(store, ids.iter().copied()).await?;
    // keep the order the jobs were saved in; jobs deleted since are dropped
    Ok(ids.iter().filter_map(|id| jobs.get(id)).map(JobView::from).collect())
}

pub async fn overview(store: &dyn Store, claims: &Claims, user_id: &str) -> AppResult<DashboardOverview> {
    let id = owner_id(claims, user_id)?;
    let user = store
        .find_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let recent = store.applications_for_user(&id, Some(RECENT_LIMIT)).await?;
    let jobs = lookup::jobs_by_id(store, recent.iter().map(|a| a.job)).await?;
    let applications = recent
        .iter()
        .map(|a| {
            let job = jobs.get(&a.job);
            RecentApplication {
                id: a.id_hex(),
                job_title: job.map(|j| j.title.clone()),
                company: job.map(|j| j.company.clone()),
                status: a.status,
                applied_date: a.created_at,
            }
        })
        .collect();

    let saved_jobs = saved_job_views(store, &id).await?;
    let notifications = store
        .notifications_for_user(&id, Some(RECENT_LIMIT))
        .await?
        .iter()
        .map(NotificationView::from)
        .collect();

    Ok(DashboardOverview {
        user_id: user.user_id,
        student_info: StudentInfo {
            name: user.name,
            email: user.email,
            department: user.department,
            cgpa: user.cgpa,
        },
        applications,
        saved_jobs_count: saved_jobs.len(),
        saved_jobs,
        notifications,
    })
}

pub async fn applications(
    store: &dyn Store,
    claims: &Claims,
    user_id: &str,
) -> AppResult<Vec<ApplicationView>> {
    let id = owner_id(claims, user_id)?;
    let applications = store.applications_for_user(&id, None).await?;
    lookup::with_jobs(store, &applications).await
}

pub async fn notifications(
    store: &dyn Store,
    claims: &Claims,
    user_id: &str,
) -> AppResult<Vec<NotificationView>> {
    let id = owner_id(claims, user_id)?;
    let notifications = store.notifications_for_user(&id, None).await?;
    Ok(notifications.iter().map(NotificationView::from).collect())
}

pub async fn saved_jobs(store: &dyn Store, claims: &Claims, user_id: &str) -> AppResult<Vec<JobView>> {
    let id = owner_id(claims, user_id)?;
    saved_job_views(store, &id).await
}

pub async fn save_job(
    store: &dyn Store,
    claims: &Claims,
    user_id: &str,
    request: &JobIdRequest,
) -> AppResult<()> {
    let id = owner_id(claims, user_id)?;
    let job_id = parse_object_id(&request.job_id, "job")?;

    if store.find_job(&job_id).await?.is_none() {
        return Err(AppError::NotFound("Job not found".into()));
    }
    if !store.add_saved_job(&id, &job_id).await? {
        return Err(AppError::Validation("Job already saved".into()));
    }
    Ok(())
}

pub async fn unsave_job(
    store: &dyn Store,
    claims: &Claims,
    user_id: &str,
    request: &JobIdRequest,
) -> AppResult<()> {
    let id = owner_id(claims, user_id)?;
    let job_id = parse_object_id(&request.job_id, "job")?;
    store.remove_saved_job(&id, &job_id).await
}

pub async fn mark_notification_read(
    store: &dyn Store,
    claims: &Claims,
    notification_id: &str,
) -> AppResult<()> {
    let id = parse_object_id(notification_id, "notification")?;
    if !store.mark_notification_read(&id, &claims.object_id()?).await? {
        return Err(AppError::NotFound("Notification not found".into()));
    }
    Ok(())
}
