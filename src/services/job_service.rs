use crate::{
    database::Store,
    models::{Application, ApplicationStatus, ApplicationView, JobSearch, JobStatus, JobView},
    services::{auth_service::Claims, lookup},
    utils::{parse_object_id, time, AppError, AppResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub success: bool,
    pub message: String,
    pub application_id: String,
    pub status: ApplicationStatus,
}

pub async fn search_jobs(store: &dyn Store, search: &JobSearch) -> AppResult<Vec<JobView>> {
    let jobs = store.search_jobs(search).await?;
    Ok(jobs.iter().map(JobView::from).collect())
}

/// Every job, newest first.
pub async fn list_jobs(store: &dyn Store) -> AppResult<Vec<JobView>> {
    search_jobs(store, &JobSearch::default()).await
}

pub async fn get_job(store: &dyn Store, job_id: &str) -> AppResult<JobView> {
    let id = parse_object_id(job_id, "job")?;
    store
        .find_job(&id)
        .await?
        .map(|job| JobView::from(&job))
        .ok_or_else(|| AppError::NotFound("Job not found".into()))
}

/// The pre-check gives the friendly error; the unique (job, user) index
/// catches the race between two concurrent submissions.
pub async fn apply(store: &dyn Store, claims: &Claims, request: &ApplyRequest) -> AppResult<ApplyResponse> {
    let user = claims.object_id()?;
    let job_id = parse_object_id(&request.job_id, "job")?;

    let job = store
        .find_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    if job.status == JobStatus::Filled {
        return Err(AppError::Validation(
            "This position has been filled and is no longer accepting applications".into(),
        ));
    }

    if store.find_application_for(&job_id, &user).await?.is_some() {
        return Err(AppError::Validation(crate::database::DUPLICATE_APPLICATION.into()));
    }

    let application = store
        .insert_application(Application::new(job_id, user, time::now_millis()))
        .await?;

    Ok(ApplyResponse {
        success: true,
        message: "Application submitted successfully".into(),
        application_id: application.id_hex(),
        status: application.status,
    })
}

pub async fn my_applications(store: &dyn Store, claims: &Claims) -> AppResult<Vec<ApplicationView>> {
    let applications = store.applications_for_user(&claims.object_id()?, None).await?;
    lookup::with_jobs(store, &applications).await
}
