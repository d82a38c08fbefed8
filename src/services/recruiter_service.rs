use crate::{
    database::Store,
    models::{
        ApplicationStatus, ApplicationView, Job, JobRequest, JobStatus, JobView, Notification,
        UserSummary,
    },
    services::{
        admin_service::{self, JobApplicants},
        auth_service::Claims,
        review_service::{self, RecruiterReviews},
    },
    utils::{parse_object_id, time, AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// Loads a job and checks the caller posted it.
async fn owned_job(store: &dyn Store, claims: &Claims, job_id: &str) -> AppResult<Job> {
    let id = parse_object_id(job_id, "job")?;
    let job = store
        .find_job(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    if !job.is_owned_by(&claims.object_id()?) {
        return Err(AppError::Forbidden("You can only manage your own job postings".into()));
    }
    Ok(job)
}

fn job_id(job: &Job) -> AppResult<ObjectId> {
    job.id
        .ok_or_else(|| AppError::Internal("Stored job has no _id".into()))
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

pub async fn my_jobs(store: &dyn Store, claims: &Claims) -> AppResult<Vec<JobView>> {
    let jobs = store.jobs_by_recruiter(&claims.object_id()?).await?;

    let mut views = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let mut view = JobView::from(job);
        view.applicant_count = Some(store.count_applications_for_job(&job_id(job)?).await?);
        views.push(view);
    }
    Ok(views)
}

pub async fn create_job(store: &dyn Store, claims: &Claims, request: JobRequest) -> AppResult<JobView> {
    if !(non_blank(&request.title) && non_blank(&request.company) && non_blank(&request.description)) {
        return Err(AppError::Validation(
            "Title, company, and description are required".into(),
        ));
    }

    let now = time::now_millis();
    let mut job = Job {
        id: None,
        title: String::new(),
        company: String::new(),
        location: None,
        description: String::new(),
        required_skills: Vec::new(),
        responsibilities: Vec::new(),
        requirements: Vec::new(),
        job_type: None,
        salary_min: None,
        salary_max: None,
        status: JobStatus::Open,
        recruiter: Some(claims.object_id()?),
        created_at: now,
        updated_at: now,
    };
    request.apply_to(&mut job);

    let job = store.insert_job(job).await?;
    let mut view = JobView::from(&job);
    view.applicant_count = Some(0);
    Ok(view)
}

pub async fn update_job(
    store: &dyn Store,
    claims: &Claims,
    job_id: &str,
    request: JobRequest,
) -> AppResult<JobView> {
    let mut job = owned_job(store, claims, job_id).await?;
    request.apply_to(&mut job);
    job.updated_at = time::now_millis();

    if !store.replace_job(&job).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }
    Ok(JobView::from(&job))
}

pub async fn mark_filled(store: &dyn Store, claims: &Claims, job_id: &str) -> AppResult<JobView> {
    let mut job = owned_job(store, claims, job_id).await?;
    if !store.set_job_status(&self::job_id(&job)?, JobStatus::Filled).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }
    job.status = JobStatus::Filled;
    Ok(JobView::from(&job))
}

pub async fn delete_job(store: &dyn Store, claims: &Claims, job_id: &str) -> AppResult<()> {
    let job = owned_job(store, claims, job_id).await?;
    if !store.delete_job(&self::job_id(&job)?).await? {
        return Err(AppError::NotFound("Job not found".into()));
    }
    Ok(())
}

pub async fn job_applicants(store: &dyn Store, claims: &Claims, job_id: &str) -> AppResult<JobApplicants> {
    let job = owned_job(store, claims, job_id).await?;
    admin_service::applicants_for(store, &self::job_id(&job)?).await
}

/// Moves an application along Pending → Reviewed → Accepted/Rejected and
/// tells the applicant. A failed notification doesn't undo the update.
pub async fn update_application_status(
    store: &dyn Store,
    claims: &Claims,
    application_id: &str,
    request: &StatusUpdateRequest,
) -> AppResult<ApplicationView> {
    let id = parse_object_id(application_id, "application")?;
    let mut application = store
        .find_application(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    let job = store
        .find_job(&application.job)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    if !job.is_owned_by(&claims.object_id()?) {
        return Err(AppError::Forbidden(
            "You can only manage applications to your own job postings".into(),
        ));
    }

    if !application.status.can_transition_to(request.status) {
        return Err(AppError::Validation(format!(
            "Cannot change application status from {} to {}",
            application.status, request.status
        )));
    }

    if !store.set_application_status(&id, request.status).await? {
        return Err(AppError::NotFound("Application not found".into()));
    }
    application.status = request.status;
    application.updated_at = time::now_millis();

    let message = format!(
        "Your application for {} at {} is now {}",
        job.title, job.company, request.status
    );
    if let Err(e) = store
        .insert_notification(Notification::new(application.user, message, time::now_millis()))
        .await
    {
        log::error!("❌ Failed to notify applicant {}: {}", application.user, e);
    }

    let applicant = store.find_user(&application.user).await?;
    Ok(ApplicationView::new(
        &application,
        Some(JobView::from(&job)),
        applicant.as_ref().map(UserSummary::from),
    ))
}

pub async fn my_reviews(store: &dyn Store, claims: &Claims) -> AppResult<RecruiterReviews> {
    review_service::reviews_about(store, &claims.object_id()?).await
}
