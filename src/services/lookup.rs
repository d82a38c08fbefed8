//! Batch "populate" helpers: resolve referenced ids with one query per
//! collection instead of one per document.

use crate::{
    database::Store,
    models::{ApplicationView, Application, Job, JobView, UserSummary},
    utils::AppResult,
};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

fn unique(ids: impl IntoIterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut ids: Vec<ObjectId> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    ids
}

pub async fn user_summaries(
    store: &dyn Store,
    ids: impl IntoIterator<Item = ObjectId>,
) -> AppResult<HashMap<ObjectId, UserSummary>> {
    let users = store.find_users(&unique(ids)).await?;
    Ok(users
        .iter()
        .filter_map(|user| user.id.map(|id| (id, UserSummary::from(user))))
        .collect())
}

pub async fn jobs_by_id(
    store: &dyn Store,
    ids: impl IntoIterator<Item = ObjectId>,
) -> AppResult<HashMap<ObjectId, Job>> {
    let jobs = store.find_jobs(&unique(ids)).await?;
    Ok(jobs
        .into_iter()
        .filter_map(|job| job.id.map(|id| (id, job)))
        .collect())
}

/// Applications with their jobs populated. A deleted job leaves `job: null`.
pub async fn with_jobs(
    store: &dyn Store,
    applications: &[Application],
) -> AppResult<Vec<ApplicationView>> {
    let jobs = jobs_by_id(store, applications.iter().map(|a| a.job)).await?;
    Ok(applications
        .iter()
        .map(|a| ApplicationView::new(a, jobs.get(&a.job).map(JobView::from), None))
        .collect())
}

/// Applications with their applicants populated.
pub async fn with_applicants(
    store: &dyn Store,
    applications: &[Application],
) -> AppResult<Vec<ApplicationView>> {
    let users = user_summaries(store, applications.iter().map(|a| a.user)).await?;
    Ok(applications
        .iter()
        .map(|a| ApplicationView::new(a, None, users.get(&a.user).cloned()))
        .collect())
}
