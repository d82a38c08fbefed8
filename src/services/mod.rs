pub mod admin_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod forum_service;
pub mod job_service;
pub mod lookup;
pub mod profile_service;
pub mod recruiter_service;
pub mod review_service;

#[cfg(test)]
pub mod test_support;
