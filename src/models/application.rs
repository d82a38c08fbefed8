use crate::models::{JobView, UserSummary};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    /// Pending → Reviewed|Accepted|Rejected, Reviewed → Accepted|Rejected.
    /// Accepted and Rejected are terminal.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Reviewed) | (Pending, Accepted) | (Pending, Rejected)
                | (Reviewed, Accepted) | (Reviewed, Rejected)
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
        };
        f.write_str(label)
    }
}

/// Candidatura (collection "applications"), única por (job, user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub job: ObjectId,
    pub user: ObjectId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Application {
    pub fn new(job: ObjectId, user: ObjectId, now: i64) -> Self {
        Application {
            id: None,
            job,
            user,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Application with its job and applicant populated when they still exist
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub job: Option<JobView>,
    pub user: Option<UserSummary>,
    pub status: ApplicationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ApplicationView {
    pub fn new(application: &Application, job: Option<JobView>, user: Option<UserSummary>) -> Self {
        ApplicationView {
            id: application.id_hex(),
            job_id: application.job.to_hex(),
            user_id: application.user.to_hex(),
            job,
            user,
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// Applicant counters; `Reviewed` is still awaiting a decision and counts as pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ApplicantStats {
    pub total: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub pending: u64,
}

impl ApplicantStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut stats = ApplicantStats::default();
        for application in applications {
            stats.total += 1;
            match application.status {
                ApplicationStatus::Accepted => stats.accepted += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Pending | ApplicationStatus::Reviewed => stats.pending += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: ApplicationStatus) -> Application {
        let mut application = Application::new(ObjectId::new(), ObjectId::new(), 0);
        application.status = status;
        application
    }

    #[test]
    fn test_stats_total_is_sum_of_buckets() {
        use ApplicationStatus::*;
        let applications: Vec<_> = [Pending, Reviewed, Accepted, Rejected, Accepted, Pending]
            .into_iter()
            .map(with_status)
            .collect();

        let stats = ApplicantStats::from_applications(&applications);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.total, stats.accepted + stats.rejected + stats.pending);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(ApplicantStats::from_applications(&[]), ApplicantStats::default());
    }

    #[test]
    fn test_transitions() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Accepted));
        assert!(Reviewed.can_transition_to(Rejected));
        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_serializes_capitalized() {
        let json = serde_json::to_value(ApplicationStatus::Accepted).unwrap();
        assert_eq!(json, "Accepted");
    }
}
