use mongodb::bson::{doc, oid::ObjectId, Document, Regex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub enum JobStatus {
    #[default]
    Open,
    Filled,
}

/// Vaga publicada por um recrutador (collection "jobs")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub status: JobStatus,
    /// Owning recruiter's `_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter: Option<ObjectId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Job {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.recruiter.as_ref() == Some(user)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: String,
    pub required_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub status: JobStatus,
    pub recruiter: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_count: Option<u64>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        JobView {
            id: job.id_hex(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            responsibilities: job.responsibilities.clone(),
            requirements: job.requirements.clone(),
            job_type: job.job_type.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            status: job.status,
            recruiter: job.recruiter.map(|id| id.to_hex()),
            created_at: job.created_at,
            updated_at: job.updated_at,
            applicant_count: None,
        }
    }
}

/// Body for creating or editing a job; on edit absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

impl JobRequest {
    pub fn apply_to(self, job: &mut Job) {
        if let Some(v) = self.title {
            job.title = v;
        }
        if let Some(v) = self.company {
            job.company = v;
        }
        if let Some(v) = self.location {
            job.location = Some(v);
        }
        if let Some(v) = self.description {
            job.description = v;
        }
        if let Some(v) = self.required_skills {
            job.required_skills = v;
        }
        if let Some(v) = self.responsibilities {
            job.responsibilities = v;
        }
        if let Some(v) = self.requirements {
            job.requirements = v;
        }
        if let Some(v) = self.job_type {
            job.job_type = Some(v);
        }
        if let Some(v) = self.salary_min {
            job.salary_min = Some(v);
        }
        if let Some(v) = self.salary_max {
            job.salary_max = Some(v);
        }
    }
}

/// Query string of GET /api/jobs/search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearch {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl JobSearch {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(keyword) = non_empty(&self.keyword) {
            if !job.title.to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(location) = non_empty(&self.location) {
            let matches = job
                .location
                .as_ref()
                .map(|l| l.to_lowercase().contains(&location.to_lowercase()))
                .unwrap_or(false);
            if !matches {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            match job.salary_max.or(job.salary_min) {
                Some(top) if top >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = self.max_salary {
            match job.salary_min {
                Some(bottom) if bottom <= max => {}
                _ => return false,
            }
        }
        true
    }

    /// The same predicate as `matches`, expressed as a MongoDB filter.
    pub fn to_filter(&self) -> Document {
        let mut clauses: Vec<Document> = Vec::new();

        if let Some(keyword) = non_empty(&self.keyword) {
            let pattern = case_insensitive(keyword);
            clauses.push(doc! { "title": pattern });
        }
        if let Some(location) = non_empty(&self.location) {
            let pattern = case_insensitive(location);
            clauses.push(doc! { "location": pattern });
        }
        if let Some(min) = self.min_salary {
            clauses.push(doc! {
                "$or": [
                    { "salaryMax": { "$gte": min } },
                    { "salaryMax": { "$exists": false }, "salaryMin": { "$gte": min } }
                ]
            });
        }
        if let Some(max) = self.max_salary {
            clauses.push(doc! { "salaryMin": { "$lte": max } });
        }

        if clauses.is_empty() {
            doc! {}
        } else {
            doc! { "$and": clauses }
        }
    }
}

/// Literal, case-insensitive `$regex` for user-supplied search terms.
pub fn case_insensitive(raw: &str) -> Regex {
    Regex {
        pattern: escape_regex(raw),
        options: "i".to_string(),
    }
}

/// Keeps user keywords literal inside a `$regex`.
fn escape_regex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
pub fn sample_job(title: &str, recruiter: Option<ObjectId>) -> Job {
    Job {
        id: None,
        title: title.to_string(),
        company: "Acme".into(),
        location: Some("Dhaka".into()),
        description: "Build things".into(),
        required_skills: vec!["rust".into()],
        responsibilities: vec![],
        requirements: vec![],
        job_type: Some("Full-time".into()),
        salary_min: Some(30_000.0),
        salary_max: Some(50_000.0),
        status: JobStatus::Open,
        recruiter,
        created_at: crate::utils::time::now_millis(),
        updated_at: crate::utils::time::now_millis(),
    }
}
