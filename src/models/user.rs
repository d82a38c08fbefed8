use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Recruiter,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "recruiter" => Ok(Role::Recruiter),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid role: {}. Supported: student, recruiter, admin", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub year: String,
}

/// Document stored in the "users" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Public handle, the local part of the institutional email
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Unix millis; only meaningful while `is_active` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_until: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_is_active() -> bool {
    true
}

/// Outcome of checking an account's suspension at login time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspensionState {
    Active,
    Suspended { until: Option<i64> },
    Expired,
}

impl User {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn suspension_state(&self, now: i64) -> SuspensionState {
        if self.is_active {
            return SuspensionState::Active;
        }
        match self.suspended_until {
            Some(until) if until <= now => SuspensionState::Expired,
            until => SuspensionState::Suspended { until },
        }
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.user_id.to_lowercase().contains(&term)
    }
}

/// User as returned by the API: string id, never the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub student_id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    pub is_active: bool,
    pub suspended_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id_hex(),
            user_id: user.user_id.clone(),
            student_id: user.student_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            department: user.department.clone(),
            cgpa: user.cgpa,
            skills: user.skills.clone(),
            interests: user.interests.clone(),
            work_experience: user.work_experience.clone(),
            education: user.education.clone(),
            company_name: user.company_name.clone(),
            company_industry: user.company_industry.clone(),
            company_location: user.company_location.clone(),
            company_size: user.company_size.clone(),
            company_description: user.company_description.clone(),
            is_active: user.is_active,
            suspended_until: user.suspended_until,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Compact author/applicant reference used when populating other documents.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id_hex(),
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            department: user.department.clone(),
            cgpa: user.cgpa,
        }
    }
}

/// Admin listing filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
}

/// Request para atualizar o perfil; campos ausentes mantêm o valor atual
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub education: Option<Vec<Education>>,
    pub company_name: Option<String>,
    pub company_industry: Option<String>,
    pub company_location: Option<String>,
    pub company_size: Option<String>,
    pub company_description: Option<String>,
}

impl UpdateProfileRequest {
    pub fn apply_to(self, user: &mut User) {
        if let Some(v) = self.student_id {
            user.student_id = Some(v);
        }
        if let Some(v) = self.department {
            user.department = Some(v);
        }
        if let Some(v) = self.cgpa {
            user.cgpa = Some(v);
        }
        if let Some(v) = self.skills {
            user.skills = v;
        }
        if let Some(v) = self.interests {
            user.interests = v;
        }
        if let Some(v) = self.work_experience {
            user.work_experience = v;
        }
        if let Some(v) = self.education {
            user.education = v;
        }
        if let Some(v) = self.company_name {
            user.company_name = Some(v);
        }
        if let Some(v) = self.company_industry {
            user.company_industry = Some(v);
        }
        if let Some(v) = self.company_location {
            user.company_location = Some(v);
        }
        if let Some(v) = self.company_size {
            user.company_size = Some(v);
        }
        if let Some(v) = self.company_description {
            user.company_description = Some(v);
        }
    }
}

#[cfg(test)]
pub fn sample_user(user_id: &str, role: Role) -> User {
    User {
        id: None,
        user_id: user_id.to_string(),
        student_id: None,
        name: format!("{} name", user_id),
        email: format!("{}@g.bracu.ac.bd", user_id),
        password: "hash".into(),
        role,
        department: Some("CSE".into()),
        cgpa: Some(3.5),
        skills: vec![],
        interests: vec![],
        work_experience: vec![],
        education: vec![],
        company_name: None,
        company_industry: None,
        company_location: None,
        company_size: None,
        company_description: None,
        is_active: true,
        suspended_until: None,
        created_at: crate::utils::time::now_millis(),
        updated_at: crate::utils::time::now_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspension_state() {
        let mut user = sample_user("alice", Role::Student);
        assert_eq!(user.suspension_state(1_000), SuspensionState::Active);

        user.is_active = false;
        user.suspended_until = Some(2_000);
        assert_eq!(
            user.suspension_state(1_000),
            SuspensionState::Suspended { until: Some(2_000) }
        );
        assert_eq!(user.suspension_state(2_000), SuspensionState::Expired);

        user.suspended_until = None;
        assert_eq!(user.suspension_state(5_000), SuspensionState::Suspended { until: None });
    }

    #[test]
    fn test_profile_omits_password() {
        let mut user = sample_user("bob", Role::Recruiter);
        user.id = Some(ObjectId::new());
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["userId"], "bob");
        assert_eq!(json["role"], "recruiter");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["_id"], user.id_hex());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut user = sample_user("carol", Role::Student);
        user.skills = vec!["rust".into()];
        UpdateProfileRequest {
            cgpa: Some(3.9),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.cgpa, Some(3.9));
        assert_eq!(user.skills, vec!["rust".to_string()]);
        assert_eq!(user.department.as_deref(), Some("CSE"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_matches_search() {
        let user = sample_user("dave.k", Role::Student);
        assert!(user.matches_search("DAVE"));
        assert!(user.matches_search("bracu"));
        assert!(!user.matches_search("zed"));
    }
}
