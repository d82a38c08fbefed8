use crate::{
    config::{Config, JwtConfig},
    database::{user_id_taken, Store, DUPLICATE_EMAIL},
    models::{Role, SuspensionState, User, UserProfile},
    utils::{time, AppError, AppResult},
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

const BCRYPT_COST: u32 = 10;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: String,            // user _id (hex)
    pub user_id: String,       // public handle, e.g. "jane.doe"
    pub role: Role,
    pub name: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
}

impl Claims {
    /// The caller's `_id`. A token that passed signature checks but carries a
    /// malformed id is still treated as unauthenticated.
    pub fn object_id(&self) -> AppResult<ObjectId> {
        ObjectId::parse_str(&self.id)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub cgpa: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

// Generate JWT token
pub fn generate_jwt(user: &User, jwt: &JwtConfig) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        id: user.id_hex(),
        user_id: user.user_id.clone(),
        role: user.role,
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(jwt.expiry_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, jwt: &JwtConfig) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Unauthorized("Invalid or expired token".into())
    })
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// User registration
pub async fn register(
    store: &dyn Store,
    config: &Config,
    request: RegisterRequest,
) -> AppResult<RegisterResponse> {
    let (name, email, password) = match (
        required(&request.name),
        required(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(name), Some(email), Some(password)) => (name, email.to_lowercase(), password),
        _ => {
            return Err(AppError::Validation(
                "Name, email, and password are required".into(),
            ))
        }
    };

    if !email.ends_with(&config.allowed_email_domain) {
        return Err(AppError::Validation(format!(
            "Only {} email addresses are allowed",
            config.allowed_email_domain
        )));
    }

    // userId is the mailbox name
    let user_id = email.split('@').next().unwrap_or_default().trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::Validation("Email must include a mailbox name".into()));
    }

    let role = request.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(AppError::Forbidden("Admin accounts cannot be self-registered".into()));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Validation(DUPLICATE_EMAIL.into()));
    }

    if store.find_user_by_user_id(&user_id).await?.is_some() {
        return Err(user_id_taken(&user_id));
    }

    let now = time::now_millis();
    let user = User {
        id: None,
        user_id,
        student_id: None,
        name: name.to_string(),
        email,
        password: hash(password, BCRYPT_COST)?,
        role,
        department: request.department,
        cgpa: request.cgpa,
        skills: request.skills.unwrap_or_default(),
        interests: request.interests.unwrap_or_default(),
        work_experience: Vec::new(),
        education: Vec::new(),
        company_name: None,
        company_industry: None,
        company_location: None,
        company_size: None,
        company_description: None,
        is_active: true,
        suspended_until: None,
        created_at: now,
        updated_at: now,
    };

    let user = store.insert_user(user).await?;

    Ok(RegisterResponse {
        success: true,
        message: "User registered successfully".into(),
        user_id: user.user_id,
    })
}

// User login
pub async fn login(
    store: &dyn Store,
    jwt: &JwtConfig,
    request: &LoginRequest,
) -> AppResult<AuthResponse> {
    let email = request.email.trim().to_lowercase();

    let mut user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify(&request.password, &user.password)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    match user.suspension_state(time::now_millis()) {
        SuspensionState::Active => {}
        SuspensionState::Suspended { until: Some(until) } => {
            return Err(AppError::Forbidden(format!(
                "Account suspended until {}",
                time::format_millis(until)
            )));
        }
        SuspensionState::Suspended { until: None } => {
            return Err(AppError::Forbidden("Account is suspended".into()));
        }
        SuspensionState::Expired => {
            let id = user
                .id
                .ok_or_else(|| AppError::Internal("Stored user has no _id".into()))?;
            store.set_user_active(&id, true, None).await?;
            user.is_active = true;
            user.suspended_until = None;
            log::info!("🔓 Suspension expired, account reactivated: {}", user.user_id);
        }
    }

    let token = generate_jwt(&user, jwt)?;

    Ok(AuthResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: UserInfo {
            id: user.id_hex(),
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    })
}

pub async fn get_profile(store: &dyn Store, claims: &Claims) -> AppResult<UserProfile> {
    let id = claims.object_id()?;
    store
        .find_user(&id)
        .await?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
