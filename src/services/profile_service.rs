use crate::{
    database::Store,
    models::{Role, UpdateProfileRequest, UserProfile},
    services::auth_service::Claims,
    utils::{time, AppError, AppResult},
};

pub async fn get_profile(store: &dyn Store, user_id: &str) -> AppResult<UserProfile> {
    store
        .find_user_by_user_id(user_id)
        .await?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Recruiters have a profile once their company name is filled in; everyone
/// else gets theirs at registration.
pub async fn has_profile(store: &dyn Store, claims: &Claims) -> AppResult<bool> {
    let user = store
        .find_user(&claims.object_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(match user.role {
        Role::Recruiter => user
            .company_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty()),
        _ => true,
    })
}

/// Only the owner may edit; fields absent from the request keep their value.
pub async fn update_profile(
    store: &dyn Store,
    claims: &Claims,
    user_id: &str,
    request: UpdateProfileRequest,
) -> AppResult<UserProfile> {
    if claims.user_id != user_id {
        return Err(AppError::Forbidden(
            "Access denied. You can only update your own profile.".into(),
        ));
    }

    let mut user = store
        .find_user(&claims.object_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    request.apply_to(&mut user);
    user.updated_at = time::now_millis();

    if !store.replace_user(&user).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(UserProfile::from(&user))
}
