use crate::models::User;
use crate::services::auth_service::Claims;

/// Claims as the auth middleware would decode them for `user`.
pub fn claims_for(user: &User) -> Claims {
    Claims {
        id: user.id_hex(),
        user_id: user.user_id.clone(),
        role: user.role,
        name: user.name.clone(),
        iat: 0,
        exp: usize::MAX,
    }
}
