use actix_web::HttpRequest;

use crate::{
    models::users::{self, Role, UserProfile},
    protocol::{ApiError, ApiResult},
    supabase::{SupabaseClient, SupabaseError},
    utils::bearer_token,
};

/// A bearer token resolved to its identity and `users` row.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub profile: UserProfile,
}

pub(crate) fn is_client_error(err: &SupabaseError) -> bool {
    matches!(err.status(), Some(status) if (400..500).contains(&status))
}

pub async fn load_profile(client: &SupabaseClient, user_id: &str) -> ApiResult<UserProfile> {
    client
        .from(users::TABLE)
        .select(users::PROFILE_COLUMNS)
        .eq("id", user_id)
        .fetch_optional::<UserProfile>()
        .await?
        .ok_or_else(|| ApiError::forbidden("No profile for this account"))
}

pub async fn get_session(req: &HttpRequest, client: &SupabaseClient) -> ApiResult<Session> {
    let access_token = bearer_token(req)?;
    let user = client.get_user(&access_token).await.map_err(|err| {
        if is_client_error(&err) || matches!(err, SupabaseError::MissingUserId) {
            ApiError::unauthorized("Invalid or expired session")
        } else {
            ApiError::from(err)
        }
    })?;
    let profile = load_profile(client, &user.id).await?;

    Ok(Session {
        user_id: user.id,
        email: user.email,
        profile,
    })
}

pub async fn require_role(
    req: &HttpRequest,
    client: &SupabaseClient,
    role: Role,
) -> ApiResult<Session> {
    let session = get_session(req, client).await?;
    if session.profile.role != role {
        return Err(ApiError::forbidden(format!(
            "This area is for {} accounts only",
            role
        )));
    }
    Ok(session)
}
