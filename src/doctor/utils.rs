use actix_web::HttpRequest;

use crate::{
    models::users::Role,
    protocol::ApiResult,
    session::utils::{require_role, Session},
    supabase::SupabaseClient,
};

/// Doctors only ever act on their own rows, so the session is the sole source of the id.
pub async fn get_doctor_from_request(
    req: &HttpRequest,
    client: &SupabaseClient,
) -> ApiResult<Session> {
    require_role(req, client, Role::Doctor).await
}
