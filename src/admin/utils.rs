use actix_web::HttpRequest;

use crate::{
    models::users::Role,
    protocol::ApiResult,
    session::utils::{require_role, Session},
    supabase::SupabaseClient,
};

pub async fn get_admin_from_request(
    req: &HttpRequest,
    client: &SupabaseClient,
) -> ApiResult<Session> {
    require_role(req, client, Role::Admin).await
}
