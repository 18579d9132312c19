use serde::Serialize;

use crate::models::users::Role;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub user_id: String,
    pub role: Role,
    pub name: String,
    pub specialty: Option<String>,
    pub redirect: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
    pub redirect: &'static str,
}
