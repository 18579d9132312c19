use serde::Deserialize;

use crate::models::doctors::UpdateDoctor;

#[derive(Deserialize)]
pub struct ModifyProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub description: Option<String>,
}

impl From<ModifyProfileRequest> for UpdateDoctor {
    fn from(info: ModifyProfileRequest) -> Self {
        UpdateDoctor {
            name: info.name,
            phone: info.phone,
            specialty: info.specialty,
            description: info.description,
        }
    }
}

#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub week: Option<String>,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPasswordRequest {
    pub old_password: Option<String>,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct PasswordStrengthRequest {
    #[serde(default)]
    pub password: String,
    pub confirmation: Option<String>,
}
