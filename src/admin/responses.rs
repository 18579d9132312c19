use serde::Serialize;

use crate::models::{
    appointments::{Appointment, AppointmentStats},
    users::UserData,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorResponse {
    pub success: bool,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub specialty: String,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDoctorResponse {
    pub success: bool,
    pub message: String,
    pub deleted_id: String,
}

#[derive(Serialize)]
pub struct DoctorListResponse {
    pub success: bool,
    pub doctors: Vec<UserData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub total_doctors: usize,
    #[serde(flatten)]
    pub appointments: AppointmentStats,
    pub fill_rate: u32,
}

#[derive(Serialize)]
pub struct AppointmentListResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}
