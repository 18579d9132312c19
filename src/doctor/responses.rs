use serde::Serialize;

use crate::{
    models::{
        appointments::{Appointment, AppointmentStats},
        doctors::DoctorProfile,
        patients::Patient,
    },
    password::{PasswordChecks, Strength},
    schedule::WeekSchedule,
};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub doctor: DoctorProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientItem {
    #[serde(flatten)]
    pub patient: Patient,
    pub appointment_count: usize,
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub success: bool,
    pub patients: Vec<PatientItem>,
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
    pub stats: AppointmentStats,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(flatten)]
    pub schedule: WeekSchedule,
}

#[derive(Serialize)]
pub struct PasswordStrengthResponse {
    pub success: bool,
    pub score: u32,
    pub strength: Strength,
    pub checks: PasswordChecks,
    pub valid: bool,
}
