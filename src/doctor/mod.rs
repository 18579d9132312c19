mod requests;
mod responses;
mod utils;

use std::collections::HashMap;

use crate::{
    models::{
        appointments::{self, Appointment, AppointmentStats, CancelAppointment},
        doctors::{self, DoctorProfile, UpdateDoctor},
        patients::{self, Patient},
        users::Role,
    },
    password::{self, PasswordChecks, Strength},
    protocol::{ApiError, ApiResult, SimpleResponse},
    schedule::WeekSchedule,
    session::utils::is_client_error,
    supabase::{assert, SupabaseClient, SupabaseError},
};
use actix_web::{web, HttpRequest};
use chrono::Duration;

use self::{requests::*, responses::*, utils::get_doctor_from_request};

/// Doctor dashboard, mounted under `/doctor`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(view_profile)
        .service(modify_profile)
        .service(list_patients)
        .service(list_appointments)
        .service(view_schedule)
        .service(cancel_appointment)
        .service(delete_appointment)
        .service(modify_password);
}

/// Routes that need no session.
pub fn public_config(cfg: &mut web::ServiceConfig) {
    cfg.service(password_strength);
}

crate::api_funcs! {
    (get, view_profile, "/profile", ProfileResponse, [req: HttpRequest]),
    (patch, modify_profile, "/profile", SimpleResponse, [req: HttpRequest, info: web::Json<ModifyProfileRequest>]),
    (get, list_patients, "/patients", PatientListResponse, [req: HttpRequest]),
    (get, list_appointments, "/appointments", AppointmentsResponse, [req: HttpRequest, query: web::Query<AppointmentsQuery>]),
    (get, view_schedule, "/schedule", ScheduleResponse, [req: HttpRequest, query: web::Query<ScheduleQuery>]),
    (patch, cancel_appointment, "/appointments/{appointment_id}/cancel", SimpleResponse, [req: HttpRequest, path: web::Path<String>]),
    (delete, delete_appointment, "/appointments/{appointment_id}", SimpleResponse, [req: HttpRequest, path: web::Path<String>]),
    (post, modify_password, "/password", SimpleResponse, [req: HttpRequest, info: web::Json<ModifyPasswordRequest>]),
    (post, password_strength, "/password/strength", PasswordStrengthResponse, [info: web::Json<PasswordStrengthRequest>]),
}

async fn fetch_own_appointments(
    client: &SupabaseClient,
    doctor_id: &str,
) -> ApiResult<Vec<Appointment>> {
    Ok(client
        .from(appointments::TABLE)
        .eq("doctor_id", doctor_id)
        .order("date", true)
        .fetch::<Appointment>()
        .await?)
}

async fn view_profile_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
) -> ApiResult<ProfileResponse> {
    let session = get_doctor_from_request(&req, &client).await?;

    let doctor = client
        .from(doctors::TABLE)
        .eq("id", &session.user_id)
        .fetch_optional::<DoctorProfile>()
        .await?;
    match doctor {
        Some(doctor) if doctor.role == Some(Role::Doctor) => Ok(ProfileResponse {
            success: true,
            doctor,
        }),
        _ => Err(ApiError::forbidden("No doctor profile for this account")),
    }
}

async fn modify_profile_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    info: web::Json<ModifyProfileRequest>,
) -> ApiResult<SimpleResponse> {
    let session = get_doctor_from_request(&req, &client).await?;

    let data = UpdateDoctor::from(info.into_inner());
    if data.is_empty() {
        return Ok(SimpleResponse::ok("Nothing to update"));
    }
    client
        .from(doctors::TABLE)
        .eq("id", &session.user_id)
        .update(&data)
        .await?;
    tracing::info!(doctor_id = %session.user_id, "profile updated");

    Ok(SimpleResponse::ok("Profile updated successfully"))
}

async fn list_patients_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
) -> ApiResult<PatientListResponse> {
    let session = get_doctor_from_request(&req, &client).await?;

    let patients = client
        .from(patients::TABLE)
        .select(patients::COLUMNS)
        .eq("doctor_id", &session.user_id)
        .fetch::<Patient>()
        .await?;
    let appointments = fetch_own_appointments(&client, &session.user_id).await?;
    tracing::debug!(count = patients.len(), "patients loaded");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for patient_id in appointments.iter().filter_map(|a| a.patient_id.as_deref()) {
        *counts.entry(patient_id).or_default() += 1;
    }
    let mut patients: Vec<PatientItem> = patients
        .into_iter()
        .map(|patient| PatientItem {
            appointment_count: counts.get(patient.id.as_str()).copied().unwrap_or(0),
            patient,
        })
        .collect();
    patients.sort_by(|a, b| b.appointment_count.cmp(&a.appointment_count));

    Ok(PatientListResponse {
        success: true,
        patients,
    })
}

async fn list_appointments_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    query: web::Query<AppointmentsQuery>,
) -> ApiResult<AppointmentsResponse> {
    let session = get_doctor_from_request(&req, &client).await?;
    let date = match &query.date {
        Some(date) => Some(crate::utils::parse_date_str(date).map_err(ApiError::bad_request)?),
        None => None,
    };

    let mut appointments = fetch_own_appointments(&client, &session.user_id).await?;
    // stats always cover every appointment, the date only narrows the list
    let stats = AppointmentStats::from_appointments(&appointments);
    if let Some(date) = date {
        appointments.retain(|a| a.date == Some(date));
    }

    Ok(AppointmentsResponse {
        success: true,
        appointments,
        stats,
    })
}

async fn view_schedule_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    query: web::Query<ScheduleQuery>,
) -> ApiResult<ScheduleResponse> {
    let session = get_doctor_from_request(&req, &client).await?;

    let query = query.into_inner();
    let today = crate::utils::today();
    let anchor = match query.week {
        Some(week) => crate::utils::parse_date_str(week).map_err(ApiError::bad_request)?,
        None => today,
    };
    let anchor = Duration::try_weeks(query.offset)
        .and_then(|shift| anchor.checked_add_signed(shift))
        .ok_or_else(|| ApiError::bad_request("Week offset out of range"))?;

    let appointments = fetch_own_appointments(&client, &session.user_id).await?;

    Ok(ScheduleResponse {
        success: true,
        schedule: WeekSchedule::build(&appointments, anchor, today),
    })
}

async fn cancel_appointment_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<SimpleResponse> {
    let session = get_doctor_from_request(&req, &client).await?;
    let appointment_id = path.into_inner();
    assert::assert_appointment(&client, &appointment_id, Some(&session.user_id)).await?;

    client
        .from(appointments::TABLE)
        .eq("id", &appointment_id)
        .update(&CancelAppointment::default())
        .await?;
    tracing::info!(%appointment_id, doctor_id = %session.user_id, "appointment cancelled");

    Ok(SimpleResponse::ok("Appointment cancelled"))
}

async fn delete_appointment_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<SimpleResponse> {
    let session = get_doctor_from_request(&req, &client).await?;
    let appointment_id = path.into_inner();
    assert::assert_appointment(&client, &appointment_id, Some(&session.user_id)).await?;

    client
        .from(appointments::TABLE)
        .eq("id", &appointment_id)
        .delete()
        .await?;
    tracing::info!(%appointment_id, doctor_id = %session.user_id, "appointment deleted");

    Ok(SimpleResponse::ok("Appointment deleted successfully"))
}

async fn modify_password_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    info: web::Json<ModifyPasswordRequest>,
) -> ApiResult<SimpleResponse> {
    let session = get_doctor_from_request(&req, &client).await?;
    let info = info.into_inner();

    let checks = PasswordChecks::new(&info.new_password, &info.confirm_password);
    if !checks.all_passed() {
        return Err(ApiError::bad_request(format!(
            "Password must have {}",
            checks.failed().join(", ")
        )));
    }

    if let (Some(old), Some(email)) = (info.old_password.as_deref(), session.email.as_deref()) {
        if !old.is_empty() {
            client
                .sign_in_with_password(email, old)
                .await
                .map_err(|err| {
                    if is_client_error(&err) || matches!(err, SupabaseError::MissingUserId) {
                        ApiError::unauthorized("Old password is incorrect")
                    } else {
                        ApiError::from(err)
                    }
                })?;
        }
    }

    client
        .update_user_password(&session.user_id, &info.new_password)
        .await?;
    tracing::info!(doctor_id = %session.user_id, "password changed");

    Ok(SimpleResponse::ok("Password changed successfully"))
}

async fn password_strength_impl(
    _client: web::Data<SupabaseClient>,
    info: web::Json<PasswordStrengthRequest>,
) -> ApiResult<PasswordStrengthResponse> {
    let info = info.into_inner();
    let confirmation = info.confirmation.as_deref().unwrap_or(&info.password);
    let checks = PasswordChecks::new(&info.password, confirmation);
    let score = password::strength_score(&info.password);

    Ok(PasswordStrengthResponse {
        success: true,
        score,
        strength: Strength::from_score(score),
        checks,
        valid: checks.all_passed(),
    })
}
