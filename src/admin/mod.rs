mod requests;
mod responses;
mod utils;

use crate::{
    models::{
        appointments::{self, Appointment, AppointmentStats, CancelAppointment},
        users::{self, NewUser, Role, UserData},
    },
    protocol::{ApiError, ApiResult, SimpleResponse},
    supabase::{assert, SupabaseClient, SupabaseError},
};
use actix_web::{web, HttpRequest};

use self::{requests::*, responses::*, utils::get_admin_from_request};

/// Doctor account lifecycle, mounted at the root.
pub fn lifecycle_config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_doctor).service(delete_doctor);
}

/// Admin dashboard, mounted under `/admin`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_doctors)
        .service(view_stats)
        .service(doctor_appointments)
        .service(cancel_appointment)
        .service(delete_appointment);
}

crate::api_funcs! {
    (post, create_doctor, "/createDoctor", CreateDoctorResponse, [info: web::Json<CreateDoctorRequest>]),
    (delete, delete_doctor, "/deleteDoctor/{doctor_id}", DeleteDoctorResponse, [path: web::Path<String>]),
    (get, list_doctors, "/doctors", DoctorListResponse, [req: HttpRequest]),
    (get, view_stats, "/stats", StatsResponse, [req: HttpRequest]),
    (get, doctor_appointments, "/doctors/{doctor_id}/appointments", AppointmentListResponse, [req: HttpRequest, path: web::Path<String>]),
    (patch, cancel_appointment, "/appointments/{appointment_id}/cancel", SimpleResponse, [req: HttpRequest, path: web::Path<String>]),
    (delete, delete_appointment, "/appointments/{appointment_id}", SimpleResponse, [req: HttpRequest, path: web::Path<String>]),
}

async fn create_doctor_impl(
    client: web::Data<SupabaseClient>,
    info: web::Json<CreateDoctorRequest>,
) -> ApiResult<CreateDoctorResponse> {
    let info = info.into_inner();
    let email = info.email.unwrap_or_default();
    let password = info.password.unwrap_or_default();
    let full_name = info.full_name.unwrap_or_default();
    let specialty = info.specialty.unwrap_or_default();
    crate::utils::require_fields(
        &[email.as_str(), password.as_str(), full_name.as_str(), specialty.as_str()],
        "Missing fields",
    )?;

    tracing::info!(%email, "creating doctor");
    let user = client.create_user(&email, &password).await?;
    tracing::info!(user_id = %user.id, "auth user created");

    let row = NewUser::doctor(
        user.id.clone(),
        email.clone(),
        full_name.clone(),
        specialty.clone(),
    );
    match client.from(users::TABLE).insert(&row).await {
        Ok(()) => {}
        Err(err @ SupabaseError::Api { .. }) => {
            tracing::error!(user_id = %user.id, error = %err, "users insert rejected, removing auth user");
            if let Err(rollback) = client.delete_user(&user.id).await {
                tracing::error!(user_id = %user.id, error = %rollback, "auth user rollback failed");
            }
            return Err(err.into());
        }
        // the row may have been stored, so the auth user stays
        Err(err) => {
            tracing::error!(user_id = %user.id, error = %err, "users insert outcome unknown");
            return Err(err.into());
        }
    }
    tracing::info!(user_id = %user.id, "doctor profile inserted");

    Ok(CreateDoctorResponse {
        success: true,
        user_id: user.id,
        email,
        full_name,
        specialty,
        message: "Doctor created successfully".to_string(),
    })
}

async fn delete_doctor_impl(
    client: web::Data<SupabaseClient>,
    path: web::Path<String>,
) -> ApiResult<DeleteDoctorResponse> {
    let doctor_id = path.into_inner().trim().to_string();
    if doctor_id.is_empty() {
        return Err(ApiError::bad_request("Doctor ID required"));
    }

    // each step runs only if the previous one succeeded; nothing is undone
    tracing::info!(%doctor_id, "deleting doctor");
    client
        .from(appointments::TABLE)
        .eq("doctor_id", &doctor_id)
        .delete()
        .await?;
    tracing::info!(%doctor_id, "appointments deleted");

    client
        .from(users::TABLE)
        .eq("id", &doctor_id)
        .delete()
        .await?;
    tracing::info!(%doctor_id, "users row deleted");

    client.delete_user(&doctor_id).await?;
    tracing::info!(%doctor_id, "auth user deleted");

    Ok(DeleteDoctorResponse {
        success: true,
        message: "Doctor deleted successfully".to_string(),
        deleted_id: doctor_id,
    })
}

async fn list_doctors_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
) -> ApiResult<DoctorListResponse> {
    get_admin_from_request(&req, &client).await?;

    let doctors = client
        .from(users::TABLE)
        .eq("role", Role::Doctor)
        .fetch::<UserData>()
        .await?;

    Ok(DoctorListResponse {
        success: true,
        doctors,
    })
}

async fn view_stats_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
) -> ApiResult<StatsResponse> {
    get_admin_from_request(&req, &client).await?;

    let doctors = client
        .from(users::TABLE)
        .eq("role", Role::Doctor)
        .fetch::<UserData>()
        .await?;
    let appointments = client
        .from(appointments::TABLE)
        .fetch::<Appointment>()
        .await?;
    let stats = AppointmentStats::from_appointments(&appointments);

    Ok(StatsResponse {
        success: true,
        total_doctors: doctors.len(),
        appointments: stats,
        fill_rate: stats.fill_rate(),
    })
}

async fn doctor_appointments_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<AppointmentListResponse> {
    get_admin_from_request(&req, &client).await?;
    let doctor_id = path.into_inner();
    assert::assert_doctor(&client, &doctor_id).await?;

    let appointments = client
        .from(appointments::TABLE)
        .eq("doctor_id", &doctor_id)
        .order("date", false)
        .fetch::<Appointment>()
        .await?;

    Ok(AppointmentListResponse {
        success: true,
        appointments,
    })
}

async fn cancel_appointment_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<SimpleResponse> {
    get_admin_from_request(&req, &client).await?;
    let appointment_id = path.into_inner();
    assert::assert_appointment(&client, &appointment_id, None).await?;

    client
        .from(appointments::TABLE)
        .eq("id", &appointment_id)
        .update(&CancelAppointment::default())
        .await?;
    tracing::info!(%appointment_id, "appointment cancelled");

    Ok(SimpleResponse::ok("Appointment cancelled"))
}

async fn delete_appointment_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<SimpleResponse> {
    get_admin_from_request(&req, &client).await?;
    let appointment_id = path.into_inner();
    assert::assert_appointment(&client, &appointment_id, None).await?;

    client
        .from(appointments::TABLE)
        .eq("id", &appointment_id)
        .delete()
        .await?;
    tracing::info!(%appointment_id, "appointment deleted");

    Ok(SimpleResponse::ok("Appointment deleted"))
}
