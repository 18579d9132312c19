use serde::Deserialize;

use super::SupabaseClient;
use crate::{
    models::{appointments, users},
    protocol::{ApiError, ApiResult},
};

#[derive(Deserialize)]
struct RoleRow {
    role: users::Role,
}

#[derive(Deserialize)]
struct OwnerRow {
    #[serde(deserialize_with = "crate::models::id_string")]
    doctor_id: String,
}

pub async fn assert_doctor(client: &SupabaseClient, doctor_id: &str) -> ApiResult<()> {
    let row = client
        .from(users::TABLE)
        .select("role")
        .eq("id", doctor_id)
        .fetch_optional::<RoleRow>()
        .await?;

    match row {
        Some(RoleRow {
            role: users::Role::Doctor,
        }) => Ok(()),
        _ => Err(ApiError::not_found("No such doctor")),
    }
}

/// Checks the appointment exists and, when `doctor_id` is given, that it belongs to that doctor.
pub async fn assert_appointment(
    client: &SupabaseClient,
    appointment_id: &str,
    doctor_id: Option<&str>,
) -> ApiResult<()> {
    let row = client
        .from(appointments::TABLE)
        .select("doctor_id")
        .eq("id", appointment_id)
        .fetch_optional::<OwnerRow>()
        .await?;

    match (row, doctor_id) {
        (None, _) => Err(ApiError::not_found("No such appointment")),
        (Some(row), Some(doctor_id)) if row.doctor_id != doctor_id => {
            Err(ApiError::not_found("No such appointment"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::testing::client_for;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mount_appointment(server: &MockServer, id: &str, doctor_id: &str) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/appointments"))
            .and(query_param("id", format!("eq.{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "doctor_id": doctor_id }])),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn appointment_owned_by_other_doctor_is_hidden() {
        let server = MockServer::start().await;
        mount_appointment(&server, "a-1", "d-2").await;
        let client = client_for(&server);

        assert!(assert_appointment(&client, "a-1", None).await.is_ok());
        assert!(assert_appointment(&client, "a-1", Some("d-2")).await.is_ok());
        let err = assert_appointment(&client, "a-1", Some("d-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_rows_are_not_doctors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.adm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "role": "admin" }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.doc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "role": "doctor" }])))
            .mount(&server)
            .await;
        let client = client_for(&server);

        assert!(assert_doctor(&client, "doc").await.is_ok());
        assert!(assert_doctor(&client, "adm").await.is_err());
    }
}
