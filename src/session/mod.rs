mod requests;
mod responses;
pub mod utils;

use crate::{
    models::users::Role,
    protocol::{ApiError, ApiResult, SimpleResponse},
    supabase::{SupabaseClient, SupabaseError},
};
use actix_web::{web, HttpRequest};

use self::{
    requests::LoginRequest,
    responses::{LoginResponse, SessionResponse},
    utils::{get_session, is_client_error, load_profile},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(current_session);
}

crate::api_funcs! {
    (post, login, "/login", LoginResponse, [info: web::Json<LoginRequest>]),
    (post, logout, "/logout", SimpleResponse, [req: HttpRequest]),
    (get, current_session, "/session", SessionResponse, [req: HttpRequest]),
}

async fn login_impl(
    client: web::Data<SupabaseClient>,
    info: web::Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let info = info.into_inner();
    let role: Role = match info.role.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::bad_request("Please select a role (doctor or admin)")),
        Some(role) => role.parse().map_err(ApiError::bad_request)?,
    };
    crate::utils::require_fields(&[info.email.as_str(), info.password.as_str()], "Missing fields")?;

    let auth = client
        .sign_in_with_password(&info.email, &info.password)
        .await
        .map_err(|err| {
            if is_client_error(&err) || matches!(err, SupabaseError::MissingUserId) {
                ApiError::unauthorized("Invalid credentials")
            } else {
                ApiError::from(err)
            }
        })?;
    let profile = load_profile(&client, &auth.user.id).await?;

    if profile.role != role {
        if let Err(err) = client.sign_out(&auth.access_token).await {
            tracing::warn!(user_id = %auth.user.id, error = %err, "sign-out after role mismatch failed");
        }
        return Err(ApiError::forbidden(format!(
            "Login failed: account is {}, not a {}",
            profile.role, role
        )));
    }

    tracing::info!(user_id = %auth.user.id, role = %role, "signed in");
    Ok(LoginResponse {
        success: true,
        access_token: auth.access_token,
        user_id: auth.user.id,
        role,
        name: profile.name,
        specialty: profile.specialty,
        redirect: role.home_path(),
    })
}

async fn logout_impl(client: web::Data<SupabaseClient>, req: HttpRequest) -> ApiResult<SimpleResponse> {
    let token = crate::utils::bearer_token(&req)?;
    client.sign_out(&token).await?;
    Ok(SimpleResponse::ok("Signed out"))
}

async fn current_session_impl(
    client: web::Data<SupabaseClient>,
    req: HttpRequest,
) -> ApiResult<SessionResponse> {
    let session = get_session(&req, &client).await?;
    let role = session.profile.role;
    Ok(SessionResponse {
        success: true,
        user_id: session.user_id,
        email: session.email,
        name: session.profile.name,
        role,
        redirect: role.home_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::testing::{client_for, mount_session};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mount_password_grant(server: &MockServer, user_id: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "user": { "id": user_id, "email": "someone@clinic.test" }
            })))
            .mount(server)
            .await;
    }

    macro_rules! app {
        ($server:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(client_for(&$server)))
                    .configure(config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn login_with_matching_role_returns_redirect() {
        let server = MockServer::start().await;
        mount_password_grant(&server, "doc-1").await;
        mount_session(&server, "tok-1", "doc-1", "doctor").await;
        let app = app!(server);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@b.c", "password": "pw", "role": "doctor" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["accessToken"], "tok-1");
        assert_eq!(body["userId"], "doc-1");
        assert_eq!(body["redirect"], "/doctor");
    }

    #[actix_web::test]
    async fn login_with_wrong_role_signs_out() {
        let server = MockServer::start().await;
        mount_password_grant(&server, "doc-1").await;
        mount_session(&server, "tok-1", "doc-1", "doctor").await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let app = app!(server);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@b.c", "password": "pw", "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Login failed: account is doctor, not a admin");
    }

    #[actix_web::test]
    async fn login_requires_role_and_valid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;
        let app = app!(server);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@b.c", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@b.c", "password": "bad", "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn session_lookup() {
        let server = MockServer::start().await;
        mount_session(&server, "adm-token", "adm-1", "admin").await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })))
            .mount(&server)
            .await;
        let app = app!(server);

        let req = test::TestRequest::get()
            .uri("/session")
            .insert_header(("Authorization", "Bearer adm-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["role"], "admin");
        assert_eq!(body["redirect"], "/admin");

        let req = test::TestRequest::get()
            .uri("/session")
            .insert_header(("Authorization", "Bearer stale"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/session").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
