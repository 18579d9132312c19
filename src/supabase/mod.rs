pub mod assert;
pub mod error;
pub mod query;

use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub use self::{error::SupabaseError, query::TableQuery};

pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Identity record as returned by the auth API.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Service-role client for the hosted auth and table APIs.
///
/// Every call carries the service key, so row-level security is bypassed; only
/// the session lookups (`get_user`, `sign_out`) run with a user's own token.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str, anon_key: Option<&str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            anon_key: anon_key.unwrap_or(service_key).to_string(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            &config.supabase_url,
            &config.service_role_key,
            config.anon_key.as_deref(),
        )
    }

    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn service_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn user_request(&self, method: Method, url: &str, access_token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    /// Creates a confirmed email/password identity.
    pub async fn create_user(&self, email: &str, password: &str) -> SupabaseResult<AuthUser> {
        let body = CreateUserBody {
            email,
            password,
            email_confirm: true,
        };
        let resp = self
            .service_request(Method::POST, &self.auth_url("admin/users"))
            .json(&body)
            .send()
            .await?;
        let user: AuthUser = check(resp).await?.json().await?;
        if user.id.is_empty() {
            return Err(SupabaseError::MissingUserId);
        }
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: &str) -> SupabaseResult<()> {
        let url = self.auth_url(&format!("admin/users/{}", user_id));
        let resp = self.service_request(Method::DELETE, &url).send().await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn update_user_password(&self, user_id: &str, password: &str) -> SupabaseResult<()> {
        let url = self.auth_url(&format!("admin/users/{}", user_id));
        let resp = self
            .service_request(Method::PUT, &url)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> SupabaseResult<AuthSession> {
        let resp = self
            .http
            .post(&self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let session: AuthSession = check(resp).await?.json().await?;
        if session.user.id.is_empty() {
            return Err(SupabaseError::MissingUserId);
        }
        Ok(session)
    }

    /// Resolves an access token to its identity.
    pub async fn get_user(&self, access_token: &str) -> SupabaseResult<AuthUser> {
        let resp = self
            .user_request(Method::GET, &self.auth_url("user"), access_token)
            .send()
            .await?;
        let user: AuthUser = check(resp).await?.json().await?;
        if user.id.is_empty() {
            return Err(SupabaseError::MissingUserId);
        }
        Ok(user)
    }

    pub async fn sign_out(&self, access_token: &str) -> SupabaseResult<()> {
        let resp = self
            .user_request(Method::POST, &self.auth_url("logout"), access_token)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

pub(crate) async fn check(resp: Response) -> SupabaseResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "provider rejected request");
    Err(error::error_from_body(status.as_u16(), &body))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SupabaseClient;
    use crate::models::users::PROFILE_COLUMNS;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    pub const SERVICE_KEY: &str = "service-role-key";

    pub fn client_for(server: &MockServer) -> SupabaseClient {
        SupabaseClient::new(&server.uri(), SERVICE_KEY, None)
    }

    /// Makes `token` resolve to `user_id` whose `users` row has `role`.
    pub async fn mount_session(server: &MockServer, token: &str, user_id: &str, role: &str) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", format!("Bearer {}", token)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": user_id,
                "email": format!("{}@clinic.test", user_id),
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("select", PROFILE_COLUMNS))
            .and(query_param("id", format!("eq.{}", user_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "name": format!("User {}", user_id),
                "specialty": null,
                "role": role,
            }])))
            .mount(server)
            .await;
    }
}
