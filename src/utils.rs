#[macro_export]
macro_rules! api_funcs {
    ( $( ( $method:ident, $func_name:ident, $url:literal, $response:ty, [ $( $arg:ident : $arg_ty:ty ),* $(,)? ] ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[actix_web::$method($url)]
                async fn $func_name(
                    client: actix_web::web::Data<$crate::supabase::SupabaseClient>,
                    $( $arg: $arg_ty ),*
                ) -> Result<actix_web::HttpResponse, $crate::protocol::ApiError> {
                    let result: $crate::protocol::ApiResult<$response> =
                        [<$func_name _impl>](client, $( $arg ),*).await;
                    match result {
                        Ok(response) => Ok(actix_web::HttpResponse::Ok().json(response)),
                        Err(err) => {
                            use actix_web::ResponseError;
                            if err.status_code().is_server_error() {
                                tracing::error!(handler = stringify!($func_name), error = %err, "request failed");
                            } else {
                                tracing::warn!(handler = stringify!($func_name), error = %err, "request rejected");
                            }
                            Err(err)
                        }
                    }
                }
            }
        )+
    };
}

use actix_web::{http::header, HttpRequest};
use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Utc};

use crate::protocol::{ApiError, ApiResult};

pub fn bearer_token(req: &HttpRequest) -> ApiResult<String> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("Malformed authorization header"))
}

/// Fails with the given message when any of `fields` is blank.
pub fn require_fields(fields: &[&str], err: &str) -> ApiResult<()> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(ApiError::bad_request(err));
    }
    Ok(())
}

pub fn parse_date_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.as_ref().trim(), "%Y-%m-%d")
        .context("Wrong date format, expected YYYY-MM-DD")
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

pub fn week_days(start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| start + Duration::days(i)).collect()
}
