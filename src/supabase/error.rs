use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the hosted auth and table APIs.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// The provider answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth API accepted the call but its payload had no user id.
    #[error("Failed to get user ID from auth")]
    MissingUserId,
}

impl SupabaseError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// GoTrue and PostgREST disagree on where the human-readable message lives.
#[derive(Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

pub(crate) fn error_from_body(status: u16, body: &str) -> SupabaseError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("provider returned status {}", status)
            } else {
                body.trim().to_string()
            }
        });
    SupabaseError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_postgrest_message() {
        let err = error_from_body(
            409,
            r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value"}"#,
        );
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn picks_gotrue_msg_and_description() {
        let err = error_from_body(422, r#"{"code":422,"msg":"User already registered"}"#);
        assert_eq!(err.to_string(), "User already registered");

        let err = error_from_body(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn falls_back_to_raw_body_or_status() {
        assert_eq!(error_from_body(502, "Bad Gateway").to_string(), "Bad Gateway");
        assert_eq!(
            error_from_body(503, "").to_string(),
            "provider returned status 503"
        );
    }
}
