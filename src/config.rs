use anyhow::{bail, Context};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub service_role_key: String,
    pub anon_key: Option<String>,
    pub bind: String,
    pub cors_origin: String,
    /// Built frontend bundle to serve, if any.
    pub static_dir: Option<String>,
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // the frontend build shares its .env with this server, hence the VITE_ names
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let supabase_url = first(&["SUPABASE_URL", "VITE_SUPABASE_URL"])
            .context("SUPABASE_URL not found")?;
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            bail!("SUPABASE_URL must be an http(s) URL, got '{}'", supabase_url);
        }
        let service_role_key = first(&[
            "SUPABASE_SERVICE_ROLE_KEY",
            "VITE_SUPABASE_SERVICE_ROLE_KEY",
        ])
        .context("SUPABASE_SERVICE_ROLE_KEY not found")?;

        Ok(Self {
            supabase_url,
            service_role_key,
            anon_key: first(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]),
            bind: first(&["BIND_ADDR"]).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            cors_origin: first(&["CORS_ORIGIN"])
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            static_dir: first(&["STATIC_DIR"]),
            log_filter: first(&["LOG_FILTER"]).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
