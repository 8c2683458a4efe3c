use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.ainative.studio";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub zerodb: ZeroDbSettings,
    pub mail: MailConfig,
    pub payments: PaymentsConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: usize,
    pub rate_limit_window_secs: u64,
    pub default_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub api_url: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub timeout_ms: u64,
    pub login_timeout_ms: u64,
    /// Local-development escape hatch used only when the identity service is unreachable.
    pub fallback: Option<FallbackLogin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackLogin {
    pub username: String,
    pub password: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroDbSettings {
    pub base_url: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub knowledge_collection: String,
    pub top_k: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("AGENCY_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = split_list(&v);
        }

        // API overrides
        if let Ok(v) = env::var("RATE_LIMIT_ENABLED") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }
        if let Ok(v) = env::var("DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }

        // Remote platform overrides. One URL feeds every AINative-hosted service
        // unless a more specific variable says otherwise.
        if let Some(url) = env_url("AINATIVE_API_URL") {
            self.auth.api_url = url.clone();
            self.zerodb.base_url = url.clone();
            self.payments.base_url = url.clone();
            self.chat.api_url = url;
        }
        if let Some(url) = env_url("PAYMENTS_API_URL") {
            self.payments.base_url = url;
        }
        if let Ok(v) = env::var("AINATIVE_API_KEY") {
            self.zerodb.api_key = non_empty(v.clone());
            self.chat.api_key = non_empty(v);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_COOKIE_NAME") {
            self.auth.cookie_name = v;
        }
        if let Ok(v) = env::var("AUTH_COOKIE_SECURE") {
            self.auth.cookie_secure = v.parse().unwrap_or(self.auth.cookie_secure);
        }
        if let Ok(v) = env::var("AUTH_TIMEOUT_MS") {
            self.auth.timeout_ms = v.parse().unwrap_or(self.auth.timeout_ms);
        }
        let fallback_user = env::var("ZERODB_USERNAME").or_else(|_| env::var("AINATIVE_USERNAME"));
        let fallback_pass = env::var("ZERODB_PASSWORD").or_else(|_| env::var("AINATIVE_PASSWORD"));
        let fallback_token = env::var("ZERODB_API_TOKEN").or_else(|_| env::var("AINATIVE_API_TOKEN"));
        if let (Ok(username), Ok(password), Ok(token)) = (fallback_user, fallback_pass, fallback_token) {
            self.auth.fallback = Some(FallbackLogin { username, password, token });
        }

        // ZeroDB overrides
        if let Ok(v) = env::var("ZERODB_PROJECT_ID") {
            self.zerodb.project_id = v;
        }
        if let Ok(v) = env::var("ZERODB_TIMEOUT_SECS") {
            self.zerodb.timeout_secs = v.parse().unwrap_or(self.zerodb.timeout_secs);
        }

        // Mail overrides
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.mail.api_key = non_empty(v);
        }
        if let Some(url) = env_url("RESEND_API_URL") {
            self.mail.api_url = url;
        }
        if let Ok(v) = env::var("RESEND_FROM_EMAIL") {
            self.mail.from = v;
        }
        if let Ok(v) = env::var("CONTACT_EMAIL_TO") {
            self.mail.to = v;
        }

        // Chat overrides
        if let Ok(v) = env::var("CHAT_MODEL") {
            self.chat.model = v;
        }
        if let Ok(v) = env::var("KNOWLEDGE_COLLECTION") {
            self.chat.knowledge_collection = v;
        }
        if let Ok(v) = env::var("CHAT_TOP_K") {
            self.chat.top_k = v.parse().unwrap_or(self.chat.top_k);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 1000,
                rate_limit_window_secs: 60,
                default_page_size: 50,
            },
            auth: AuthConfig {
                api_url: DEFAULT_API_URL.to_string(),
                cookie_name: "ainative_token".to_string(),
                cookie_secure: false,
                timeout_ms: 5_000,
                login_timeout_ms: 10_000,
                fallback: None,
            },
            zerodb: ZeroDbSettings {
                base_url: DEFAULT_API_URL.to_string(),
                project_id: "northbound-studio-prod".to_string(),
                api_key: None,
                timeout_secs: 30,
            },
            mail: MailConfig {
                api_url: "https://api.resend.com".to_string(),
                api_key: None,
                from: "Blaq Digital <noreply@blaqdigital.com>".to_string(),
                to: "contact@blaqdigital.com".to_string(),
            },
            payments: PaymentsConfig {
                base_url: DEFAULT_API_URL.to_string(),
            },
            chat: ChatConfig {
                api_url: DEFAULT_API_URL.to_string(),
                api_key: None,
                model: "meta-llama/llama-3.1-70b-instruct".to_string(),
                knowledge_collection: "blaq_knowledge_base".to_string(),
                top_k: 5,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.cors_origins = vec!["https://staging.blaq.ainative.studio".to_string()];
        config.api.rate_limit_requests = 200;
        config.auth.cookie_secure = true;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.cors_origins = vec!["https://blaq.ainative.studio".to_string()];
        config.api.rate_limit_requests = 100;
        config.auth.cookie_secure = true;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.api.rate_limit_window_secs)
    }
}

/// A base URL from the environment. Anything that isn't an absolute http(s)
/// URL is ignored with a warning and the preset stays in effect.
fn env_url(name: &str) -> Option<String> {
    let raw = env::var(name).ok()?;
    match parse_base_url(&raw) {
        Some(url) => Some(url),
        None => {
            tracing::warn!(var = name, value = %raw, "Ignoring invalid base URL");
            None
        }
    }
}

fn parse_base_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    Some(parsed.as_str().trim_end_matches('/').to_string())
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(v: String) -> Option<String> {
    if v.trim().is_empty() {
        None
    } else {
        Some(v)
    }
}
