use autogift_domain::{CancellationPolicy, DeferredPaymentSchedule, VerificationPolicy};
use autogift_utils::create_random_secret;
use tracing::{info, warn};

const DEFAULT_BYPASS_CODE: &str = "123456";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret api key that admin tooling sends in the `x-api-key` header
    pub admin_api_key: String,
    /// HS256 secret the hosted auth signs user tokens with
    pub jwt_secret: String,
    pub is_production: bool,
    /// Base url of the hosted remote functions. When absent the
    /// in-memory services are used.
    pub functions_base_url: Option<String>,
    pub functions_service_key: String,
    pub cancellation_policy: CancellationPolicy,
    pub deferred_payment_schedule: DeferredPaymentSchedule,
    pub verification_policy: VerificationPolicy,
}

impl Config {
    pub fn new() -> Self {
        let admin_api_key = match std::env::var("ADMIN_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find ADMIN_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(32);
                info!("Admin api key was generated and set to: {}", key);
                key
            }
        };
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                warn!("Did not find JWT_SECRET environment variable. User tokens signed elsewhere will be rejected.");
                create_random_secret(32)
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                5000
            }
        };

        let app_env = std::env::var("APP_ENV").ok();
        let is_production = app_env
            .as_deref()
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let bypass_code = verification_bypass_code(
            app_env.as_deref(),
            std::env::var("VERIFICATION_BYPASS_CODE").ok(),
        );
        if bypass_code.is_some() {
            info!("Email verification bypass code is enabled in development");
        }

        let functions_base_url = std::env::var("FUNCTIONS_BASE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let functions_service_key = std::env::var("FUNCTIONS_SERVICE_KEY").unwrap_or_default();

        Self {
            port,
            admin_api_key,
            jwt_secret,
            is_production,
            functions_base_url,
            functions_service_key,
            cancellation_policy: CancellationPolicy::default(),
            deferred_payment_schedule: DeferredPaymentSchedule::default(),
            verification_policy: VerificationPolicy {
                bypass_code,
                ..Default::default()
            },
        }
    }
}

/// The bypass code is only accepted when `APP_ENV` is explicitly `development`
fn verification_bypass_code(app_env: Option<&str>, configured: Option<String>) -> Option<String> {
    match app_env {
        Some(env) if env.eq_ignore_ascii_case("development") => {
            Some(configured.unwrap_or_else(|| DEFAULT_BYPASS_CODE.into()))
        }
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_code_requires_development_env() {
        assert_eq!(verification_bypass_code(None, None), None);
        assert_eq!(verification_bypass_code(None, Some("999999".into())), None);
        assert_eq!(verification_bypass_code(Some("production"), None), None);
        assert_eq!(verification_bypass_code(Some("staging"), None), None);
        assert_eq!(verification_bypass_code(Some(""), None), None);

        assert_eq!(
            verification_bypass_code(Some("development"), None),
            Some("123456".into())
        );
        assert_eq!(
            verification_bypass_code(Some("Development"), Some("999999".into())),
            Some("999999".into())
        );
    }
}
