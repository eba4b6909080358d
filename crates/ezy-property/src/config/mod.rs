use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Which bank adapter the cheque submit route forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChequeProviderKind {
    Mock,
    Http,
}

impl ChequeProviderKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" | "bank" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidProvider {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cheques: ChequeConfig,
    pub loans: LoanConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mock_latency = env_flag("MOCK_LATENCY", true)?;
        let provider = match env::var("CHEQUE_PROVIDER") {
            Ok(raw) => ChequeProviderKind::parse(&raw)?,
            Err(_) => ChequeProviderKind::Mock,
        };
        let bank_base_url = env::var("CHEQUE_BANK_BASE_URL").unwrap_or_default();
        let bank_api_key = env::var("CHEQUE_BANK_API_KEY").unwrap_or_default();

        let auth_disabled = env_flag("AUTH_DISABLED", false)?;
        let functions_url = env::var("LOAN_FUNCTIONS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            cheques: ChequeConfig {
                mock_latency,
                provider,
                bank_base_url,
                bank_api_key,
            },
            loans: LoanConfig {
                auth_disabled,
                functions_url,
            },
        })
    }
}

fn env_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }

    /// Functions mounted on this server, as reachable from the same host.
    pub fn local_functions_url(&self) -> String {
        match self.socket_addr() {
            Ok(addr) if !addr.ip().is_unspecified() => format!("http://{addr}/functions/v1"),
            _ => format!("http://127.0.0.1:{}/functions/v1", self.port),
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Mock cheque API behavior and bank adapter selection.
#[derive(Debug, Clone)]
pub struct ChequeConfig {
    pub mock_latency: bool,
    pub provider: ChequeProviderKind,
    pub bank_base_url: String,
    pub bank_api_key: String,
}

/// Loan data source settings.
#[derive(Debug, Clone)]
pub struct LoanConfig {
    /// Serve local fixtures instead of calling the remote functions.
    pub auth_disabled: bool,
    /// Explicit `LOAN_FUNCTIONS_URL`; unset means the functions this server mounts.
    pub functions_url: Option<String>,
}

impl LoanConfig {
    /// Resolve against the final bind address, after any CLI overrides.
    pub fn functions_url_for(&self, server: &ServerConfig) -> String {
        self.functions_url
            .clone()
            .unwrap_or_else(|| server.local_functions_url())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { key: &'static str, value: String },
    InvalidProvider { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false (got '{value}')")
            }
            ConfigError::InvalidProvider { value } => {
                write!(f, "CHEQUE_PROVIDER must be 'mock' or 'http' (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidProvider { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MOCK_LATENCY",
            "CHEQUE_PROVIDER",
            "CHEQUE_BANK_BASE_URL",
            "CHEQUE_BANK_API_KEY",
            "AUTH_DISABLED",
            "LOAN_FUNCTIONS_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.cheques.mock_latency);
        assert_eq!(config.cheques.provider, ChequeProviderKind::Mock);
        assert!(!config.loans.auth_disabled);
        assert_eq!(config.loans.functions_url, None);
        assert_eq!(
            config.loans.functions_url_for(&config.server),
            "http://127.0.0.1:3000/functions/v1"
        );
    }

    #[test]
    fn default_functions_url_follows_port_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let mut config = AppConfig::load().expect("config loads");
        config.server.port = 8080;
        assert_eq!(
            config.loans.functions_url_for(&config.server),
            "http://127.0.0.1:8080/functions/v1"
        );

        config.server.host = "0.0.0.0".to_string();
        config.server.port = 9090;
        assert_eq!(
            config.loans.functions_url_for(&config.server),
            "http://127.0.0.1:9090/functions/v1"
        );

        config.server.host = "::1".to_string();
        assert_eq!(
            config.loans.functions_url_for(&config.server),
            "http://[::1]:9090/functions/v1"
        );
    }

    #[test]
    fn explicit_functions_url_ignores_bind_address() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOAN_FUNCTIONS_URL", "https://project.functions.example/functions/v1");
        let mut config = AppConfig::load().expect("config loads");
        config.server.port = 8080;
        assert_eq!(
            config.loans.functions_url_for(&config.server),
            "https://project.functions.example/functions/v1"
        );
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_provider_and_flags() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CHEQUE_PROVIDER", "http");
        env::set_var("MOCK_LATENCY", "off");
        env::set_var("AUTH_DISABLED", "true");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.cheques.provider, ChequeProviderKind::Http);
        assert!(!config.cheques.mock_latency);
        assert!(config.loans.auth_disabled);
        reset_env();
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AUTH_DISABLED", "maybe");
        let err = AppConfig::load().expect_err("flag must be boolean");
        assert!(matches!(
            err,
            ConfigError::InvalidFlag {
                key: "AUTH_DISABLED",
                ..
            }
        ));
        reset_env();
    }
}
