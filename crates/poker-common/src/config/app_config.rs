//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// `None` keeps completed stories in memory only
    pub database: Option<DatabaseConfig>,
    pub cors: CorsConfig,
    pub websocket: WebSocketConfig,
    pub rooms: RoomConfig,
    pub persistence: PersistenceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP / WebSocket listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT configuration
///
/// Tokens are issued elsewhere; the server only checks them.
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig").finish_non_exhaustive()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Live connection tuning
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Per-connection outbound queue capacity
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    #[serde(default = "default_heartbeat_timeout_ms")]
    pub heartbeat_timeout_ms: u64,
}

impl WebSocketConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    #[must_use]
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            heartbeat_timeout_ms: default_heartbeat_timeout_ms(),
        }
    }
}

/// Live room retention
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// How long a room may sit with no registered connection before eviction
    #[serde(default = "default_room_idle_ttl_ms")]
    pub idle_ttl_ms: u64,
    #[serde(default = "default_room_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl RoomConfig {
    #[must_use]
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_millis(self.idle_ttl_ms)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            idle_ttl_ms: default_room_idle_ttl_ms(),
            sweep_interval_ms: default_room_sweep_interval_ms(),
        }
    }
}

/// Retry policy for writing completed stories
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "planning-poker".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

fn default_heartbeat_timeout_ms() -> u64 {
    90_000
}

fn default_room_idle_ttl_ms() -> u64 {
    30 * 60 * 1000
}

fn default_room_sweep_interval_ms() -> u64 {
    60_000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let env = match vars.get("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let database = match vars.get("DATABASE_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            None => None,
        };

        let websocket = WebSocketConfig {
            outbound_buffer: vars.parse_or("WS_OUTBOUND_BUFFER", default_outbound_buffer)?,
            heartbeat_interval_ms: vars
                .parse_or("WS_HEARTBEAT_INTERVAL_MS", default_heartbeat_interval_ms)?,
            heartbeat_timeout_ms: vars
                .parse_or("WS_HEARTBEAT_TIMEOUT_MS", default_heartbeat_timeout_ms)?,
        };
        if websocket.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "WS_OUTBOUND_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }
        if websocket.heartbeat_timeout_ms <= websocket.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "WS_HEARTBEAT_TIMEOUT_MS",
                "must be greater than WS_HEARTBEAT_INTERVAL_MS".to_string(),
            ));
        }

        let rooms = RoomConfig {
            idle_ttl_ms: vars.parse_or("ROOM_IDLE_TTL_MS", default_room_idle_ttl_ms)?,
            sweep_interval_ms: vars
                .parse_or("ROOM_SWEEP_INTERVAL_MS", default_room_sweep_interval_ms)?,
        };
        if rooms.sweep_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "ROOM_SWEEP_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }

        let persistence = PersistenceConfig {
            max_attempts: vars.parse_or("PERSISTENCE_MAX_ATTEMPTS", default_max_attempts)?,
            base_delay_ms: vars.parse_or("PERSISTENCE_BASE_DELAY_MS", default_base_delay_ms)?,
            max_delay_ms: vars.parse_or("PERSISTENCE_MAX_DELAY_MS", default_max_delay_ms)?,
        };
        if persistence.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "PERSISTENCE_MAX_ATTEMPTS",
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            server: ServerConfig {
                host: vars.get("SERVER_HOST").unwrap_or_else(default_host),
                port: vars.parse_or("SERVER_PORT", default_port)?,
            },
            jwt: JwtConfig {
                secret: vars
                    .get("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
            },
            database,
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            websocket,
            rooms,
            persistence,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn parse_or<T: FromStr>(
        &self,
        key: &'static str,
        default: fn() -> T,
    ) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
