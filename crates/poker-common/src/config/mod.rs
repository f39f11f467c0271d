//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    PersistenceConfig, RoomConfig, ServerConfig, WebSocketConfig,
};
