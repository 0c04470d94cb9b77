use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub model: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub pool_size: usize,
    pub threads: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug", &self.debug)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("cors_origin", &self.cors_origin)
            .field("model_dir", &self.model.model_dir.display())
            .field("pool_size", &self.model.pool_size)
            .field("threads", &self.model.threads)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let debug = env_or_bool("DEBUG", false);
        let default_level = if debug { "debug" } else { "info" };

        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: env_or_parse("PORT", 5000_u16),
            debug,
            log_level: env_or("RUST_LOG", default_level),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            model: ModelConfig {
                model_dir: PathBuf::from(env_or("MODEL_DIR", "./models")),
                // 至少保留一个模型实例，0 会让所有请求永久等待
                pool_size: env_or_parse("MODEL_POOL_SIZE", 1_usize).max(1),
                threads: env_or_parse("MODEL_THREADS", num_cpus::get()).max(1),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
