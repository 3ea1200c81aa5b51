use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub defaults: DefaultsConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Where the serialized model artifacts live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub dir: PathBuf,
    pub regressor_file: String,
    pub scaler_x_file: String,
    pub scaler_y_file: String,
    /// Abort startup instead of serving 503s when the artifacts fail to load.
    pub required: bool,
}

impl ModelConfig {
    pub fn regressor_path(&self) -> PathBuf {
        self.dir.join(&self.regressor_file)
    }

    pub fn scaler_x_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_x_file)
    }

    pub fn scaler_y_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_y_file)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            regressor_file: "model_electria.json".to_string(),
            scaler_x_file: "scaler_x.json".to_string(),
            scaler_y_file: "scaler_y.json".to_string(),
            required: false,
        }
    }
}

/// Values substituted for prediction inputs the caller leaves out.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    pub temperature_c: f64,
    pub voltage_v: f64,
    pub intensity_a: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            temperature_c: 20.0,
            voltage_v: 230.0,
            intensity_a: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Number of trailing records drawn on the chart.
    pub chart_window: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { chart_window: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "info,hyper=warn,tower_http=info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ELECTRIA__").split("__"));
        Ok(figment.extract()?)
    }
}
