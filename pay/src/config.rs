use crate::types::{PayConfig, PayError};
use clap::{Arg, ArgMatches, Command};
use config::{Config, Environment, File, FileFormat};
use log::{info, warn};
use std::{ffi::OsString, path::Path};

const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[extractor]
endpoint = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
api_key = ""
timeout_secs = 30
temperature = 0.0

[wallet]
required_chain_id = 43113
network_name = "Avalanche Fuji Testnet"

[processing]
min_delay_ms = 2000
max_delay_ms = 4000
success_rate = 0.8
source_network = "Avalanche C-Chain"

[auth]
acceptance_rate = 0.7

[monitoring]
log_level = "info"
"#;

const DEFAULT_CONFIG_PATHS: &[&str] = &["./voxpay.toml", "./config.toml", "/etc/voxpay/voxpay.toml"];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Layered configuration loader
pub struct ConfigLoader {
    config: Config,
}

/// CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub llm_endpoint: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from defaults, file, environment and process arguments
    pub fn load() -> Result<PayConfig, PayError> {
        let cli_args = Self::cli_args(cli_command().get_matches());
        Self::load_with(&cli_args)
    }

    /// Same as [`ConfigLoader::load`] with explicit arguments
    pub fn load_from_args<I, T>(args: I) -> Result<PayConfig, PayError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = cli_command()
            .try_get_matches_from(args)
            .map_err(|e| PayError::ConfigError(format!("Invalid arguments: {}", e)))?;
        Self::load_with(&Self::cli_args(matches))
    }

    fn load_with(cli_args: &CliArgs) -> Result<PayConfig, PayError> {
        let mut loader = ConfigLoader::new();

        // Precedence: defaults < file < environment < CLI
        loader.load_defaults()?;

        match &cli_args.config_file {
            Some(path) => loader.load_file(path)?,
            None => loader.try_load_default_files()?,
        }

        loader.load_environment()?;
        loader.apply_cli_overrides(cli_args)?;

        let config: PayConfig = loader
            .config
            .clone()
            .try_deserialize()
            .map_err(|e| PayError::ConfigError(format!("Configuration parsing error: {}", e)))?;

        loader.validate(&config)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn cli_args(matches: ArgMatches) -> CliArgs {
        CliArgs {
            config_file: matches.get_one::<String>("config").cloned(),
            host: matches.get_one::<String>("host").cloned(),
            port: matches.get_one::<String>("port").and_then(|s| s.parse().ok()),
            llm_endpoint: matches.get_one::<String>("llm-endpoint").cloned(),
            model: matches.get_one::<String>("model").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
        }
    }

    fn load_defaults(&mut self) -> Result<(), PayError> {
        self.config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| PayError::ConfigError(format!("Default config error: {}", e)))?;

        Ok(())
    }

    fn load_file(&mut self, path: &str) -> Result<(), PayError> {
        if !Path::new(path).exists() {
            return Err(PayError::ConfigError(format!("Config file not found: {}", path)));
        }

        info!("Loading configuration from: {}", path);

        self.config = Config::builder()
            .add_source(self.config.clone())
            .add_source(File::with_name(path))
            .build()
            .map_err(|e| PayError::ConfigError(format!("Config file error: {}", e)))?;

        Ok(())
    }

    fn try_load_default_files(&mut self) -> Result<(), PayError> {
        for path in DEFAULT_CONFIG_PATHS {
            if Path::new(path).exists() {
                info!("Found default config file: {}", path);
                return self.load_file(path);
            }
        }

        warn!("No config file found, using defaults and environment variables");
        Ok(())
    }

    /// `VOXPAY_SERVER__PORT=8080` overrides `server.port`
    fn load_environment(&mut self) -> Result<(), PayError> {
        self.config = Config::builder()
            .add_source(self.config.clone())
            .add_source(
                Environment::with_prefix("VOXPAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| PayError::ConfigError(format!("Environment config error: {}", e)))?;

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli_args: &CliArgs) -> Result<(), PayError> {
        let mut builder = Config::builder().add_source(self.config.clone());

        if let Some(ref host) = cli_args.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }

        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port as i64)?;
        }

        if let Some(ref endpoint) = cli_args.llm_endpoint {
            builder = builder.set_override("extractor.endpoint", endpoint.as_str())?;
        }

        if let Some(ref model) = cli_args.model {
            builder = builder.set_override("extractor.model", model.as_str())?;
        }

        if let Some(ref level) = cli_args.log_level {
            builder = builder.set_override("monitoring.log_level", level.as_str())?;
        }

        self.config = builder
            .build()
            .map_err(|e| PayError::ConfigError(format!("CLI config build error: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self, config: &PayConfig) -> Result<(), PayError> {
        if config.server.host.is_empty() {
            return Err(PayError::ConfigError("Server host is required".to_string()));
        }

        if !config.extractor.endpoint.starts_with("http://")
            && !config.extractor.endpoint.starts_with("https://")
        {
            return Err(PayError::ConfigError(
                "Extractor endpoint must be an http(s) URL".to_string(),
            ));
        }

        if config.extractor.model.is_empty() {
            return Err(PayError::ConfigError("Extractor model is required".to_string()));
        }

        if config.extractor.timeout_secs == 0 {
            return Err(PayError::ConfigError(
                "Extractor timeout must be greater than 0".to_string(),
            ));
        }

        if config.wallet.required_chain_id == 0 {
            return Err(PayError::ConfigError("Required chain id must be set".to_string()));
        }

        if config.processing.min_delay_ms > config.processing.max_delay_ms {
            return Err(PayError::ConfigError(
                "Processing min_delay_ms must not exceed max_delay_ms".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&config.processing.success_rate) {
            return Err(PayError::ConfigError(
                "Processing success_rate must be between 0 and 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&config.auth.acceptance_rate) {
            return Err(PayError::ConfigError(
                "Auth acceptance_rate must be between 0 and 1".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&config.monitoring.log_level.to_lowercase().as_str()) {
            return Err(PayError::ConfigError(format!(
                "Unknown log level: {}",
                config.monitoring.log_level
            )));
        }

        Ok(())
    }
}

fn cli_command() -> Command {
    Command::new("voxchain-pay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("VoxChain Pay voice-command payment service")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .env("VOXPAY_CONFIG_FILE"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Address to bind the HTTP server to"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("HTTP server port"),
        )
        .arg(
            Arg::new("llm-endpoint")
                .long("llm-endpoint")
                .value_name("URL")
                .help("Chat completions endpoint used for intent extraction")
                .env("VOXPAY_LLM_ENDPOINT"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model name used for intent extraction"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .env("LOG_LEVEL"),
        )
}

/// Create a sample configuration file
pub fn create_sample_config() -> String {
    r#"# VoxChain Pay configuration
# Copy this file to voxpay.toml and update the values

[server]
# Address and port for the HTTP API
host = "0.0.0.0"
port = 3000

[extractor]
# OpenAI-compatible chat completions endpoint
endpoint = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
# Leave empty to use the OPENAI_API_KEY environment variable
api_key = ""
# Per-request timeout in seconds
timeout_secs = 30
temperature = 0.0

[wallet]
# Chain the browser wallet must be connected to (43113 = Avalanche Fuji)
required_chain_id = 43113
network_name = "Avalanche Fuji Testnet"

[processing]
# Simulated confirmation delay range
min_delay_ms = 2000
max_delay_ms = 4000
# Probability a simulated transaction succeeds
success_rate = 0.8
source_network = "Avalanche C-Chain"

[auth]
# Probability a simulated voice check is accepted
acceptance_rate = 0.7

[monitoring]
# Log level (trace, debug, info, warn, error)
log_level = "info"
"#
    .to_string()
}
