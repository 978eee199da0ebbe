//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 命令行参数
//! 2. 环境变量
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::cli::CliArgs;
use super::types::{AppConfig, SpeechProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "MIA_VOICE";

/// 约定俗成的 API Key 环境变量，优先级低于 `MIA_VOICE_SPEECH__API_KEY`
const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// 加载应用配置
///
/// # 环境变量示例
/// - `MIA_VOICE_SERVER__TRANSPORT=http`
/// - `MIA_VOICE_DEVICE__HOST=192.168.1.20`
/// - `MIA_VOICE_SPEECH__TIMEOUT_SECS=60`
/// - `ELEVENLABS_API_KEY=sk_...`
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from_path(args.config.as_deref())?;
    args.apply_to(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// 从默认值、配置文件和环境变量合并配置（不含命令行，不做校验）
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.transport", "stdio")?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8090)?
        .set_default("speech.provider", "elevenlabs")?
        .set_default("speech.base_url", "https://api.elevenlabs.io")?
        .set_default("speech.model_id", "eleven_monolingual_v1")?
        .set_default("speech.timeout_secs", 30)?
        .set_default("speech.max_text_chars", 5000)?
        .set_default("device.host", "localhost")?
        .set_default("device.port", 8000)?
        .set_default("device.timeout_secs", 10)?
        .set_default("profiles.path", "data/voice_profiles.json")?
        .set_default("audio.output_dir", "data/audio")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量
    // 前缀: MIA_VOICE_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_env_fallbacks(&mut app_config, |name| std::env::var(name).ok());

    Ok(app_config)
}

/// 只在未配置时采用 `ELEVENLABS_API_KEY`
fn apply_env_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.speech.api_key.trim().is_empty() {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            config.speech.api_key = key;
        }
    }
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.device.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "MIA host cannot be empty".to_string(),
        ));
    }

    if config.device.port == 0 {
        return Err(ConfigError::ValidationError(
            "MIA port cannot be 0".to_string(),
        ));
    }

    if config.speech.provider == SpeechProvider::Elevenlabs {
        if config.speech.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "ElevenLabs API key is required (set {}, MIA_VOICE_SPEECH__API_KEY or --elevenlabs-api-key)",
                API_KEY_ENV
            )));
        }
        if config.speech.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Speech base URL cannot be empty".to_string(),
            ));
        }
    }

    if config.speech.timeout_secs == 0 || config.device.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Upstream timeouts must be at least 1 second".to_string(),
        ));
    }

    if config.speech.max_text_chars == 0 {
        return Err(ConfigError::ValidationError(
            "speech.max_text_chars cannot be 0".to_string(),
        ));
    }

    if config.speech.model_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default model id cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Transport: {}", config.server.transport);
    if config.server.transport == super::types::Transport::Http {
        tracing::info!("Listen: {}:{}", config.server.host, config.server.port);
    }
    tracing::info!("Speech Provider: {:?}", config.speech.provider);
    tracing::info!("Speech Base URL: {}", config.speech.base_url);
    tracing::info!("Speech API Key: {}", config.speech.masked_api_key());
    tracing::info!("Speech Model: {}", config.speech.model_id);
    tracing::info!("Speech Timeout: {}s", config.speech.timeout_secs);
    tracing::info!("MIA: {}:{}", config.device.host, config.device.port);
    tracing::info!("MIA Timeout: {}s", config.device.timeout_secs);
    tracing::info!("Profiles: {:?}", config.profiles.path);
    tracing::info!("Audio Directory: {:?}", config.audio.output_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
