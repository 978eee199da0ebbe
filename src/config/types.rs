//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 传输/服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音合成服务配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// MIA 设备服务配置
    #[serde(default)]
    pub device: DeviceConfig,

    /// 档案库配置
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// 音频输出配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// MCP 传输方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// 按行分隔的 JSON-RPC（stdin/stdout）
    #[default]
    Stdio,
    /// POST /mcp
    Http,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,

    /// 监听地址（仅 http 传输）
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口（仅 http 传输）
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 语音合成后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    #[default]
    Elevenlabs,
    /// 离线占位实现，不访问网络
    Fake,
}

/// 语音合成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub provider: SpeechProvider,

    /// API 基础 URL
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    /// API Key
    #[serde(default)]
    pub api_key: String,

    /// 默认模型
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,

    /// 单次合成的文本长度上限（字符）
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_speech_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_model_id() -> String {
    "eleven_monolingual_v1".to_string()
}

fn default_speech_timeout() -> u64 {
    30
}

fn default_max_text_chars() -> usize {
    5000
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            base_url: default_speech_base_url(),
            api_key: String::new(),
            model_id: default_model_id(),
            timeout_secs: default_speech_timeout(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

impl SpeechConfig {
    /// 日志中展示的 API Key
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        match chars.len() {
            0 => "<unset>".to_string(),
            n if n <= 8 => "****".to_string(),
            n => {
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[n - 4..].iter().collect();
                format!("{}****{}", head, tail)
            }
        }
    }
}

/// MIA 设备服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_host")]
    pub host: String,

    #[serde(default = "default_device_port")]
    pub port: u16,

    /// 请求超时时间（秒）
    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
}

fn default_device_host() -> String {
    "localhost".to_string()
}

fn default_device_port() -> u16 {
    8000
}

fn default_device_timeout() -> u64 {
    10
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_device_host(),
            port: default_device_port(),
            timeout_secs: default_device_timeout(),
        }
    }
}

/// 档案库配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    /// 档案文件路径
    #[serde(default = "default_profiles_path")]
    pub path: PathBuf,
}

fn default_profiles_path() -> PathBuf {
    PathBuf::from("data/voice_profiles.json")
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            path: default_profiles_path(),
        }
    }
}

/// 音频输出配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 合成音频的输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_api_key() {
        let mut speech = SpeechConfig::default();
        assert_eq!(speech.masked_api_key(), "<unset>");

        speech.api_key = "short".to_string();
        assert_eq!(speech.masked_api_key(), "****");

        speech.api_key = "sk_1234567890abcdef".to_string();
        assert_eq!(speech.masked_api_key(), "sk_1****cdef");
    }

    #[test]
    fn test_transport_display() {
        assert_eq!(Transport::Stdio.to_string(), "stdio");
        assert_eq!(Transport::Http.to_string(), "http");
    }
}
