//! Command Line Arguments
//!
//! 命令行参数优先级最高，覆盖配置文件与环境变量

use clap::Parser;
use std::path::PathBuf;

use super::types::{AppConfig, Transport};

/// MCP server exposing ElevenLabs text-to-speech and MIA voice control
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mia-voice-mcp", author, version, about, long_about = None)]
pub struct CliArgs {
    /// 配置文件路径（默认搜索 config.toml / config.local.toml）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// ElevenLabs API key
    #[arg(long)]
    pub elevenlabs_api_key: Option<String>,

    /// MIA 服务地址
    #[arg(long)]
    pub mia_host: Option<String>,

    /// MIA 服务端口
    #[arg(long)]
    pub mia_port: Option<u16>,

    /// MCP 传输方式
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// http 传输的监听端口
    #[arg(long)]
    pub port: Option<u16>,
}

impl CliArgs {
    /// 把命令行参数写入已加载的配置
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(key) = &self.elevenlabs_api_key {
            config.speech.api_key = key.clone();
        }
        if let Some(host) = &self.mia_host {
            config.device.host = host.clone();
        }
        if let Some(port) = self.mia_port {
            config.device.port = port;
        }
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
