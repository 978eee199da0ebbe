//! mia-voice-mcp - ElevenLabs 语音合成与 MIA 语音控制的 MCP 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Profile Context: 语音档案（名称、音色、合成参数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechEngine, DeviceControl, ProfileStore, AudioStorage）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//! - Dispatch: 工具名路由与错误归一
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: ElevenLabs / MIA HTTP 客户端，音频文件存储
//! - Persistence: JSON 档案库
//! - MCP: JSON-RPC 协议与 stdio 传输
//! - HTTP: MCP over HTTP

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
