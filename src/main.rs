//! mia-voice-mcp - ElevenLabs 语音合成 + MIA 语音控制的 MCP 服务
//!
//! 启动流程:
//! - 加载配置（命令行 > 环境变量 > 配置文件 > 默认值）
//! - 初始化日志（输出到 stderr，stdout 留给 stdio 传输）
//! - 构建适配器与 ToolDispatcher
//! - 按配置运行 stdio 或 http 传输

use std::sync::Arc;

use clap::Parser;
use mia_voice_mcp::application::commands::handlers::SpeechOptions;
use mia_voice_mcp::application::dispatch::ToolDispatcher;
use mia_voice_mcp::application::ports::SpeechEnginePort;
use mia_voice_mcp::config::{
    load_config, print_config, AppConfig, CliArgs, SpeechProvider, Transport,
};
use mia_voice_mcp::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsClientConfig, FakeSpeechClient, FileAudioStorage,
    HttpDeviceClient, HttpDeviceClientConfig,
};
use mia_voice_mcp::infrastructure::http::{AppState, HttpServer};
use mia_voice_mcp::infrastructure::mcp::{serve_stdio, McpHandler};
use mia_voice_mcp::infrastructure::persistence::JsonProfileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = load_config(&args).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("mia-voice-mcp v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let handler = Arc::new(build_handler(&config).await?);

    match config.server.transport {
        Transport::Stdio => {
            serve_stdio(handler).await?;
        }
        Transport::Http => {
            let server = HttpServer::new(&config.server, AppState::new(handler));

            server
                .run_with_shutdown(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "Failed to listen for ctrl-c");
                        std::future::pending::<()>().await;
                    }
                    tracing::info!("Received shutdown signal");
                })
                .await?;
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 日志写到 stderr，RUST_LOG 优先于配置
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},mia_voice_mcp={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// 组装适配器、档案库与 MCP handler
async fn build_handler(config: &AppConfig) -> anyhow::Result<McpHandler> {
    let speech_engine: Arc<dyn SpeechEnginePort> = match config.speech.provider {
        SpeechProvider::Elevenlabs => {
            let speech_config = ElevenLabsClientConfig::new(config.speech.api_key.clone())
                .with_base_url(config.speech.base_url.clone())
                .with_timeout(config.speech.timeout_secs);
            Arc::new(ElevenLabsClient::new(speech_config)?)
        }
        SpeechProvider::Fake => Arc::new(FakeSpeechClient::with_defaults()),
    };

    let device_config = HttpDeviceClientConfig::new(config.device.host.clone(), config.device.port)
        .with_timeout(config.device.timeout_secs);
    let device = Arc::new(HttpDeviceClient::new(device_config)?);

    let profile_store = JsonProfileStore::open(&config.profiles.path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open profile store: {}", e))?;

    let audio_storage = FileAudioStorage::new(&config.audio.output_dir).await?;

    let dispatcher = ToolDispatcher::new(
        speech_engine,
        device,
        Arc::new(profile_store),
        SpeechOptions {
            default_model_id: config.speech.model_id.clone(),
            max_text_chars: config.speech.max_text_chars,
        },
    );

    Ok(McpHandler::new(Arc::new(dispatcher), Arc::new(audio_storage)))
}
