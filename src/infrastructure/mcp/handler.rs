//! MCP Handler - JSON-RPC 方法路由与工具结果渲染
//!
//! 传输层（stdio / http）只负责收发字符串，所有协议语义在这里处理

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use super::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ServerCapabilities, ServerInfo, ToolsCapability, PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::application::commands::handlers::GeneratedSpeech;
use crate::application::dispatch::{
    tool_catalog, ToolDispatcher, ToolFailure, ToolPayload, ToolResult,
};
use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;

const INSTRUCTIONS: &str = "Voice tools backed by ElevenLabs text-to-speech and the MIA IoT \
    service. Generated audio is written to disk and the tool result reports the file path. \
    Save a profile named 'default' to hear spoken feedback from the mia_* tools.";

/// MCP 请求处理器
#[derive(Clone)]
pub struct McpHandler {
    dispatcher: Arc<ToolDispatcher>,
    audio_storage: Arc<dyn AudioStoragePort>,
}

impl McpHandler {
    pub fn new(dispatcher: Arc<ToolDispatcher>, audio_storage: Arc<dyn AudioStoragePort>) -> Self {
        Self {
            dispatcher,
            audio_storage,
        }
    }

    /// 处理一条原始 JSON-RPC 消息，通知不产生响应
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed JSON-RPC message");
                return Some(JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(e)));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(id, JsonRpcError::invalid_request(e))),
        }
    }

    /// 处理已解析的请求
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_catalog() })),
            "tools/call" => self.tools_call(request.params).await,
            other => {
                tracing::debug!(method = %other, "Unknown JSON-RPC method");
                Err(JsonRpcError::method_not_found(other))
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize(&self) -> Value {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolsCapability::default(),
            },
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };
        json!(result)
    }

    async fn tools_call(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing tools/call params"))
            .and_then(|p| serde_json::from_value(p).map_err(JsonRpcError::invalid_params))?;

        let result = self.call_tool(&params.name, params.arguments.unwrap_or(Value::Null)).await;
        serde_json::to_value(result).map_err(JsonRpcError::internal)
    }

    /// 执行工具并渲染为 MCP 文本结果
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let result = self.dispatcher.dispatch(name, arguments).await;
        self.render(name, result).await
    }

    async fn render(&self, tool: &str, result: ToolResult) -> CallToolResult {
        let payload = match result {
            ToolResult::Success(payload) => payload,
            ToolResult::Failure(failure) => return render_failure(tool, &failure),
        };

        match self.render_payload(payload).await {
            Ok(text) => CallToolResult::text(text),
            Err(err) => render_failure(tool, &ToolFailure::from(err)),
        }
    }

    async fn render_payload(&self, payload: ToolPayload) -> Result<String, ApplicationError> {
        let text = match payload {
            ToolPayload::Voices(voices) if voices.is_empty() => "No voices available".to_string(),
            ToolPayload::Voices(voices) => {
                let lines: Vec<String> = voices
                    .iter()
                    .map(|v| {
                        format!(
                            "- {} (ID: {}, Category: {})",
                            v.name,
                            v.voice_id,
                            v.category.as_deref().unwrap_or("unknown")
                        )
                    })
                    .collect();
                format!("Available voices:\n{}", lines.join("\n"))
            }
            ToolPayload::VoiceDetails(details) => {
                format!("Voice details:\n{}", pretty(&details))
            }
            ToolPayload::Models(models) if models.is_empty() => "No models available".to_string(),
            ToolPayload::Models(models) => {
                let lines: Vec<String> = models
                    .iter()
                    .map(|m| match &m.name {
                        Some(name) => format!("- {} ({})", m.model_id, name),
                        None => format!("- {}", m.model_id),
                    })
                    .collect();
                format!("Available models:\n{}", lines.join("\n"))
            }
            ToolPayload::Speech(speech) => {
                let path = self.store_audio(&speech).await?;
                match &speech.profile_name {
                    Some(profile) => format!(
                        "Speech generated from profile '{}'. Audio saved to: {}\nText: '{}'",
                        profile,
                        path.display(),
                        speech.text
                    ),
                    None => format!(
                        "Speech generated successfully. Audio saved to: {}\nText: '{}'",
                        path.display(),
                        speech.text
                    ),
                }
            }
            ToolPayload::ProfileSaved(profile) => format!(
                "Voice profile '{}' created with voice ID '{}'",
                profile.name(),
                profile.voice_id()
            ),
            ToolPayload::Profile(profile) => {
                format!("Voice profile '{}':\n{}", profile.name(), pretty(&json!(profile)))
            }
            ToolPayload::Profiles(profiles) if profiles.is_empty() => {
                "No voice profiles saved yet".to_string()
            }
            ToolPayload::Profiles(profiles) => {
                let lines: Vec<String> = profiles
                    .iter()
                    .map(|p| {
                        format!(
                            "- {} (voice ID: {}, stability: {}, similarity boost: {})",
                            p.name(),
                            p.voice_id(),
                            p.settings().stability,
                            p.settings().similarity_boost
                        )
                    })
                    .collect();
                format!("Saved voice profiles:\n{}", lines.join("\n"))
            }
            ToolPayload::ProfileDeleted(profile) => {
                format!("Voice profile '{}' deleted", profile.name())
            }
            ToolPayload::DeviceCommand(response) => {
                let mut text = response.summary.clone();
                if !response.outcome.result.is_null() {
                    text.push_str(&format!("\nMIA response: {}", response.outcome.result));
                }
                if let Some(path) = self.store_feedback(response.speech.as_ref()).await {
                    text.push_str(&format!("\nVoice response saved to: {}", path.display()));
                }
                text
            }
            ToolPayload::DeviceStatus(response) => {
                let mut text = response.summary.clone();
                if let Some(path) = self.store_feedback(response.speech.as_ref()).await {
                    text.push_str(&format!("\nVoice status saved to: {}", path.display()));
                }
                text
            }
        };

        Ok(text)
    }

    async fn store_audio(&self, speech: &GeneratedSpeech) -> Result<PathBuf, ApplicationError> {
        let path = self
            .audio_storage
            .save_audio(&speech.audio_data, audio_extension(&speech.mime_type))
            .await?;
        tracing::info!(path = %path.display(), size = speech.audio_data.len(), "Audio written");
        Ok(path)
    }

    /// 语音回执尽力保存，失败不影响主结果
    async fn store_feedback(&self, speech: Option<&GeneratedSpeech>) -> Option<PathBuf> {
        let speech = speech?;
        match self.store_audio(speech).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save spoken feedback");
                None
            }
        }
    }
}

fn render_failure(tool: &str, failure: &ToolFailure) -> CallToolResult {
    CallToolResult::error(format!(
        "Error executing {}: [{}] {} (retryable: {})",
        tool,
        failure.kind,
        failure.message,
        failure.kind.is_retryable()
    ))
}

fn audio_extension(mime_type: &str) -> &'static str {
    match mime_type {
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/pcm" => "pcm",
        _ => "mp3",
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::SpeechOptions;
    use crate::infrastructure::adapters::{
        FakeSpeechClient, FileAudioStorage, HttpDeviceClient, HttpDeviceClientConfig,
    };
    use crate::application::error::ErrorKind;
    use crate::infrastructure::persistence::JsonProfileStore;
    use tempfile::{tempdir, TempDir};

    /// 从渲染后的错误结果中取回错误类别
    fn failure_kind(result: &CallToolResult) -> Option<ErrorKind> {
        if !result.is_error {
            return None;
        }
        let text = result.joined_text();
        ErrorKind::ALL
            .into_iter()
            .find(|kind| text.contains(&format!("[{}]", kind)))
    }

    struct Fixture {
        handler: McpHandler,
        audio_dir: PathBuf,
        _dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json"))
            .await
            .unwrap();
        // 没有服务监听的端口
        let device =
            HttpDeviceClient::new(HttpDeviceClientConfig::new("127.0.0.1", 9).with_timeout(1))
            .unwrap();
        let dispatcher = ToolDispatcher::new(
            Arc::new(FakeSpeechClient::new(b"ID3fake".to_vec())),
            Arc::new(device),
            Arc::new(store),
            SpeechOptions::default(),
        );
        let audio_dir = dir.path().join("audio");
        let storage = FileAudioStorage::new(&audio_dir).await.unwrap();

        Fixture {
            handler: McpHandler::new(Arc::new(dispatcher), Arc::new(storage)),
            audio_dir,
            _dir: dir,
        }
    }

    async fn call(handler: &McpHandler, message: Value) -> Value {
        let response = handler
            .handle_message(&message.to_string())
            .await
            .expect("expected a response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let f = fixture().await;
        let response = call(
            &f.handler,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0"}
            }}),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "mcp-elevenlabs-mia");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_has_every_tool() {
        let f = fixture().await;
        let request = json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"});
        let response = call(&f.handler, request).await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 11);
        assert!(tools.iter().any(|t| {
            t["name"] == "mia_voice_command" && t["inputSchema"]["required"] == json!(["command"])
        }));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let f = fixture().await;
        let request = json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"});
        let response = call(&f.handler, request).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let f = fixture().await;
        let response = f.handler.handle_message("{not json").await.unwrap();

        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let f = fixture().await;
        let response = f
            .handler
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_call_without_name_is_invalid_params() {
        let f = fixture().await;
        let response = call(
            &f.handler,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {"arguments": {}}}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_tool_renders_as_error_result() {
        let f = fixture().await;
        let response = call(
            &f.handler,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
                   "params": {"name": "elevenlabs_clone_voice", "arguments": {}}}),
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("[UnknownTool]"));
        assert!(text.contains("retryable: false"));
    }

    #[tokio::test]
    async fn test_generate_speech_writes_audio_file() {
        let f = fixture().await;
        let result = f
            .handler
            .call_tool(
                "elevenlabs_generate_speech",
                json!({"text": "Hello world", "voice_id": "fake-rachel"}),
            )
            .await;

        assert!(!result.is_error);
        let text = result.joined_text();
        assert!(text.starts_with("Speech generated successfully. Audio saved to: "));

        let mut entries = std::fs::read_dir(&f.audio_dir).unwrap();
        let file = entries.next().unwrap().unwrap().path();
        assert_eq!(file.extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(std::fs::read(file).unwrap(), b"ID3fake");
    }

    #[tokio::test]
    async fn test_profile_round_trip_through_tools() {
        let f = fixture().await;
        let created = f
            .handler
            .call_tool(
                "elevenlabs_create_voice_profile",
                json!({"name": "helpful-assistant", "voice_id": "fake-rachel", "stability": 0.7}),
            )
            .await;
        assert_eq!(
            created.joined_text(),
            "Voice profile 'helpful-assistant' created with voice ID 'fake-rachel'"
        );

        let listed = f.handler.call_tool("elevenlabs_list_voice_profiles", Value::Null).await;
        assert!(listed.joined_text().contains("- helpful-assistant (voice ID: fake-rachel"));

        let deleted = f
            .handler
            .call_tool("elevenlabs_delete_voice_profile", json!({"name": "helpful-assistant"}))
            .await;
        assert!(!deleted.is_error);

        let missing = f
            .handler
            .call_tool("elevenlabs_get_voice_profile", json!({"name": "helpful-assistant"}))
            .await;
        assert_eq!(failure_kind(&missing), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_unreachable_device_is_retryable_upstream_error() {
        let f = fixture().await;
        let result = f
            .handler
            .call_tool("mia_voice_command", json!({"command": "turn on the lights"}))
            .await;

        assert!(result.is_error);
        let kind = failure_kind(&result).unwrap();
        assert!(matches!(kind, ErrorKind::Upstream | ErrorKind::Timeout));
        assert!(result.joined_text().contains("retryable: true"));
    }

    #[test]
    fn test_audio_extension() {
        assert_eq!(audio_extension("audio/mpeg"), "mp3");
        assert_eq!(audio_extension("audio/wav"), "wav");
        assert_eq!(audio_extension("application/octet-stream"), "mp3");
    }
}
