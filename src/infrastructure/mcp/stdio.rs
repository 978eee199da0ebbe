//! stdio 传输 - 按行分隔的 JSON-RPC
//!
//! 每条请求在独立任务中处理，响应统一经由单个写任务输出，避免行交错。
//! 输入 EOF 后等待在途请求完成再退出

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use super::handler::McpHandler;

/// 在进程 stdin/stdout 上运行
pub async fn serve_stdio(handler: Arc<McpHandler>) -> std::io::Result<()> {
    tracing::info!("MCP server listening on stdio");
    serve(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

/// 在任意读写端上运行
pub async fn serve<R, W>(handler: Arc<McpHandler>, reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_loop(writer, rx));

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let handler = handler.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = handler.handle_message(&line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(out) => {
                    // 写任务退出时丢弃
                    let _ = tx.send(out);
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize JSON-RPC response"),
            }
        });
    }

    tracing::info!("stdin closed, waiting for in-flight requests");
    drop(tx);

    writer_task
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

async fn write_loop<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<String>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        writer.write_all(message.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::SpeechOptions;
    use crate::application::dispatch::ToolDispatcher;
    use crate::infrastructure::adapters::{
        FakeSpeechClient, FileAudioStorage, HttpDeviceClient, HttpDeviceClientConfig,
    };
    use crate::infrastructure::persistence::JsonProfileStore;
    use serde_json::Value;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_serve_answers_each_request_line() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();
        let device = HttpDeviceClient::new(HttpDeviceClientConfig::default()).unwrap();
        let dispatcher = ToolDispatcher::new(
            Arc::new(FakeSpeechClient::with_defaults()),
            Arc::new(device),
            Arc::new(store),
            SpeechOptions::default(),
        );
        let storage = FileAudioStorage::new(dir.path().join("audio")).await.unwrap();
        let handler = Arc::new(McpHandler::new(Arc::new(dispatcher), Arc::new(storage)));

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"elevenlabs_list_voices"}}"#,
            "\n",
        );
        let (out_writer, mut out_reader) = tokio::io::duplex(64 * 1024);

        serve(handler, input.as_bytes(), out_writer).await.unwrap();

        let mut output = String::new();
        out_reader.read_to_string(&mut output).await.unwrap();

        let mut responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        responses.sort_by_key(|r| r["id"].as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "mcp-elevenlabs-mia");
        assert_eq!(responses[1]["result"]["isError"], false);
        assert!(responses[1]["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Available voices:"));
    }
}
