//! stdio transport — line-delimited JSON-RPC on stdin/stdout.
//!
//! Each input line is one JSON-RPC request; each response is written as one
//! JSON line. Unparsable lines get a `PARSE_ERROR` response with a null id.
//! The loop exits cleanly on EOF.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::record::RecordStore;
use crate::tools::ToolRegistry;

use super::handler::handle_request;
use super::protocol::{JsonRpcRequest, JsonRpcResponse, error_codes};

/// Run the stdio transport until stdin reaches EOF.
pub async fn serve_stdio(
    registry: Arc<ToolRegistry>,
    store: Arc<RecordStore>,
) -> std::io::Result<()> {
    info!(records = store.len(), "stdio transport started");
    serve(registry, store, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Transport loop over arbitrary reader/writer pairs, for testability.
pub(crate) async fn serve<R, W>(
    registry: Arc<ToolRegistry>,
    store: Arc<RecordStore>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "stdio request");
                handle_request(&registry, &store, request).await
            }
            Err(e) => Some(JsonRpcResponse::error(
                None,
                error_codes::PARSE_ERROR,
                format!("parse error: {e}"),
            )),
        };

        if let Some(response) = response {
            let mut body = serde_json::to_vec(&response)
                .map_err(|e| std::io::Error::other(format!("encode response: {e}")))?;
            body.push(b'\n');
            output.write_all(&body).await?;
            output.flush().await?;
        }
    }

    info!("stdio transport stopped (EOF)");
    Ok(())
}
