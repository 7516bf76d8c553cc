use crate::cancellation::{InFlightGuard, InFlightRequests};
use crate::prompts;
use crate::protocol::{self, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND};
use crate::tools;
use argocd_mcp_core::constants;
use argocd_mcp_core::error::{ProtocolErrorCode, QueryError};
use argocd_mcp_query::client::{ArgoCdClient, CallContext};
use argocd_mcp_query::{applications, resources};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use self::prompt_calls::handle_prompt_get;
use self::tool_calls::handle_tool_call;

mod prompt_calls;
mod tool_calls;

/// Cancellation scope of the single stdio connection.
const STDIO_SCOPE: &str = "stdio";

/// MCP request dispatcher shared by the stdio and HTTP transports.
pub struct McpServer {
    client: ArgoCdClient,
    in_flight: InFlightRequests,
}

impl McpServer {
    pub fn new(client: ArgoCdClient) -> Self {
        Self {
            client,
            in_flight: InFlightRequests::new(),
        }
    }

    /// Handle one decoded message. Notifications yield no response.
    ///
    /// `scope` names the connection the message arrived on; a
    /// `notifications/cancelled` only reaches requests of the same scope.
    pub async fn handle_request(
        &self,
        request: &JsonRpcRequest,
        scope: &str,
        ctx: &CallContext,
    ) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.as_ref() else {
            self.handle_notification(request, scope);
            return None;
        };
        let (guard, call_ctx) = self.track(scope, id, ctx);
        let response = self.dispatch(request, &call_ctx).await;
        drop(guard);
        Some(response)
    }

    fn track(&self, scope: &str, id: &Value, ctx: &CallContext) -> (InFlightGuard, CallContext) {
        let guard = self.in_flight.register(scope, id, ctx.cancellation_token());
        let mut call_ctx = CallContext::new(guard.token().clone());
        if let Some(deadline) = ctx.deadline() {
            call_ctx = call_ctx.with_deadline(deadline);
        }
        (guard, call_ctx)
    }

    fn handle_notification(&self, request: &JsonRpcRequest, scope: &str) {
        match request.method.as_str() {
            "notifications/cancelled" => {
                let Some(request_id) = request.params.get("requestId") else {
                    warn!("Cancellation notification without requestId");
                    return;
                };
                let reason = request
                    .params
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                if self.in_flight.cancel(scope, request_id) {
                    info!(scope, request_id = %request_id, reason, "Request cancelled by client");
                }
            }
            "notifications/initialized" => debug!("Client initialized"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    async fn dispatch(&self, request: &JsonRpcRequest, ctx: &CallContext) -> JsonRpcResponse {
        let id = request.id.clone();
        debug!(method = %request.method, id = ?id, "Handling request");
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(&request.params)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                let tools = tools::list_tools();
                JsonRpcResponse::success(id, json!({ "tools": tools }))
            }
            "tools/call" => handle_tool_call(&self.client, id, &request.params, ctx).await,
            "prompts/list" => {
                let prompts = prompts::list_prompts();
                JsonRpcResponse::success(id, json!({ "prompts": prompts }))
            }
            "prompts/get" => handle_prompt_get(&self.client, id, &request.params, ctx).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }
}

/// The client's protocol revision if supported, otherwise the latest one.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| {
            constants::SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .find(|supported| **supported == v)
        })
        .copied()
        .unwrap_or(constants::LATEST_PROTOCOL_VERSION)
}

fn initialize_result(params: &Value) -> Value {
    let requested = params.get("protocolVersion").and_then(Value::as_str);
    json!({
        "protocolVersion": negotiate_protocol_version(requested),
        "capabilities": {
            "tools": {"listChanged": false},
            "prompts": {"listChanged": false}
        },
        "serverInfo": {
            "name": constants::SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Arguments of `unhealthyApplicationResources` and of the matching prompt.
#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationNameInput {
    pub name: String,
}

impl ApplicationNameInput {
    fn from_arguments(arguments: &Value) -> Result<Self, QueryError> {
        let input: Self = decode_arguments(arguments)?;
        if input.name.is_empty() {
            return Err(QueryError::validation("'name' must not be empty"));
        }
        Ok(input)
    }
}

fn decode_arguments<T: DeserializeOwned>(arguments: &Value) -> Result<T, QueryError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments).map_err(|e| QueryError::validation(e.to_string()))
}

/// Run the MCP server loop on stdin/stdout.
pub async fn run_stdio(server: Arc<McpServer>) -> io::Result<()> {
    info!("MCP stdio server started");
    serve_lines(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`.
///
/// Each request runs in its own task so a later `notifications/cancelled`
/// line can reach it. Returns once `reader` is exhausted and every pending
/// response has been written.
pub async fn serve_lines<R, W>(server: Arc<McpServer>, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(writer));
    let mut tasks = JoinSet::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request = match protocol::parse_message(line.as_bytes()) {
            Ok(request) => request,
            Err(response) => {
                write_response(&writer, &response).await?;
                continue;
            }
        };
        let Some(id) = request.id.clone() else {
            server.handle_notification(&request, STDIO_SCOPE);
            continue;
        };

        // registered before spawning so a cancellation on the next line finds it
        let (guard, ctx) = server.track(STDIO_SCOPE, &id, &CallContext::background());
        let server = Arc::clone(&server);
        let writer = Arc::clone(&writer);
        tasks.spawn(async move {
            let response = server.dispatch(&request, &ctx).await;
            let cancelled = guard.token().is_cancelled();
            drop(guard);
            if cancelled {
                debug!(id = %id, "Dropping response of cancelled request");
                return;
            }
            if let Err(e) = write_response(&writer, &response).await {
                error!("stdout write error: {}", e);
            }
        });
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("MCP stdio input closed");
    Ok(())
}

async fn write_response<W>(writer: &Mutex<W>, response: &JsonRpcResponse) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut serialized = serde_json::to_vec(response)?;
    serialized.push(b'\n');
    let mut w = writer.lock().await;
    w.write_all(&serialized).await?;
    w.flush().await
}

/// Wrap a payload as MCP tool text content, with the payload itself as
/// structured content.
pub(crate) fn tool_result_response<T: Serialize>(
    id: Option<Value>,
    text: Option<String>,
    payload: &T,
) -> JsonRpcResponse {
    let structured = match serde_json::to_value(payload) {
        Ok(value) => value,
        Err(e) => return tool_error_response(id, ProtocolErrorCode::InternalError, e.to_string()),
    };
    let text = match text {
        Some(text) => text,
        None => serde_json::to_string(payload).unwrap_or_default(),
    };
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": text}],
            "structuredContent": structured,
            "isError": false
        }),
    )
}

pub(crate) fn tool_error_response(
    id: Option<Value>,
    code: ProtocolErrorCode,
    message: impl Into<String>,
) -> JsonRpcResponse {
    let payload = json!({
        "error": {
            "code": code.as_str(),
            "message": message.into(),
        }
    });
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": payload.to_string()}],
            "isError": true
        }),
    )
}
