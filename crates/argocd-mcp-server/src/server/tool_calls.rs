use super::*;

pub(super) async fn handle_tool_call(
    client: &ArgoCdClient,
    id: Option<Value>,
    params: &Value,
    ctx: &CallContext,
) -> JsonRpcResponse {
    let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let response = match tool_name {
        constants::TOOL_UNHEALTHY_APPLICATIONS => {
            match applications::unhealthy_applications(client, ctx).await {
                Ok(result) => {
                    let summary = result.names().collect::<Vec<_>>().join(", ");
                    tool_result_response(id, Some(summary), &result)
                }
                Err(e) => query_error_response(id, tool_name, &e),
            }
        }
        constants::TOOL_UNHEALTHY_APPLICATION_RESOURCES => {
            match unhealthy_application_resources(client, &arguments, ctx).await {
                Ok(result) => tool_result_response(id, None, &result),
                Err(e) => query_error_response(id, tool_name, &e),
            }
        }
        _ => {
            return JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown tool: {}", tool_name),
            );
        }
    };
    if let Some(result) = &response.result {
        debug!(tool = tool_name, result = %result, "Tool call completed");
    }
    response
}

async fn unhealthy_application_resources(
    client: &ArgoCdClient,
    arguments: &Value,
    ctx: &CallContext,
) -> Result<argocd_mcp_core::types::UnhealthyResources, QueryError> {
    let input = ApplicationNameInput::from_arguments(arguments)?;
    resources::unhealthy_application_resources(client, &input.name, ctx).await
}

fn query_error_response(id: Option<Value>, tool_name: &str, err: &QueryError) -> JsonRpcResponse {
    warn!(tool = tool_name, code = %err.code(), "Tool call failed: {}", err);
    tool_error_response(id, err.code(), err.to_string())
}
