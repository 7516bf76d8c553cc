use super::*;
use crate::prompts::unhealthy_application_resources::DESCRIPTION;
use crate::protocol::{INTERNAL_ERROR, INVALID_PARAMS};

pub(super) async fn handle_prompt_get(
    client: &ArgoCdClient,
    id: Option<Value>,
    params: &Value,
    ctx: &CallContext,
) -> JsonRpcResponse {
    let prompt_name = params.get("name").and_then(Value::as_str).unwrap_or("");
    if prompt_name != constants::PROMPT_UNHEALTHY_APPLICATION_RESOURCES {
        return JsonRpcResponse::error(
            id,
            INVALID_PARAMS,
            format!("Unknown prompt: {}", prompt_name),
        );
    }
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let resources = match ApplicationNameInput::from_arguments(&arguments) {
        Ok(input) => resources::unhealthy_application_resources(client, &input.name, ctx).await,
        Err(e) => Err(e),
    };
    let resources = match resources {
        Ok(resources) => resources,
        Err(e) => {
            warn!(prompt = prompt_name, code = %e.code(), "Prompt failed: {}", e);
            let code = match &e {
                QueryError::Validation(_) => INVALID_PARAMS,
                _ => INTERNAL_ERROR,
            };
            return JsonRpcResponse::error_with_data(
                id,
                code,
                e.to_string(),
                Some(json!({"code": e.code().as_str()})),
            );
        }
    };
    let text = match serde_json::to_string(&resources) {
        Ok(text) => text,
        Err(e) => {
            return JsonRpcResponse::error_with_data(
                id,
                INTERNAL_ERROR,
                format!("failed to convert unhealthy resources to text: {e}"),
                Some(json!({"code": ProtocolErrorCode::InternalError.as_str()})),
            );
        }
    };

    debug!(prompt = prompt_name, content = %text, "Prompt rendered");
    JsonRpcResponse::success(
        id,
        json!({
            "description": DESCRIPTION,
            "messages": [{
                "role": "user",
                "content": {"type": "text", "text": text}
            }]
        }),
    )
}
