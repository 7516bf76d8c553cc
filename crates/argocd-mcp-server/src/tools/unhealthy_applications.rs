use super::{ToolAnnotations, ToolDefinition};
use argocd_mcp_core::constants;
use serde_json::json;

const TITLE: &str = "List unhealthy Argo CD applications";

pub fn definition() -> ToolDefinition {
    let names = json!({"type": "array", "items": {"type": "string"}});
    ToolDefinition {
        name: constants::TOOL_UNHEALTHY_APPLICATIONS.into(),
        title: TITLE.into(),
        description: "List the Argo CD applications that are degraded, progressing, missing, \
                      unknown, suspended, or healthy but out of sync."
            .into(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "degraded": names,
                "progressing": names,
                "missing": names,
                "unknown": names,
                "suspended": names,
                "outOfSync": names
            }
        }),
        annotations: ToolAnnotations::read_only(TITLE),
    }
}
