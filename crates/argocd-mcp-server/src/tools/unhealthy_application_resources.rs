use super::{ToolAnnotations, ToolDefinition};
use argocd_mcp_core::constants;
use serde_json::json;

const TITLE: &str = "List unhealthy resources of an Argo CD application";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: constants::TOOL_UNHEALTHY_APPLICATION_RESOURCES.into(),
        title: TITLE.into(),
        description: "List the resources of a given Argo CD application whose health is \
                      reported and not Healthy."
            .into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "the name of the Argo CD Application to get details of"
                }
            },
            "required": ["name"]
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "resources": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "group": {"type": "string"},
                            "version": {"type": "string"},
                            "kind": {"type": "string"},
                            "namespace": {"type": "string"},
                            "name": {"type": "string"},
                            "status": {"type": "string"},
                            "health": {
                                "type": "object",
                                "properties": {
                                    "status": {"type": "string"},
                                    "message": {"type": "string"}
                                }
                            }
                        },
                        "required": ["version", "kind", "name"]
                    }
                }
            },
            "required": ["resources"]
        }),
        annotations: ToolAnnotations::read_only(TITLE),
    }
}
