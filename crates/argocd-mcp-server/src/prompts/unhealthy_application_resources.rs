use super::{PromptArgument, PromptDefinition};
use argocd_mcp_core::constants;

pub const DESCRIPTION: &str = "The unhealthy resources of the Argo CD Application prompt";

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: constants::PROMPT_UNHEALTHY_APPLICATION_RESOURCES.into(),
        description: DESCRIPTION.into(),
        arguments: vec![PromptArgument {
            name: "name".into(),
            description: "the name of the application to get details of".into(),
            required: true,
        }],
    }
}
