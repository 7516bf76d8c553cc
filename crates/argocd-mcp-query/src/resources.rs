use crate::applications::parse_application_list;
use crate::client::{ArgoCdClient, CallContext};
use argocd_mcp_core::constants;
use argocd_mcp_core::error::QueryError;
use argocd_mcp_core::types::{ApplicationList, HealthStatus, UnhealthyResources};
use tracing::debug;

/// Retain the unhealthy resources of the first application in `list`.
///
/// `list` is expected to be pre-filtered by name upstream. A resource without
/// a health object is treated as healthy; one whose health carries no status
/// is not.
pub fn filter_unhealthy_resources(
    list: ApplicationList,
    name: &str,
) -> Result<UnhealthyResources, QueryError> {
    let Some(app) = list.items.into_iter().next() else {
        return Err(QueryError::not_found(name));
    };
    let resources = app
        .status
        .resources
        .into_iter()
        .filter(|r| {
            r.health
                .as_ref()
                .is_some_and(|h| h.status != Some(HealthStatus::Healthy))
        })
        .collect();
    Ok(UnhealthyResources { resources })
}

/// Fetch a single application by name and return its unhealthy resources.
pub async fn unhealthy_application_resources(
    client: &ArgoCdClient,
    name: &str,
    ctx: &CallContext,
) -> Result<UnhealthyResources, QueryError> {
    let response = client
        .fetch(
            constants::APPLICATIONS_PATH,
            &[(constants::APPLICATION_NAME_PARAM, name)],
            ctx,
        )
        .await?;
    if !response.is_ok() {
        return Err(QueryError::upstream_status(
            response.status,
            response.body_text(),
        ));
    }
    let list = parse_application_list(&response.body)?;
    let result = filter_unhealthy_resources(list, name)?;
    debug!(
        application = name,
        unhealthy = result.resources.len(),
        "Filtered unhealthy resources"
    );
    Ok(result)
}
