use crate::client::{ArgoCdClient, CallContext};
use argocd_mcp_core::constants;
use argocd_mcp_core::error::QueryError;
use argocd_mcp_core::types::{ApplicationList, HealthStatus, SyncStatus, UnhealthyApplications};
use tracing::debug;

/// Parse an Argo CD application list payload.
pub fn parse_application_list(body: &[u8]) -> Result<ApplicationList, QueryError> {
    serde_json::from_slice(body).map_err(QueryError::parse)
}

/// Group application names by the reason they need attention.
///
/// Health takes precedence over sync status: a `Degraded` application that is
/// also out of sync is only reported as degraded. Healthy and synced
/// applications, and applications with no reported health, are skipped.
pub fn classify_applications(list: &ApplicationList) -> UnhealthyApplications {
    let mut result = UnhealthyApplications::default();
    for app in &list.items {
        let bucket = match app.health() {
            Some(HealthStatus::Degraded) => &mut result.degraded,
            Some(HealthStatus::Progressing) => &mut result.progressing,
            Some(HealthStatus::Missing) => &mut result.missing,
            Some(HealthStatus::Unknown) => &mut result.unknown,
            Some(HealthStatus::Suspended) => &mut result.suspended,
            Some(HealthStatus::Healthy) if app.sync() == Some(SyncStatus::OutOfSync) => {
                &mut result.out_of_sync
            }
            Some(HealthStatus::Healthy) | None => continue,
        };
        bucket.push(app.name().to_string());
    }
    result
}

/// Fetch every application from Argo CD and classify the unhealthy ones.
pub async fn unhealthy_applications(
    client: &ArgoCdClient,
    ctx: &CallContext,
) -> Result<UnhealthyApplications, QueryError> {
    let response = client.fetch(constants::APPLICATIONS_PATH, &[], ctx).await?;
    if !response.is_ok() {
        return Err(QueryError::upstream_status(
            response.status,
            response.body_text(),
        ));
    }
    let list = parse_application_list(&response.body)?;
    let result = classify_applications(&list);
    debug!(
        total = list.items.len(),
        degraded = result.degraded.len(),
        progressing = result.progressing.len(),
        missing = result.missing.len(),
        unknown = result.unknown.len(),
        suspended = result.suspended.len(),
        out_of_sync = result.out_of_sync.len(),
        "Classified Argo CD applications"
    );
    Ok(result)
}
