use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Health of an application or resource as assessed by Argo CD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Progressing,
    Degraded,
    Suspended,
    Missing,
    Unknown,
}

impl HealthStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Progressing => "Progressing",
            Self::Degraded => "Degraded",
            Self::Suspended => "Suspended",
            Self::Missing => "Missing",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Healthy" => Ok(Self::Healthy),
            "Progressing" => Ok(Self::Progressing),
            "Degraded" => Ok(Self::Degraded),
            "Suspended" => Ok(Self::Suspended),
            "Missing" => Ok(Self::Missing),
            "Unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown health status: {other}")),
        }
    }
}

/// Whether the live state of an application matches its desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncStatus {
    Synced,
    OutOfSync,
    Unknown,
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Synced" => Ok(Self::Synced),
            "OutOfSync" => Ok(Self::OutOfSync),
            "Unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown sync status: {other}")),
        }
    }
}

/// Argo CD `ApplicationList`, reduced to the fields this server reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Application>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
}

impl Application {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn health(&self) -> Option<HealthStatus> {
        self.status.health.status
    }

    pub fn sync(&self) -> Option<SyncStatus> {
        self.status.sync.status
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub health: ApplicationHealth,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sync: ApplicationSync,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<ResourceStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationHealth {
    #[serde(default, deserialize_with = "optional_status")]
    pub status: Option<HealthStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationSync {
    #[serde(default, deserialize_with = "optional_status")]
    pub status: Option<SyncStatus>,
}

/// A single managed object of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    /// Sync status of the resource, e.g. `Synced` or `OutOfSync`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<ResourceHealth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHealth {
    /// Argo CD omits the status while a resource is still being assessed.
    #[serde(
        default,
        deserialize_with = "optional_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<HealthStatus>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Application names grouped by the reason they need attention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnhealthyApplications {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub progressing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspended: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub out_of_sync: Vec<String>,
}

impl UnhealthyApplications {
    /// All names, category by category, in the serialized field order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.degraded,
            &self.progressing,
            &self.missing,
            &self.unknown,
            &self.suspended,
            &self.out_of_sync,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }
}

/// Resources of one application whose health is reported and not `Healthy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnhealthyResources {
    pub resources: Vec<ResourceStatus>,
}

/// Which transport the MCP server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

impl Transport {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            _ => Err("invalid transport: choose between 'http' and 'stdio'".to_string()),
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argo CD emits `null` for empty lists and objects.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Absent or empty status strings mean "not reported".
fn optional_status<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn application_list_tolerates_null_items() {
        let list: ApplicationList = serde_json::from_value(json!({
            "metadata": {"resourceVersion": "42"},
            "items": null
        }))
        .unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn application_without_status_has_no_health() {
        let list: ApplicationList = serde_json::from_value(json!({
            "items": [{"metadata": {"name": "bare"}}]
        }))
        .unwrap();
        let app = &list.items[0];
        assert_eq!(app.name(), "bare");
        assert_eq!(app.health(), None);
        assert_eq!(app.sync(), None);
        assert!(app.status.resources.is_empty());
    }

    #[test]
    fn empty_health_string_is_not_reported() {
        let list: ApplicationList = serde_json::from_value(json!({
            "items": [{
                "metadata": {"name": "app"},
                "status": {"health": {"status": ""}, "sync": {"status": "Synced"}}
            }]
        }))
        .unwrap();
        assert_eq!(list.items[0].health(), None);
        assert_eq!(list.items[0].sync(), Some(SyncStatus::Synced));
    }

    #[test]
    fn unrecognized_health_string_is_rejected() {
        let result: Result<ApplicationList, _> = serde_json::from_value(json!({
            "items": [{
                "metadata": {"name": "app"},
                "status": {"health": {"status": "Exploded"}}
            }]
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown health status: Exploded"), "{err}");
    }

    #[test]
    fn resource_status_omits_empty_optional_fields() {
        let resource = ResourceStatus {
            group: String::new(),
            version: "v1".into(),
            kind: "ConfigMap".into(),
            namespace: String::new(),
            name: "settings".into(),
            status: "Synced".into(),
            health: Some(ResourceHealth {
                status: Some(HealthStatus::Missing),
                message: String::new(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "version": "v1",
                "kind": "ConfigMap",
                "name": "settings",
                "status": "Synced",
                "health": {"status": "Missing"}
            })
        );
    }

    #[test]
    fn resource_health_without_status_is_kept() {
        let resource: ResourceStatus = serde_json::from_value(json!({
            "version": "v1",
            "kind": "Pod",
            "name": "web-0",
            "health": {"message": "pending"}
        }))
        .unwrap();
        let health = resource.health.as_ref().unwrap();
        assert_eq!(health.status, None);
        assert_eq!(health.message, "pending");
        assert_eq!(
            serde_json::to_value(&resource).unwrap()["health"],
            json!({"message": "pending"})
        );
    }

    #[test]
    fn unhealthy_applications_omit_empty_categories() {
        let apps = UnhealthyApplications {
            degraded: vec!["x".into()],
            out_of_sync: vec!["a".into()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&apps).unwrap(),
            json!({"degraded": ["x"], "outOfSync": ["a"]})
        );
        assert_eq!(apps.names().collect::<Vec<_>>(), vec!["x", "a"]);
        assert!(!apps.is_empty());
        assert!(UnhealthyApplications::default().is_empty());
    }

    #[test]
    fn unhealthy_resources_always_serialize_the_list() {
        assert_eq!(
            serde_json::to_value(UnhealthyResources::default()).unwrap(),
            json!({"resources": []})
        );
    }

    #[test]
    fn transport_parses_known_values_only() {
        assert_eq!("stdio".parse::<Transport>(), Ok(Transport::Stdio));
        assert_eq!("http".parse::<Transport>(), Ok(Transport::Http));
        assert!("grpc".parse::<Transport>().is_err());
    }
}
