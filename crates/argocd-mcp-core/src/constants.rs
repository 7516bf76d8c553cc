/// Name reported in `serverInfo` and used as the CLI binary name.
pub const SERVER_NAME: &str = "argocd-mcp";

/// MCP protocol revision advertised when the client asks for an unsupported one.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// MCP protocol revisions this server can speak, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Argo CD REST path listing applications (no leading `/`).
pub const APPLICATIONS_PATH: &str = "api/v1/applications";

/// Query parameter used by Argo CD to filter the application list by name.
pub const APPLICATION_NAME_PARAM: &str = "name";

/// Tool: list applications grouped by unhealthy category.
pub const TOOL_UNHEALTHY_APPLICATIONS: &str = "unhealthyApplications";

/// Tool: list unhealthy resources of a single application.
pub const TOOL_UNHEALTHY_APPLICATION_RESOURCES: &str = "unhealthyApplicationResources";

/// Prompt rendering the unhealthy resources of a single application.
pub const PROMPT_UNHEALTHY_APPLICATION_RESOURCES: &str = "argocd-unhealthy-application-resources";

/// Default port for the streamable HTTP transport.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default bind address for the streamable HTTP transport.
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0";

/// Per-request deadline applied by the HTTP transport.
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Header carrying the streamable HTTP session id.
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// HTTP sessions idle for longer than this are dropped.
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 3600;
