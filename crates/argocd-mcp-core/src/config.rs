use crate::constants;
use crate::error::ConfigError;
use crate::types::Transport;

/// Connection settings for the Argo CD API server. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ArgoCdConfig {
    pub url: String,
    pub token: String,
    pub insecure: bool,
}

impl ArgoCdConfig {
    /// Build the config from raw flag values.
    ///
    /// Values starting with `$` are expanded from the environment first, so a
    /// token can be passed as `--argocd-token '$ARGOCD_TOKEN'` without landing
    /// in the process arguments.
    pub fn from_raw(url: &str, token: &str, insecure: &str) -> Result<Self, ConfigError> {
        let url = expand_if_variable(url);
        let token = expand_if_variable(token);
        let insecure = expand_if_variable(insecure);

        let url = url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ConfigError::missing("argocd-url"));
        }
        let parsed = url::Url::parse(&url)
            .map_err(|e| ConfigError::invalid("argocd-url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "argocd-url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        if token.trim().is_empty() {
            return Err(ConfigError::missing("argocd-token"));
        }

        let insecure = parse_bool(insecure.trim())
            .ok_or_else(|| ConfigError::invalid("insecure", format!("'{insecure}' is not a boolean")))?;

        Ok(Self {
            url,
            token,
            insecure,
        })
    }

    /// Token prefix safe to put in logs.
    pub fn redacted_token(&self) -> String {
        let prefix: String = self.token.chars().take(4).collect();
        format!("{prefix}...")
    }
}

impl std::fmt::Debug for ArgoCdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgoCdConfig")
            .field("url", &self.url)
            .field("token", &self.redacted_token())
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Settings for the MCP side of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub transport: Transport,
    pub bind: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Http,
            bind: constants::DEFAULT_HTTP_BIND.into(),
            port: constants::DEFAULT_HTTP_PORT,
            debug: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn expand_if_variable(value: &str) -> String {
    if value.starts_with('$') {
        expand_env(value, |name| std::env::var(name).ok())
    } else {
        value.to_string()
    }
}

/// Replace `$VAR` and `${VAR}` references using `lookup`. Unset variables
/// expand to the empty string.
pub fn expand_env(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    // unterminated `${`: keep the text as-is
                    out.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]).unwrap_or_default());
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

/// Boolean spellings accepted by the `--insecure` flag.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
