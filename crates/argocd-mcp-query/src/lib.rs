pub mod applications;
pub mod client;
pub mod resources;

#[cfg(test)]
pub(crate) mod test_support {
    use argocd_mcp_core::types::ApplicationList;

    /// Parse one of the JSON fixtures under `testdata/fixtures/argocd`.
    pub fn fixture_list(name: &str) -> ApplicationList {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../testdata/fixtures/argocd")
            .join(name);
        let raw = std::fs::read(&path)
            .unwrap_or_else(|e| panic!("fixture {} missing: {}", path.display(), e));
        serde_json::from_slice(&raw).expect("fixture should be a valid application list")
    }
}
