//! [`ManifestToml`] builder for `addon.toml` test content.

/// Builds the text of an `addon.toml` file.
///
/// # Example
///
/// ```rust
/// use addon_test_utils::ManifestToml;
///
/// let toml = ManifestToml::new("ui", "1.0.0", "2.0.0")
///     .status("beta")
///     .dependency("core", ">=1.0.0")
///     .render();
/// assert!(toml.contains("id = \"ui\""));
/// assert!(toml.contains("[[dependencies]]"));
/// ```
#[derive(Debug, Clone)]
pub struct ManifestToml {
    id: String,
    version: String,
    min_host: String,
    max_host: Option<String>,
    status: Option<String>,
    dependencies: Vec<(String, String)>,
}

impl ManifestToml {
    /// A manifest with the three required fields.
    pub fn new(id: &str, version: &str, min_host: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            min_host: min_host.to_string(),
            max_host: None,
            status: None,
            dependencies: Vec::new(),
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn max_host(mut self, version: &str) -> Self {
        self.max_host = Some(version.to_string());
        self
    }

    pub fn dependency(mut self, id: &str, range: &str) -> Self {
        self.dependencies.push((id.to_string(), range.to_string()));
        self
    }

    /// The add-on identifier this manifest declares.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render the manifest as TOML.
    pub fn render(&self) -> String {
        let mut out = format!(
            "[addon]\nid = \"{}\"\nname = \"{}\"\nversion = \"{}\"\n",
            self.id, self.id, self.version
        );
        if let Some(ref status) = self.status {
            out.push_str(&format!("status = \"{status}\"\n"));
        }

        out.push_str(&format!("\n[host]\nmin_version = \"{}\"\n", self.min_host));
        if let Some(ref max) = self.max_host {
            out.push_str(&format!("max_version = \"{max}\"\n"));
        }

        for (id, range) in &self.dependencies {
            out.push_str(&format!(
                "\n[[dependencies]]\nid = \"{id}\"\nversion = \"{range}\"\n"
            ));
        }
        out
    }
}
