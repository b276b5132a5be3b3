//! Navigation configuration
//!
//! Controls which metadata fallbacks the navigation session tries after a direct symbol lookup
//! fails, and how the module locator probes for referenced modules.

/// Configuration shared by the navigation session and the metadata resolvers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationConfig {
    /// File extensions tried, in order, when looking for a referenced module next to the module
    /// that references it (default: `dll`, `exe`)
    pub module_extensions: Vec<String>,

    /// Method looked up on a compiler generated state machine type (default: `MoveNext`)
    pub state_machine_method: String,

    /// Try the state machine fallback when the direct lookup fails
    pub resolve_state_machines: bool,

    /// Try the declaring type fallback when the state machine fallback fails
    pub resolve_declaring_types: bool,

    /// Maximum number of base types followed by the inheritance walks (default: 64)
    pub max_inheritance_depth: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            module_extensions: vec!["dll".to_string(), "exe".to_string()],
            state_machine_method: "MoveNext".to_string(),
            resolve_state_machines: true,
            resolve_declaring_types: true,
            max_inheritance_depth: 64,
        }
    }
}

impl NavigationConfig {
    /// A configuration that only performs direct symbol lookups
    ///
    /// No module metadata is opened with this configuration.
    #[must_use]
    pub fn direct_only() -> Self {
        Self {
            resolve_state_machines: false,
            resolve_declaring_types: false,
            ..Self::default()
        }
    }

    /// Replace the module extensions probed by the module locator
    #[must_use]
    pub fn with_module_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the state machine resumption method name
    #[must_use]
    pub fn with_state_machine_method(mut self, method: &str) -> Self {
        self.state_machine_method = method.to_string();
        self
    }

    /// Enable or disable the state machine fallback
    #[must_use]
    pub fn with_state_machines(mut self, enabled: bool) -> Self {
        self.resolve_state_machines = enabled;
        self
    }

    /// Enable or disable the declaring type fallback
    #[must_use]
    pub fn with_declaring_types(mut self, enabled: bool) -> Self {
        self.resolve_declaring_types = enabled;
        self
    }

    /// Replace the inheritance walk bound
    #[must_use]
    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.module_extensions, vec!["dll", "exe"]);
        assert_eq!(config.state_machine_method, "MoveNext");
        assert!(config.resolve_state_machines);
        assert!(config.resolve_declaring_types);
        assert_eq!(config.max_inheritance_depth, 64);
    }

    #[test]
    fn builders() {
        let config = NavigationConfig::direct_only()
            .with_module_extensions(["exe"])
            .with_state_machine_method("Resume")
            .with_declaring_types(true)
            .with_max_inheritance_depth(3);

        assert!(!config.resolve_state_machines);
        assert!(config.resolve_declaring_types);
        assert_eq!(config.module_extensions, vec!["exe"]);
        assert_eq!(config.state_machine_method, "Resume");
        assert_eq!(config.max_inheritance_depth, 3);
        assert_ne!(config, NavigationConfig::default());
    }
}
