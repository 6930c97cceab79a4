use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cluster::ClusterView;
use crate::error::ConfigError;
use crate::plugin::{RlSchedulerScore, ScorePlugin, PLUGIN_NAME};

/// Builds a plugin from its opaque options and the cluster view.
pub type PluginFactory =
    fn(Option<&serde_json::Value>, Arc<dyn ClusterView>) -> Result<Arc<dyn ScorePlugin>, ConfigError>;

/// Name → factory table consulted by the host at startup.
#[derive(Default, Clone)]
pub struct Registry {
    factories: BTreeMap<String, PluginFactory>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every score plugin of this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PLUGIN_NAME, new_rl_scheduler_score);
        registry
    }

    pub fn register(&mut self, name: &str, factory: PluginFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn build(
        &self,
        name: &str,
        options: Option<&serde_json::Value>,
        view: Arc<dyn ClusterView>,
    ) -> Result<Arc<dyn ScorePlugin>, ConfigError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPlugin(name.to_string()))?;
        factory(options, view)
    }
}

fn new_rl_scheduler_score(
    options: Option<&serde_json::Value>,
    view: Arc<dyn ClusterView>,
) -> Result<Arc<dyn ScorePlugin>, ConfigError> {
    Ok(Arc::new(RlSchedulerScore::from_json(options, view)?))
}
