use crate::{
    client::{ExpandClient, HttpExpandClient},
    config::{ClientConfig, ExpanderConfig},
    error::DebugError,
    expand::TreeExpander,
    models::NodeInfo,
    normalize::normalize,
    resolve::{assemble, Explanation},
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Permission debugger: expand, normalize, then assemble the graph
pub struct PermissionDebugger {
    /// Recursive expansion over the remote service
    expander: TreeExpander,
}

impl PermissionDebugger {
    /// Create a debugger over any expansion client
    pub fn new(client: Arc<dyn ExpandClient>, config: ExpanderConfig) -> Self {
        Self {
            expander: TreeExpander::new(client).with_config(config),
        }
    }

    /// Create a debugger talking HTTP to the configured store
    pub fn connect(client_config: ClientConfig, config: ExpanderConfig) -> Result<Self, DebugError> {
        let client = HttpExpandClient::new(client_config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Normalized records explaining `relation` on `object` for `subject`
    pub async fn collect(&self, object: &str, relation: &str, subject: &str) -> Vec<NodeInfo> {
        let records = self.expander.expand(object, relation).await;
        normalize(object, relation, subject, &records)
    }

    /// Explain how `subject` reaches `relation` on `object`.
    ///
    /// Never fails: unreachable branches shrink the graph and a missing chain
    /// yields the neutral fallback graph.
    #[instrument(skip(self))]
    pub async fn explain(&self, object: &str, relation: &str, subject: &str) -> Explanation {
        let nodes = self.collect(object, relation, subject).await;
        let explanation = assemble(subject, &nodes);

        info!(
            found = explanation.found(),
            records = nodes.len(),
            path = explanation.path.len(),
            nodes = explanation.graph.node_count(),
            edges = explanation.graph.edge_count(),
            "Explanation assembled"
        );

        explanation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticExpandClient;
    use crate::models::{Leaf, RewriteTree};

    #[tokio::test]
    async fn test_explain_direct_user() {
        let client = Arc::new(StaticExpandClient::new().with_tree(
            "document:1",
            "viewer",
            RewriteTree::leaf("document:1#viewer", Leaf::users(["user:anne"])),
        ));
        let debugger = PermissionDebugger::new(client, ExpanderConfig::default());

        let explanation = debugger.explain("document:1", "viewer", "user:anne").await;
        assert!(explanation.found());
        assert_eq!(explanation.path.nodes(), vec!["document:1#viewer", "user:anne"]);
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let result = PermissionDebugger::connect(
            ClientConfig::new("not-a-url", "store"),
            ExpanderConfig::default(),
        );
        assert!(matches!(result, Err(DebugError::InvalidConfig(_))));
    }
}
