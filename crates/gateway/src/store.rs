//! Gateway-owned metadata: clusters, selector registrations, and agent
//! metadata. The one data set this layer owns rather than proxies.
//!
//! Durable persistence is out of scope; the in-memory store keeps the trait
//! seam so a database-backed implementation can slot in.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A gateway-local grouping of agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform_type: String,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub managed_by: String,
    #[serde(default)]
    pub agents_list: Vec<String>,
}

/// Console-side metadata for one agent (which attestation plugin registered
/// its selectors).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    #[serde(default)]
    pub spiffe_id: String,
    #[serde(default)]
    pub plugin: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cluster {0:?} already exists")]
    ClusterExists(String),

    #[error("cluster {0:?} not found")]
    ClusterNotFound(String),
}

/// CRUD surface over gateway-owned metadata. Implementations must be safe
/// for concurrent use; methods are synchronous and never block on IO in the
/// in-memory case.
pub trait GatewayStore: Send + Sync {
    fn list_clusters(&self) -> Result<Vec<Cluster>, StoreError>;
    fn create_cluster(&self, cluster: Cluster) -> Result<(), StoreError>;
    /// Replaces the cluster currently named `name`; the replacement may
    /// carry a different name (rename).
    fn edit_cluster(&self, name: &str, cluster: Cluster) -> Result<(), StoreError>;
    fn delete_cluster(&self, name: &str) -> Result<(), StoreError>;

    /// Upserts the selector plugin recorded for an agent.
    fn register_selector(&self, meta: AgentMetadata) -> Result<(), StoreError>;
    fn list_selectors(&self) -> Result<Vec<AgentMetadata>, StoreError>;
    /// Metadata for the given agents, or all agents when the filter is empty.
    fn list_agent_metadata(&self, spiffe_ids: &[String]) -> Result<Vec<AgentMetadata>, StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    clusters: BTreeMap<String, Cluster>,
    agents: BTreeMap<String, AgentMetadata>,
}

#[derive(Debug, Default)]
pub struct MemoryGatewayStore {
    tables: RwLock<Tables>,
}

impl MemoryGatewayStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl GatewayStore for MemoryGatewayStore {
    fn list_clusters(&self) -> Result<Vec<Cluster>, StoreError> {
        Ok(self.read().clusters.values().cloned().collect())
    }

    fn create_cluster(&self, cluster: Cluster) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.clusters.contains_key(&cluster.name) {
            return Err(StoreError::ClusterExists(cluster.name));
        }
        tables.clusters.insert(cluster.name.clone(), cluster);
        Ok(())
    }

    fn edit_cluster(&self, name: &str, cluster: Cluster) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.clusters.contains_key(name) {
            return Err(StoreError::ClusterNotFound(name.to_string()));
        }
        if cluster.name != name && tables.clusters.contains_key(&cluster.name) {
            return Err(StoreError::ClusterExists(cluster.name));
        }
        tables.clusters.remove(name);
        tables.clusters.insert(cluster.name.clone(), cluster);
        Ok(())
    }

    fn delete_cluster(&self, name: &str) -> Result<(), StoreError> {
        let mut tables = self.write();
        match tables.clusters.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::ClusterNotFound(name.to_string())),
        }
    }

    fn register_selector(&self, meta: AgentMetadata) -> Result<(), StoreError> {
        self.write().agents.insert(meta.spiffe_id.clone(), meta);
        Ok(())
    }

    fn list_selectors(&self) -> Result<Vec<AgentMetadata>, StoreError> {
        Ok(self.read().agents.values().cloned().collect())
    }

    fn list_agent_metadata(&self, spiffe_ids: &[String]) -> Result<Vec<AgentMetadata>, StoreError> {
        let tables = self.read();
        if spiffe_ids.is_empty() {
            return Ok(tables.agents.values().cloned().collect());
        }
        Ok(spiffe_ids
            .iter()
            .filter_map(|id| tables.agents.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(name: &str) -> Cluster {
        Cluster {
            name: name.into(),
            platform_type: "Kubernetes".into(),
            domain_name: "example.org".into(),
            managed_by: "platform-team".into(),
            agents_list: vec![],
        }
    }

    #[test]
    fn create_list_delete_cluster() {
        let store = MemoryGatewayStore::new();
        store.create_cluster(cluster("east")).unwrap();
        store.create_cluster(cluster("west")).unwrap();

        let names: Vec<String> =
            store.list_clusters().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["east", "west"]);

        store.delete_cluster("east").unwrap();
        assert_eq!(store.list_clusters().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let store = MemoryGatewayStore::new();
        store.create_cluster(cluster("east")).unwrap();
        assert_eq!(
            store.create_cluster(cluster("east")),
            Err(StoreError::ClusterExists("east".into()))
        );
    }

    #[test]
    fn edit_renames_without_clobbering() {
        let store = MemoryGatewayStore::new();
        store.create_cluster(cluster("east")).unwrap();
        store.create_cluster(cluster("west")).unwrap();

        // Renaming onto an existing cluster must fail.
        assert_eq!(
            store.edit_cluster("east", cluster("west")),
            Err(StoreError::ClusterExists("west".into()))
        );

        store.edit_cluster("east", cluster("east-2")).unwrap();
        let names: Vec<String> =
            store.list_clusters().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["east-2", "west"]);
    }

    #[test]
    fn edit_or_delete_missing_cluster_errors() {
        let store = MemoryGatewayStore::new();
        assert!(matches!(
            store.edit_cluster("ghost", cluster("ghost")),
            Err(StoreError::ClusterNotFound(_))
        ));
        assert!(matches!(
            store.delete_cluster("ghost"),
            Err(StoreError::ClusterNotFound(_))
        ));
    }

    #[test]
    fn selector_registration_upserts_and_filters() {
        let store = MemoryGatewayStore::new();
        let id = "spiffe://example.org/agent/a".to_string();
        store
            .register_selector(AgentMetadata { spiffe_id: id.clone(), plugin: "k8s_sat".into() })
            .unwrap();
        store
            .register_selector(AgentMetadata { spiffe_id: id.clone(), plugin: "k8s_psat".into() })
            .unwrap();

        let all = store.list_selectors().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].plugin, "k8s_psat");

        let filtered = store.list_agent_metadata(&[id, "spiffe://example.org/agent/b".into()]).unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
