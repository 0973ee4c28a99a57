//! Request/response shapes for gateway-owned endpoints.

use serde::{Deserialize, Serialize};

use crate::store::{AgentMetadata, Cluster};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterSelectorRequest {
    #[serde(default)]
    pub agent: AgentMetadata,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListSelectorsResponse {
    pub agents: Vec<AgentMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAgentMetadataRequest {
    /// SPIFFE IDs to look up; empty means all registered agents.
    #[serde(default)]
    pub agents: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListAgentMetadataResponse {
    pub agents: Vec<AgentMetadata>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListClustersResponse {
    pub clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterClusterRequest {
    #[serde(default)]
    pub cluster: Cluster,
}

/// Edit payload: `name` addresses the existing cluster, `edited_name`
/// optionally renames it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterEdit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub edited_name: String,
    #[serde(default)]
    pub platform_type: String,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub managed_by: String,
    #[serde(default)]
    pub agents_list: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditClusterRequest {
    #[serde(default)]
    pub cluster: ClusterEdit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteClusterRequest {
    #[serde(default)]
    pub cluster: ClusterRef,
}
