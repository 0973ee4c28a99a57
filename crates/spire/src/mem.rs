//! In-memory control plane used by tests and demo deployments.
//!
//! Implements [`SpireClient`] over a mutex-guarded state table with the
//! smallest semantics the gateway's contract needs: bans stick, deletes
//! remove, batch operations report per-item status.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::client::{ClientError, SpireClient};
use crate::types::*;

#[derive(Debug, Default)]
struct State {
    agents: Vec<Agent>,
    entries: Vec<Entry>,
    bundle: Bundle,
    federated_bundles: BTreeMap<String, Bundle>,
    federations: BTreeMap<String, FederationRelationship>,
}

/// See the module docs.
#[derive(Debug, Default)]
pub struct InMemorySpireClient {
    state: Mutex<State>,
    next_id: AtomicU64,
}

impl InMemorySpireClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_agent(&self, agent: Agent) {
        self.lock().agents.push(agent);
    }

    pub fn seed_entry(&self, entry: Entry) {
        self.lock().entries.push(entry);
    }

    pub fn set_bundle(&self, bundle: Bundle) {
        self.lock().bundle = bundle;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

fn not_found(what: &str) -> Status {
    Status { code: 5, message: format!("{what} not found") }
}

#[async_trait]
impl SpireClient for InMemorySpireClient {
    async fn debug_server(&self) -> Result<DebugServerInfo, ClientError> {
        let state = self.lock();
        Ok(DebugServerInfo {
            svid_chain: Vec::new(),
            uptime: 0,
            federated_bundles_count: state.federated_bundles.len() as i32,
        })
    }

    async fn healthcheck(&self, _req: HealthcheckRequest) -> Result<HealthcheckResponse, ClientError> {
        Ok(HealthcheckResponse { status: "SERVING".into() })
    }

    async fn list_agents(&self, req: ListAgentsRequest) -> Result<ListAgentsResponse, ClientError> {
        let state = self.lock();
        let agents = state
            .agents
            .iter()
            .filter(|a| match &req.filters {
                None => true,
                Some(f) => {
                    f.by_attestation_type
                        .as_ref()
                        .is_none_or(|t| *t == a.attestation_type)
                        && f.by_banned.is_none_or(|b| b == a.banned)
                }
            })
            .cloned()
            .collect();
        Ok(ListAgentsResponse { agents })
    }

    async fn ban_agent(&self, req: BanAgentRequest) -> Result<(), ClientError> {
        let mut state = self.lock();
        match state.agents.iter_mut().find(|a| a.id == req.id) {
            Some(agent) => {
                agent.banned = true;
                Ok(())
            }
            None => Err(ClientError::Status(format!("agent {} not found", req.id))),
        }
    }

    async fn delete_agent(&self, req: DeleteAgentRequest) -> Result<(), ClientError> {
        let mut state = self.lock();
        let before = state.agents.len();
        state.agents.retain(|a| a.id != req.id);
        if state.agents.len() == before {
            return Err(ClientError::Status(format!("agent {} not found", req.id)));
        }
        Ok(())
    }

    async fn create_join_token(&self, req: CreateJoinTokenRequest) -> Result<JoinToken, ClientError> {
        let value = req.token.unwrap_or_else(|| self.fresh_id("token"));
        let ttl = i64::from(req.ttl.unwrap_or(600));
        Ok(JoinToken { value, expires_at: Utc::now().timestamp() + ttl })
    }

    async fn list_entries(&self, req: ListEntriesRequest) -> Result<ListEntriesResponse, ClientError> {
        let state = self.lock();
        let entries = state
            .entries
            .iter()
            .filter(|e| match &req.filters {
                None => true,
                Some(f) => {
                    f.by_parent_id.as_ref().is_none_or(|p| *p == e.parent_id)
                        && f.by_spiffe_id.as_ref().is_none_or(|s| *s == e.spiffe_id)
                }
            })
            .cloned()
            .collect();
        Ok(ListEntriesResponse { entries })
    }

    async fn batch_create_entries(
        &self,
        req: BatchCreateEntryRequest,
    ) -> Result<BatchCreateEntryResponse, ClientError> {
        let mut results = Vec::with_capacity(req.entries.len());
        let mut state = self.lock();
        for mut entry in req.entries {
            if entry.id.is_empty() {
                entry.id = self.fresh_id("entry");
            }
            state.entries.push(entry.clone());
            results.push(BatchEntryResult { status: Status::ok(), entry: Some(entry) });
        }
        Ok(BatchCreateEntryResponse { results })
    }

    async fn batch_delete_entries(
        &self,
        req: BatchDeleteEntryRequest,
    ) -> Result<BatchDeleteEntryResponse, ClientError> {
        let mut state = self.lock();
        let results = req
            .ids
            .into_iter()
            .map(|id| {
                let before = state.entries.len();
                state.entries.retain(|e| e.id != id);
                let status = if state.entries.len() < before {
                    Status::ok()
                } else {
                    not_found("entry")
                };
                BatchDeleteEntryResult { status, id }
            })
            .collect();
        Ok(BatchDeleteEntryResponse { results })
    }

    async fn get_bundle(&self, _req: GetBundleRequest) -> Result<Bundle, ClientError> {
        Ok(self.lock().bundle.clone())
    }

    async fn list_federated_bundles(
        &self,
        _req: ListFederatedBundlesRequest,
    ) -> Result<ListFederatedBundlesResponse, ClientError> {
        Ok(ListFederatedBundlesResponse {
            bundles: self.lock().federated_bundles.values().cloned().collect(),
        })
    }

    async fn create_federated_bundle(
        &self,
        req: CreateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError> {
        let Some(bundle) = req.bundle else {
            return Err(ClientError::Status("no bundle provided".into()));
        };
        let mut state = self.lock();
        if state.federated_bundles.contains_key(&bundle.trust_domain) {
            return Ok(BatchBundleResult {
                status: Status { code: 6, message: "bundle already exists".into() },
                bundle: None,
            });
        }
        state.federated_bundles.insert(bundle.trust_domain.clone(), bundle.clone());
        Ok(BatchBundleResult { status: Status::ok(), bundle: Some(bundle) })
    }

    async fn update_federated_bundle(
        &self,
        req: UpdateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError> {
        let Some(bundle) = req.bundle else {
            return Err(ClientError::Status("no bundle provided".into()));
        };
        let mut state = self.lock();
        if !state.federated_bundles.contains_key(&bundle.trust_domain) {
            return Ok(BatchBundleResult { status: not_found("bundle"), bundle: None });
        }
        state.federated_bundles.insert(bundle.trust_domain.clone(), bundle.clone());
        Ok(BatchBundleResult { status: Status::ok(), bundle: Some(bundle) })
    }

    async fn delete_federated_bundle(
        &self,
        req: DeleteFederatedBundleRequest,
    ) -> Result<Status, ClientError> {
        let mut state = self.lock();
        match state.federated_bundles.remove(&req.trust_domain) {
            Some(_) => Ok(Status::ok()),
            None => Ok(not_found("bundle")),
        }
    }

    async fn list_federation_relationships(
        &self,
        _req: ListFederationRelationshipsRequest,
    ) -> Result<ListFederationRelationshipsResponse, ClientError> {
        Ok(ListFederationRelationshipsResponse {
            federation_relationships: self.lock().federations.values().cloned().collect(),
        })
    }

    async fn create_federation_relationships(
        &self,
        req: BatchCreateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError> {
        let mut state = self.lock();
        let results = req
            .federation_relationships
            .into_iter()
            .map(|rel| {
                if state.federations.contains_key(&rel.trust_domain) {
                    BatchFederationRelationshipResult {
                        status: Status { code: 6, message: "relationship already exists".into() },
                        federation_relationship: None,
                    }
                } else {
                    state.federations.insert(rel.trust_domain.clone(), rel.clone());
                    BatchFederationRelationshipResult {
                        status: Status::ok(),
                        federation_relationship: Some(rel),
                    }
                }
            })
            .collect();
        Ok(BatchFederationRelationshipResponse { results })
    }

    async fn update_federation_relationships(
        &self,
        req: BatchUpdateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError> {
        let mut state = self.lock();
        let results = req
            .federation_relationships
            .into_iter()
            .map(|rel| {
                if state.federations.contains_key(&rel.trust_domain) {
                    state.federations.insert(rel.trust_domain.clone(), rel.clone());
                    BatchFederationRelationshipResult {
                        status: Status::ok(),
                        federation_relationship: Some(rel),
                    }
                } else {
                    BatchFederationRelationshipResult {
                        status: not_found("relationship"),
                        federation_relationship: None,
                    }
                }
            })
            .collect();
        Ok(BatchFederationRelationshipResponse { results })
    }

    async fn delete_federation_relationships(
        &self,
        req: DeleteFederationRelationshipRequest,
    ) -> Result<DeleteFederationRelationshipResponse, ClientError> {
        let mut state = self.lock();
        let results = req
            .trust_domains
            .into_iter()
            .map(|td| {
                let status = match state.federations.remove(&td) {
                    Some(_) => Status::ok(),
                    None => not_found("relationship"),
                };
                DeleteFederationRelationshipResult { status, trust_domain: td }
            })
            .collect();
        Ok(DeleteFederationRelationshipResponse { results })
    }
}
