//! Opaque client seam to the control plane.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No control-plane configuration was supplied to this gateway.
    #[error("no SPIRE server configured")]
    Unconfigured,

    /// The control plane could not be reached.
    #[error("SPIRE server unavailable: {0}")]
    Unavailable(String),

    /// The control plane answered with a non-OK status.
    #[error("SPIRE server error: {0}")]
    Status(String),
}

/// Everything the gateway asks of the control plane.
///
/// Implementations must be safe for concurrent use by many in-flight
/// requests; handlers never hold gateway locks across these calls.
#[async_trait]
pub trait SpireClient: Send + Sync {
    async fn debug_server(&self) -> Result<DebugServerInfo, ClientError>;
    async fn healthcheck(&self, req: HealthcheckRequest) -> Result<HealthcheckResponse, ClientError>;

    async fn list_agents(&self, req: ListAgentsRequest) -> Result<ListAgentsResponse, ClientError>;
    async fn ban_agent(&self, req: BanAgentRequest) -> Result<(), ClientError>;
    async fn delete_agent(&self, req: DeleteAgentRequest) -> Result<(), ClientError>;
    async fn create_join_token(&self, req: CreateJoinTokenRequest) -> Result<JoinToken, ClientError>;

    async fn list_entries(&self, req: ListEntriesRequest) -> Result<ListEntriesResponse, ClientError>;
    async fn batch_create_entries(
        &self,
        req: BatchCreateEntryRequest,
    ) -> Result<BatchCreateEntryResponse, ClientError>;
    async fn batch_delete_entries(
        &self,
        req: BatchDeleteEntryRequest,
    ) -> Result<BatchDeleteEntryResponse, ClientError>;

    async fn get_bundle(&self, req: GetBundleRequest) -> Result<Bundle, ClientError>;
    async fn list_federated_bundles(
        &self,
        req: ListFederatedBundlesRequest,
    ) -> Result<ListFederatedBundlesResponse, ClientError>;
    async fn create_federated_bundle(
        &self,
        req: CreateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError>;
    async fn update_federated_bundle(
        &self,
        req: UpdateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError>;
    async fn delete_federated_bundle(
        &self,
        req: DeleteFederatedBundleRequest,
    ) -> Result<Status, ClientError>;

    async fn list_federation_relationships(
        &self,
        req: ListFederationRelationshipsRequest,
    ) -> Result<ListFederationRelationshipsResponse, ClientError>;
    async fn create_federation_relationships(
        &self,
        req: BatchCreateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError>;
    async fn update_federation_relationships(
        &self,
        req: BatchUpdateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError>;
    async fn delete_federation_relationships(
        &self,
        req: DeleteFederationRelationshipRequest,
    ) -> Result<DeleteFederationRelationshipResponse, ClientError>;
}

/// Client used when the gateway runs without a control-plane binding.
///
/// Every call fails with [`ClientError::Unconfigured`], which handlers map
/// to a client-visible error; the gateway-owned endpoints keep working.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpireClient;

#[async_trait]
impl SpireClient for NullSpireClient {
    async fn debug_server(&self) -> Result<DebugServerInfo, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn healthcheck(&self, _req: HealthcheckRequest) -> Result<HealthcheckResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn list_agents(&self, _req: ListAgentsRequest) -> Result<ListAgentsResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn ban_agent(&self, _req: BanAgentRequest) -> Result<(), ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn delete_agent(&self, _req: DeleteAgentRequest) -> Result<(), ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn create_join_token(&self, _req: CreateJoinTokenRequest) -> Result<JoinToken, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn list_entries(&self, _req: ListEntriesRequest) -> Result<ListEntriesResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn batch_create_entries(
        &self,
        _req: BatchCreateEntryRequest,
    ) -> Result<BatchCreateEntryResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn batch_delete_entries(
        &self,
        _req: BatchDeleteEntryRequest,
    ) -> Result<BatchDeleteEntryResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn get_bundle(&self, _req: GetBundleRequest) -> Result<Bundle, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn list_federated_bundles(
        &self,
        _req: ListFederatedBundlesRequest,
    ) -> Result<ListFederatedBundlesResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn create_federated_bundle(
        &self,
        _req: CreateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn update_federated_bundle(
        &self,
        _req: UpdateFederatedBundleRequest,
    ) -> Result<BatchBundleResult, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn delete_federated_bundle(
        &self,
        _req: DeleteFederatedBundleRequest,
    ) -> Result<Status, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn list_federation_relationships(
        &self,
        _req: ListFederationRelationshipsRequest,
    ) -> Result<ListFederationRelationshipsResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn create_federation_relationships(
        &self,
        _req: BatchCreateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn update_federation_relationships(
        &self,
        _req: BatchUpdateFederationRelationshipRequest,
    ) -> Result<BatchFederationRelationshipResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }

    async fn delete_federation_relationships(
        &self,
        _req: DeleteFederationRelationshipRequest,
    ) -> Result<DeleteFederationRelationshipResponse, ClientError> {
        Err(ClientError::Unconfigured)
    }
}
