//! Wire shapes mirroring the control plane's API.
//!
//! The gateway validates shape only (well-formed JSON); semantic validation
//! of IDs, selectors and TTLs belongs to the control plane.

use serde::{Deserialize, Serialize};

/// A SPIFFE identifier split into trust domain and workload path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiffeId {
    #[serde(default)]
    pub trust_domain: String,
    #[serde(default)]
    pub path: String,
}

impl std::fmt::Display for SpiffeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spiffe://{}{}", self.trust_domain, self.path)
    }
}

/// A node or workload selector (`type:value`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

/// An attested node known to the control plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default)]
    pub id: SpiffeId,
    #[serde(default)]
    pub attestation_type: String,
    #[serde(default)]
    pub x509svid_serial_number: String,
    #[serde(default)]
    pub x509svid_expires_at: i64,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub selectors: Vec<Selector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFilters {
    #[serde(default)]
    pub by_attestation_type: Option<String>,
    #[serde(default)]
    pub by_banned: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAgentsRequest {
    #[serde(default)]
    pub filters: Option<AgentFilters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAgentsResponse {
    pub agents: Vec<Agent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanAgentRequest {
    #[serde(default)]
    pub id: SpiffeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAgentRequest {
    #[serde(default)]
    pub id: SpiffeId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateJoinTokenRequest {
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub agent_id: Option<SpiffeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinToken {
    pub value: String,
    pub expires_at: i64,
}

/// A registration entry binding a workload identity to selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub spiffe_id: SpiffeId,
    #[serde(default)]
    pub parent_id: SpiffeId,
    #[serde(default)]
    pub selectors: Vec<Selector>,
    #[serde(default)]
    pub x509_svid_ttl: i32,
    #[serde(default)]
    pub jwt_svid_ttl: i32,
    #[serde(default)]
    pub federates_with: Vec<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub downstream: bool,
    #[serde(default)]
    pub dns_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryFilters {
    #[serde(default)]
    pub by_parent_id: Option<SpiffeId>,
    #[serde(default)]
    pub by_spiffe_id: Option<SpiffeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListEntriesRequest {
    #[serde(default)]
    pub filters: Option<EntryFilters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<Entry>,
}

/// gRPC-style per-item status used by the control plane's batch operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Status {
    pub fn ok() -> Self {
        Self { code: 0, message: "OK".into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCreateEntryRequest {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchEntryResult {
    pub status: Status,
    pub entry: Option<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCreateEntryResponse {
    pub results: Vec<BatchEntryResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteEntryRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteEntryResult {
    pub status: Status,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteEntryResponse {
    pub results: Vec<BatchDeleteEntryResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct X509Certificate {
    /// Base64-encoded ASN.1 DER bytes. Opaque to the gateway.
    #[serde(default)]
    pub asn1: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtKey {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub expires_at: i64,
}

/// A trust bundle for one trust domain. Bundle bytes are opaque here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub trust_domain: String,
    #[serde(default)]
    pub x509_authorities: Vec<X509Certificate>,
    #[serde(default)]
    pub jwt_authorities: Vec<JwtKey>,
    #[serde(default)]
    pub refresh_hint: i64,
    #[serde(default)]
    pub sequence_number: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetBundleRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFederatedBundlesRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFederatedBundlesResponse {
    pub bundles: Vec<Bundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFederatedBundleRequest {
    #[serde(default)]
    pub bundle: Option<Bundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFederatedBundleRequest {
    #[serde(default)]
    pub bundle: Option<Bundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFederatedBundleRequest {
    #[serde(default)]
    pub trust_domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchBundleResult {
    pub status: Status,
    pub bundle: Option<Bundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpsSpiffeProfile {
    #[serde(default)]
    pub endpoint_spiffe_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpsWebProfile {}

/// A configured trust relationship between two trust domains.
///
/// The endpoint profile mirrors the control plane's oneof: exactly one of
/// `https_web` / `https_spiffe` is expected, but the gateway does not
/// enforce that; the control plane owns semantic validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FederationRelationship {
    #[serde(default)]
    pub trust_domain: String,
    #[serde(default)]
    pub bundle_endpoint_url: String,
    #[serde(default)]
    pub https_web: Option<HttpsWebProfile>,
    #[serde(default)]
    pub https_spiffe: Option<HttpsSpiffeProfile>,
    #[serde(default)]
    pub trust_domain_bundle: Option<Bundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFederationRelationshipsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFederationRelationshipsResponse {
    pub federation_relationships: Vec<FederationRelationship>,
}

/// Request shape of the control plane's protobuf batch-create API; decoded
/// from protobuf-JSON rather than plain JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCreateFederationRelationshipRequest {
    #[serde(default)]
    pub federation_relationships: Vec<FederationRelationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateFederationRelationshipRequest {
    #[serde(default)]
    pub federation_relationships: Vec<FederationRelationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFederationRelationshipResult {
    pub status: Status,
    pub federation_relationship: Option<FederationRelationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFederationRelationshipResponse {
    pub results: Vec<BatchFederationRelationshipResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFederationRelationshipRequest {
    #[serde(default)]
    pub trust_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFederationRelationshipResult {
    pub status: Status,
    pub trust_domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFederationRelationshipResponse {
    pub results: Vec<DeleteFederationRelationshipResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthcheckRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthcheckResponse {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SvidInfo {
    #[serde(default)]
    pub id: SpiffeId,
    #[serde(default)]
    pub expires_at: i64,
}

/// Snapshot of the control plane's debug endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugServerInfo {
    #[serde(default)]
    pub svid_chain: Vec<SvidInfo>,
    #[serde(default)]
    pub uptime: i64,
    #[serde(default)]
    pub federated_bundles_count: i32,
}
