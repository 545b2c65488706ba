use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::mutation::Patch;

pub const ADMISSION_REVIEW_API_VERSION: &str = "admission.k8s.io/v1";
pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionResource {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub resource: String,
}

/// The AdmissionReview envelope sent by the API server
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub request: AdmissionRequest,
}

/// This models the admission/v1/AdmissionRequest object of Kubernetes.
/// Only the fields this webhook looks at are kept.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    /// Correlates the response with this request, must be echoed back.
    pub uid: String,
    pub kind: GroupVersionKind,
    pub resource: GroupVersionResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub operation: String,
    #[serde(default)]
    pub user_info: k8s_openapi::api::authentication::v1::UserInfo,
    /// `None` for DELETE operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl AdmissionRequest {
    /// Username of the principal that triggered the operation
    pub fn requester_identity(&self) -> &str {
        self.user_info.username.as_deref().unwrap_or_default()
    }

    /// Plural resource name, e.g. `deployments`
    pub fn requested_resource(&self) -> &str {
        &self.resource.resource
    }
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

/// This models the admission/v1/AdmissionResponse object of Kubernetes
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// Copied over from the corresponding AdmissionRequest.
    pub uid: String,

    /// Always true, this webhook never rejects objects.
    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// Base64 encoded JSON patch, as expected by Kubernetes for `[]byte`
    /// fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

impl AdmissionResponse {
    pub fn allow(uid: String) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: true,
            ..Default::default()
        }
    }

    /// Allows the request, attaching `patch` unless it is empty.
    pub fn allow_with_patch(uid: String, patch: &Patch) -> serde_json::Result<AdmissionResponse> {
        if patch.is_empty() {
            return Ok(AdmissionResponse::allow(uid));
        }

        let patch = general_purpose::STANDARD.encode(patch.to_json()?);
        Ok(AdmissionResponse {
            uid,
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(patch),
        })
    }

    /// Decodes the patch carried by the response.
    ///
    /// Nothing on the request path needs it, it is there to inspect
    /// responses in tests and when debugging a webhook configuration.
    pub fn decoded_patch(&self) -> Option<Vec<u8>> {
        self.patch
            .as_ref()
            .and_then(|p| general_purpose::STANDARD.decode(p).ok())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub response: AdmissionResponse,
}

impl AdmissionReviewResponse {
    /// Wraps `response`, echoing the schema version of the inbound envelope.
    pub fn new(review: &AdmissionReviewRequest, response: AdmissionResponse) -> Self {
        AdmissionReviewResponse {
            api_version: Some(
                review
                    .api_version
                    .clone()
                    .unwrap_or_else(|| ADMISSION_REVIEW_API_VERSION.to_owned()),
            ),
            kind: Some(
                review
                    .kind
                    .clone()
                    .unwrap_or_else(|| ADMISSION_REVIEW_KIND.to_owned()),
            ),
            response,
        }
    }
}
