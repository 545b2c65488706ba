use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, warn, Span};

use crate::{
    admission_review::AdmissionRequest,
    api::{
        api_error::ApiError, request::admission_review_from_request, service::mutate,
        state::ApiServerState,
    },
    errors::AdmissionError,
    mutation::MutationDecision,
};

#[tracing::instrument(
    name = "mutation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        name=tracing::field::Empty,
        namespace=tracing::field::Empty,
        operation=tracing::field::Empty,
        username=tracing::field::Empty,
        kind=tracing::field::Empty,
        resource=tracing::field::Empty,
        dry_run=tracing::field::Empty,
        bypassed=tracing::field::Empty,
        mutated=tracing::field::Empty,
    ),
    skip_all)]
/// Mutate the object carried by an AdmissionReview
pub(crate) async fn mutate_handler(
    State(state): State<Arc<ApiServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let review = admission_review_from_request(&headers, &body).map_err(|e| {
        warn!(error = %e, "error getting admission review from request");
        ApiError::from(e)
    })?;

    populate_span_with_admission_request_data(&review.request);

    let (response, decision) = mutate(&state, &review).map_err(handle_admission_error)?;

    Span::current().record("bypassed", decision == MutationDecision::Bypass);
    Span::current().record("mutated", response.response.patch.is_some());

    let payload = serde_json::to_vec(&response)
        .map_err(|e| handle_admission_error(AdmissionError::Serialization(e.to_string())))?;
    debug!(response = ?response, "admission review processed");

    Ok((
        [(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
        payload,
    )
        .into_response())
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("kind", adm_req.kind.kind.as_str());
    Span::current().record("resource", adm_req.resource.resource.as_str());
    Span::current().record("name", adm_req.name.clone().unwrap_or_default().as_str());
    Span::current().record(
        "namespace",
        adm_req.namespace.clone().unwrap_or_default().as_str(),
    );
    Span::current().record("operation", adm_req.operation.as_str());
    Span::current().record("username", adm_req.requester_identity());
    Span::current().record("dry_run", adm_req.dry_run.unwrap_or_default());
}

fn handle_admission_error(error: AdmissionError) -> ApiError {
    if !error.is_input_error() {
        error!("Admission error: {}", error);
    }
    ApiError::from(error)
}
