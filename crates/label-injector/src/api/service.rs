use tracing::{debug, info};

use crate::{
    admission_review::{AdmissionResponse, AdmissionReviewRequest, AdmissionReviewResponse},
    api::state::ApiServerState,
    errors::{AdmissionError, Result},
    mutation::{decide, MutationDecision, Patch},
};

/// Runs a decoded admission review through the decision and the patch
/// builder, returning the response to send back.
pub(crate) fn mutate(
    state: &ApiServerState,
    review: &AdmissionReviewRequest,
) -> Result<(AdmissionReviewResponse, MutationDecision)> {
    let request = &review.request;
    let identity = request.requester_identity();

    let decision = decide(state.principal_matcher.as_ref(), identity);
    if decision == MutationDecision::Bypass {
        info!(
            username = identity,
            "ignoring admission review request because it came from a system user"
        );
        return Ok((assemble(review, decision, None)?, decision));
    }

    let object = match &request.object {
        Some(object) if !object.is_null() => object,
        _ => {
            debug!(
                operation = request.operation.as_str(),
                "no object under review, nothing to mutate"
            );
            return Ok((assemble(review, decision, None)?, decision));
        }
    };

    let strategy = state.strategies.lookup(request.requested_resource());
    let view = strategy.view(object);
    if view.has_template_labels() {
        debug!("object carries a pod template, labels are propagated to spec.template");
    }
    let patch = strategy.build(&view, &state.metadata);
    debug!(
        strategy = strategy.name(),
        operations = patch.len(),
        "patch assembled"
    );

    Ok((assemble(review, decision, Some(&patch))?, decision))
}

/// Builds the AdmissionReview response correlated with `review`.
///
/// The request is always allowed, the patch is attached only when the
/// decision was to mutate and the patch is not empty.
pub(crate) fn assemble(
    review: &AdmissionReviewRequest,
    decision: MutationDecision,
    patch: Option<&Patch>,
) -> Result<AdmissionReviewResponse> {
    let uid = review.request.uid.clone();
    let response = match (decision, patch) {
        (MutationDecision::Mutate, Some(patch)) => AdmissionResponse::allow_with_patch(uid, patch)
            .map_err(|e| AdmissionError::Serialization(e.to_string()))?,
        _ => AdmissionResponse::allow(uid),
    };

    Ok(AdmissionReviewResponse::new(review, response))
}
