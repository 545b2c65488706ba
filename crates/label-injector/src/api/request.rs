use axum::http::{header, HeaderMap};

use crate::admission_review::AdmissionReviewRequest;
use crate::errors::{AdmissionError, Result};

/// Decodes the AdmissionReview carried by an HTTP request.
///
/// The media type must be `application/json`, parameters such as `charset`
/// are ignored.
pub(crate) fn admission_review_from_request(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<AdmissionReviewRequest> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    let media_type: mime::Mime = content_type
        .parse()
        .map_err(|_| AdmissionError::UnsupportedMediaType(content_type.clone()))?;
    if media_type.essence_str() != mime::APPLICATION_JSON.essence_str() {
        return Err(AdmissionError::UnsupportedMediaType(content_type));
    }

    serde_json::from_slice(body).map_err(|e| AdmissionError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::*;

    const REVIEW: &str = r#"{
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "abc",
            "kind": {"group": "", "version": "v1", "kind": "Pod"},
            "resource": {"group": "", "version": "v1", "resource": "pods"},
            "operation": "CREATE",
            "userInfo": {"username": "jane"},
            "object": {"metadata": {}}
        }
    }"#;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }

    #[rstest]
    #[case::plain("application/json")]
    #[case::with_charset("application/json; charset=utf-8")]
    fn accepted_media_types(#[case] content_type: &'static str) {
        let review =
            admission_review_from_request(&headers(Some(content_type)), REVIEW.as_bytes()).unwrap();

        assert_eq!(review.request.uid, "abc");
        assert_eq!(review.request.requester_identity(), "jane");
        assert_eq!(review.request.requested_resource(), "pods");
    }

    #[rstest]
    #[case::missing(None)]
    #[case::text(Some("text/plain"))]
    #[case::yaml(Some("application/yaml"))]
    #[case::garbage(Some("not a media type"))]
    fn rejected_media_types(#[case] content_type: Option<&'static str>) {
        let error =
            admission_review_from_request(&headers(content_type), REVIEW.as_bytes()).unwrap_err();
        assert!(matches!(error, AdmissionError::UnsupportedMediaType(_)));
    }

    #[rstest]
    #[case::empty_body("")]
    #[case::invalid_json("{")]
    #[case::empty_object("{}")]
    #[case::missing_uid(r#"{"request": {"kind": {"version": "v1", "kind": "Pod"}, "resource": {"version": "v1", "resource": "pods"}, "operation": "CREATE"}}"#)]
    #[case::missing_resource(r#"{"request": {"uid": "abc", "kind": {"version": "v1", "kind": "Pod"}, "operation": "CREATE"}}"#)]
    fn undecodable_bodies(#[case] body: &str) {
        let error =
            admission_review_from_request(&headers(Some("application/json")), body.as_bytes())
                .unwrap_err();
        assert!(matches!(error, AdmissionError::Decode(_)));
        assert!(error.is_input_error());
    }
}
