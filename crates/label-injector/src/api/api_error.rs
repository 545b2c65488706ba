use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::errors::AdmissionError;

#[derive(Debug)]
/// An error that can be returned by the API
/// and will be converted into a JSON response.
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl From<AdmissionError> for ApiError {
    fn from(error: AdmissionError) -> Self {
        let status = if error.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let payload = json!({
            "message": self.message,
            "status": self.status.as_u16(),
        });

        (self.status, axum::Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    #[rstest]
    #[case::media_type(
        AdmissionError::UnsupportedMediaType("text/plain".to_owned()),
        StatusCode::BAD_REQUEST
    )]
    #[case::decode(AdmissionError::Decode("eof".to_owned()), StatusCode::BAD_REQUEST)]
    #[case::serialization(
        AdmissionError::Serialization("key must be a string".to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    async fn admission_errors_to_response(
        #[case] error: AdmissionError,
        #[case] expected_status: StatusCode,
    ) {
        let message = error.to_string();

        let (status, body) = body_json(ApiError::from(error)).await;

        assert_eq!(status, expected_status);
        assert_eq!(
            body,
            serde_json::json!({"message": message, "status": expected_status.as_u16()})
        );
    }
}
