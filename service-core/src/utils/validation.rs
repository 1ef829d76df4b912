use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// JSON body extractor that also runs `validator` rules.
///
/// The body is parsed whatever the `Content-Type` says. Malformed JSON,
/// missing fields and failed rules all reject with a 400 envelope before the
/// handler runs.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e.body_text()))
        })?;

        let value: T = serde_json::from_slice(&body).map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e))
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(custom(function = "not_blank"))]
        name: String,
    }

    async fn extract(body: &'static str) -> Result<Probe, AppError> {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        ValidatedJson::<Probe>::from_request(req, &())
            .await
            .map(|ValidatedJson(p)| p)
    }

    #[tokio::test]
    async fn parses_without_content_type() {
        let probe = extract(r#"{"name":"apple"}"#).await.expect("valid body");
        assert_eq!(probe.name, "apple");
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let err = extract("{}").await.expect_err("name is required");
        assert!(err.to_string().contains("missing field `name`"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = extract("{not json").await.expect_err("broken JSON");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_value_fails_validation() {
        let err = extract(r#"{"name":"   "}"#).await.expect_err("blank name");
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_blank_accepts_text() {
        assert!(not_blank("banana").is_ok());
        assert!(not_blank("").is_err());
    }
}
