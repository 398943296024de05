/**
 * Request Extractors
 *
 * `ValidJson<T>` parses a JSON body and runs `T::validate`, so handlers only
 * see checked input. Malformed JSON keeps axum's status and rejection text.
 */

use axum::{
    extract::{FromRequest, Request},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;
use crate::shared::Validate;

/// A JSON body that passed validation
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            BackendError::handler(rejection.status(), rejection.body_text())
        })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// `User-Agent` of the request, if present and printable
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::handlers::types::LoginRequest;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let req = json_request(r#"{"email":"a@example.com","password":"secret1"}"#);
        let ValidJson(body) = ValidJson::<LoginRequest>::from_request(req, &()).await.unwrap();
        assert_eq!(body.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_invalid_body_is_400() {
        let req = json_request(r#"{"email":"nope","password":"secret1"}"#);
        let err = ValidJson::<LoginRequest>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_keeps_rejection_status() {
        let req = json_request("{not json");
        let err = ValidJson::<LoginRequest>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let err = ValidJson::<LoginRequest>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_user_agent() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_agent(&headers), None);
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        assert_eq!(user_agent(&headers).as_deref(), Some("curl/8.0"));
    }
}
