//! Extractors whose rejections come back as `{"error": ...}` like every other
//! failure, instead of axum's plain-text bodies.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ServerError;
use crate::store::parse_id;

/// The `{id}` path segment, parsed as a UUID.
pub struct ResourceId(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for ResourceId {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        parse_id(&raw, "id").map(ResourceId)
    }
}

pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListParams;
    use axum::http::Request as HttpRequest;

    fn parts(uri: &str) -> Parts {
        HttpRequest::get(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn query_rejection_is_a_validation_error() {
        let mut parts = parts("/api/tools?limit=ten");
        let err = ApiQuery::<ListParams>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServerError::Validation(_)), "{err:?}");
        assert!(err.to_string().starts_with("validation failed: "), "{err}");
    }

    #[tokio::test]
    async fn query_params_pass_through() {
        let mut parts = parts("/api/tools?limit=5&status=LOST");
        let ApiQuery(params) = ApiQuery::<ListParams>::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.status.as_deref(), Some("LOST"));
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_error() {
        let req = HttpRequest::post("/api/tools")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let err = ApiJson::<serde_json::Value>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServerError::Validation(_)), "{err:?}");
    }
}
