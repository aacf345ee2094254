use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// JSON body extractor that treats an empty body, or a literal `null`, as `{}`.
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header and does
/// not check the shape of the document: only bytes that are not JSON at all
/// are rejected, as [`AppError::MalformedInput`]. Handlers inspect the value
/// themselves once their own preconditions hold.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::malformed(e.body_text()))?;

        if bytes.is_empty() {
            return Ok(JsonBody(Value::Object(Map::new())));
        }

        match serde_json::from_slice(&bytes) {
            Ok(Value::Null) => Ok(JsonBody(Value::Object(Map::new()))),
            Ok(value) => Ok(JsonBody(value)),
            Err(e) => Err(AppError::malformed(e.to_string())),
        }
    }
}
