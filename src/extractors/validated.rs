//! JSON body checked against an entity shape before the handler runs.

use crate::error::AppError;
use crate::model::{Entity, ValidationErrors};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

/// Extractor for a request body that conforms to `T`. Rejects with 422.
#[derive(Clone, Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Entity,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;
        let record = T::validate(&raw)?;
        Ok(ValidatedJson(record))
    }
}
