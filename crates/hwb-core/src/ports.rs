use async_trait::async_trait;
use serde_json::Value;

use crate::{domain::Cursor, errors::FetchError};

/// Hexagonal port for the homework review API.
///
/// Implementations return the decoded payload as-is; shape checks live in
/// [`crate::response`].
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from: Cursor) -> Result<Value, FetchError>;
}
