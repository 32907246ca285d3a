use crate::core::command::registry::RemoteOperation;
use crate::core::results::RemoteResponse;
use crate::domain::error::HavocResult;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Request/response access to the control plane
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Invoke `operation` with named parameters.
    ///
    /// Failures the service reports in its response body are returned as
    /// ordinary responses. `Err` is reserved for requests that produced no
    /// usable response.
    async fn call(
        &self,
        operation: RemoteOperation,
        params: Map<String, Value>,
    ) -> HavocResult<RemoteResponse>;
}
