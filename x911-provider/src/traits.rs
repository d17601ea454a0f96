use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Action, Arguments, ResponseKind, ResponsePayload};

/// Executes back-office actions on behalf of an authenticated account.
///
/// Implementations own everything below the request level: SOAP envelope
/// construction, transport, authentication and retry. They report failures
/// with the executor-side [`X911Error`](crate::X911Error) variants
/// (`NetworkError`, `Timeout`, `InvalidCredentials`, `RemoteFault`,
/// `ParseError`), which the client passes through unchanged.
#[async_trait]
pub trait AccountExecutor: Send + Sync {
    /// Send `action` with `arguments` and return the payload parsed as `response_kind`.
    async fn execute(
        &self,
        action: Action,
        response_kind: ResponseKind,
        arguments: &Arguments,
    ) -> Result<ResponsePayload>;
}

#[async_trait]
impl<E: AccountExecutor + ?Sized> AccountExecutor for Arc<E> {
    async fn execute(
        &self,
        action: Action,
        response_kind: ResponseKind,
        arguments: &Arguments,
    ) -> Result<ResponsePayload> {
        (**self).execute(action, response_kind, arguments).await
    }
}
