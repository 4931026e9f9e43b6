// ABOUTME: Core AgentInvoker trait that all providers implement.
// ABOUTME: One capability interface; callers never branch on provider identity.

use crate::config::AgentDefinition;
use crate::reply::{AgentReply, InvokeRequest};
use anyhow::Result;
use futures::future::BoxFuture;

/// Core trait that all agent providers implement.
///
/// An invoker turns one user message into one [`AgentReply`] using the
/// agent's configuration. Implementations are expected to be cheap to clone
/// behind an `Arc` and safe to call concurrently.
pub trait AgentInvoker: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Run one completion for `request` against `agent`'s model.
    ///
    /// Errors are transient provider failures (network, auth, rate limit);
    /// the caller substitutes a fallback reply and continues.
    fn invoke<'a>(
        &'a self,
        agent: &'a AgentDefinition,
        request: InvokeRequest,
    ) -> BoxFuture<'a, Result<AgentReply>>;
}
