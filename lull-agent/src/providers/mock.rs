// ABOUTME: Mock invoker for testing - returns pre-configured replies.
// ABOUTME: Allows deterministic tests without network access or real providers.
//!
//! # Example
//!
//! ```no_run
//! use lull_agent::providers::mock::MockInvoker;
//!
//! let mock = MockInvoker::new()
//!     .on_message("hello").reply_text("Hi there!")
//!     .on_message("handoff").reply_transfer("Connecting you to a human.");
//! ```

use crate::config::AgentDefinition;
use crate::registry::InvokerFactory;
use crate::reply::{AgentReply, InvokeRequest};
use crate::traits::AgentInvoker;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock invoker for testing
pub struct MockInvoker {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

struct Expectation {
    pattern: String,
    outcome: Outcome,
}

enum Outcome {
    Reply { text: String, transfer: bool },
    Error(String),
}

impl MockInvoker {
    /// Create a new mock invoker with no expectations
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Set up an expectation for a message containing the given pattern
    pub fn on_message(self, pattern: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            invoker: self,
            pattern: pattern.to_string(),
        }
    }

    /// Factory function for the registry
    pub fn factory() -> InvokerFactory {
        Box::new(|_config| Ok(Arc::new(MockInvoker::new())))
    }
}

impl Default for MockInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentInvoker for MockInvoker {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn invoke<'a>(
        &'a self,
        agent: &'a AgentDefinition,
        request: InvokeRequest,
    ) -> BoxFuture<'a, Result<AgentReply>> {
        Box::pin(async move {
            // FIFO preference: check the front first, fall back to searching
            // the queue so out-of-order messages still find their match.
            let outcome = {
                let mut exp = self.expectations.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(front) = exp.front() {
                    if request.text.contains(&front.pattern) {
                        exp.pop_front().map(|e| e.outcome)
                    } else {
                        exp.iter()
                            .position(|e| request.text.contains(&e.pattern))
                            .and_then(|i| exp.remove(i))
                            .map(|e| e.outcome)
                    }
                } else {
                    None
                }
            };

            match outcome {
                Some(Outcome::Reply { text, transfer }) => {
                    let mut reply = AgentReply::from_text(text, &agent.id, &request);
                    reply.transfer = transfer;
                    Ok(reply)
                }
                Some(Outcome::Error(message)) => Err(anyhow!(message)),
                None => Ok(AgentReply::from_text(
                    format!("Mock: no expectation for '{}'", request.text),
                    &agent.id,
                    &request,
                )),
            }
        })
    }
}

/// Builder for setting up mock expectations with a fluent API
pub struct ExpectationBuilder {
    invoker: MockInvoker,
    pattern: String,
}

impl ExpectationBuilder {
    fn push(self, outcome: Outcome) -> MockInvoker {
        self.invoker
            .expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Expectation {
                pattern: self.pattern,
                outcome,
            });
        self.invoker
    }

    /// Reply with a simple text message
    pub fn reply_text(self, text: &str) -> MockInvoker {
        self.push(Outcome::Reply {
            text: text.to_string(),
            transfer: false,
        })
    }

    /// Reply with text and the transfer flag set
    pub fn reply_transfer(self, text: &str) -> MockInvoker {
        self.push(Outcome::Reply {
            text: text.to_string(),
            transfer: true,
        })
    }

    /// Fail the invocation with an error
    pub fn reply_error(self, message: &str) -> MockInvoker {
        self.push(Outcome::Error(message.to_string()))
    }
}
