//! Inbound message dispatch
//!
//! A dispatcher holds at most one handler. Events arriving before
//! registration are dropped.

use crate::errors::{BridgeError, Result};
use crate::protocol::InboundEvent;
use tracing::debug;

/// Receives inbound events, valid or not
#[allow(async_fn_in_trait)]
pub trait MessageHandler {
    type Outcome;

    async fn handle(&self, event: InboundEvent) -> Self::Outcome;
}

pub struct Dispatcher<H> {
    handler: Option<H>,
}

impl<H> Default for Dispatcher<H> {
    fn default() -> Self {
        Self { handler: None }
    }
}

impl<H: MessageHandler> Dispatcher<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler
    ///
    /// # Errors
    ///
    /// Returns error if a handler is already registered
    pub fn register(&mut self, handler: H) -> Result<()> {
        if self.handler.is_some() {
            return Err(BridgeError::AlreadyRegistered);
        }
        self.handler = Some(handler);
        Ok(())
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Hands the event to the registered handler
    pub async fn dispatch(&self, event: InboundEvent) -> Option<H::Outcome> {
        let Some(handler) = &self.handler else {
            debug!(origin = %event.origin, "no handler registered, dropping message");
            return None;
        };
        Some(handler.handle(event).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct Counter {
        seen: Cell<usize>,
    }

    impl MessageHandler for Counter {
        type Outcome = usize;

        async fn handle(&self, _event: InboundEvent) -> usize {
            self.seen.set(self.seen.get() + 1);
            self.seen.get()
        }
    }

    #[tokio::test]
    async fn test_register_once_and_dispatch() {
        let mut dispatcher = Dispatcher::new();
        let event = InboundEvent::new("http://localhost:5173", json!({}));
        assert_eq!(dispatcher.dispatch(event.clone()).await, None);

        dispatcher
            .register(Counter { seen: Cell::new(0) })
            .unwrap();
        assert!(matches!(
            dispatcher.register(Counter { seen: Cell::new(0) }),
            Err(BridgeError::AlreadyRegistered)
        ));

        assert_eq!(dispatcher.dispatch(event.clone()).await, Some(1));
        assert_eq!(dispatcher.dispatch(event).await, Some(2));
    }
}
