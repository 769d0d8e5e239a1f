//! Client events and subscriptions

use crate::error::Result;
use crate::gateway::Gateway;

/// Handle returned by [`Client::subscribe`](crate::Client::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u32);

/// Events published to subscribers
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ClientEvent {
    /// A gateway announced itself for the first time. Carries a snapshot
    /// of the gateway as it was inserted into the registry.
    NewGateway(Gateway),
}

/// Observer for client events
///
/// Handlers run synchronously, in subscription order, on the thread
/// dispatching the triggering message. An error aborts processing of
/// that message and propagates to the `handle_message` caller.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &ClientEvent) -> Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(&ClientEvent) -> Result<()> + Send + Sync,
{
    fn on_event(&self, event: &ClientEvent) -> Result<()> {
        self(event)
    }
}
