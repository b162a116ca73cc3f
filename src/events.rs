// src/events.rs

//! A small in-process pub/sub mechanism: named events, ordered subscriber
//! lists, synchronous publishing.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventsError {
    #[error("no such subscriber for event '{event}'")]
    UnknownSubscriber { event: String },
}

/// Token identifying one subscription, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler<P, R> = Box<dyn Fn(&str, &P) -> R>;

/// An event bus over payloads of type `P`, with handlers returning `R`.
///
/// Handlers for an event run in subscription order; publishing to an event
/// with no subscribers is a no-op that returns no results.
pub struct EventBus<P, R = ()> {
    next_id: u64,
    subscribers: HashMap<String, Vec<(SubscriberId, Handler<P, R>)>>,
}

impl<P, R> Default for EventBus<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> EventBus<P, R> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: HashMap::new(),
        }
    }

    /// Subscribe a handler to `event`; the returned id removes it again.
    pub fn add(&mut self, event: &str, handler: impl Fn(&str, &P) -> R + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(event.to_string())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Unsubscribe; fails when `id` was never subscribed to `event` (e.g.
    /// removing twice), which signals a logic error in the caller.
    pub fn remove(&mut self, event: &str, id: SubscriberId) -> Result<(), EventsError> {
        let handlers = self
            .subscribers
            .get_mut(event)
            .ok_or_else(|| EventsError::UnknownSubscriber {
                event: event.to_string(),
            })?;
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        if handlers.len() == before {
            return Err(EventsError::UnknownSubscriber {
                event: event.to_string(),
            });
        }
        Ok(())
    }

    /// Ids currently subscribed to `event`, in invocation order.
    pub fn subscribers(&self, event: &str) -> Vec<SubscriberId> {
        self.subscribers
            .get(event)
            .map(|handlers| handlers.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    /// Publish `payload` to every subscriber of `event`, collecting their
    /// results in invocation order.
    pub fn publish(&self, event: &str, payload: &P) -> Vec<R> {
        let handlers = match self.subscribers.get(event) {
            Some(handlers) => handlers,
            None => {
                debug!(event, "publish with no subscribers");
                return Vec::new();
            }
        };
        handlers
            .iter()
            .map(|(_, handler)| handler(event, payload))
            .collect()
    }
}
