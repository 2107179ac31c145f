use super::connection::Connection;
use std::fmt;

/// A change notification published by the graph after a mutation has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    BlockAdded(String),
    BlockUpdated(String),
    BlockRemoved(String),
    SelectBlock(String),
    ConnectionCreated(Connection),
    ConnectionDeleted(Connection),
}

impl GraphEvent {
    /// The wire name a rendering layer subscribes to.
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::BlockAdded(_) => "blockAdded",
            GraphEvent::BlockUpdated(_) => "blockUpdated",
            GraphEvent::BlockRemoved(_) => "blockRemoved",
            GraphEvent::SelectBlock(_) => "selectBlock",
            GraphEvent::ConnectionCreated(_) => "connectionCreated",
            GraphEvent::ConnectionDeleted(_) => "connectionDeleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&GraphEvent) + Send>;

/// A synchronous callback list. Subscribers run in subscription order, on the
/// caller's thread, before the mutating call returns.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &GraphEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }

    pub fn publish_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = GraphEvent>,
    {
        for event in events {
            self.publish(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
