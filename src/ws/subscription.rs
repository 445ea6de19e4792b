//! Per-connection subscription manager.
//!
//! Tracks which panel topics a UI WebSocket client wants and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::Topic;

/// Manages the set of topic subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    topics: HashSet<Topic>,
}

impl SubscriptionManager {
    /// Creates a manager subscribed to every topic, the state of a fresh
    /// UI connection.
    #[must_use]
    pub fn all() -> Self {
        Self {
            topics: Topic::ALL.into_iter().collect(),
        }
    }

    /// Adds topics to the subscription set.
    pub fn subscribe(&mut self, topics: &[Topic]) {
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics from the subscription set.
    pub fn unsubscribe(&mut self, topics: &[Topic]) {
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if events of `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// Returns the subscribed topics in a stable order.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        Topic::ALL
            .into_iter()
            .filter(|topic| self.topics.contains(topic))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::default();
        assert!(!mgr.matches(Topic::Log));
    }

    #[test]
    fn all_matches_everything() {
        let mgr = SubscriptionManager::all();
        for topic in Topic::ALL {
            assert!(mgr.matches(topic));
        }
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::all();
        mgr.unsubscribe(&[Topic::Webcam]);
        assert!(!mgr.matches(Topic::Webcam));
        assert!(mgr.matches(Topic::Log));
        assert_eq!(
            mgr.topics(),
            vec![Topic::Log, Topic::Step, Topic::Connection]
        );
    }

    #[test]
    fn subscribe_adds_topic() {
        let mut mgr = SubscriptionManager::default();
        mgr.subscribe(&[Topic::Log, Topic::Log]);
        assert_eq!(mgr.topics(), vec![Topic::Log]);
    }
}
