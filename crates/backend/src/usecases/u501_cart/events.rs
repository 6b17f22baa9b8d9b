use contracts::usecases::u501_cart::CartChanged;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Publish/subscribe hub for cart changes.
///
/// Publishing never blocks; a subscriber that falls behind misses the oldest events.
/// A second channel announces accounts that lost a session, so open cart streams
/// can check whether their own token is still live.
#[derive(Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartChanged>,
    session_ends: broadcast::Sender<String>,
}

impl CartEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (session_ends, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            session_ends,
        }
    }

    pub fn publish(&self, account_id: &str, item_count: u32) {
        let event = CartChanged {
            account_id: account_id.to_string(),
            item_count,
        };
        // No subscribers is not an error
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::debug!(
            "cart of {} changed ({} items), {} subscriber(s)",
            account_id,
            item_count,
            receivers
        );
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.sender.subscribe()
    }

    /// Announce that one or more sessions of `account_id` were revoked
    pub fn session_ended(&self, account_id: &str) {
        let receivers = self.session_ends.send(account_id.to_string()).unwrap_or(0);
        tracing::debug!("session of {} ended, {} stream(s) notified", account_id, receivers);
    }

    pub fn subscribe_session_ends(&self) -> broadcast::Receiver<String> {
        self.session_ends.subscribe()
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_change() {
        let events = CartEvents::new();
        let mut rx = events.subscribe();
        events.publish("acc-1", 3);
        let got = rx.recv().await.unwrap();
        assert_eq!(got.account_id, "acc-1");
        assert_eq!(got.item_count, 3);
    }

    #[test]
    fn test_publish_without_subscribers() {
        CartEvents::new().publish("acc-1", 0);
        CartEvents::new().session_ended("acc-1");
    }

    #[tokio::test]
    async fn test_session_end_is_separate_from_cart_changes() {
        let events = CartEvents::new();
        let mut changes = events.subscribe();
        let mut ends = events.subscribe_session_ends();
        events.session_ended("acc-1");
        assert_eq!(ends.recv().await.unwrap(), "acc-1");
        assert!(changes.try_recv().is_err());
    }
}
