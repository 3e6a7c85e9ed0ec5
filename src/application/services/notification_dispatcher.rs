//! Notification Dispatcher - Routes host notifications to registered handlers
//!
//! Handlers are registered explicitly and identified by a `SubscriptionId`
//! so they can be removed later. Two kinds of registration exist:
//! - persistent subscriptions, fired for every notification of a kind
//! - one-shot subscriptions, scoped to a single character and carrying a
//!   deadline; they fire at most once, before any persistent handler
//!
//! Handler failures are logged and never reach the host pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::application::errors::WardError;
use crate::domain::events::{Notification, NotificationKind};
use crate::domain::value_objects::{CharacterId, SubscriptionId};

#[async_trait]
pub trait NotificationHandler: Send + Sync {
    /// React to a notification, possibly rewriting its payload
    async fn handle(
        &self,
        notification: &mut Notification,
        dispatcher: &NotificationDispatcher,
    ) -> Result<(), WardError>;

    /// Called when a one-shot subscription reaches its deadline unfired
    async fn expired(&self) {}
}

struct Subscription {
    id: SubscriptionId,
    kind: NotificationKind,
    scope: Option<CharacterId>,
    once: bool,
    expires_at: Option<Instant>,
    handler: Arc<dyn NotificationHandler>,
}

impl Subscription {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }

    fn matches(&self, kind: NotificationKind, subject: CharacterId) -> bool {
        self.kind == kind && self.scope.map_or(true, |scope| scope == subject)
    }
}

/// Registry of notification handlers
#[derive(Default)]
pub struct NotificationDispatcher {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every notification of `kind`
    pub async fn subscribe(
        &self,
        kind: NotificationKind,
        handler: Arc<dyn NotificationHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscriptions.lock().await.push(Subscription {
            id,
            kind,
            scope: None,
            once: false,
            expires_at: None,
            handler,
        });
        debug!(subscription_id = %id, ?kind, "Registered notification handler");
        id
    }

    /// Register a handler for the next notification of `kind` about `scope`
    ///
    /// The subscription is dropped after firing once or after `ttl`,
    /// whichever comes first.
    pub async fn subscribe_once(
        &self,
        kind: NotificationKind,
        scope: CharacterId,
        ttl: Duration,
        handler: Arc<dyn NotificationHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscriptions.lock().await.push(Subscription {
            id,
            kind,
            scope: Some(scope),
            once: true,
            expires_at: Some(Instant::now() + ttl),
            handler,
        });
        debug!(subscription_id = %id, ?kind, %scope, ?ttl, "Registered one-shot handler");
        id
    }

    /// Remove a subscription; false when it already fired or expired
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock().await;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        before != subscriptions.len()
    }

    pub async fn subscription_count(&self) -> usize {
        self.subscriptions.lock().await.len()
    }

    pub async fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.lock().await.iter().any(|s| s.id == id)
    }

    /// Deliver a notification to every matching handler
    ///
    /// Scoped one-shot handlers run first and are deregistered before they
    /// fire. Returns the number of handlers invoked.
    pub async fn dispatch(&self, notification: &mut Notification) -> usize {
        let kind = notification.kind();
        let subject = notification.subject();

        let (expired, handlers) = {
            let mut subscriptions = self.subscriptions.lock().await;
            let expired = Self::take_expired(&mut subscriptions, Instant::now());

            let mut once = Vec::new();
            let mut persistent = Vec::new();
            let mut index = 0;
            while index < subscriptions.len() {
                let subscription = &subscriptions[index];
                if !subscription.matches(kind, subject) {
                    index += 1;
                    continue;
                }
                if subscription.once {
                    once.push(subscriptions.remove(index).handler);
                } else {
                    persistent.push(subscription.handler.clone());
                    index += 1;
                }
            }
            once.extend(persistent);
            (expired, once)
        };

        for handler in expired {
            handler.expired().await;
        }

        let count = handlers.len();
        for handler in handlers {
            if let Err(e) = handler.handle(notification, self).await {
                error!(?kind, %subject, "Notification handler failed: {}", e);
            }
        }
        count
    }

    /// Drop one-shot subscriptions past their deadline
    pub async fn sweep_expired(&self) -> usize {
        let expired = {
            let mut subscriptions = self.subscriptions.lock().await;
            Self::take_expired(&mut subscriptions, Instant::now())
        };
        let count = expired.len();
        for handler in expired {
            handler.expired().await;
        }
        if count > 0 {
            info!("Expired {} one-shot subscription(s)", count);
        }
        count
    }

    fn take_expired(
        subscriptions: &mut Vec<Subscription>,
        now: Instant,
    ) -> Vec<Arc<dyn NotificationHandler>> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(subscriptions)
            .into_iter()
            .partition(|s| s.is_expired(now));
        *subscriptions = kept;
        expired.into_iter().map(|s| s.handler).collect()
    }
}
