//! In-process invalidation bus backed by a `tokio::sync::broadcast` channel.
//!
//! Every reorder or unpin changes the absolute position of some products,
//! which makes any cached listing page containing them stale. The engine
//! publishes one [`ListingEvent`] per affected product; cache layers
//! subscribe and drop the matching entries. It is designed to be shared
//! via `Arc<InvalidationBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use shelf_core::types::DbId;

// ---------------------------------------------------------------------------
// ListingEvent
// ---------------------------------------------------------------------------

/// A product whose listing position changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEvent {
    /// Dot-separated event name, e.g. `"listing.position_changed"`.
    pub event_type: String,

    /// Category whose listing is affected.
    pub category_id: DbId,

    /// Product whose position changed.
    pub product_id: DbId,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ListingEvent {
    /// A product moved to a different position in a category listing.
    pub fn position_changed(category_id: DbId, product_id: DbId) -> Self {
        Self {
            event_type: "listing.position_changed".into(),
            category_id,
            product_id,
            timestamp: Utc::now(),
        }
    }

    /// A product lost its pinned slot and fell back to the default order.
    pub fn unpinned(category_id: DbId, product_id: DbId) -> Self {
        Self {
            event_type: "listing.unpinned".into(),
            category_id,
            product_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// InvalidationBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for [`ListingEvent`]s.
pub struct InvalidationBus {
    sender: broadcast::Sender<ListingEvent>,
}

impl InvalidationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// with no cache attached there is nothing to invalidate.
    pub fn publish(&self, event: ListingEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ListingEvent> {
        self.sender.subscribe()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
