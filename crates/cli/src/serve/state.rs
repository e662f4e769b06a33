//! Application state shared across request handlers.

use std::sync::atomic::{AtomicU16, Ordering};

use tokio::sync::Mutex;

use plugtest_core::PlugtestResource;

pub(crate) struct AppState {
    /// The resource and its tag store. Every exchange holds this lock for
    /// the whole read-modify-write.
    pub(crate) resource: Mutex<PlugtestResource>,
    /// Response payload buffer capacity handed to the resource.
    pub(crate) payload_limit: usize,
    /// Message IDs assigned to requests that carry no `X-CoAP-MID`.
    next_mid: AtomicU16,
}

impl AppState {
    pub(crate) fn new(resource: PlugtestResource, payload_limit: usize) -> Self {
        Self {
            resource: Mutex::new(resource),
            payload_limit,
            next_mid: AtomicU16::new(1),
        }
    }

    /// Next server-assigned message ID. Wraps at `u16::MAX`.
    pub(crate) fn assign_mid(&self) -> u16 {
        self.next_mid.fetch_add(1, Ordering::Relaxed)
    }
}
