//! In-process [`TestableResource`] over a mutex-guarded resource.

use async_trait::async_trait;
use plugtest_core::{PlugtestResource, Request, ResourceState, Response, MAX_PLUGTEST_PAYLOAD};
use tokio::sync::Mutex;

use crate::traits::{ConformanceResult, TestableResource};

/// A [`PlugtestResource`] behind one lock, so every exchange is a single
/// critical section over the whole state.
pub struct LocalResource {
    inner: Mutex<PlugtestResource>,
    capacity: usize,
}

impl LocalResource {
    pub fn new() -> Self {
        Self::from_resource(PlugtestResource::new())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_resource(PlugtestResource::seeded(seed))
    }

    pub fn from_resource(resource: PlugtestResource) -> Self {
        Self {
            inner: Mutex::new(resource),
            capacity: MAX_PLUGTEST_PAYLOAD,
        }
    }

    /// Payload buffer capacity handed to each response.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Snapshot of the current tag store.
    pub async fn state(&self) -> ResourceState {
        self.inner.lock().await.state().clone()
    }
}

impl Default for LocalResource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestableResource for LocalResource {
    async fn exchange(&self, request: &Request) -> ConformanceResult<Response> {
        let mut resource = self.inner.lock().await;
        Ok(resource.process(request, self.capacity))
    }
}
