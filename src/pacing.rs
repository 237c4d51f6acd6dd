use std::time::Duration;

use async_trait::async_trait;

/// Spacing between successful calls to the translation service.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed interval after every call.
pub struct FixedInterval {
    pub interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Pacer for FixedInterval {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}
