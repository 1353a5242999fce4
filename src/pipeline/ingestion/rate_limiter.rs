use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// Fixed-delay pacer for an external service.
///
/// Every [`acquire`](Pacer::acquire) waits the configured delay before handing
/// out a permit, and only one permit exists at a time. Holding the permit for
/// the duration of a request keeps at most one request in flight.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    gate: Mutex<()>,
}

/// Exclusive right to send one request. Dropping it lets the next caller in.
pub type PacerPermit<'a> = MutexGuard<'a, ()>;

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            gate: Mutex::new(()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn acquire(&self) -> PacerPermit<'_> {
        let permit = self.gate.lock().await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        permit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_each_acquire_waits_the_delay() {
        let pacer = Pacer::new(Duration::from_millis(2000));
        let t0 = Instant::now();

        drop(pacer.acquire().await);
        let first = Instant::now();
        drop(pacer.acquire().await);
        let second = Instant::now();

        assert!(first - t0 >= Duration::from_millis(2000));
        assert!(second - first >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permits_are_exclusive() {
        let pacer = Arc::new(Pacer::new(Duration::from_millis(100)));
        let held = pacer.acquire().await;

        let waiter = {
            let pacer = pacer.clone();
            tokio::spawn(async move {
                let _permit = pacer.acquire().await;
                Instant::now()
            })
        };

        tokio::time::sleep(Duration::from_secs(5)).await;
        let released_at = Instant::now();
        drop(held);

        let acquired_at = waiter.await.unwrap();
        assert!(acquired_at - released_at >= Duration::from_millis(100));
    }
}
