//! Randomized pauses between recipient sends.
//!
//! Both the random source and the sleep are injected so tests can run
//! deterministically without waiting on the clock.

use crate::domain::ports::{DelaySampler, Sleeper};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_MIN_DELAY_MS: u64 = 10;
pub const DEFAULT_MAX_DELAY_MS: u64 = 750;

/// Closed interval the pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub min: Duration,
    pub max: Duration,
}

impl PacingPolicy {
    /// Bounds are swapped if given in the wrong order.
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    pub fn contains(&self, delay: Duration) -> bool {
        delay >= self.min && delay <= self.max
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MIN_DELAY_MS, DEFAULT_MAX_DELAY_MS)
    }
}

/// Uniform whole-millisecond delays from a seedable RNG.
pub struct RandomDelay {
    rng: Mutex<StdRng>,
}

impl RandomDelay {
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DelaySampler for RandomDelay {
    fn sample(&self, min: Duration, max: Duration) -> Duration {
        let lo = min.as_millis() as u64;
        let hi = max.as_millis() as u64;
        if lo >= hi {
            return Duration::from_millis(lo);
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Clone)]
pub struct Pacer {
    policy: PacingPolicy,
    sampler: Arc<dyn DelaySampler>,
    sleeper: Arc<dyn Sleeper>,
}

impl Pacer {
    pub fn new(policy: PacingPolicy) -> Self {
        Self::with_parts(
            policy,
            Arc::new(RandomDelay::from_os_rng()),
            Arc::new(TokioSleeper),
        )
    }

    pub fn with_parts(
        policy: PacingPolicy,
        sampler: Arc<dyn DelaySampler>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            policy,
            sampler,
            sleeper,
        }
    }

    pub fn policy(&self) -> PacingPolicy {
        self.policy
    }

    /// Sleeps for one sampled delay and returns it.
    pub async fn pause(&self) -> Duration {
        let delay = self.sampler.sample(self.policy.min, self.policy.max);
        self.sleeper.sleep(delay).await;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex as AsyncMutex;

    struct RecordingSleeper {
        slept: AsyncMutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().await.push(duration);
        }
    }

    #[test]
    fn test_policy_defaults_and_swapped_bounds() {
        let policy = PacingPolicy::default();
        assert_eq!(policy.min, Duration::from_millis(10));
        assert_eq!(policy.max, Duration::from_millis(750));

        let swapped = PacingPolicy::from_millis(500, 100);
        assert_eq!(swapped.min, Duration::from_millis(100));
        assert_eq!(swapped.max, Duration::from_millis(500));
    }

    #[test]
    fn test_random_delay_stays_in_bounds() {
        let policy = PacingPolicy::from_millis(10, 750);
        let sampler = RandomDelay::seeded(7);
        for _ in 0..500 {
            let delay = sampler.sample(policy.min, policy.max);
            assert!(policy.contains(delay), "{:?} out of bounds", delay);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomDelay::seeded(42);
        let b = RandomDelay::seeded(42);
        let min = Duration::from_millis(0);
        let max = Duration::from_millis(10_000);
        for _ in 0..20 {
            assert_eq!(a.sample(min, max), b.sample(min, max));
        }
    }

    #[test]
    fn test_degenerate_interval() {
        let sampler = RandomDelay::seeded(1);
        let fixed = Duration::from_millis(25);
        assert_eq!(sampler.sample(fixed, fixed), fixed);
    }

    #[tokio::test]
    async fn test_pacer_sleeps_sampled_delay() {
        let sleeper = Arc::new(RecordingSleeper {
            slept: AsyncMutex::new(Vec::new()),
        });
        let pacer = Pacer::with_parts(
            PacingPolicy::from_millis(100, 200),
            Arc::new(RandomDelay::seeded(3)),
            sleeper.clone(),
        );

        let first = pacer.pause().await;
        let second = pacer.pause().await;

        let slept = sleeper.slept.lock().await;
        assert_eq!(*slept, vec![first, second]);
        assert!(slept.iter().all(|d| pacer.policy().contains(*d)));
    }
}
