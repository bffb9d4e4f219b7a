use crate::config::PacingConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Kind of unit of work the next remote call belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pace {
    Account,
    Session,
    ConfirmationList,
    Confirmation,
    ReceivedOffers,
}

/// Keeps the remote calls spread out enough not to trip abuse detection.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pace(&self, pace: Pace);
}

/// Fixed-interval ticker, one tick per kind. The first `pace` of a kind waits
/// the whole interval, later ones return at least the interval after the
/// previous tick of the same kind.
pub struct IntervalPacer {
    intervals: PacingConfig,
    last: Mutex<HashMap<Pace, Instant>>,
}

impl IntervalPacer {
    pub fn new(intervals: PacingConfig) -> Self {
        Self {
            intervals,
            last: Mutex::new(HashMap::new()),
        }
    }

    fn interval(&self, pace: Pace) -> Duration {
        Duration::from_secs(match pace {
            Pace::Account => self.intervals.account_secs,
            Pace::Session => self.intervals.session_secs,
            Pace::ConfirmationList => self.intervals.confirmation_list_secs,
            Pace::Confirmation => self.intervals.confirmation_secs,
            Pace::ReceivedOffers => self.intervals.received_offers_secs,
        })
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&self, pace: Pace) {
        let mut last = self.last.lock().await;
        let interval = self.interval(pace);
        let deadline = match last.get(&pace) {
            Some(tick) => *tick + interval,
            None => Instant::now() + interval,
        };
        sleep_until(deadline).await;
        last.insert(pace, Instant::now());
    }
}
