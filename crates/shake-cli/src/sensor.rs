//! Accelerometer stand-in for the terminal.
//!
//! Availability is answered once, up front. A subscription owns the task that
//! paces delivery on a fixed interval; dropping it (or calling
//! [`Subscription::unsubscribe`]) stops delivery before the engine goes away.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shake_core::{DEFAULT_UPDATE_INTERVAL_MS, MotionSample, REST_SAMPLE};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::script::Event;

/// Where readings come from.
#[derive(Debug)]
pub enum SampleSource {
    Recorded(Vec<Event>),
    Synthetic(SyntheticShaker),
    Unavailable,
}

/// Seeded generator of rest/shake phases.
#[derive(Debug, Clone)]
pub struct SyntheticShaker {
    pub shakes: u32,
    pub rest_ticks: u32,
    pub shake_ticks: u32,
    pub seed: u64,
}

impl SyntheticShaker {
    pub fn new(shakes: u32, seed: u64) -> Self {
        Self {
            shakes,
            rest_ticks: 5,
            shake_ticks: 4,
            seed,
        }
    }

    /// Rest, then shake, `shakes` times, then a final rest.
    ///
    /// Rest jitters by at most ±0.05 g per axis. Shake readings flip sign on
    /// every axis each tick with magnitudes of 2-3 g, so consecutive readings
    /// differ by at least 4 g per axis.
    pub fn events(&self) -> Vec<Event> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut events = Vec::new();
        for _ in 0..self.shakes {
            self.push_rest(&mut rng, &mut events);
            for tick in 0..self.shake_ticks {
                let sign = if tick % 2 == 0 { 1.0 } else { -1.0 };
                let mut axis = || sign * rng.random_range(2.0f64..3.0);
                events.push(Event::Sample(MotionSample::new(axis(), axis(), axis())));
            }
        }
        self.push_rest(&mut rng, &mut events);
        events
    }

    fn push_rest(&self, rng: &mut SmallRng, events: &mut Vec<Event>) {
        for _ in 0..self.rest_ticks {
            let mut jitter = || rng.random_range(-0.05f64..0.05);
            events.push(Event::Sample(MotionSample::new(
                REST_SAMPLE.x + jitter(),
                REST_SAMPLE.y + jitter(),
                REST_SAMPLE.z + jitter(),
            )));
        }
    }
}

#[derive(Debug)]
pub struct Accelerometer {
    source: SampleSource,
    interval: Duration,
}

impl Accelerometer {
    /// Sensor paced at the default cadence until told otherwise.
    pub fn new(source: SampleSource) -> Self {
        Self {
            source,
            interval: Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.source, SampleSource::Unavailable)
    }

    pub fn set_update_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Start delivering events. An unavailable sensor yields a subscription
    /// that closes immediately without producing anything.
    pub fn subscribe(self) -> Subscription {
        let events = match self.source {
            SampleSource::Recorded(events) => events,
            SampleSource::Synthetic(shaker) => shaker.events(),
            SampleSource::Unavailable => Vec::new(),
        };

        // Capacity 1: the next reading is not produced until the previous one
        // has been taken by the consumer.
        let (tx, rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(deliver(events, self.interval, tx, cancel.clone()));
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "sensor subscribed");

        Subscription {
            rx,
            cancel,
            task: Some(task),
        }
    }
}

async fn deliver(
    events: Vec<Event>,
    interval: Duration,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    // tokio rejects a zero period; zero means "as fast as the consumer allows"
    let mut ticker = (!interval.is_zero()).then(|| {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    for event in events {
        if event.is_sample()
            && let Some(ticker) = ticker.as_mut()
        {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(event) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}

/// Live sensor subscription. Delivery stops when this is dropped.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Next event, or `None` once the source is exhausted or cancelled.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Stop delivery and wait for the delivery task to finish.
    pub async fn unsubscribe(mut self) {
        self.cancel.cancel();
        self.rx.close();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("sensor task ended abnormally: {e}");
        }
        tracing::debug!("sensor unsubscribed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shake_core::{SHAKE_THRESHOLD, SensorSampler};

    #[test]
    fn test_synthetic_phases_cross_threshold() {
        let shaker = SyntheticShaker::new(2, 42);
        let events = shaker.events();
        assert_eq!(events.len(), (5 + 4) * 2 + 5);

        let mut sampler = SensorSampler::new();
        let intensities: Vec<f64> = events
            .iter()
            .map(|e| match e {
                Event::Sample(s) => sampler.on_sample(*s),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();

        // Rest readings stay well under the threshold
        assert!(intensities[..5].iter().all(|&i| i < 0.1));
        // Every shake reading is above it
        assert!(intensities[5..9].iter().all(|&i| i > SHAKE_THRESHOLD));
        // Returning to rest from a shake is a large drop, then calm again
        assert!(intensities[10..14].iter().all(|&i| i < 0.1));
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        assert_eq!(
            SyntheticShaker::new(3, 7).events(),
            SyntheticShaker::new(3, 7).events()
        );
    }

    #[tokio::test]
    async fn test_recorded_events_delivered_in_order() {
        let events = vec![
            Event::Sample(MotionSample::new(0.0, 0.0, 1.0)),
            Event::SetSides { set_sides: 8.0 },
            Event::Sample(MotionSample::new(1.0, 1.0, 1.0)),
        ];
        let mut sensor = Accelerometer::new(SampleSource::Recorded(events.clone()));
        sensor.set_update_interval(Duration::from_millis(1));
        assert!(sensor.is_available());

        let mut sub = sensor.subscribe();
        let mut received = Vec::new();
        while let Some(event) = sub.next().await {
            received.push(event);
        }
        assert_eq!(received, events);
        sub.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_unavailable_closes_immediately() {
        let sensor = Accelerometer::new(SampleSource::Unavailable);
        assert!(!sensor.is_available());
        let mut sub = sensor.subscribe();
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let shaker = SyntheticShaker::new(100, 1);
        let mut sensor = Accelerometer::new(SampleSource::Synthetic(shaker));
        sensor.set_update_interval(Duration::from_millis(5));

        let mut sub = sensor.subscribe();
        assert!(sub.next().await.is_some());
        let cancel = sub.cancel.clone();
        sub.unsubscribe().await;
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let mut sensor = Accelerometer::new(SampleSource::Synthetic(SyntheticShaker::new(100, 1)));
        sensor.set_update_interval(Duration::from_millis(5));
        let sub = sensor.subscribe();
        let cancel = sub.cancel.clone();
        drop(sub);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_default_interval_until_overridden() {
        let mut sensor = Accelerometer::new(SampleSource::Unavailable);
        assert_eq!(sensor.interval, Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS));
        sensor.set_update_interval(Duration::ZERO);
        assert_eq!(sensor.interval, Duration::ZERO);
    }
}
