//! Background polling of the administrator alert feed.
//!
//! The alert screen refreshes on a fixed interval. `AlertPoller` fetches from
//! an `AlertSource` on every tick and forwards each batch, unread alerts
//! first, to a channel. A failed fetch is logged and the next tick tries
//! again; polling stops on the shutdown signal or when the receiver is gone.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use super::data_aggregator::unread_first;
use crate::api::alerts::AdminAlert;
use crate::api::ApiClient;
use crate::auth::Session;
use crate::errors::Result;

#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch_alerts(&self) -> Result<Vec<AdminAlert>>;
}

/// Fetches `GET /admin-alerts` on behalf of a fixed session.
pub struct SessionAlertSource {
    api: ApiClient,
    session: Session,
}

impl SessionAlertSource {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }
}

#[async_trait]
impl AlertSource for SessionAlertSource {
    async fn fetch_alerts(&self) -> Result<Vec<AdminAlert>> {
        self.api.admin_alerts(&self.session).await
    }
}

pub struct AlertPoller<A> {
    source: A,
    interval: Duration,
}

impl<A: AlertSource + 'static> AlertPoller<A> {
    pub fn new(source: A, interval: Duration) -> Self {
        Self { source, interval }
    }

    pub fn spawn(
        self,
        batches: mpsc::Sender<Vec<AdminAlert>>,
        shutdown: oneshot::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(batches, shutdown))
    }

    /// Polls until `shutdown` fires (or its sender is dropped) or `batches`
    /// is closed. The first fetch happens immediately.
    ///
    /// Shutdown is checked first at every await point, so a slow fetch or a
    /// full channel never delays it.
    pub async fn run(
        self,
        batches: mpsc::Sender<Vec<AdminAlert>>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if unless_shutdown(&mut shutdown, ticker.tick()).await.is_none() {
                break;
            }
            let Some(fetched) = unless_shutdown(&mut shutdown, self.source.fetch_alerts()).await
            else {
                break;
            };
            let alerts = match fetched {
                Ok(alerts) => alerts,
                Err(err) => {
                    warn!(error = %err, "failed to fetch alerts");
                    continue;
                }
            };
            match unless_shutdown(&mut shutdown, batches.send(unread_first(alerts))).await {
                None => break,
                Some(Err(_)) => {
                    debug!("alert receiver dropped, stopping poller");
                    return;
                }
                Some(Ok(())) => {}
            }
        }
        debug!("alert poller shutting down");
    }
}

/// Drives `work` to completion unless `shutdown` resolves first.
async fn unless_shutdown<F: Future>(
    shutdown: &mut oneshot::Receiver<()>,
    work: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = shutdown => None,
        output = work => Some(output),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::errors::ClientError;

    /// Returns one alert per call; every second call fails.
    struct Flaky {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AlertSource for Flaky {
        async fn fetch_alerts(&self) -> Result<Vec<AdminAlert>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(ClientError::Api {
                    status: 503,
                    message: "Service Unavailable".into(),
                });
            }
            Ok(vec![
                alert(n as i64, "Read"),
                alert(n as i64 + 100, "Unread"),
            ])
        }
    }

    fn alert(id: i64, status: &str) -> AdminAlert {
        AdminAlert {
            alert_id: id,
            report_id: id,
            alert_status: status.into(),
            alert_timestamp: String::new(),
            image_url: String::new(),
            description: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            severity_level: String::new(),
            report_status: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_through_errors_until_shutdown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = AlertPoller::new(
            Flaky {
                calls: Arc::clone(&calls),
            },
            Duration::from_secs(10),
        );
        let (tx, mut rx) = mpsc::channel(4);
        let (stop, shutdown) = oneshot::channel();
        let handle = poller.spawn(tx, shutdown);

        let first = rx.recv().await.unwrap();
        assert_eq!(first[0].alert_id, 100, "unread alert comes first");

        // Call 1 fails and is skipped; call 2 delivers.
        let second = rx.recv().await.unwrap();
        assert_eq!(second[0].alert_id, 102);
        assert!(calls.load(Ordering::SeqCst) >= 3);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_dropped() {
        let poller = AlertPoller::new(
            Flaky {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            Duration::from_secs(1),
        );
        let (tx, rx) = mpsc::channel(1);
        let (_stop, shutdown) = oneshot::channel::<()>();
        drop(rx);

        poller.run(tx, shutdown).await;
    }

    struct Steady;

    #[async_trait]
    impl AlertSource for Steady {
        async fn fetch_alerts(&self) -> Result<Vec<AdminAlert>> {
            Ok(vec![alert(1, "Unread")])
        }
    }

    /// Counts calls and takes `delay` to answer.
    struct Slow {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl AlertSource for Slow {
        async fn fetch_alerts(&self) -> Result<Vec<AdminAlert>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.delay).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_a_blocked_send() {
        let poller = AlertPoller::new(Steady, Duration::from_secs(10));
        // Capacity one and never read: the second batch blocks on send.
        let (tx, _rx) = mpsc::channel(1);
        let (stop, shutdown) = oneshot::channel();
        let handle = poller.spawn(tx, shutdown);

        time::sleep(Duration::from_secs(11)).await;
        stop.send(()).unwrap();

        let stopped = time::timeout(Duration::from_secs(1), handle).await;
        assert!(stopped.is_ok(), "poller kept waiting on a full channel");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_a_slow_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = AlertPoller::new(
            Slow {
                calls: Arc::clone(&calls),
                delay: Duration::from_secs(30),
            },
            Duration::from_secs(10),
        );
        let (tx, _rx) = mpsc::channel(4);
        let (stop, shutdown) = oneshot::channel();
        let started = time::Instant::now();
        let handle = poller.spawn(tx, shutdown);

        time::sleep(Duration::from_secs(1)).await;
        stop.send(()).unwrap();
        handle.await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
