use crate::state::messages::NetworkRequest;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};

/// Fixed-period game refresh. Sends `RefreshGame` for whatever the current
/// polling target is; does nothing while idle or while a fetch is still out.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    target: watch::Receiver<Option<u64>>,
    in_flight: Arc<AtomicBool>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        target: watch::Receiver<Option<u64>>,
        in_flight: Arc<AtomicBool>,
        period: Duration,
    ) -> Self {
        Self { network_requests, target, in_flight, period }
    }

    pub async fn run(self) {
        let mut game_interval = interval(self.period);
        game_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick; selecting a game already fetches it once.
        game_interval.tick().await;

        loop {
            game_interval.tick().await;

            let target = *self.target.borrow();
            let Some(game_pk) = target else {
                continue;
            };
            if self.in_flight.load(Ordering::Relaxed) {
                debug!("previous fetch still running, skipping tick for game {game_pk}");
                continue;
            }
            if self
                .network_requests
                .send(NetworkRequest::RefreshGame { game_pk })
                .await
                .is_err()
            {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const PERIOD: Duration = Duration::from_millis(10);

    fn spawn(
        target: Option<u64>,
        busy: bool,
    ) -> (mpsc::Receiver<NetworkRequest>, watch::Sender<Option<u64>>) {
        let (req_tx, req_rx) = mpsc::channel(16);
        let (target_tx, target_rx) = watch::channel(target);
        let in_flight = Arc::new(AtomicBool::new(busy));
        tokio::spawn(PeriodicRefresher::new(req_tx, target_rx, in_flight, PERIOD).run());
        (req_rx, target_tx)
    }

    #[tokio::test]
    async fn refreshes_current_target() {
        let (mut requests, _target) = spawn(Some(5), false);
        let request = timeout(Duration::from_secs(1), requests.recv()).await.unwrap();
        assert!(matches!(request, Some(NetworkRequest::RefreshGame { game_pk: 5 })));
    }

    #[tokio::test]
    async fn follows_target_switch() {
        let (mut requests, target) = spawn(Some(1), false);
        target.send_replace(Some(2));
        // Drain anything issued before the switch.
        loop {
            let request = timeout(Duration::from_secs(1), requests.recv()).await.unwrap();
            if matches!(request, Some(NetworkRequest::RefreshGame { game_pk: 2 })) {
                break;
            }
        }
    }

    #[tokio::test]
    async fn idle_sends_nothing() {
        let (mut requests, _target) = spawn(None, false);
        assert!(timeout(PERIOD * 10, requests.recv()).await.is_err());
    }

    #[tokio::test]
    async fn skips_while_fetch_in_flight() {
        let (mut requests, _target) = spawn(Some(5), true);
        assert!(timeout(PERIOD * 10, requests.recv()).await.is_err());
    }
}
