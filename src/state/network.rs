use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use savant_api::GameSnapshot;
use savant_api::client::SavantApi;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serves requests one at a time, so at most one fetch is ever in flight.
pub struct NetworkWorker {
    client: SavantApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: SavantApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set while a request is being served. The refresher skips ticks while it is up.
    pub fn in_flight(&self) -> Arc<AtomicBool> {
        self.is_loading.clone()
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadSchedule => self.handle_load_schedule().await,
                NetworkRequest::RefreshGame { game_pk } => self.handle_refresh_game(game_pk).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(response.is_ok()).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_schedule(&self) -> NetworkResponse {
        debug!("loading today's schedule");
        let games = self.client.list_games_today().await;
        NetworkResponse::ScheduleLoaded { games }
    }

    async fn handle_refresh_game(&self, game_pk: u64) -> NetworkResponse {
        debug!("refreshing game {game_pk}");
        // The snapshot is fully built here, before it is handed to the UI.
        let snapshot = self
            .client
            .fetch_game_state(game_pk)
            .await
            .map(|raw| Box::new(GameSnapshot::from_raw(game_pk, &raw)));
        NetworkResponse::GameRefreshed { game_pk, snapshot }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    async fn next_payload(responses: &mut mpsc::Receiver<NetworkResponse>) -> NetworkResponse {
        loop {
            match responses.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(other) => return other,
                None => panic!("worker hung up"),
            }
        }
    }

    #[tokio::test]
    async fn refresh_builds_tagged_snapshot() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gf")
            .match_query(Matcher::UrlEncoded("game_pk".into(), "42".into()))
            .with_status(200)
            .with_body(
                r#"{"home_pitchers": {"9": [{"px": 0.2, "pz": 2.1, "pitcher_name": "A. Smith"}]},
                    "away_pitchers": {}, "scoreboard": {}}"#,
            )
            .create_async()
            .await;

        let client = SavantApi::new().with_base_urls(server.url(), server.url());
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        tokio::spawn(NetworkWorker::new(client, req_rx, resp_tx).run());

        req_tx.send(NetworkRequest::RefreshGame { game_pk: 42 }).await.unwrap();
        match next_payload(&mut resp_rx).await {
            NetworkResponse::GameRefreshed { game_pk, snapshot } => {
                assert_eq!(game_pk, 42);
                let snapshot = snapshot.expect("snapshot");
                assert_eq!(snapshot.pitcher_names, vec!["A. Smith".to_string()]);
                assert_eq!(snapshot.pitch_count(), 1);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_refresh_reports_no_snapshot() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gf")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = SavantApi::new().with_base_urls(server.url(), server.url());
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        tokio::spawn(NetworkWorker::new(client, req_rx, resp_tx).run());

        req_tx.send(NetworkRequest::RefreshGame { game_pk: 7 }).await.unwrap();
        let response = next_payload(&mut resp_rx).await;
        assert!(!response.is_ok());
        assert!(matches!(
            response,
            NetworkResponse::GameRefreshed { game_pk: 7, snapshot: None }
        ));
    }
}
