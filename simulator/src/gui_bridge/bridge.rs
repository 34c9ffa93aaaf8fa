use crate::generator::profile::{build_drop_field, GeneratorConfig};
use crate::gui_bridge::keyring::Keyring;
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::{Runner, WorkflowResult};
use anyhow::{Context, Result};
use log::{error, info};
use scoutcore::model::RawNftRecord;
use scoutcore::wallet::{SecretImporter, SecretKey};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

const MAX_IMPORTED_WALLETS: usize = 16;

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    secret: String,
}

type SharedModel = Arc<RwLock<VisualizationModel>>;
type SharedKeyring = Arc<Mutex<Keyring>>;

/// Bridge that hosts the JSON endpoints the visualizer polls.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    /// Shared state only; no listener is started.
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
        }
    }

    /// Starts the HTTP listener on a dedicated thread.
    pub fn serve(&self) -> Result<()> {
        let state_filter = {
            let state = self.state.clone();
            warp::any().map(move || state.clone())
        };
        let runner_filter = {
            let runner = self.runner.clone();
            warp::any().map(move || runner.clone())
        };
        let keyring: SharedKeyring = Arc::new(Mutex::new(Keyring::with_capacity(
            MAX_IMPORTED_WALLETS,
        )));
        let keyring_filter = warp::any().map(move || keyring.clone());

        let get_route = warp::path("payload")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&*guard)
            });

        let post_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |records: Vec<RawNftRecord>, state: SharedModel, runner: Arc<Runner>| async move {
                    match runner.execute(records) {
                        Ok(result) => {
                            let accepted = result.accepted;
                            store_result(&state, &runner, result);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok", "accepted": accepted})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            error!("ingest error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig, state: SharedModel, runner: Arc<Runner>| async move {
                    match build_drop_field(&config).and_then(|records| runner.execute(records)) {
                        Ok(result) => {
                            let accepted = result.accepted;
                            store_result(&state, &runner, result);
                            if let Some(name) = config.scenario.as_ref() {
                                info!("scenario {} -> {} drops", name, accepted);
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "accepted": accepted,
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            error!("ingest-config error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let wallet_route = warp::path!("wallet" / "import")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(keyring_filter)
            .map(
                |request: ImportRequest, state: SharedModel, keyring: SharedKeyring| {
                    let (body, status) = import_wallet(&request.secret, &state, &keyring);
                    warp::reply::with_status(warp::reply::json(&body), status)
                },
            );

        let routes = get_route
            .or(post_route)
            .or(generator_route)
            .or(wallet_route);
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building bridge runtime")?;
        thread::spawn(move || {
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });
        info!("bridge listening on http://{}", gui_bind_address());
        Ok(())
    }

    pub fn publish(&self, model: VisualizationModel) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let wallets = std::mem::take(&mut guard.wallets);
        *guard = VisualizationModel { wallets, ..model };
        info!(
            "published {} blips ({} rejected)",
            guard.blips.len(),
            guard.rejected
        );
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn store_result(state: &SharedModel, runner: &Runner, result: WorkflowResult) {
    let config = runner.config();
    let model = VisualizationModel::from_result(
        result,
        config.observer,
        config.radar.clone(),
        config.viewport,
    );
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    let wallets = std::mem::take(&mut guard.wallets);
    *guard = VisualizationModel { wallets, ..model };
}

/// Validates before touching the keyring, so malformed secrets never reach
/// the importer.
fn import_wallet(
    secret: &str,
    state: &SharedModel,
    keyring: &SharedKeyring,
) -> (serde_json::Value, StatusCode) {
    let key = match SecretKey::parse(secret) {
        Ok(key) => key,
        Err(err) => {
            return (
                json!({"status": "invalid", "message": err.to_string()}),
                StatusCode::BAD_REQUEST,
            )
        }
    };

    let mut keyring = keyring.lock().unwrap_or_else(PoisonError::into_inner);
    match keyring.import(&key) {
        Ok(imported) => {
            if imported {
                let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
                guard.wallets = keyring.masked();
            }
            (
                json!({"status": "ok", "imported": imported}),
                StatusCode::OK,
            )
        }
        Err(err) => (
            json!({"status": "error", "message": err.to_string()}),
            StatusCode::CONFLICT,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use scoutcore::model::GeoPoint;

    fn runner() -> Arc<Runner> {
        Arc::new(Runner::new(WorkflowConfig::from_args(
            Some(GeoPoint::new(0.0, 0.0)),
            3,
            4,
        )))
    }

    #[test]
    fn gui_bridge_publish_updates_state() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let raw = build_drop_field(&runner.config().generator).unwrap();
        let result = runner.execute(raw).unwrap();
        let config = runner.config();
        gui.publish(VisualizationModel::from_result(
            result,
            config.observer,
            config.radar.clone(),
            config.viewport,
        ));
        assert_eq!(gui.snapshot().blips.len(), 3);
    }

    #[test]
    fn wallet_import_validates_before_keyring() {
        let state: SharedModel = Arc::default();
        let keyring: SharedKeyring = Arc::new(Mutex::new(Keyring::default()));

        let (body, status) = import_wallet("GNOTASECRET", &state, &keyring);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "invalid");
        assert!(keyring.lock().unwrap().masked().is_empty());

        let secret = format!("S{}", "Q".repeat(55));
        let (body, status) = import_wallet(&secret, &state, &keyring);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imported"], true);
        assert_eq!(state.read().unwrap().wallets.len(), 1);

        let (body, _) = import_wallet(&secret, &state, &keyring);
        assert_eq!(body["imported"], false);
    }

    #[test]
    fn store_result_keeps_imported_wallets() {
        let runner = runner();
        let state: SharedModel = Arc::default();
        state.write().unwrap().wallets = vec!["SAAA…AAAA".into()];
        let raw = build_drop_field(&runner.config().generator).unwrap();
        store_result(&state, &runner, runner.execute(raw).unwrap());
        let snapshot = state.read().unwrap();
        assert_eq!(snapshot.wallets.len(), 1);
        assert_eq!(snapshot.accepted, 3);
    }
}
