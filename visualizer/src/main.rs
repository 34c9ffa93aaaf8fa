use iced::{
    time,
    widget::{button, column, row, scrollable, text, text_input, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use scoutcore::map::MapFrame;
use scoutcore::model::{GeoPoint, NftRecord};
use scoutcore::radar::{Gesture, PanZoom, RadarBlip, RadarConfig, ViewportLimits};
use scoutcore::wallet::{FormStatus, ImportError, WalletImportForm};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod radar_scope;

use radar_scope::RadarScope;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Geo Scout Radar".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(2)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    scenario: ScenarioForm,
    payload: Option<VisualizationPayload>,
    view: PanZoom,
    wallet: WalletImportForm,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    PayloadFetched(Result<VisualizationPayload, String>),
    ScenarioFieldChanged(ScenarioField, String),
    SubmitScenario,
    ScenarioSubmitted(Result<String, String>),
    Radar(Gesture),
    OpenWallet,
    CloseWallet,
    SecretChanged(String),
    SubmitWallet,
    WalletImported(Result<bool, String>),
}

#[derive(Debug, Clone, Copy)]
pub enum ScenarioField {
    Latitude,
    Longitude,
    Count,
    MaxDistance,
    Radius,
    Seed,
    Description,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                scenario: ScenarioForm::default(),
                payload: None,
                view: PanZoom::default(),
                wallet: WalletImportForm::default(),
                status: "Waiting for bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn limits(&self) -> ViewportLimits {
        self.payload
            .as_ref()
            .map(|payload| payload.viewport)
            .unwrap_or_default()
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.status = format!(
                    "{} drops on radar ({} rejected)",
                    payload.blips.len(),
                    payload.rejected
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::ScenarioFieldChanged(field, value) => {
                state.scenario.update_field(field, value);
                Task::none()
            }
            Message::SubmitScenario => {
                let payload = state.scenario.to_payload();
                Task::perform(post_scenario(payload), Message::ScenarioSubmitted)
            }
            Message::ScenarioSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Scenario submitted".into());
                Task::perform(fetch_payload(), Message::PayloadFetched)
            }
            Message::ScenarioSubmitted(Err(err)) => {
                state.status = format!("Scenario error: {err}");
                Task::none()
            }
            Message::Radar(gesture) => {
                state.view = state.limits().apply(state.view, gesture);
                Task::none()
            }
            Message::OpenWallet => {
                state.wallet.open();
                Task::none()
            }
            Message::CloseWallet => {
                state.wallet.close();
                Task::none()
            }
            Message::SecretChanged(value) => {
                state.wallet.set_input(value);
                Task::none()
            }
            Message::SubmitWallet => match state.wallet.begin_submit() {
                Some(key) => Task::perform(
                    post_wallet(key.expose().to_string()),
                    Message::WalletImported,
                ),
                None => Task::none(),
            },
            Message::WalletImported(outcome) => {
                state.wallet.finish(outcome.map_err(ImportError));
                if state.wallet.status() == &FormStatus::Imported {
                    state.push_history("Wallet imported".into());
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let side_column = if state.wallet.is_open() {
            state.wallet_panel()
        } else {
            state.scenario_panel()
        };

        let (blips, radar_config) = state
            .payload
            .as_ref()
            .map(|payload| (payload.blips.clone(), payload.radar.clone()))
            .unwrap_or_default();

        let radar = Canvas::new(RadarScope::new(blips.clone(), &radar_config, state.view))
            .width(Length::Fill)
            .height(Length::Fixed(360.0));

        let radar_controls = row![
            button("+").on_press(Message::Radar(Gesture::ZoomIn)).padding(6),
            button("-").on_press(Message::Radar(Gesture::ZoomOut)).padding(6),
            button("Reset").on_press(Message::Radar(Gesture::Reset)).padding(6),
            text(format!(
                "zoom {:.2}x  pan ({:.0}, {:.0})",
                state.view.zoom, state.view.pan_x, state.view.pan_y
            ))
            .size(12),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let blip_entries = if blips.is_empty() {
            Column::new().push(text("No drops to render").size(12))
        } else {
            blips.iter().take(8).fold(Column::new().spacing(4), |col, blip| {
                let bearing = blip
                    .offset
                    .angle
                    .degrees()
                    .map(|degrees| format!("{degrees:.0}°"))
                    .unwrap_or_else(|| "direction unknown".into());
                let distance = blip
                    .distance_m
                    .map(|d| format!("{d:.0}m"))
                    .unwrap_or_else(|| "?".into());
                col.push(
                    text(format!(
                        "{} · {} | {} | {}",
                        blip.name, blip.collection, distance, bearing
                    ))
                    .size(12),
                )
            })
        };

        let notes_list = match state.payload.as_ref() {
            Some(payload) if !payload.notes.is_empty() => payload
                .notes
                .iter()
                .fold(Column::new().spacing(4), |col, note| {
                    col.push(text(note.clone()).size(12))
                }),
            _ => Column::new().push(text("No notes yet").size(12)),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let radar_column = column![
            text("Radar").size(26),
            state.distance_panel(),
            radar,
            radar_controls,
            text("Nearby drops").size(16),
            Container::new(blip_entries).padding(6),
            text("Notes").size(16),
            Container::new(scrollable(notes_list).height(Length::Fixed(100.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(80.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![side_column, radar_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn distance_panel(&self) -> Element<'_, Message> {
        let Some(payload) = self.payload.as_ref() else {
            return text("Nearest drop: n/a").size(18).into();
        };
        let (Some(target), Some(frame)) = (payload.target.as_ref(), payload.frame.as_ref()) else {
            return text("Nearest drop: none in range of the scan").size(18).into();
        };

        let observer = payload
            .observer
            .map(|point| format!("Observer {point}"))
            .unwrap_or_else(|| "Observer location unknown".into());
        let fence = if frame.in_range {
            "inside geofence"
        } else {
            "outside geofence"
        };
        let image = target
            .image
            .as_ref()
            .map(|image| image.url())
            .unwrap_or_else(|| "no artwork".into());

        column![
            text(format!("{} ({}): {}", target.name, target.collection, frame.label)).size(18),
            text(format!(
                "{fence} · r={:.0}m · map zoom {} · camera {}",
                frame.geofence_radius_m, frame.zoom, frame.camera
            ))
            .size(12),
            text(observer).size(12),
            text(image).size(12),
        ]
        .spacing(4)
        .into()
    }

    fn scenario_panel(&self) -> Element<'_, Message> {
        let wallets = self
            .payload
            .as_ref()
            .map(|payload| payload.wallets.clone())
            .unwrap_or_default();
        let wallet_summary = if wallets.is_empty() {
            "No wallet imported".to_string()
        } else {
            format!("Wallets: {}", wallets.join(", "))
        };

        column![
            text("Scenario").size(26),
            scenario_input("Center latitude", &self.scenario.latitude, ScenarioField::Latitude),
            scenario_input("Center longitude", &self.scenario.longitude, ScenarioField::Longitude),
            scenario_input("Drop count", &self.scenario.count, ScenarioField::Count),
            scenario_input("Max distance (m)", &self.scenario.max_distance, ScenarioField::MaxDistance),
            scenario_input("Geofence radius (m)", &self.scenario.radius, ScenarioField::Radius),
            scenario_input("Seed", &self.scenario.seed, ScenarioField::Seed),
            scenario_input("Description", &self.scenario.description, ScenarioField::Description),
            button("POST scenario")
                .on_press(Message::SubmitScenario)
                .padding(10),
            text(&self.status).size(14),
            text(wallet_summary).size(12),
            button("Import wallet").on_press(Message::OpenWallet).padding(10),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0))
        .into()
    }

    fn wallet_panel(&self) -> Element<'_, Message> {
        let submitting = self.wallet.status() == &FormStatus::Submitting;
        let message = self.wallet.message().unwrap_or_default();

        column![
            text("Import wallet").size(26),
            text("Paste a secret key (starts with S, 56 characters).").size(12),
            text_input("S...", self.wallet.input())
                .on_input(Message::SecretChanged)
                .on_submit(Message::SubmitWallet)
                .secure(true)
                .padding(6),
            row![
                button("Import")
                    .on_press_maybe((!submitting).then_some(Message::SubmitWallet))
                    .padding(10),
                button("Cancel").on_press(Message::CloseWallet).padding(10),
            ]
            .spacing(10),
            text(message).size(14),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0))
        .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn scenario_input<'a>(
    placeholder: &'a str,
    value: &'a str,
    field: ScenarioField,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .on_input(move |value| Message::ScenarioFieldChanged(field, value))
        .padding(6)
        .into()
}

async fn fetch_payload() -> Result<VisualizationPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_scenario(config: ScenarioConfig) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/ingest-config"))
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(format!("{}: {}", status, text))
    }
}

/// The wallet import function handed to the modal: the bridge answers with
/// `imported: true/false` or an error message.
async fn post_wallet(secret: String) -> Result<bool, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/wallet/import"))
        .json(&serde_json::json!({ "secret": secret }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(body["imported"].as_bool().unwrap_or(false))
    } else {
        Err(body["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string()))
    }
}

#[derive(Debug, Clone)]
struct ScenarioForm {
    latitude: String,
    longitude: String,
    count: String,
    max_distance: String,
    radius: String,
    seed: String,
    description: String,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        Self {
            latitude: "40.7580".into(),
            longitude: "-73.9855".into(),
            count: "12".into(),
            max_distance: "4000".into(),
            radius: "150".into(),
            seed: "0".into(),
            description: "Visualizer scenario".into(),
        }
    }
}

impl ScenarioForm {
    fn update_field(&mut self, field: ScenarioField, value: String) {
        match field {
            ScenarioField::Latitude => self.latitude = value,
            ScenarioField::Longitude => self.longitude = value,
            ScenarioField::Count => self.count = value,
            ScenarioField::MaxDistance => self.max_distance = value,
            ScenarioField::Radius => self.radius = value,
            ScenarioField::Seed => self.seed = value,
            ScenarioField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> ScenarioConfig {
        let center = match (self.latitude.trim().parse(), self.longitude.trim().parse()) {
            (Ok(latitude), Ok(longitude)) => GeoPoint::checked(latitude, longitude).ok(),
            _ => None,
        };
        ScenarioConfig {
            center,
            count: self.count.trim().parse().ok(),
            max_distance_m: self.max_distance.trim().parse().ok(),
            radius_m: self.radius.trim().parse().ok(),
            seed: self.seed.trim().parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

/// Body for `POST /ingest-config`; absent fields keep the bridge defaults.
#[derive(Debug, Serialize)]
struct ScenarioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    center: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_distance_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizationPayload {
    #[serde(default)]
    observer: Option<GeoPoint>,
    #[serde(default)]
    radar: RadarConfig,
    #[serde(default)]
    viewport: ViewportLimits,
    #[serde(default)]
    blips: Vec<RadarBlip>,
    #[serde(default)]
    target: Option<NftRecord>,
    #[serde(default)]
    frame: Option<MapFrame>,
    #[serde(default)]
    rejected: usize,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    wallets: Vec<String>,
}
