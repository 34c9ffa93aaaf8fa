use anyhow::{bail, Context};
use clap::Parser;
use generator::profile::build_drop_field;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::VisualizationModel;
use scoutcore::model::{GeoPoint, RawNftRecord};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Geo-NFT scout scenario driver")]
struct Args {
    /// Run one scenario and write a summary report
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Observer latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Observer longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    #[arg(long, default_value_t = 12)]
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Ingest raw NFT records from a JSON array instead of generating them
    #[arg(long)]
    records: Option<PathBuf>,
    #[arg(long, default_value = "tools/data/offline_report.log")]
    report: PathBuf,
    /// Keep the JSON bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if !args.offline && !args.serve {
        bail!("nothing to do: pass --offline and/or --serve");
    }

    let observer = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            Some(GeoPoint::checked(lat, lon).context("parsing observer position")?)
        }
        _ => None,
    };

    let mut workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(observer, args.count, args.seed)
    };
    if observer.is_some() {
        workflow_config.observer = observer;
    }

    let raw = match args.records.as_ref() {
        Some(path) => load_records(path)?,
        None => build_drop_field(&workflow_config.generator)?,
    };

    let runner = Runner::new(workflow_config.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));

    let result = runner.execute(raw).context("running scenario")?;
    let report = render_report(&result);
    gui_bridge.publish(VisualizationModel::from_result(
        result,
        workflow_config.observer,
        workflow_config.radar.clone(),
        workflow_config.viewport,
    ));

    if args.offline {
        print!("{report}");
        if let Some(parent) = args.report.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&args.report)
            .with_context(|| format!("opening report {}", args.report.display()))?;
        file.write_all(report.as_bytes())?;
        gui_bridge.publish_status("Offline scenario results ready.");
    }

    if args.serve {
        gui_bridge.serve()?;
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

fn load_records(path: &Path) -> anyhow::Result<Vec<RawNftRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading records {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing records {}", path.display()))
}

fn render_report(result: &workflow::runner::WorkflowResult) -> String {
    let mut report = format!(
        "drops accepted={} rejected={} blips={}\n",
        result.accepted,
        result.rejected,
        result.blips.len()
    );
    if let (Some(target), Some(frame)) = (&result.target, &result.frame) {
        report.push_str(&format!(
            "nearest {} ({}) {} zoom={} in_range={}\n",
            target.id, target.collection, frame.label, frame.zoom, frame.in_range
        ));
    }
    for blip in &result.blips {
        let direction = match blip.offset.angle.degrees() {
            Some(degrees) => format!("{degrees:6.1}°"),
            None => "   n/a ".to_string(),
        };
        report.push_str(&format!(
            "  {:<10} {} r={:5.1}px ({:+.1}, {:+.1})\n",
            blip.id, direction, blip.offset.radial_px, blip.x, blip.y
        ));
    }
    for note in &result.notes {
        report.push_str(&format!("  note: {note}\n"));
    }
    report
}
