//! VORTRAC analysis driver: a long-running service that watches a radar
//! data directory and turns each new volume into a vortex center, wind
//! profile, and central pressure estimate.
//!
//! # Usage
//!
//! ```bash
//! analysis-driver --config vortrac.yaml
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use analysis_driver::{pipeline, AnalysisDriver};
use ingestion::{atcf_reader, load_config_file, pressure_reader, RadarFileSource};
use vortrac_core::RadarVolume;

#[derive(Parser, Debug)]
#[command(name = "analysis-driver")]
#[command(about = "VORTRAC single-Doppler vortex analysis pipeline")]
struct Args {
    /// Path to the YAML analysis configuration (spec.md §6).
    #[arg(long)]
    config: PathBuf,

    /// Directory the SimplexList/VortexList XML files are written to.
    #[arg(long, default_value = "./vortrac-output")]
    output_dir: PathBuf,

    /// Optional ATCF b-deck file used to seed the first cycle's best-guess
    /// center.
    #[arg(long)]
    atcf: Option<PathBuf>,

    /// Log level.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Decoding NEXRAD Level II/III or Dorade bytes into a `RadarVolume` is
/// delegated to an external library (spec.md §4 Non-goals); this build
/// carries no such decoder, so the binary fails loudly on every file rather
/// than silently producing empty volumes.
struct UnimplementedRadarFileSource;

impl RadarFileSource for UnimplementedRadarFileSource {
    fn load_volume(&self, path: &std::path::Path) -> ingestion::Result<RadarVolume> {
        Err(ingestion::IngestionError::VolumeLoad {
            path: path.display().to_string(),
            reason: "no radar file decoder is linked into this build".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("starting VORTRAC analysis driver");

    let config = load_config_file(&args.config).context("loading analysis configuration")?;

    let mut driver = AnalysisDriver::new(config.clone());
    if let Some(atcf_path) = &args.atcf {
        let contents = std::fs::read_to_string(atcf_path).context("reading ATCF seed file")?;
        for record in atcf_reader::parse_stream(&contents).context("parsing ATCF seed file")? {
            driver.seed_from_atcf(&record);
        }
    }

    let pressure_obs = load_pressure_observations(&config.pressure.obs_dir);

    std::fs::create_dir_all(&args.output_dir).context("creating output directory")?;
    let simplex_list_path = args.output_dir.join("simplex_list.xml");
    let vortex_list_path = args.output_dir.join("vortex_list.xml");

    let start = parse_config_datetime(&config.radar.startdate, &config.radar.starttime)?;
    let end = parse_config_datetime(&config.radar.enddate, &config.radar.endtime)?;

    let abort = Arc::new(AtomicBool::new(false));
    let source: Arc<dyn RadarFileSource> = Arc::new(UnimplementedRadarFileSource);

    let handles = pipeline::spawn(
        PathBuf::from(&config.radar.dir),
        start,
        end,
        source,
        driver,
        pressure_obs,
        simplex_list_path,
        vortex_list_path,
        abort.clone(),
    );

    tokio::signal::ctrl_c().await.ok();
    info!("shutdown requested, cancelling in-flight work");
    abort.store(true, Ordering::Relaxed);

    let _ = handles.poller.await;
    let _ = handles.analysis.await;
    let _ = handles.publish.await;

    Ok(())
}

fn load_pressure_observations(obs_dir: &str) -> Vec<vortrac_core::PressureObservation> {
    let mut observations = Vec::new();
    let Ok(entries) = std::fs::read_dir(obs_dir) else {
        warn!(obs_dir, "pressure observation directory not found, continuing without it");
        return observations;
    };
    for entry in entries.flatten() {
        let Ok(contents) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        match pressure_reader::parse_stream(&contents) {
            Ok(mut obs) => observations.append(&mut obs),
            Err(err) => warn!(error = %err, file = %entry.path().display(), "skipping unparseable pressure observation file"),
        }
    }
    observations
}

fn parse_config_datetime(date: &str, time: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    use chrono::{NaiveDate, TimeZone, Utc};
    if time.len() < 4 {
        anyhow::bail!("time field {time} too short, expected at least HHMM");
    }
    let naive_date = NaiveDate::parse_from_str(date, "%Y%m%d").with_context(|| format!("parsing date {date}"))?;
    let hh: u32 = time[0..2].parse().with_context(|| format!("parsing time {time}"))?;
    let mm: u32 = time[2..4].parse().with_context(|| format!("parsing time {time}"))?;
    let naive = naive_date.and_hms_opt(hh, mm, 0).context("invalid time of day")?;
    Ok(Utc.from_utc_datetime(&naive))
}
