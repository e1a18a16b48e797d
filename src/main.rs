use clap::Parser;
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ecoscope::api::ApiClient;
use ecoscope::export::{export_csv, export_json, MetricsReport};
use ecoscope::ui::App;

#[derive(Parser, Debug)]
#[command(name = "ecoscope")]
#[command(about = "Terminal sustainability dashboard - solar, carbon and region analysis")]
#[command(version)]
struct Args {
    /// Base URL of the sustainability backend
    #[arg(long, env = "ECOSCOPE_API_URL", default_value = "http://127.0.0.1:5000")]
    api_url: String,

    /// Export fetched metrics to CSV and exit (no TUI)
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export fetched metrics to JSON and exit (no TUI)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Write diagnostics to this file (the terminal stays clean in TUI mode)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_tracing(args.log_file.as_ref(), args.csv.is_some() || args.json.is_some())?;

    let api = ApiClient::new(&args.api_url)?;

    if args.csv.is_some() || args.json.is_some() {
        let report = MetricsReport::from_metrics(&api.solar()?, &api.carbon()?);

        if let Some(csv_path) = &args.csv {
            export_csv(&report, csv_path)?;
            println!("Exported to CSV: {}", csv_path.display());
        }
        if let Some(json_path) = &args.json {
            export_json(&report, json_path)?;
            println!("Exported to JSON: {}", json_path.display());
        }
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(api).run(terminal);
    ratatui::restore();
    result
}

fn init_tracing(log_file: Option<&PathBuf>, export_mode: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if export_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    // TUI mode without --log-file: diagnostics are dropped rather than
    // corrupting the alternate screen.

    Ok(())
}
