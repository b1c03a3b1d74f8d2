use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use inventory_codec::config::Settings;
use inventory_codec::pipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the inventory codec run.
#[derive(Debug, Parser)]
#[clap(name = "inventory-codec")]
struct Args {
    /// Optional path to the configuration file. If not provided, defaults
    /// and environment variables are used.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    inventory_codec::logging::setup_logging("info,inventory_codec=info", pretty);

    let settings = match Settings::new(args.config.as_ref()) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(%error, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&settings) {
        Ok(summary) => {
            tracing::info!(hits = summary.hits, "done");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "run failed");
            ExitCode::FAILURE
        }
    }
}
