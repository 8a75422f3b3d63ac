//! `get-wind-data`: download GFS wind tiles for the landing predictor.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use opendap::DapClient;
use wind_common::{TimeRange, WindError};
use wind_downloader::config::Args;
use wind_downloader::context::{init_tracing, RunContext};
use wind_downloader::locator::{self, Candidates};
use wind_downloader::pipeline;
use wind_downloader::tiles::enumerate_tiles;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose, args.log_json);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Everything that can be checked offline is checked before the first
    // request goes out.
    let area = args
        .area_of_interest()
        .context("Invalid area of interest")?;
    let target = args.target_time()?;
    let resolution = args.resolution();
    let source = args.source()?;

    let ctx = RunContext::new(&args.dataset_record, args.cache_dir.clone())
        .context("Failed to prepare run")?
        .with_output_template(args.output.clone());

    info!(resolution = %resolution, "Using resolution");
    info!(target = %target, area = %area, "Looking for latest dataset");
    let candidates = Candidates::new(target, resolution, &source);
    if let Some(earliest) = locator::earliest_candidate_date(target, &source) {
        info!(
            earliest = %earliest,
            days = candidates.days(),
            base_url = %source.base_url,
            "Searching model runs"
        );
    }

    let client = DapClient::new(ctx.client_config()).context("Failed to create DAP client")?;
    let dataset = match locator::locate(&ctx, &client, candidates, target).await {
        Ok(dataset) => dataset,
        Err(e @ WindError::DatasetNotFound(_)) => {
            return Err(e).context("Could not locate a dataset for the requested time")
        }
        Err(e) => return Err(e.into()),
    };
    locator::log_dataset_summary(&dataset)?;

    let tiles = enumerate_tiles(&area, args.lattiles, args.lontiles);
    let range = TimeRange::around(target, args.past, args.future);
    let summary = pipeline::run(&ctx, &dataset, &tiles, &range).await?;

    if summary.is_empty() {
        warn!(%summary, "No tile files were written");
    } else {
        info!(%summary, "Finished");
    }
    Ok(())
}
