//! Sequential extraction of every tile and time step.
//!
//! Failures confined to one tile or one time step are logged and counted;
//! the run carries on with the rest.

use tracing::{error, info, warn};

use wind_common::{datetime_to_posix, GridDataset, TimeRange, WindResult};

use crate::context::RunContext;
use crate::extract::{select_indices, Selection, TimeStep};
use crate::fetch::fetch_time_slice;
use crate::tiles::Tile;
use crate::writer::{output_path, write_tile};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tiles_processed: usize,
    pub tiles_skipped: usize,
    pub files_written: usize,
    pub slices_skipped: usize,
}

impl RunSummary {
    /// Whether nothing at all was written.
    pub fn is_empty(&self) -> bool {
        self.files_written == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tiles processed, {} skipped; {} files written, {} time steps skipped",
            self.tiles_processed, self.tiles_skipped, self.files_written, self.slices_skipped
        )
    }
}

/// Extract and write every tile.
///
/// Only errors that are not local to a tile or time step are returned.
pub async fn run<D: GridDataset>(
    ctx: &RunContext,
    dataset: &D,
    tiles: &[Tile],
    range: &TimeRange,
) -> WindResult<RunSummary> {
    let mut summary = RunSummary::default();

    for tile in tiles {
        match process_tile(ctx, dataset, tile, range, &mut summary).await {
            Ok(()) => summary.tiles_processed += 1,
            Err(e) if e.is_tile_local() => {
                warn!(
                    window = %tile.window,
                    error = %e,
                    "Skipping tile"
                );
                summary.tiles_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(%summary, "Run complete");
    Ok(summary)
}

/// Extract one tile, writing one file per selected time step.
pub async fn process_tile<D: GridDataset>(
    ctx: &RunContext,
    dataset: &D,
    tile: &Tile,
    range: &TimeRange,
    summary: &mut RunSummary,
) -> WindResult<()> {
    let window = &tile.window;
    info!(window = %window, "Downloading data in window");

    let selection = select_indices(dataset.axes(), window, range)?;
    info!(
        start = %selection.start_time(),
        end = %selection.end_time(),
        steps = selection.times.len(),
        "Downloading time span"
    );

    for step in &selection.times {
        match write_time_step(ctx, dataset, tile, step, &selection).await {
            Ok(()) => summary.files_written += 1,
            Err(e) if e.is_tile_local() => {
                error!(
                    window = %window,
                    time = %step.time,
                    error = %e,
                    "Skipping time step"
                );
                summary.slices_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

async fn write_time_step<D: GridDataset>(
    ctx: &RunContext,
    dataset: &D,
    tile: &Tile,
    step: &TimeStep,
    selection: &Selection,
) -> WindResult<()> {
    info!(time = %step.time, "Downloading data for time step");
    let slices = fetch_time_slice(dataset, step.index, selection).await?;

    let timestamp = datetime_to_posix(&step.time);
    let path = output_path(ctx.output_template(), &tile.window, timestamp);
    write_tile(&path, &tile.window, timestamp, selection, &slices).await
}
