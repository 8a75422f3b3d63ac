//! Tile file serialization.
//!
//! Each file holds one tile at one time step:
//!
//! ```text
//! # window centre latitude, window latitude radius, window centre longitude, window longitude radius, POSIX timestamp
//! -33.0,10.0,139.0,10.0,1510358400
//! # num_axes
//! 3
//! # axis 1: pressures
//! ...
//! ```
//!
//! followed by one `height,u,v` line per `(level, latitude, longitude)`,
//! longitude varying fastest. Lines starting with `#` are comments; readers
//! rely on the counts.

use std::fmt::Debug;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use wind_common::{WindResult, Window};

use crate::extract::Selection;
use crate::fetch::WindSlices;

/// Number of axes in every file.
const NUM_AXES: usize = 3;

/// Values per data line: height, u, v.
const COMPONENTS: usize = 3;

/// Format a value the way the predictor's reader expects: shortest
/// round-trip form, integral floats keeping their `.0`.
fn fmt_value<T: Debug>(value: T) -> String {
    format!("{:?}", value)
}

fn join<T: Debug + Copy>(values: &[T]) -> String {
    values
        .iter()
        .map(|&v| fmt_value(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Substitute `%(time)`, `%(lat)`, `%(latdelta)`, `%(lon)` and
/// `%(londelta)` in an output template.
pub fn output_path(template: &str, window: &Window, timestamp: i64) -> PathBuf {
    let path = template
        .replace("%(time)", &timestamp.to_string())
        .replace("%(latdelta)", &fmt_value(window.lat_radius))
        .replace("%(londelta)", &fmt_value(window.lon_radius))
        .replace("%(lat)", &fmt_value(window.center_lat))
        .replace("%(lon)", &fmt_value(window.center_lon));
    PathBuf::from(path)
}

/// Write one tile file body.
///
/// The header lists the selected coordinates. The data section walks the
/// fetched block and skips longitudes outside the window, which narrows a
/// full-axis fetch back down to the selection.
pub fn render<W: Write>(
    out: &mut W,
    window: &Window,
    timestamp: i64,
    selection: &Selection,
    slices: &WindSlices,
) -> io::Result<usize> {
    let latitudes = selection.latitudes.values();
    let longitudes = selection.longitudes.values();
    let levels = &slices.height.levels;

    writeln!(out, "# window centre latitude, window latitude radius, window centre longitude, window longitude radius, POSIX timestamp")?;
    writeln!(
        out,
        "{},{},{},{},{}",
        fmt_value(window.center_lat),
        fmt_value(window.lat_radius),
        fmt_value(window.center_lon),
        fmt_value(window.lon_radius),
        timestamp
    )?;

    writeln!(out, "# num_axes")?;
    writeln!(out, "{}", NUM_AXES)?;

    writeln!(out, "# axis 1: pressures")?;
    writeln!(out, "{}", levels.len())?;
    writeln!(out, "{}", join(levels))?;
    writeln!(out, "# axis 2: latitudes")?;
    writeln!(out, "{}", latitudes.len())?;
    writeln!(out, "{}", join(&latitudes))?;
    writeln!(out, "# axis 3: longitudes")?;
    writeln!(out, "{}", longitudes.len())?;
    writeln!(out, "{}", join(&longitudes))?;

    writeln!(out, "# number of lines of data")?;
    writeln!(out, "{}", levels.len() * latitudes.len() * longitudes.len())?;

    writeln!(out, "# data line component count")?;
    writeln!(out, "{}", COMPONENTS)?;

    writeln!(out, "# now the data in axis 3 major order")?;
    writeln!(out, "# data is: geopotential height [gpm], u-component wind [m/s], v-component wind [m/s]")?;

    let (height, u_wind, v_wind) = (&slices.height.data, &slices.u_wind.data, &slices.v_wind.data);
    let mut lines = 0;
    for lev in 0..levels.len() {
        for (y, &lat) in slices.height.latitudes.iter().enumerate() {
            if !window.contains_latitude(lat) {
                continue;
            }
            for (x, &lon) in slices.height.longitudes.iter().enumerate() {
                if !window.contains_longitude(lon) {
                    continue;
                }
                writeln!(
                    out,
                    "{},{},{}",
                    fmt_value(height[[0, lev, y, x]]),
                    fmt_value(u_wind[[0, lev, y, x]]),
                    fmt_value(v_wind[[0, lev, y, x]])
                )?;
                lines += 1;
            }
        }
    }
    Ok(lines)
}

/// Render a tile and write it to `path`, creating parent directories.
pub async fn write_tile(
    path: &Path,
    window: &Window,
    timestamp: i64,
    selection: &Selection,
    slices: &WindSlices,
) -> WindResult<()> {
    let mut body = Vec::new();
    let lines = render(&mut body, window, timestamp, selection, slices)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!(path = %path.display(), lines, "Writing tile");
    tokio::fs::write(path, body).await?;
    Ok(())
}
