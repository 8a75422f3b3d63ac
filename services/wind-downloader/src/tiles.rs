//! Tiling of the area of interest.

use wind_common::Window;

/// One tile of the requested area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Position along latitude, from the base tile northwards
    pub lat_index: u32,
    /// Position along longitude, from the base tile eastwards
    pub lon_index: u32,
    pub window: Window,
}

/// Lay out `lat_tiles * lon_tiles` edge-to-edge windows starting at `base`.
///
/// Each tile has the base window's half-widths and is offset by whole
/// window widths. Tiles are produced latitude-major. Centre longitudes are
/// left as computed, so they may exceed 360.
pub fn enumerate_tiles(base: &Window, lat_tiles: u32, lon_tiles: u32) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(lat_tiles as usize * lon_tiles as usize);
    for lat_index in 0..lat_tiles {
        for lon_index in 0..lon_tiles {
            let window = Window::new(
                base.center_lat + f64::from(lat_index) * base.lat_radius * 2.0,
                base.lat_radius,
                base.center_lon + f64::from(lon_index) * base.lon_radius * 2.0,
                base.lon_radius,
            );
            tiles.push(Tile {
                lat_index,
                lon_index,
                window,
            });
        }
    }
    tiles
}
