//! Web-Mercator slippy-map tile math.

use std::f64::consts::PI;

/// Default OpenStreetMap tile server URL template.
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org";

/// Highest zoom level the tile servers provide.
pub const MAX_ZOOM: u8 = 19;

/// A tile address at a given zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Tile containing a WGS84 coordinate at the given zoom level.
    ///
    /// Latitude is clamped to the Web-Mercator domain before projection;
    /// the zoom level is clamped to [`MAX_ZOOM`].
    pub fn containing(lat: f64, lon: f64, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let n = f64::from(1u32 << zoom);

        let lat = lat.clamp(-85.05112878, 85.05112878);
        let lat_rad = lat.to_radians();

        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

        let max_index = (1u32 << zoom) - 1;
        Self {
            zoom,
            x: (x.max(0.0) as u32).min(max_index),
            y: (y.max(0.0) as u32).min(max_index),
        }
    }

    /// Geographic bounds of this tile as
    /// `(min_lat, min_lon, max_lat, max_lon)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = f64::from(1u32 << self.zoom);

        let lon0 = f64::from(self.x) / n * 360.0 - 180.0;
        let lon1 = f64::from(self.x + 1) / n * 360.0 - 180.0;

        // Inverse Mercator: tile y grows southwards.
        let lat0 = (PI * (1.0 - 2.0 * f64::from(self.y + 1) / n)).sinh().atan().to_degrees();
        let lat1 = (PI * (1.0 - 2.0 * f64::from(self.y) / n)).sinh().atan().to_degrees();

        (lat0, lon0, lat1, lon1)
    }
}

/// Tile image URL on an OSM-compatible tile server.
pub fn osm_tile_url(base_url: &str, tile: TileCoord) -> String {
    format!(
        "{}/{}/{}/{}.png",
        base_url.trim_end_matches('/'),
        tile.zoom,
        tile.x,
        tile.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_tile_at_zoom_zero() {
        let tile = TileCoord::containing(44.97, -93.26, 0);
        assert_eq!(tile, TileCoord { zoom: 0, x: 0, y: 0 });
    }

    #[test]
    fn minneapolis_tile_at_zoom_ten() {
        // Known slippy-map tile for downtown Minneapolis.
        let tile = TileCoord::containing(44.9778, -93.2650, 10);
        assert_eq!(tile.x, 246);
        assert_eq!(tile.y, 368);
    }

    #[test]
    fn tile_bounds_contain_origin_point() {
        let tile = TileCoord::containing(44.9778, -93.2650, 12);
        let (min_lat, min_lon, max_lat, max_lon) = tile.bounds();
        assert!(min_lat < 44.9778 && 44.9778 < max_lat);
        assert!(min_lon < -93.2650 && -93.2650 < max_lon);
    }

    #[test]
    fn latitude_clamped_to_mercator_domain() {
        let tile = TileCoord::containing(89.9, 0.0, 5);
        assert_eq!(tile.y, 0);
        let tile = TileCoord::containing(-89.9, 0.0, 5);
        assert_eq!(tile.y, 31);
    }

    #[test]
    fn url_formatting() {
        let tile = TileCoord { zoom: 10, x: 246, y: 368 };
        assert_eq!(
            osm_tile_url(OSM_TILE_URL, tile),
            "https://tile.openstreetmap.org/10/246/368.png"
        );
    }
}
