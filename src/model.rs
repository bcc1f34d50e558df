use geo::{Coord, HaversineLength, LineString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Container element the map is mounted into.
pub const MAP_CONTAINER: &str = "map";

pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 40.8829378816515,
    lon: -98.37406855532743,
};
pub const DEFAULT_ZOOM: u8 = 12;

/// A latitude/longitude pair in degrees. Values are not range checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for Coord {
    fn from(value: GeoPoint) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapType {
    #[default]
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub center: GeoPoint,
    pub zoom: u8,
    pub map_type: MapType,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            map_type: MapType::Roadmap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub geodesic: bool,
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_weight: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            geodesic: true,
            stroke_color: "#0096FF".to_string(),
            stroke_opacity: 1.0,
            stroke_weight: 5,
        }
    }
}

/// Great-circle length of a path in metres.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    let line: LineString = points.iter().copied().map(Coord::from).collect();
    line.haversine_length()
}
