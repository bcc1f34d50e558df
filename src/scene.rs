//! In-process map provider.
//!
//! Maps and lines live in memory; the browser page pulls them as JSON and
//! draws them on top of the configured tile layer.

use geo::{Coord, LineString};
use geojson::{Feature, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::MapConfig,
    model::{GeoPoint, LineStyle, MapOptions},
    provider::{MapProvider, Provider, ProviderError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineId(usize);

#[derive(Debug, Clone, Serialize)]
pub struct MapSurface {
    pub container: String,
    #[serde(flatten)]
    pub options: MapOptions,
    pub tile_url: String,
    pub attribution: String,
}

#[derive(Debug, Clone)]
struct Line {
    points: Vec<GeoPoint>,
    style: LineStyle,
    map: Option<MapId>,
}

#[derive(Debug)]
pub struct SceneProvider {
    tile_url: String,
    attribution: String,
    maps: Vec<MapSurface>,
    lines: Vec<Line>,
}

impl SceneProvider {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
            maps: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// The provider is only usable once a tile layer has been configured.
    pub fn probe(config: Option<&MapConfig>) -> Provider<Self> {
        match config {
            Some(config) => Provider::Ready(Self::new(config)),
            None => Provider::Unavailable,
        }
    }

    pub fn map(&self, id: MapId) -> Option<&MapSurface> {
        self.maps.get(id.0)
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// A line as a GeoJSON feature, with its style in the properties.
    pub fn line_feature(&self, id: LineId) -> Option<Feature> {
        let line = self.lines.get(id.0)?;
        let geometry: LineString = line.points.iter().copied().map(Coord::from).collect();

        let mut properties = JsonObject::new();
        properties.insert("geodesic".into(), json!(line.style.geodesic));
        properties.insert("strokeColor".into(), json!(line.style.stroke_color));
        properties.insert("strokeOpacity".into(), json!(line.style.stroke_opacity));
        properties.insert("strokeWeight".into(), json!(line.style.stroke_weight));
        properties.insert("attached".into(), json!(line.map.is_some()));

        Some(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut Line, ProviderError> {
        self.lines
            .get_mut(id.0)
            .ok_or(ProviderError::UnknownLine(id.0))
    }
}

impl MapProvider for SceneProvider {
    type Map = MapId;
    type Line = LineId;

    fn create_map(&mut self, container: &str, options: &MapOptions) -> Result<MapId, ProviderError> {
        self.maps.push(MapSurface {
            container: container.to_string(),
            options: options.clone(),
            tile_url: self.tile_url.clone(),
            attribution: self.attribution.clone(),
        });
        Ok(MapId(self.maps.len() - 1))
    }

    fn create_line(&mut self, points: Vec<GeoPoint>, style: &LineStyle) -> LineId {
        self.lines.push(Line {
            points,
            style: style.clone(),
            map: None,
        });
        LineId(self.lines.len() - 1)
    }

    fn attach(&mut self, line: &LineId, map: &MapId) -> Result<(), ProviderError> {
        if self.maps.get(map.0).is_none() {
            return Err(ProviderError::UnknownMap(map.0));
        }
        self.line_mut(*line)?.map = Some(*map);
        Ok(())
    }

    fn detach(&mut self, line: &LineId) -> Result<(), ProviderError> {
        self.line_mut(*line)?.map = None;
        Ok(())
    }

    fn coordinates(&self, line: &LineId) -> Result<Vec<GeoPoint>, ProviderError> {
        self.lines
            .get(line.0)
            .map(|x| x.points.clone())
            .ok_or(ProviderError::UnknownLine(line.0))
    }

    fn set_coordinates(&mut self, line: &LineId, points: Vec<GeoPoint>) -> Result<(), ProviderError> {
        self.line_mut(*line)?.points = points;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MapConfig {
        MapConfig {
            tile_url: "https://tiles.test/{z}/{x}/{y}.png".to_string(),
            attribution: "test".to_string(),
        }
    }

    #[test]
    fn probe() {
        assert!(!SceneProvider::probe(None).is_ready());
        assert!(SceneProvider::probe(Some(&config())).is_ready());
    }

    #[test]
    fn line_lifecycle() {
        let mut scene = SceneProvider::new(&config());
        let map = scene.create_map("map", &MapOptions::default()).unwrap();
        let line = scene.create_line(
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)],
            &LineStyle::default(),
        );

        scene.attach(&line, &map).unwrap();
        let feature = scene.line_feature(line).unwrap();
        let properties = feature.properties.unwrap();
        assert_eq!(properties["attached"], json!(true));
        assert_eq!(properties["strokeColor"], json!("#0096FF"));
        assert_eq!(
            feature.geometry.unwrap().value,
            Value::LineString(vec![vec![2.0, 1.0], vec![4.0, 3.0]])
        );

        scene
            .set_coordinates(&line, vec![GeoPoint::new(5.0, 6.0)])
            .unwrap();
        assert_eq!(
            scene.coordinates(&line).unwrap(),
            vec![GeoPoint::new(5.0, 6.0)]
        );

        scene.detach(&line).unwrap();
        let properties = scene.line_feature(line).unwrap().properties.unwrap();
        assert_eq!(properties["attached"], json!(false));
    }

    #[test]
    fn unknown_handles() {
        let mut scene = SceneProvider::new(&config());
        let line = scene.create_line(Vec::new(), &LineStyle::default());
        assert_eq!(
            scene.attach(&line, &MapId(3)),
            Err(ProviderError::UnknownMap(3))
        );
        assert_eq!(
            scene.coordinates(&LineId(9)),
            Err(ProviderError::UnknownLine(9))
        );
        assert!(scene.line_feature(LineId(9)).is_none());
    }

    #[test]
    fn surface_carries_tile_layer() {
        let mut scene = SceneProvider::new(&config());
        let map = scene.create_map("map", &MapOptions::default()).unwrap();
        let surface = scene.map(map).unwrap();
        assert_eq!(surface.container, "map");
        assert_eq!(surface.options.zoom, 12);

        let value = serde_json::to_value(surface).unwrap();
        assert_eq!(value["map_type"], json!("roadmap"));
        assert_eq!(value["center"]["lat"], json!(40.8829378816515));
    }
}
