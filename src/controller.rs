//! The map view: mounts one map, draws the path loaded from the coordinate
//! source and trims it on request.

use log::{debug, error, info, warn};

use crate::{
    gps::parse_path,
    model::{GeoPoint, LineStyle, MapOptions, MAP_CONTAINER},
    provider::{MapProvider, Provider},
    source::{CoordinateSource, FetchError},
};

/// Points removed by one press of the trim button.
pub const TRIM_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum PathState<L> {
    NoFeature,
    Loading,
    LoadFailed(String),
    FeatureAttached(L),
}

pub struct ViewController<P: MapProvider> {
    provider: Provider<P>,
    resource: String,
    map: Option<P::Map>,
    state: PathState<P::Line>,
}

impl<P: MapProvider> ViewController<P> {
    pub fn new(provider: Provider<P>, resource: impl Into<String>) -> Self {
        Self {
            provider,
            resource: resource.into(),
            map: None,
            state: PathState::NoFeature,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn map(&self) -> Option<&P::Map> {
        self.map.as_ref()
    }

    pub fn state(&self) -> &PathState<P::Line> {
        &self.state
    }

    /// Mount the map. Returns true when the coordinate resource should now be
    /// fetched and handed to [`complete_initialize`](Self::complete_initialize).
    pub fn begin_initialize(&mut self) -> bool {
        if self.map.is_some() {
            return false;
        }

        let Some(provider) = self.provider.as_mut() else {
            warn!("map provider is not loaded");
            return false;
        };

        let options = MapOptions::default();
        match provider.create_map(MAP_CONTAINER, &options) {
            Ok(map) => {
                info!(
                    "mounted map at {}, {} zoom {}",
                    options.center.lat, options.center.lon, options.zoom
                );
                self.map = Some(map);
                self.state = PathState::Loading;
                true
            }
            Err(e) => {
                warn!("failed to create map: {e}");
                false
            }
        }
    }

    /// Draw the fetched path, or record why it couldn't be loaded.
    pub fn complete_initialize(&mut self, result: Result<String, FetchError>) {
        if !matches!(self.state, PathState::Loading) {
            debug!("discarding {} fetched after the view changed", self.resource);
            return;
        }
        let (Some(provider), Some(map)) = (self.provider.as_mut(), self.map.as_ref()) else {
            return;
        };

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                error!("failed to load {}: {e}", self.resource);
                self.state = PathState::LoadFailed(e.to_string());
                return;
            }
        };

        let points = parse_path(&data);
        let count = points.len();
        let line = provider.create_line(points, &LineStyle::default());
        if let Err(e) = provider.attach(&line, map) {
            error!("failed to attach path: {e}");
            self.state = PathState::LoadFailed(e.to_string());
            return;
        }

        info!("drew path of {count} points from {}", self.resource);
        self.state = PathState::FeatureAttached(line);
    }

    pub async fn initialize<S: CoordinateSource>(&mut self, source: &S) {
        if self.begin_initialize() {
            let result = source.fetch(&self.resource).await;
            self.complete_initialize(result);
        }
    }

    /// The points of the attached path, if there is one.
    pub fn path(&self) -> Option<Vec<GeoPoint>> {
        let PathState::FeatureAttached(line) = &self.state else {
            return None;
        };
        self.provider.as_ref()?.coordinates(line).ok()
    }

    /// Drop up to `count` leading points of the attached path. Returns the
    /// number of points left, or `None` when no path is attached.
    pub fn trim_leading(&mut self, count: usize) -> Option<usize> {
        let PathState::FeatureAttached(line) = &self.state else {
            return None;
        };
        let provider = self.provider.as_mut()?;

        let mut points = match provider.coordinates(line) {
            Ok(x) => x,
            Err(e) => {
                warn!("failed to read path: {e}");
                return None;
            }
        };
        points.drain(..count.min(points.len()));
        let remaining = points.len();

        if let Err(e) = provider.set_coordinates(line, points) {
            warn!("failed to update path: {e}");
            return None;
        }

        debug!("trimmed path to {remaining} points");
        Some(remaining)
    }

    pub fn trim_leading_10(&mut self) -> Option<usize> {
        self.trim_leading(TRIM_COUNT)
    }

    /// Detach the path from the map. A fetch still in flight is discarded.
    pub fn unmount(&mut self) {
        if let (PathState::FeatureAttached(line), Some(provider)) =
            (&self.state, self.provider.as_mut())
        {
            if let Err(e) = provider.detach(line) {
                warn!("failed to detach path: {e}");
            }
        }
        self.state = PathState::NoFeature;
    }
}
