use thiserror::Error;

use crate::model::{GeoPoint, LineStyle, MapOptions};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no map with handle {0}")]
    UnknownMap(usize),
    #[error("no line with handle {0}")]
    UnknownLine(usize),
}

/// The capabilities the view needs from a map backend.
pub trait MapProvider {
    type Map: Clone;
    type Line: Clone;

    /// Mount a new map into the named container.
    fn create_map(&mut self, container: &str, options: &MapOptions)
        -> Result<Self::Map, ProviderError>;

    /// Create a line feature. It is not shown until attached to a map.
    fn create_line(&mut self, points: Vec<GeoPoint>, style: &LineStyle) -> Self::Line;

    fn attach(&mut self, line: &Self::Line, map: &Self::Map) -> Result<(), ProviderError>;

    fn detach(&mut self, line: &Self::Line) -> Result<(), ProviderError>;

    /// Read back the current point sequence of a line.
    fn coordinates(&self, line: &Self::Line) -> Result<Vec<GeoPoint>, ProviderError>;

    /// Replace the point sequence of a line in place.
    fn set_coordinates(
        &mut self,
        line: &Self::Line,
        points: Vec<GeoPoint>,
    ) -> Result<(), ProviderError>;
}

/// A map provider that may not have finished loading.
#[derive(Debug)]
pub enum Provider<P> {
    Unavailable,
    Ready(P),
}

impl<P> Provider<P> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Provider::Ready(_))
    }

    pub fn as_ref(&self) -> Option<&P> {
        match self {
            Provider::Ready(p) => Some(p),
            Provider::Unavailable => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut P> {
        match self {
            Provider::Ready(p) => Some(p),
            Provider::Unavailable => None,
        }
    }
}
