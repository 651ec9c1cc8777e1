use std::future::Future;

use crate::types::{Coordinates, LocationError};

/// Source of the user's position.
pub trait Geolocator: Send + Sync {
    /// Ask for the current position.
    fn locate(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Position taken from configuration.
///
/// Reports `Unsupported` when no coordinates are configured and
/// `PermissionDenied` when location access is switched off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfiguredLocator {
    coordinates: Option<Coordinates>,
    enabled: bool,
}

impl ConfiguredLocator {
    pub fn new(coordinates: Option<Coordinates>, enabled: bool) -> Self {
        Self {
            coordinates,
            enabled,
        }
    }

    pub fn fixed(coordinates: Coordinates) -> Self {
        Self::new(Some(coordinates), true)
    }

    pub fn denied() -> Self {
        Self::new(None, false)
    }

    pub fn unsupported() -> Self {
        Self::new(None, true)
    }
}

impl Geolocator for ConfiguredLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        if !self.enabled {
            return Err(LocationError::PermissionDenied);
        }
        self.coordinates.ok_or(LocationError::Unsupported)
    }
}
