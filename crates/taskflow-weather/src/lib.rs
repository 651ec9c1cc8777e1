//! Weather panel for TaskFlow
//!
//! Looks up the current weather for the user's position via Open-Meteo and
//! names the place via Nominatim, driving a small loading/error/ready state
//! machine the presentation layer renders.

pub mod geocode;
pub mod location;
pub mod provider;
pub mod types;
pub mod widget;

pub use geocode::FALLBACK_PLACE;
pub use location::{ConfiguredLocator, Geolocator};
pub use provider::{ProviderSettings, WeatherProvider};
pub use types::*;
pub use widget::{WeatherSlot, WeatherWidget, WidgetError, WidgetEvent, WidgetState, WidgetView};
