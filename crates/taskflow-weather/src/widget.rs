//! Weather panel state machine.
//!
//! The panel starts in `Loading`, asks a [`Geolocator`] for a position and,
//! if it gets one, fires the weather and reverse-geocode requests at the
//! same time. Each completion arrives as a [`WidgetEvent`] and is folded
//! into the state by [`WidgetState::apply`], which is pure so every ordering
//! of completions can be checked without a network.
//!
//! The reverse-geocode completion, not the weather completion, moves the
//! panel out of `Loading`. A fast weather answer therefore waits for the
//! place name, and so does a fast weather failure. A panel can be `Ready`
//! while its weather slot is still pending or missing (rendered as blank).

use chrono::NaiveDateTime;
use tokio::sync::mpsc;

use crate::geocode::FALLBACK_PLACE;
use crate::location::Geolocator;
use crate::provider::WeatherProvider;
use crate::types::{Coordinates, LocationError, WeatherSnapshot};

/// Title shown when the place label is empty.
pub const DEFAULT_TITLE: &str = "Current Weather";

/// What is known about the weather reading.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherSlot {
    /// Request still in flight
    Pending,
    /// Service answered without a `current_weather` object
    Missing,
    /// Request failed; reported once the place settles
    Failed,
    Loaded(WeatherSnapshot),
}

impl From<Option<WeatherSnapshot>> for WeatherSlot {
    fn from(snapshot: Option<WeatherSnapshot>) -> Self {
        match snapshot {
            Some(snapshot) => Self::Loaded(snapshot),
            None => Self::Missing,
        }
    }
}

/// Terminal failures, each with a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetError {
    LocationDenied,
    Unsupported,
    WeatherUnavailable,
}

impl WidgetError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LocationDenied => "Location access denied. Please enable it in your settings.",
            Self::Unsupported => "Geolocation is not supported on this system.",
            Self::WeatherUnavailable => "Could not fetch weather data.",
        }
    }
}

impl From<LocationError> for WidgetError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::PermissionDenied => Self::LocationDenied,
            LocationError::Unsupported => Self::Unsupported,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    LocationDenied,
    LocationUnsupported,
    /// Position known; both requests are now in flight.
    Located(Coordinates),
    WeatherLoaded(Option<WeatherSnapshot>),
    WeatherFailed,
    PlaceResolved(Option<String>),
    PlaceFailed,
}

impl From<LocationError> for WidgetEvent {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::PermissionDenied => Self::LocationDenied,
            LocationError::Unsupported => Self::LocationUnsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    /// Geocode has not settled yet.
    Loading { weather: WeatherSlot },
    Error(WidgetError),
    /// Geocode settled; `location` is never empty.
    Ready {
        weather: WeatherSlot,
        location: String,
    },
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::Loading {
            weather: WeatherSlot::Pending,
        }
    }
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state.
    pub fn apply(self, event: WidgetEvent) -> Self {
        use WidgetEvent as E;

        match (self, event) {
            (Self::Error(e), _) => Self::Error(e),

            (_, E::LocationDenied) => Self::Error(WidgetError::LocationDenied),
            (_, E::LocationUnsupported) => Self::Error(WidgetError::Unsupported),
            (state, E::Located(_)) => state,

            (Self::Loading { .. }, E::WeatherFailed) => Self::Loading {
                weather: WeatherSlot::Failed,
            },
            (Self::Ready { .. }, E::WeatherFailed) => Self::Error(WidgetError::WeatherUnavailable),
            (Self::Loading { .. }, E::WeatherLoaded(snapshot)) => Self::Loading {
                weather: snapshot.into(),
            },
            (Self::Ready { location, .. }, E::WeatherLoaded(snapshot)) => Self::Ready {
                weather: snapshot.into(),
                location,
            },

            (
                Self::Loading {
                    weather: WeatherSlot::Failed,
                },
                E::PlaceResolved(_) | E::PlaceFailed,
            ) => Self::Error(WidgetError::WeatherUnavailable),
            (Self::Loading { weather }, E::PlaceResolved(name)) => Self::Ready {
                weather,
                location: name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_PLACE.to_string()),
            },
            (Self::Loading { weather }, E::PlaceFailed) => Self::Ready {
                weather,
                location: FALLBACK_PLACE.to_string(),
            },
            // Geocode settles once per mount
            (ready @ Self::Ready { .. }, E::PlaceResolved(_) | E::PlaceFailed) => ready,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// What the panel shows for this state.
    pub fn view(&self) -> WidgetView {
        match self {
            Self::Loading { .. } => WidgetView::Skeleton,
            Self::Error(e) => WidgetView::Failure(e.message()),
            Self::Ready {
                weather: WeatherSlot::Loaded(snapshot),
                location,
            } => {
                let condition = snapshot.condition();
                WidgetView::Card {
                    title: if location.is_empty() {
                        DEFAULT_TITLE.to_string()
                    } else {
                        location.clone()
                    },
                    temperature: snapshot.rounded_temperature(),
                    description: condition.description(),
                    icon: condition.icon_name(),
                    observed_at: snapshot.observed_at(),
                }
            }
            Self::Ready { .. } => WidgetView::Blank,
        }
    }
}

/// Render-ready projection of [`WidgetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    Skeleton,
    Failure(&'static str),
    /// Loaded with no weather to show
    Blank,
    Card {
        title: String,
        /// Whole degrees Celsius
        temperature: i64,
        description: &'static str,
        icon: &'static str,
        /// When the reading was taken, if the service's timestamp parsed
        observed_at: Option<NaiveDateTime>,
    },
}

/// Runs one mount of the weather panel.
#[derive(Debug, Clone)]
pub struct WeatherWidget<G> {
    locator: G,
    provider: WeatherProvider,
}

impl<G: Geolocator> WeatherWidget<G> {
    pub fn new(locator: G, provider: WeatherProvider) -> Self {
        Self { locator, provider }
    }

    /// Run the panel to completion and return the final state.
    pub async fn mount(&self) -> WidgetState {
        self.mount_with(|_| {}).await
    }

    /// Like [`mount`](Self::mount), calling `on_change` with the initial
    /// state and after every transition.
    ///
    /// Requests run as spawned tasks and are never cancelled; if this future
    /// is dropped early they still finish and their results are discarded.
    pub async fn mount_with<F>(&self, mut on_change: F) -> WidgetState
    where
        F: FnMut(&WidgetState),
    {
        let mut state = WidgetState::new();
        on_change(&state);

        let coords = match self.locator.locate().await {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!("Location unavailable: {}", e);
                state = state.apply(e.into());
                on_change(&state);
                return state;
            }
        };
        tracing::info!("Got location: {}, {}", coords.latitude, coords.longitude);
        state = state.apply(WidgetEvent::Located(coords));

        let (tx, mut rx) = mpsc::unbounded_channel();

        let weather_tx = tx.clone();
        let provider = self.provider.clone();
        tokio::spawn(async move {
            let event = match provider.current_weather(coords).await {
                Ok(snapshot) => WidgetEvent::WeatherLoaded(snapshot),
                Err(e) => {
                    tracing::warn!("Weather fetch failed: {}", e);
                    WidgetEvent::WeatherFailed
                }
            };
            let _ = weather_tx.send(event);
        });

        let provider = self.provider.clone();
        tokio::spawn(async move {
            let event = match provider.reverse_geocode(coords).await {
                Ok(place) => WidgetEvent::PlaceResolved(place),
                Err(e) => {
                    tracing::debug!("Reverse geocode failed: {}", e);
                    WidgetEvent::PlaceFailed
                }
            };
            let _ = tx.send(event);
        });

        // Closes once both tasks have sent (or died)
        while let Some(event) = rx.recv().await {
            tracing::debug!(?event, "Weather panel event");
            state = state.apply(event);
            on_change(&state);
        }

        state
    }
}
