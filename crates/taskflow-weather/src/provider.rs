use crate::geocode;
use crate::types::{Coordinates, WeatherError, WeatherSnapshot};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("TaskFlow/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Endpoints and client options for the weather panel.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub weather_base_url: String,
    pub geocode_base_url: String,
    /// Per-request timeout. `None` lets requests run until they settle.
    pub timeout: Option<Duration>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<WeatherSnapshot>,
}

/// `base_url` with `path` appended as extra path segments.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, WeatherError> {
    let mut url =
        Url::parse(base_url).map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| WeatherError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(path.split('/'));
    Ok(url)
}

/// Build the current-weather URL under `base_url`.
///
/// # Errors
/// Returns `WeatherError::InvalidUrl` if `base_url` can't be parsed.
pub fn forecast_url(base_url: &str, coords: Coordinates) -> Result<Url, WeatherError> {
    let mut url = endpoint(base_url, "v1/forecast")?;
    url.query_pairs_mut()
        .append_pair("latitude", &coords.latitude.to_string())
        .append_pair("longitude", &coords.longitude.to_string())
        .append_pair("current_weather", "true");
    Ok(url)
}

/// HTTP access to the forecast and reverse-geocode services.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl WeatherProvider {
    /// # Errors
    /// Returns `WeatherError::Network` if the HTTP client can't be built.
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Fetch the current weather at `coords`.
    ///
    /// `Ok(None)` means the service answered with JSON that has no
    /// `current_weather` object.
    ///
    /// # Errors
    /// Returns `WeatherError` on transport failure, a non-success status, or
    /// a body that isn't valid forecast JSON.
    pub async fn current_weather(
        &self,
        coords: Coordinates,
    ) -> Result<Option<WeatherSnapshot>, WeatherError> {
        let url = forecast_url(&self.settings.weather_base_url, coords)?;
        tracing::debug!("Fetching weather from {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!("Weather request returned status {}", response.status());
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        if body.current_weather.is_none() {
            tracing::warn!("Weather response has no current_weather object");
        }
        Ok(body.current_weather)
    }

    /// Name the place at `coords`. See [`geocode::reverse_geocode`].
    ///
    /// # Errors
    /// Same as [`geocode::reverse_geocode`].
    pub async fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> Result<Option<String>, WeatherError> {
        geocode::reverse_geocode(&self.client, &self.settings.geocode_base_url, coords).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_forecast_url() {
        let url = forecast_url(DEFAULT_WEATHER_BASE_URL, Coordinates::new(48.8566, 2.3522)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.open-meteo.com/v1/forecast?latitude=48.8566&longitude=2.3522&current_weather=true"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint("http://localhost:8080/proxy/", "v1/forecast").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1/forecast");

        let url = endpoint("http://localhost:8080/proxy", "reverse").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/reverse");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(matches!(
            endpoint("not a url", "reverse"),
            Err(WeatherError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_provider_builds_without_timeout() {
        let provider = WeatherProvider::new(ProviderSettings::default()).unwrap();
        assert!(provider.settings().timeout.is_none());
    }
}
