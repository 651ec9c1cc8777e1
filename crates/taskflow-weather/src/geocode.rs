//! Reverse geocoding: convert coordinates to a human-readable place name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::provider::endpoint;
use crate::types::{Coordinates, WeatherError};

/// Label used when no place name can be determined.
pub const FALLBACK_PLACE: &str = "Your Location";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl NominatimAddress {
    /// First non-empty of city > town > village.
    fn place(self) -> Option<String> {
        [self.city, self.town, self.village]
            .into_iter()
            .flatten()
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
    }
}

/// Build the reverse-geocode URL under `base_url`.
///
/// # Errors
/// Returns `WeatherError::InvalidUrl` if `base_url` can't be parsed.
pub fn reverse_url(base_url: &str, coords: Coordinates) -> Result<Url, WeatherError> {
    let mut url = endpoint(base_url, "reverse")?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("lat", &coords.latitude.to_string())
        .append_pair("lon", &coords.longitude.to_string());
    Ok(url)
}

/// Reverse geocode coordinates to a place name.
///
/// `Ok(None)` means the service answered but had no city, town or village
/// for the position; callers show [`FALLBACK_PLACE`] in both that case and
/// on error.
///
/// # Errors
/// Returns `WeatherError` on transport failure, a non-success status, or a
/// body that isn't a Nominatim response.
pub async fn reverse_geocode(
    client: &Client,
    base_url: &str,
    coords: Coordinates,
) -> Result<Option<String>, WeatherError> {
    let url = reverse_url(base_url, coords)?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        tracing::debug!("Reverse geocode returned status {}", response.status());
        return Err(WeatherError::Status(response.status().as_u16()));
    }

    let body: NominatimResponse = response
        .json()
        .await
        .map_err(|e| WeatherError::Parse(e.to_string()))?;

    let place = body.address.and_then(NominatimAddress::place);
    match &place {
        Some(name) => tracing::info!("Reverse geocoded to: {}", name),
        None => tracing::debug!("Reverse geocode returned no place name"),
    }
    Ok(place)
}
