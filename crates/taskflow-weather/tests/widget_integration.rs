//! Integration tests for WeatherWidget using wiremock.
//!
//! Both endpoints are served by mock servers so every mix of success and
//! failure can be driven through a real mount.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::NaiveDate;

use taskflow_weather::{
    ConfiguredLocator, Coordinates, ProviderSettings, WeatherProvider, WeatherSlot, WeatherWidget,
    WidgetError, WidgetState, WidgetView, FALLBACK_PLACE,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris() -> Coordinates {
    Coordinates::new(48.8566, 2.3522)
}

fn forecast_body(temperature: f64, weathercode: i32) -> serde_json::Value {
    serde_json::json!({
        "latitude": 48.86,
        "longitude": 2.35,
        "current_weather": {
            "time": "2026-10-16T14:00",
            "interval": 900,
            "temperature": temperature,
            "windspeed": 11.5,
            "winddirection": 240,
            "is_day": 1,
            "weathercode": weathercode
        }
    })
}

fn provider(weather: &MockServer, geocode: &MockServer) -> WeatherProvider {
    WeatherProvider::new(ProviderSettings {
        weather_base_url: weather.uri(),
        geocode_base_url: geocode.uri(),
        timeout: None,
    })
    .unwrap()
}

async fn mount_weather(response: ResponseTemplate, server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.8566"))
        .and(query_param("longitude", "2.3522"))
        .and(query_param("current_weather", "true"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_geocode(response: ResponseTemplate, server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("lat", "48.8566"))
        .and(query_param("lon", "2.3522"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_renders_card() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(
        ResponseTemplate::new(200).set_body_json(forecast_body(17.5, 2)),
        &weather,
    )
    .await;
    mount_geocode(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "city": "Paris", "country": "France" }
        })),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let state = widget.mount().await;

    assert_eq!(
        state.view(),
        WidgetView::Card {
            title: "Paris".to_string(),
            temperature: 18,
            description: "Cloudy",
            icon: "cloud",
            observed_at: NaiveDate::from_ymd_opt(2026, 10, 16).and_then(|d| d.and_hms_opt(14, 0, 0)),
        }
    );
}

#[tokio::test]
async fn test_weather_failure_with_city_is_error() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(ResponseTemplate::new(500).set_body_string("upstream down"), &weather).await;
    mount_geocode(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "city": "Paris" }
        })),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let state = widget.mount().await;

    assert_eq!(state, WidgetState::Error(WidgetError::WeatherUnavailable));
    assert_eq!(state.view(), WidgetView::Failure("Could not fetch weather data."));
}

#[tokio::test]
async fn test_unparseable_weather_is_error() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(ResponseTemplate::new(200).set_body_string("<html>"), &weather).await;
    mount_geocode(ResponseTemplate::new(200).set_body_json(serde_json::json!({})), &geocode).await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    assert_eq!(
        widget.mount().await,
        WidgetState::Error(WidgetError::WeatherUnavailable)
    );
}

#[tokio::test]
async fn test_geocode_failure_falls_back_to_placeholder() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(
        ResponseTemplate::new(200).set_body_json(forecast_body(4.2, 95)),
        &weather,
    )
    .await;
    mount_geocode(ResponseTemplate::new(503), &geocode).await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let state = widget.mount().await;

    assert_eq!(
        state.view(),
        WidgetView::Card {
            title: FALLBACK_PLACE.to_string(),
            temperature: 4,
            description: "Thunderstorm",
            icon: "cloud_lightning",
            observed_at: NaiveDate::from_ymd_opt(2026, 10, 16).and_then(|d| d.and_hms_opt(14, 0, 0)),
        }
    );
}

#[tokio::test]
async fn test_town_used_when_no_city() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(
        ResponseTemplate::new(200).set_body_json(forecast_body(10.0, 0)),
        &weather,
    )
    .await;
    mount_geocode(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "town": "Honfleur", "state": "Normandie" }
        })),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let state = widget.mount().await;
    assert!(matches!(state, WidgetState::Ready { ref location, .. } if location == "Honfleur"));
}

#[tokio::test]
async fn test_missing_current_weather_renders_blank() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": false })),
        &weather,
    )
    .await;
    mount_geocode(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "village": "Giverny" }
        })),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let state = widget.mount().await;

    assert_eq!(
        state,
        WidgetState::Ready {
            weather: WeatherSlot::Missing,
            location: "Giverny".to_string(),
        }
    );
    assert_eq!(state.view(), WidgetView::Blank);
}

#[tokio::test]
async fn test_slow_geocode_keeps_skeleton_until_it_settles() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(
        ResponseTemplate::new(200).set_body_json(forecast_body(21.0, 0)),
        &weather,
    )
    .await;
    mount_geocode(
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "address": { "city": "Paris" } }))
            .set_delay(Duration::from_millis(300)),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let mut views = Vec::new();
    let state = widget.mount_with(|s| views.push(s.view())).await;

    // Initial skeleton, still skeleton after weather, then the card
    assert_eq!(views.len(), 3);
    assert_eq!(views[0], WidgetView::Skeleton);
    assert_eq!(views[1], WidgetView::Skeleton);
    assert!(matches!(views[2], WidgetView::Card { .. }));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_fast_weather_failure_waits_for_slow_geocode() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    mount_weather(ResponseTemplate::new(500), &weather).await;
    mount_geocode(
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "address": { "city": "Paris" } }))
            .set_delay(Duration::from_millis(300)),
        &geocode,
    )
    .await;

    let widget = WeatherWidget::new(ConfiguredLocator::fixed(paris()), provider(&weather, &geocode));
    let mut views = Vec::new();
    let state = widget.mount_with(|s| views.push(s.view())).await;

    assert_eq!(
        views,
        vec![
            WidgetView::Skeleton,
            WidgetView::Skeleton,
            WidgetView::Failure("Could not fetch weather data."),
        ]
    );
    assert_eq!(state, WidgetState::Error(WidgetError::WeatherUnavailable));
}

#[tokio::test]
async fn test_location_denied_makes_no_requests() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&geocode)
        .await;

    let widget = WeatherWidget::new(ConfiguredLocator::denied(), provider(&weather, &geocode));
    let mut seen = Vec::new();
    let state = widget.mount_with(|s| seen.push(s.clone())).await;

    assert_eq!(state, WidgetState::Error(WidgetError::LocationDenied));
    assert_eq!(
        seen,
        vec![
            WidgetState::new(),
            WidgetState::Error(WidgetError::LocationDenied)
        ]
    );
    assert!(weather.received_requests().await.unwrap_or_default().is_empty());
    assert!(geocode.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_unsupported_location_is_error() {
    let weather = MockServer::start().await;
    let geocode = MockServer::start().await;

    let widget = WeatherWidget::new(ConfiguredLocator::unsupported(), provider(&weather, &geocode));
    let state = widget.mount().await;

    assert_eq!(state, WidgetState::Error(WidgetError::Unsupported));
    assert_eq!(
        state.view(),
        WidgetView::Failure("Geolocation is not supported on this system.")
    );
}
