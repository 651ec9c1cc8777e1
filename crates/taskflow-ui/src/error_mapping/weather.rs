use taskflow_core::{AppError, ConfigError, NetworkError};
use taskflow_weather::WeatherError;

use super::IntoAppError;

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::Network(e) => {
                let network = if e.is_timeout() {
                    NetworkError::Timeout
                } else if let Some(status) = e.status() {
                    NetworkError::ServerError {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    NetworkError::ConnectionFailed(e.to_string())
                };
                AppError::Network(network)
            }
            WeatherError::Status(status) => AppError::Network(NetworkError::ServerError {
                status,
                message: format!("HTTP {}", status),
            }),
            WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            WeatherError::InvalidUrl(url) => AppError::Config(ConfigError::Invalid(url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_server_error() {
        let err = WeatherError::Status(502).into_app_error();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::ServerError { status: 502, .. })
        ));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let err = WeatherError::InvalidUrl("nope".into()).into_app_error();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
    }
}
