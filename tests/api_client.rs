//! Integration tests for WeatherApiClient using wiremock.

mod support;

use chrono_tz::Tz;
use support::{current_body, forecast_body};
use weathercard::config::WeatherConfig;
use weathercard::{
    Background, Coordinates, ErrorCode, LocationQuery, WeatherApiClient, WeatherCardError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::new(WeatherConfig {
        api_key: Some("test_key_123".to_string()),
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn london() -> LocationQuery {
    LocationQuery::City("London".to_string())
}

#[tokio::test]
async fn test_current_weather_by_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test_key_123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("London", "Rain", "light rain", 285.32)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let current = client_for(&mock_server)
        .get_current_weather(&london())
        .await
        .unwrap();

    assert_eq!(current.location_name, "London");
    assert_eq!(current.condition.label, "Rain");
    assert_eq!(current.format_temperature(), "12.17°C");
}

#[tokio::test]
async fn test_forecast_by_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let query = LocationQuery::from(Coordinates::new(51.5, -0.12).unwrap());
    let series = client_for(&mock_server).get_forecast(&query).await.unwrap();

    assert_eq!(series.len(), 11);
    assert_eq!(series[0].temperature_kelvin, 280.0);
}

#[tokio::test]
async fn test_fetch_report_aggregates_forecast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("London", "Clouds", "broken clouds", 288.0)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let report = client_for(&mock_server)
        .fetch_report(&london(), Some(Tz::UTC))
        .await
        .unwrap();

    assert_eq!(report.background, Background::Cloudy);
    assert_eq!(report.daily.len(), 2);
    assert_eq!(report.daily[0].day, "Monday");
    assert_eq!(report.daily[0].temperature_celsius, 16.85);
    assert_eq!(report.daily[0].condition.label, "Rain");
    assert_eq!(report.daily[1].day, "Tuesday");
    assert_eq!(report.daily[1].temperature_celsius, 11.85);
    assert_eq!(report.daily[1].condition.label, "Clouds");
}

#[tokio::test]
async fn test_unauthorized_maps_to_error_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_current_weather(&london())
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::ApiUnauthorized));
}

#[tokio::test]
async fn test_unknown_city_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let query = LocationQuery::City("Atlantis".to_string());
    let err = client_for(&mock_server)
        .get_forecast(&query)
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::ApiLocationNotFound));
    assert!(err.to_string().contains("Atlantis"));
}

#[tokio::test]
async fn test_server_error_maps_to_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_current_weather(&london())
        .await
        .unwrap_err();

    // no retries: the mock's expect(1) verifies a single call on drop
    assert_eq!(err.code(), Some(ErrorCode::ApiNetworkError));
}

#[tokio::test]
async fn test_connection_error_does_not_leak_api_key() {
    let client = WeatherApiClient::new(WeatherConfig {
        api_key: Some("SECRETKEY42".to_string()),
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: 5,
    })
    .unwrap();

    let err = client.get_current_weather(&london()).await.unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::ApiNetworkError));
    assert!(!err.to_string().contains("SECRETKEY42"), "{err}");
    assert!(!format!("{err:?}").contains("SECRETKEY42"));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_current_weather(&london())
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::ApiInvalidResponse));
}

#[tokio::test]
async fn test_forecast_entry_without_condition_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [{"dt": 1_704_067_200, "main": {"temp": 280.0}, "weather": []}]
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_forecast(&london())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherCardError::Api {
            code: ErrorCode::ApiInvalidResponse,
            ..
        }
    ));
}

#[tokio::test]
async fn test_report_fails_when_either_request_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("London", "Clear", "clear sky", 290.0)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .fetch_report(&london(), Some(Tz::UTC))
        .await;

    assert!(result.is_err());
}
