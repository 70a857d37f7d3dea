//! Integration tests for `GoogleMapsClient` using wiremock HTTP mocks.

use venuemap_core::Coordinate;
use venuemap_places::{GoogleMapsClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GoogleMapsClient {
    GoogleMapsClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry(2, 0)
}

#[tokio::test]
async fn geocode_returns_first_result_location() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                "geometry": { "location": { "lat": 37.4224, "lng": -122.0842 } }
            },
            {
                "formatted_address": "Somewhere else",
                "geometry": { "location": { "lat": 1.0, "lng": 1.0 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "1600 Amphitheatre Pkwy"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client
        .geocode("1600 Amphitheatre Pkwy")
        .await
        .expect("should geocode");

    assert_eq!(coordinate, Some(Coordinate::new(37.4224, -122.0842)));
}

#[tokio::test]
async fn geocode_zero_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client.geocode("nowhere at all").await.expect("not an error");
    assert!(coordinate.is_none());
}

#[tokio::test]
async fn geocode_request_denied_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("anything").await.unwrap_err();
    assert!(
        matches!(err, PlacesError::ApiError { ref status, .. } if status == "REQUEST_DENIED"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn search_nearby_sends_meters_and_type() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            { "place_id": "p1", "name": "Blue Bar", "vicinity": "1 Main St" },
            { "place_id": "p2", "name": "Red Bar" }
        ],
        "next_page_token": "more"
    });

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("location", "40.7,-74"))
        .and(query_param("radius", "8047"))
        .and(query_param("type", "bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .search_nearby(Coordinate::new(40.7, -74.0), 5.0, Some("bar"))
        .await
        .expect("should list places");

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].external_id, "p1");
    assert_eq!(places[0].vicinity.as_deref(), Some("1 Main St"));
    assert_eq!(places[1].name.as_deref(), Some("Red Bar"));
    assert!(places[1].vicinity.is_none());
}

#[tokio::test]
async fn search_nearby_caps_radius() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("radius", "50000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .search_nearby(Coordinate::new(0.0, 0.0), 100.0, None)
        .await
        .expect("should succeed");
    assert!(places.is_empty());
}

#[tokio::test]
async fn search_nearby_retries_over_query_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OVER_QUERY_LIMIT" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{ "place_id": "p1" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .search_nearby(Coordinate::new(1.0, 2.0), 1.0, None)
        .await
        .expect("should succeed after retry");
    assert_eq!(places.len(), 1);
}

#[tokio::test]
async fn server_error_is_retried_then_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_place_details("p1").await.unwrap_err();
    assert!(matches!(err, PlacesError::Http(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn get_place_details_returns_normalized_record() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "place_id": "p1",
            "name": "Blue Bar",
            "formatted_address": "1 Main St, Springfield",
            "geometry": { "location": { "lat": 39.78, "lng": -89.65 } },
            "rating": 4.2,
            "user_ratings_total": 87,
            "price_level": 1,
            "opening_hours": {
                "open_now": true,
                "periods": [{ "open": { "day": 0, "time": "0000" } }]
            },
            "types": ["bar", "establishment"]
        }
    });

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client
        .get_place_details("p1")
        .await
        .expect("should fetch")
        .expect("should be present");

    assert_eq!(details.name, "Blue Bar");
    assert_eq!(details.coordinate, Coordinate::new(39.78, -89.65));
    assert_eq!(details.rating_count, Some(87));
    assert_eq!(details.open_now, Some(true));
    assert_eq!(details.opening_periods.len(), 1);
    assert!(details.opening_periods[0].close.is_none());
}

#[tokio::test]
async fn get_place_details_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "NOT_FOUND" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.get_place_details("gone").await.expect("not an error");
    assert!(details.is_none());
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("x").await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }));
}
