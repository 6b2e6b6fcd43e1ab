//! Integration tests for `KakaoLocalClient` using wiremock HTTP mocks.

use mentalmap_geocode::{GeocodeError, KakaoLocalClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> KakaoLocalClient {
    KakaoLocalClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn address_to_coordinate_returns_first_match() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "documents": [
            {
                "address_name": "서울 강남구 테헤란로 1",
                "x": "127.0276",
                "y": "37.4979"
            },
            {
                "address_name": "서울 강남구 테헤란로 10",
                "x": "127.0300",
                "y": "37.4990"
            }
        ],
        "meta": { "total_count": 2 }
    });

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .and(query_param("query", "서울 강남구 테헤란로 1"))
        .and(query_param("size", "1"))
        .and(header("Authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client
        .address_to_coordinate("서울 강남구 테헤란로 1")
        .await
        .expect("should resolve address");

    assert!((coordinate.lat - 37.4979).abs() < 1e-9);
    assert!((coordinate.lng - 127.0276).abs() < 1e-9);
}

#[tokio::test]
async fn empty_documents_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "documents": [], "meta": { "total_count": 0 } })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.address_to_coordinate("존재하지 않는 주소 999").await;

    assert!(
        matches!(result, Err(GeocodeError::NoMatch { ref address }) if address == "존재하지 않는 주소 999"),
        "expected NoMatch, got: {result:?}"
    );
}

#[tokio::test]
async fn unauthorized_surfaces_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.address_to_coordinate("서울 강남구").await;

    assert!(
        matches!(result, Err(GeocodeError::HttpStatus { status: 401, .. })),
        "expected HttpStatus(401), got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_coordinate_strings_are_rejected() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "documents": [
            { "address_name": "어딘가", "x": "not-a-number", "y": "37.0" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.address_to_coordinate("어딘가").await;

    assert!(
        matches!(result, Err(GeocodeError::InvalidResponseCoordinate { .. })),
        "expected InvalidResponseCoordinate, got: {result:?}"
    );
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let server = MockServer::start().await;

    // Swapped x/y would put latitude at 127°, which must not pass validation.
    let body = serde_json::json!({
        "documents": [
            { "address_name": "어딘가", "x": "37.4979", "y": "127.0276" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.address_to_coordinate("어딘가").await;

    assert!(
        matches!(result, Err(GeocodeError::InvalidResponseCoordinate { .. })),
        "expected InvalidResponseCoordinate, got: {result:?}"
    );
}

#[tokio::test]
async fn retry_wrapper_recovers_from_server_errors() {
    let server = MockServer::start().await;

    // First two attempts fail with 503, then the mock is exhausted and the
    // success mock below takes over.
    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                { "address_name": "서울 중구", "x": "126.9780", "y": "37.5665" }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client
        .address_to_coordinate_with_retry("서울 중구", 3, 1)
        .await
        .expect("should recover after transient 503s");

    assert!((coordinate.lat - 37.5665).abs() < 1e-9);
}
