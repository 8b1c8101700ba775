//! HTTP-level tests for the search API, backed by an in-memory provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use brewzzle_core::provider::{PlacesProvider, ProviderError, ProviderResult};
use brewzzle_core::{
    Config, DayTime, NearbyQuery, OpeningHours, Period, Place, ProviderConfig, ProviderResponse,
};
use brewzzle_server::api::create_router;
use brewzzle_server::state::AppState;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Text(String, Option<String>),
    Nearby(NearbyQuery),
    Type(String, Option<String>),
    Details(String, Option<Vec<String>>),
}

#[derive(Default)]
struct StubProvider {
    page: ProviderResponse,
    details: HashMap<String, ProviderResponse>,
    error: Option<fn() -> ProviderError>,
    calls: Mutex<Vec<Call>>,
}

impl StubProvider {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: Call, response: ProviderResponse) -> ProviderResult<ProviderResponse> {
        self.calls.lock().unwrap().push(call);
        match self.error {
            Some(make_error) => Err(make_error()),
            None => Ok(response),
        }
    }
}

#[async_trait]
impl PlacesProvider for StubProvider {
    async fn text_search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        self.respond(
            Call::Text(query.into(), page_token.map(Into::into)),
            self.page.clone(),
        )
    }

    async fn nearby_search(&self, query: &NearbyQuery) -> ProviderResult<ProviderResponse> {
        self.respond(Call::Nearby(query.clone()), self.page.clone())
    }

    async fn type_search(
        &self,
        place_type: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        self.respond(
            Call::Type(place_type.into(), page_token.map(Into::into)),
            self.page.clone(),
        )
    }

    async fn place_details(
        &self,
        place_id: &str,
        fields: Option<&[String]>,
    ) -> ProviderResult<ProviderResponse> {
        let response = self
            .details
            .get(place_id)
            .cloned()
            .unwrap_or_else(|| ProviderResponse::details(None));
        self.respond(
            Call::Details(place_id.into(), fields.map(<[String]>::to_vec)),
            response,
        )
    }
}

fn cafe(id: &str, open_now: Option<bool>) -> Place {
    Place {
        place_id: Some(id.into()),
        name: Some(format!("Cafe {id}")),
        formatted_address: Some(format!("{id} Main St")),
        opening_hours: open_now.map(|open_now| OpeningHours {
            open_now: Some(open_now),
            ..OpeningHours::default()
        }),
        ..Place::default()
    }
}

fn schedule(open: &str, close: Option<&str>) -> ProviderResponse {
    ProviderResponse::details(Some(Place {
        opening_hours: Some(OpeningHours {
            periods: vec![Period {
                open: Some(DayTime::new(3, open)),
                close: close.map(|c| DayTime::new(3, c)),
            }],
            ..OpeningHours::default()
        }),
        ..Place::default()
    }))
}

fn server(provider: StubProvider) -> (TestServer, Arc<StubProvider>) {
    let provider = Arc::new(provider);
    let config = Config {
        provider: ProviderConfig {
            api_key: "test-key".into(),
            details_concurrency: 2,
            ..ProviderConfig::default()
        },
        ..Config::default()
    };
    let state = AppState::with_provider(config, provider.clone());
    let server = TestServer::new(create_router(state)).unwrap();
    (server, provider)
}

fn page(results: Vec<Place>, token: Option<&str>) -> StubProvider {
    StubProvider {
        page: ProviderResponse::page(results, token.map(ToString::to_string)),
        ..StubProvider::default()
    }
}

// =============================================================================
// SYSTEM
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (server, provider) = server(StubProvider::default());

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_openapi_document() {
    let (server, _) = server(StubProvider::default());

    let response = server.get("/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/search/nearby"].is_object());
}

// =============================================================================
// /search
// =============================================================================

#[tokio::test]
async fn test_text_search_returns_raw_response() {
    let mut raw: ProviderResponse = serde_json::from_value(json!({
        "status": "OK",
        "html_attributions": [],
        "next_page_token": "NEXT",
        "results": [{"place_id": "p1", "name": "Roastery", "rating": 4.6}]
    }))
    .unwrap();
    raw.results[0].extra.insert("user_ratings_total".into(), json!(812));
    let (server, provider) = server(StubProvider {
        page: raw,
        ..StubProvider::default()
    });

    let response = server
        .get("/search")
        .add_query_param("query", "pour over")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["next_page_token"], "NEXT");
    assert_eq!(body["html_attributions"], json!([]));
    assert_eq!(body["results"][0]["rating"], 4.6);
    assert_eq!(body["results"][0]["user_ratings_total"], 812);
    assert_eq!(provider.calls(), vec![Call::Text("pour over".into(), None)]);
}

#[tokio::test]
async fn test_text_search_missing_query_is_400() {
    let (server, provider) = server(StubProvider::default());

    let response = server.get("/search").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "MISSING_PARAMETER");
    assert!(body["message"].as_str().unwrap().contains("query"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_text_search_token_without_query() {
    let (server, provider) = server(page(vec![], None));

    server
        .get("/search")
        .add_query_param("next_page_token", "TOKEN1")
        .await
        .assert_status_ok();
    assert_eq!(
        provider.calls(),
        vec![Call::Text(String::new(), Some("TOKEN1".into()))]
    );
}

// =============================================================================
// /search/type
// =============================================================================

#[tokio::test]
async fn test_type_search_projection() {
    let (server, provider) = server(page(vec![cafe("a", Some(true)), cafe("b", None)], Some("N2")));

    let response = server
        .get("/search/type")
        .add_query_param("type", "cafe")
        .add_query_param("next_page_token", "T1")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "cafe");
    assert_eq!(body["next_page_token"], "N2");
    assert_eq!(
        body["results"][0],
        json!({"place_id": "a", "name": "Cafe a", "address": "a Main St", "open_now": true})
    );
    assert_eq!(body["results"][1]["open_now"], Value::Null);
    assert_eq!(provider.calls(), vec![Call::Type("cafe".into(), Some("T1".into()))]);
}

#[tokio::test]
async fn test_type_search_missing_type_is_400() {
    let (server, _) = server(StubProvider::default());

    let response = server.get("/search/type").add_query_param("type", " ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "MISSING_PARAMETER");
}

// =============================================================================
// /search/open
// =============================================================================

#[tokio::test]
async fn test_open_search_unknown_filter_returns_whole_page() {
    let (server, _) = server(page(
        vec![cafe("a", Some(false)), cafe("b", None), cafe("c", Some(true))],
        None,
    ));

    let response = server
        .get("/search/open")
        .add_query_param("filter", "foo")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "cafe");
    assert_eq!(body["filter"], "foo");
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_open_search_opennow() {
    let (server, _) = server(page(
        vec![cafe("a", Some(false)), cafe("b", None), cafe("c", Some(true))],
        None,
    ));

    let response = server
        .get("/search/open")
        .add_query_param("filter", "OpenNow")
        .await;

    let body: Value = response.json();
    assert_eq!(body["filter"], "opennow");
    assert_eq!(body["results"], json!([
        {"place_id": "c", "name": "Cafe c", "address": "c Main St", "open_now": true}
    ]));
}

#[tokio::test]
async fn test_open_search_after8_filters_by_schedule() {
    let mut provider = page(vec![cafe("late", None), cafe("early", None), cafe("allday", None)], Some("N"));
    provider.details.insert("late".into(), schedule("0700", Some("2230")));
    provider.details.insert("early".into(), schedule("0600", Some("1930")));
    provider.details.insert("allday".into(), schedule("0800", None));
    let (server, provider) = server(provider);

    let response = server
        .get("/search/open")
        .add_query_param("type", "cafe")
        .add_query_param("filter", "after8")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let ids: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["place_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["late", "allday"]);
    assert_eq!(body["next_page_token"], "N");

    let detail_calls = provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Details(_, Some(f)) if f == &["opening_hours"]))
        .count();
    assert_eq!(detail_calls, 3);
}

#[tokio::test]
async fn test_open_search_malformed_hours_is_502() {
    let mut provider = page(vec![cafe("a", None)], None);
    provider.details.insert("a".into(), schedule("7:00", Some("1900")));
    let (server, _) = server(provider);

    let response = server
        .get("/search/open")
        .add_query_param("filter", "before7")
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "MALFORMED_UPSTREAM_DATA");
}

// =============================================================================
// /search/place
// =============================================================================

#[tokio::test]
async fn test_place_details_returns_raw_result() {
    let mut provider = StubProvider::default();
    provider.details.insert(
        "p1".into(),
        serde_json::from_value(json!({
            "status": "OK",
            "result": {"name": "Roastery", "website": "https://example.com", "rating": 4.8}
        }))
        .unwrap(),
    );
    let (server, provider) = server(provider);

    let response = server
        .get("/search/place")
        .add_query_param("place_id", "p1")
        .add_query_param("fields", "name,website,rating")
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "name": "Roastery",
        "website": "https://example.com",
        "rating": 4.8
    }));
    assert_eq!(
        provider.calls(),
        vec![Call::Details(
            "p1".into(),
            Some(vec!["name".into(), "website".into(), "rating".into()])
        )]
    );
}

#[tokio::test]
async fn test_place_details_empty_result_is_404() {
    let mut provider = StubProvider::default();
    provider.details.insert(
        "gone".into(),
        serde_json::from_value(json!({"status": "OK", "result": {}})).unwrap(),
    );
    let (server, _) = server(provider);

    let response = server
        .get("/search/place")
        .add_query_param("place_id", "gone")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "PLACE_NOT_FOUND");
}

#[tokio::test]
async fn test_place_details_missing_id_is_400() {
    let (server, _) = server(StubProvider::default());
    server
        .get("/search/place")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// /search/nearby
// =============================================================================

#[tokio::test]
async fn test_nearby_open_now_false_is_null() {
    let mut near = cafe("n1", Some(true));
    near.vicinity = Some("1 Bean Rd".into());
    let (server, provider) = server(page(vec![near], None));

    let response = server
        .get("/search/nearby")
        .add_query_param("location", "40.7,-74.0")
        .add_query_param("open_now", "false")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["location"], "40.7,-74.0");
    assert_eq!(body["radius"], 5000);
    assert_eq!(body["open_now"], Value::Null);
    assert_eq!(body["next_page_token"], Value::Null);
    assert_eq!(
        body["results"][0],
        json!({"place_id": "n1", "name": "Cafe n1", "vicinity": "1 Bean Rd", "open_now": true})
    );

    match &provider.calls()[0] {
        Call::Nearby(query) => assert!(!query.open_now_only),
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_nearby_open_now_true_and_radius() {
    let (server, provider) = server(page(vec![], None));

    let response = server
        .get("/search/nearby")
        .add_query_param("location", "40.7,-74.0")
        .add_query_param("radius", "800")
        .add_query_param("open_now", "true")
        .await;

    let body: Value = response.json();
    assert_eq!(body["open_now"], true);
    assert_eq!(body["radius"], 800);

    match &provider.calls()[0] {
        Call::Nearby(query) => {
            assert!(query.open_now_only);
            assert_eq!(query.radius, 800);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_nearby_bad_location_is_400() {
    let (server, provider) = server(StubProvider::default());

    let response = server
        .get("/search/nearby")
        .add_query_param("location", "downtown")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "INVALID_LOCATION");

    let response = server.get("/search/nearby").await;
    let body: Value = response.json();
    assert_eq!(body["error"], "MISSING_PARAMETER");
    assert!(provider.calls().is_empty());
}

// =============================================================================
// PROVIDER FAILURES
// =============================================================================

#[tokio::test]
async fn test_provider_quota_is_503() {
    let (server, _) = server(StubProvider {
        error: Some(|| ProviderError::QuotaExceeded { message: None }),
        ..StubProvider::default()
    });

    let response = server
        .get("/search/type")
        .add_query_param("type", "cafe")
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "PROVIDER_QUOTA_EXCEEDED");
}

#[tokio::test]
async fn test_provider_failure_is_502() {
    let (server, _) = server(StubProvider {
        error: Some(|| ProviderError::HttpStatus { status: 500 }),
        ..StubProvider::default()
    });

    let response = server
        .get("/search")
        .add_query_param("query", "latte")
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "PROVIDER_ERROR");
}
