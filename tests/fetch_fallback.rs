//! Orchestrator integration tests against a local mock provider server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use formguide_api::provider::{DataSource, Endpoint, FetchParams, Fetcher};
use formguide_api::types::Envelope;

const CARET_MEETINGS: &str =
    "176739^Coffs Harbour^+4m^True^2025-03-26T00:00:00.000Z^False^False^COFF^True^0\n\
     176742^Randwick^+2m^True^2025-03-26T00:00:00.000Z^False^True^RAND^False^0\n";

fn fetcher_for(server: &MockServer) -> Fetcher {
    Fetcher::new(server.uri(), 5, 300).expect("client should build")
}

#[tokio::test]
async fn caret_body_is_parsed_into_meetings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetingslist"))
        .and(query_param("apiKey", "k123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARET_MEETINGS))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let fetched = fetcher.fetch(Endpoint::Meetings, &FetchParams::default(), "k123").await;

    assert_eq!(fetched.source, DataSource::RealApi);
    let meetings = fetched.data.as_array().expect("array payload");
    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0]["meetingId"], 176739);
    assert_eq!(meetings[0]["track"], "Coffs Harbour");
    assert_eq!(meetings[0]["isTABMeeting"], true);
    assert_eq!(meetings[1]["trackAbbrev"], "RAND");
}

#[tokio::test]
async fn json_body_passes_through_unchanged() {
    let server = MockServer::start().await;
    let payload = json!([{ "meetingId": 1, "track": "Flemington" }]);
    Mock::given(method("GET"))
        .and(path("/racelist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let params = FetchParams {
        meeting_id: Some(1),
        ..Default::default()
    };
    let fetched = fetcher.fetch(Endpoint::Races, &params, "k").await;

    assert_eq!(fetched.source, DataSource::RealApi);
    assert_eq!(fetched.data, payload);
}

#[tokio::test]
async fn server_error_falls_back_to_mock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fieldslist"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let params = FetchParams {
        race_id: Some(912345),
        ..Default::default()
    };
    let fetched = fetcher.fetch(Endpoint::Fields, &params, "k").await;

    assert_eq!(fetched.source, DataSource::MockFallback);
    let fields = fetched.data.as_array().expect("array payload");
    assert!(!fields.is_empty());
    // Mock honors the same filters as the real endpoint.
    assert!(fields.iter().all(|f| f["raceId"] == 912345));

    // The envelope the route would build still reports success.
    let envelope = Envelope::new(fetched.data, fetched.source);
    let body = serde_json::to_value(&envelope).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "Mock API (Fallback)");
}

#[tokio::test]
async fn unreachable_provider_falls_back_to_mock() {
    // Nothing is listening on this port.
    let fetcher = Fetcher::new("http://127.0.0.1:9", 2, 300).expect("client should build");
    let fetched = fetcher.fetch(Endpoint::Meetings, &FetchParams::default(), "k").await;

    assert_eq!(fetched.source, DataSource::MockFallback);
    assert!(fetched.data.as_array().is_some_and(|a| !a.is_empty()));
}

#[tokio::test]
async fn auth_failure_falls_back_but_validation_surfaces_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetingslist"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);

    // Data path: UI must always render something.
    let fetched = fetcher.fetch(Endpoint::Meetings, &FetchParams::default(), "bad-key").await;
    assert_eq!(fetched.source, DataSource::MockFallback);

    // Validation path: the bad key is visible.
    let err = fetcher.validate_key("bad-key").await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/racelist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "raceId": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let params = FetchParams {
        meeting_id: Some(176739),
        ..Default::default()
    };

    let first = fetcher.fetch(Endpoint::Races, &params, "k").await;
    let second = fetcher.fetch(Endpoint::Races, &params, "k").await;

    assert_eq!(first.source, DataSource::RealApi);
    assert_eq!(second.source, DataSource::RealApi);
    assert_eq!(first.data, second.data);
    // expect(1) on the mock verifies the second fetch never hit the wire.
}

#[tokio::test]
async fn cache_keys_isolate_different_meetings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/racelist"))
        .and(query_param("meetingId", "176739"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "meetingId": 176739 }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/racelist"))
        .and(query_param("meetingId", "176742"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "meetingId": 176742 }])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let a = FetchParams {
        meeting_id: Some(176739),
        ..Default::default()
    };
    let b = FetchParams {
        meeting_id: Some(176742),
        ..Default::default()
    };

    let first = fetcher.fetch(Endpoint::Races, &a, "k").await;
    let second = fetcher.fetch(Endpoint::Races, &b, "k").await;

    assert_eq!(first.data[0]["meetingId"], 176739);
    assert_eq!(second.data[0]["meetingId"], 176742);
}

#[tokio::test]
async fn truncated_caret_lines_are_dropped() {
    let server = MockServer::start().await;
    // First line has only 9 fields and must be dropped.
    let body = "176739^Coffs Harbour^+4m^True^2025-03-26T00:00:00.000Z^False^False^COFF^True\n\
                176742^Randwick^+2m^True^2025-03-26T00:00:00.000Z^False^True^RAND^False^0\n";
    Mock::given(method("GET"))
        .and(path("/meetingslist"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let fetched = fetcher.fetch(Endpoint::Meetings, &FetchParams::default(), "k").await;

    assert_eq!(fetched.source, DataSource::RealApi);
    let meetings = fetched.data.as_array().expect("array payload");
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["meetingId"], 176742);
}
