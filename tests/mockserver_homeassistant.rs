//! Mock server for Home Assistant API
use httpmock::{Method::POST, Mock, MockServer};
use reqwest::Url;
use serde_json::{Value, json};

/// Wrapper around `MockServer` for Home Assistant endpoint mocks.
pub struct HomeAssistantMockServer {
    pub server: MockServer,
}

#[allow(dead_code)]
impl HomeAssistantMockServer {
    /// Start and return a running MockServer for Home Assistant.
    pub async fn start() -> Self {
        let server = MockServer::start_async().await;
        HomeAssistantMockServer { server }
    }

    /// Get the base URL to use when constructing the client.
    pub fn url(&self) -> Url {
        Url::parse(&self.server.base_url()).expect("invalid mock server URL")
    }

    /// Token to use in Authorization headers in mocks.
    pub fn token(&self) -> String {
        "test_token".into()
    }

    fn response(entity_id: &str, state: &Value) -> Value {
        json!({
            "entity_id": entity_id,
            "state": state,
            "last_changed": "2025-06-23T06:22:32.877327+00:00",
            "last_reported": "2025-06-23T06:22:32.877327+00:00",
            "last_updated": "2025-06-23T06:22:32.877327+00:00",
            "context": {
                "id": "X7TQ47E2AGDK5CWNR3VPYDJP01",
                "parent_id": null,
                "user_id": "b7c2e6d3f124c9e5f763a9821576c30"
            }
        })
    }

    /// Mock the set state of one entity with the exact expected body.
    pub async fn mock_set_state<'a>(&'a self, entity_id: &str, body: Value) -> Mock<'a> {
        let path = format!("/api/states/{entity_id}");
        let response = Self::response(entity_id, &body["state"]);
        self.server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path(path)
                    .header("Authorization", format!("Bearer {}", self.token()))
                    .header("Content-Type", "application/json")
                    .json_body(body);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(response);
            })
            .await
    }

    /// Mock the set state of any QCells sensor.
    pub async fn mock_set_any_state<'a>(&'a self) -> Mock<'a> {
        self.server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path_contains("/api/states/sensor.qcells_inverter_")
                    .header("Authorization", format!("Bearer {}", self.token()));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({}));
            })
            .await
    }

    /// Mock a server error on setting any state to test retry/circuit breaker.
    pub async fn mock_error_set_state<'a>(&'a self) -> Mock<'a> {
        self.server
            .mock_async(move |when, then| {
                when.method(POST).path_contains("/api/states/");
                then.status(500).header("content-type", "application/json");
            })
            .await
    }
}
