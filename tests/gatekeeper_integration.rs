use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracking_gatekeeper::{build_app, load_seed_data, MemoryStore};

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn post_as(&self, path: &str, user_agent: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .header(reqwest::header::USER_AGENT, user_agent)
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Serve a seeded in-memory gatekeeper on an ephemeral port
async fn start_server() -> TestClient {
    let store = Arc::new(MemoryStore::new());
    load_seed_data(&*store).await.expect("Failed to seed store");

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, build_app(store))
            .await
            .expect("Server stopped");
    });

    TestClient::new(format!("http://{}", address))
}

fn tracking_request(customer_id: i64, remote_ip: &str, timestamp: i64) -> Value {
    json!({
        "customerID": customer_id,
        "tagID": 0,
        "userID": "string",
        "remoteIP": remote_ip,
        "timestamp": timestamp,
    })
}

#[tokio::test]
async fn test_process_missing_field() {
    let client = start_server().await;

    let response = client
        .post(
            "/api/v1/process",
            json!({
                "tagID": 2,
                "userID": "aaaaaaaa-bbbb-cccc-1111-222222222222",
                "remoteIP": "123.234.56.78",
                "timestamp": 1500000000,
            }),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("customerID"));
}

#[tokio::test]
async fn test_process_customer_not_found() {
    let client = start_server().await;

    let response = client
        .post("/api/v1/process", tracking_request(5_000_000, "32.0.0.1", 10_000_000))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Customer not found"})
    );

    // Counted as invalid against the sink customer
    let stats: Value = client
        .get("/api/v1/stats?customer_id=1&date=01/01/1970")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["data"]["customer"]["invalid_requests_count"], 1);
    assert_eq!(stats["data"]["customer"]["valid_requests_count"], 0);
}

#[tokio::test]
async fn test_process_blacklisted_ip() {
    let client = start_server().await;

    let response = client
        .post("/api/v1/process", tracking_request(2, "0", 10_000_000))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Remote IP is blocked"})
    );
}

#[tokio::test]
async fn test_process_blacklisted_user_agent() {
    let client = start_server().await;

    let response = client
        .post_as("/api/v1/process", "A6-Indexer", tracking_request(2, "32.0.0.1", 10_000_000))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "User Agent is blocked"})
    );
}

#[tokio::test]
async fn test_process_valid_request() {
    let client = start_server().await;

    let response = client
        .post("/api/v1/process", tracking_request(2, "32.0.0.1", 10_000_000))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "success": true,
            "message": "Request was processed",
            "data": {},
        })
    );
}

#[tokio::test]
async fn test_statistics_for_unknown_customer() {
    let client = start_server().await;

    let response = client
        .get("/api/v1/stats?customer_id=5000000&date=01/08/1980")
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "success": true,
            "message": "Returning User Stats",
            "data": {
                "customer": {
                    "id": 5000000,
                    "valid_requests_count": 0,
                    "invalid_requests_count": 0,
                },
                "daily_total_all_customers": 0,
            },
        })
    );
}

#[tokio::test]
async fn test_statistics_aggregate_hours_of_a_day() {
    let client = start_server().await;

    // 2020-08-02 00:15, 11:59 and 23:00 UTC, then 2020-08-03 00:00 UTC
    let first = 1_596_327_300_000;
    let midday = 1_596_369_540_000;
    let last = 1_596_409_200_000;
    let next_day = 1_596_412_800_000;

    for timestamp in [first, midday, last, next_day] {
        let response = client
            .post("/api/v1/process", tracking_request(2, "32.0.0.1", timestamp))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    client
        .post("/api/v1/process", tracking_request(2, "0", midday))
        .await
        .unwrap();
    client
        .post("/api/v1/process", tracking_request(3, "32.0.0.1", midday))
        .await
        .unwrap();
    client
        .post("/api/v1/process", tracking_request(4, "32.0.0.1", first))
        .await
        .unwrap();

    let stats: Value = client
        .get("/api/v1/stats?customer_id=2&date=02/08/2020")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["data"]["customer"]["id"], 2);
    assert_eq!(stats["data"]["customer"]["valid_requests_count"], 3);
    assert_eq!(stats["data"]["customer"]["invalid_requests_count"], 1);
    assert_eq!(stats["data"]["daily_total_all_customers"], 6);
}

#[tokio::test]
async fn test_statistics_bad_date() {
    let client = start_server().await;

    let response = client
        .get("/api/v1/stats?customer_id=2&date=08-02-2020")
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Validation Error: Date should be in the format day/month/year. ex: 02/08/2020"})
    );
}
