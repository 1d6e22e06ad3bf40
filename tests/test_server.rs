use async_trait::async_trait;
use fridge_chef::providers::{GenerationRequest, LlmProvider};
use fridge_chef::{server, ChefError, FridgeChef};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers identification requests (they carry video) and suggestion requests differently
struct CannedProvider {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl LlmProvider for CannedProvider {
    fn provider_name(&self) -> &str {
        "canned"
    }

    fn supports_media(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ChefError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ChefError::Upstream("quota exceeded".to_string()));
        }
        if request.has_media() {
            Ok(r#"{"identifiedIngredients": "eggs, spinach"}"#.to_string())
        } else {
            Ok(r#"{"recipes": [{"name": "Spinach Omelette", "ingredients": "eggs, spinach", "instructions": "Whisk the eggs, add spinach, cook gently."}]}"#.to_string())
        }
    }
}

async fn spawn(fail: bool) -> (String, Arc<CannedProvider>) {
    let provider = Arc::new(CannedProvider {
        calls: AtomicUsize::new(0),
        fail,
    });
    let chef = FridgeChef::builder()
        .backend(provider.clone())
        .build()
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, chef));
    (format!("http://{}", addr), provider)
}

#[tokio::test]
async fn test_health() {
    let (base, _) = spawn(false).await;
    let body = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_suggest_endpoint() {
    let (base, provider) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/suggest-recipes", base))
        .json(&json!({ "ingredients": "eggs, spinach" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["recipes"][0]["name"], "Spinach Omelette");
    assert_eq!(body["recipes"][0]["ingredients"], "eggs, spinach");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_suggest_endpoint_rejects_blank_input() {
    let (base, provider) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/suggest-recipes", base))
        .json(&json!({ "ingredients": "  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "input_validation");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identify_endpoint() {
    let (base, _) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/identify-ingredients", base))
        .json(&json!({ "videoDataUri": "data:video/mp4;base64,AAAAIGZ0eXBpc29t" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "identifiedIngredients": "eggs, spinach" }));
}

#[tokio::test]
async fn test_identify_endpoint_bad_video() {
    let (base, provider) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/identify-ingredients", base))
        .json(&json!({ "videoDataUri": "data:text/plain;base64,aGVsbG8=" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "media_read");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (base, _) = spawn(true).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/suggest-recipes", base))
        .json(&json!({ "ingredients": "eggs" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "upstream");
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_suggest_endpoint_rejects_wrong_field() {
    let (base, provider) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/suggest-recipes", base))
        .json(&json!({ "ingredient": "eggs" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "input_validation");
    assert!(body["error"].as_str().unwrap().contains("ingredients"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identify_endpoint_rejects_malformed_json() {
    let (base, provider) = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/identify-ingredients", base))
        .header("content-type", "application/json")
        .body("{\"videoDataUri\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "input_validation");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}
