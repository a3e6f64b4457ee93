// tests/api_tests.rs

use std::{net::SocketAddr, sync::Arc};

use chrono::Duration;
use qbank_backend::{
    config::Config,
    routes,
    state::AppState,
    utils::login_guard::LoginGuard,
};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "Sup3r-Secret";

/// Configuration whose database is unreachable: any handler that touches
/// storage answers 500, so a 400 proves validation ran first.
fn test_config() -> Config {
    Config {
        db_host: "127.0.0.1".to_string(),
        db_port: 1,
        db_user: "nobody".to_string(),
        db_password: String::new(),
        db_name: "nothing".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        completion_api_key: "test-key".to_string(),
        completion_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        completion_model: "grok-3".to_string(),
        port: 0,
        rust_log: "error".to_string(),
    }
}

/// Spawns the app on a random port and returns its base URL.
async fn spawn_app_with_state(state: AppState) -> String {
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    address
}

async fn spawn_app() -> String {
    spawn_app_with_state(AppState::new(test_config())).await
}

async fn login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn admin_token(client: &reqwest::Client, address: &str) -> String {
    let body: serde_json::Value = login(client, address, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .json()
        .await
        .expect("Failed to parse login json");
    body["token"].as_str().expect("Token not found").to_string()
}

#[tokio::test]
async fn unknown_path_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_endpoint_reports_ok() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/test", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_with_admin_credentials_returns_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["token"].as_str().expect("Token not found");
    let claims = qbank_backend::utils::jwt::verify_jwt(token, &test_config().jwt_secret).unwrap();
    assert_eq!(claims.sub, ADMIN_EMAIL);
}

#[tokio::test]
async fn credential_check_is_case_sensitive() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = login(&client, &address, "ADMIN@example.com", ADMIN_PASSWORD).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Authentication failed");
    assert_eq!(body["attemptsLeft"], 4);
}

#[tokio::test]
async fn sixth_attempt_is_locked_out_even_with_correct_credentials() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for expected_left in [4, 3, 2, 1, 0] {
        let response = login(&client, &address, ADMIN_EMAIL, "wrong").await;
        assert_eq!(response.status().as_u16(), 401);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["attemptsLeft"], expected_left);
    }

    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 429);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Too many login attempts");
}

#[tokio::test]
async fn lockout_lifts_after_window() {
    let mut state = AppState::new(test_config());
    state.login_attempts = Arc::new(LoginGuard::new(5, Duration::milliseconds(300)));
    let address = spawn_app_with_state(state).await;
    let client = reqwest::Client::new();

    for _ in 0..5 {
        login(&client, &address, ADMIN_EMAIL, "wrong").await;
    }
    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 429);

    tokio::time::sleep(std::time::Duration::from_millis(400)).await;

    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn successful_login_resets_counter() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        login(&client, &address, ADMIN_EMAIL, "wrong").await;
    }
    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = login(&client, &address, ADMIN_EMAIL, "wrong").await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["attemptsLeft"], 4);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for path in ["/api/systems", "/api/progress", "/api/questions/1", "/api/raw-questions"] {
        let response = client
            .get(&format!("{}{}", address, path))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 401, "{path}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Authentication required");
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/systems", address))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn update_rejects_missing_field_before_touching_storage() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "scenario": "Skenario",
            "question": "Pertanyaan",
            "option_a": "A",
            "option_b": "B",
            "option_c": "C",
            "option_d": "D",
            "option_e": "",
            "correct_answer": "A",
            "discussion": "Pembahasan"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("option_e"));
    assert!(message.contains("learning_objective"));
}

#[tokio::test]
async fn update_rejects_invalid_answer_letter() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "scenario": "Skenario",
            "question": "Pertanyaan",
            "option_a": "A",
            "option_b": "B",
            "option_c": "C",
            "option_d": "D",
            "option_e": "E",
            "correct_answer": "F",
            "discussion": "Pembahasan",
            "learning_objective": "Tujuan"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("correct_answer"));
}

#[tokio::test]
async fn valid_update_reaches_storage() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "scenario": "Skenario",
            "question": "Pertanyaan",
            "option_a": "A",
            "option_b": "B",
            "option_c": "C",
            "option_d": "D",
            "option_e": "E",
            "correct_answer": "C",
            "discussion": "Pembahasan",
            "learning_objective": "Tujuan"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Validation passed; the unreachable database surfaces as a 500 with detail.
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn accept_requires_flag() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1/accept", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn listing_requires_system_id() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .get(&format!("{}/api/questions?page=1&limit=10", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "systemId is required");
}

#[tokio::test]
async fn page_beyond_offset_range_is_400() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .get(&format!(
            "{}/api/questions?systemId=1&page={}&limit=10",
            address,
            i64::MAX
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn malformed_query_is_a_json_validation_error() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .get(&format!("{}/api/questions?systemId=abc", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn wrongly_typed_accept_flag_is_a_json_validation_error() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1/accept", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "is_accepted": 1 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrongly_typed_update_field_is_a_json_validation_error() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .patch(&format!("{}/api/questions/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "scenario": 5 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn non_numeric_question_id_is_a_json_validation_error() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .get(&format!("{}/api/questions/abc", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn non_json_login_body_is_400_and_not_counted() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for _ in 0..6 {
        let response = client
            .post(&format!("{}/api/auth/login", address))
            .header("Content-Type", "application/json")
            .body("email=admin&password=nope")
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Validation Error");
    }

    // Malformed bodies never reached the credential check.
    let response = login(&client, &address, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);
}
