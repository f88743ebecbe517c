// tests/common/mod.rs

#![allow(dead_code)]

use quizmaster::{config::Config, routes, state::AppState};
use serde_json::{Value, json};

/// Spawns the app on a random port with a fresh in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let config = Config {
        session_secret: "integration_test_secret".to_string(),
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let state = AppState::in_memory(config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// A client that keeps the session cookie, like a browser.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client")
}

pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers (and thereby logs in) a fresh user. Returns `{id, username}`.
pub async fn register(client: &reqwest::Client, address: &str, prefix: &str) -> Value {
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({
            "username": unique_username(prefix),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

/// A valid quiz body: two questions, the first option of each correct.
pub fn sample_quiz() -> Value {
    json!({
        "title": "World Capitals",
        "description": "How well do you know your capitals?",
        "timeLimit": 30,
        "passingScore": 70,
        "questions": [
            {
                "text": "Capital of France?",
                "options": [
                    { "text": "Paris", "isCorrect": true },
                    { "text": "Lyon", "isCorrect": false }
                ],
                "explanation": "Paris has been the capital since 508."
            },
            {
                "text": "Capital of Japan?",
                "options": [
                    { "text": "Tokyo", "isCorrect": true },
                    { "text": "Osaka", "isCorrect": false },
                    { "text": "Kyoto", "isCorrect": false }
                ]
            }
        ]
    })
}

/// Creates `body` as the client's user and returns the stored quiz.
pub async fn create_quiz(client: &reqwest::Client, address: &str, body: &Value) -> Value {
    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(body)
        .send()
        .await
        .expect("Create quiz failed");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

/// Option id of the correct (`true`) or first wrong (`false`) option of question `index`.
pub fn option_id(quiz: &Value, index: usize, correct: bool) -> String {
    quiz["questions"][index]["options"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["isCorrect"] == correct)
        .and_then(|o| o["id"].as_str())
        .unwrap()
        .to_string()
}
