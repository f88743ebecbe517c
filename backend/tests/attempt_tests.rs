// tests/attempt_tests.rs

mod common;

use common::{client, create_quiz, option_id, register, sample_quiz, spawn_app};
use serde_json::{Value, json};

async fn submit(client: &reqwest::Client, address: &str, quiz_id: &Value, answers: Value) -> reqwest::Response {
    client
        .post(format!("{}/api/quizzes/{}/attempt", address, quiz_id))
        .json(&json!({ "answers": answers }))
        .send()
        .await
        .expect("Submit failed")
}

#[tokio::test]
async fn alice_passes_a_one_question_quiz() {
    // Arrange
    let address = spawn_app().await;
    let client = client();
    let register = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({ "username": "alice", "password": "pw1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(register.status().as_u16(), 201);

    let quiz = create_quiz(
        &client,
        &address,
        &json!({
            "title": "One question",
            "description": "Easy",
            "timeLimit": 30,
            "passingScore": 70,
            "questions": [{
                "text": "Pick A",
                "options": [
                    { "text": "A", "isCorrect": true },
                    { "text": "B", "isCorrect": false }
                ]
            }]
        }),
    )
    .await;
    let question_id = quiz["questions"][0]["id"].clone();
    let option_a = option_id(&quiz, 0, true);

    // Act
    let response = submit(
        &client,
        &address,
        &quiz["id"],
        json!([{ "questionId": question_id, "selectedOptionId": option_a, "correct": true }]),
    )
    .await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let attempt: Value = response.json().await.unwrap();
    assert_eq!(attempt["score"], 100);
    assert_eq!(attempt["passed"], true);
    assert_eq!(attempt["quizId"], quiz["id"]);
    assert!(attempt["completedAt"].is_string());
    assert_eq!(attempt["quiz"]["title"], "One question");
}

#[tokio::test]
async fn three_of_five_scores_sixty() {
    let address = spawn_app().await;
    let client = client();
    register(&client, &address, "five").await;

    let questions: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "text": format!("Question {i}"),
                "options": [
                    { "text": "right", "isCorrect": true },
                    { "text": "wrong", "isCorrect": false }
                ]
            })
        })
        .collect();
    let mut body = sample_quiz();
    body["questions"] = json!(questions);
    let quiz = create_quiz(&client, &address, &body).await;

    let answers: Vec<Value> = (0..5)
        .map(|i| {
            let correct = i < 3;
            json!({
                "questionId": quiz["questions"][i]["id"],
                "selectedOptionId": option_id(&quiz, i, correct),
                "correct": correct
            })
        })
        .collect();

    let attempt: Value = submit(&client, &address, &quiz["id"], json!(answers))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(attempt["score"], 60);
    assert_eq!(attempt["passed"], false);
}

#[tokio::test]
async fn client_correctness_claims_are_not_trusted() {
    let address = spawn_app().await;
    let client = client();
    register(&client, &address, "cheat").await;
    let quiz = create_quiz(&client, &address, &sample_quiz()).await;

    let answers = json!([
        {
            "questionId": quiz["questions"][0]["id"],
            "selectedOptionId": option_id(&quiz, 0, false),
            "correct": true
        },
        {
            "questionId": quiz["questions"][1]["id"],
            "selectedOptionId": "",
            "correct": true
        }
    ]);
    let attempt: Value = submit(&client, &address, &quiz["id"], answers)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(attempt["score"], 0);
    assert_eq!(attempt["passed"], false);
    assert_eq!(attempt["answers"][0]["correct"], false);
    assert_eq!(attempt["answers"][1]["selectedOptionId"], "");
}

#[tokio::test]
async fn submission_checks_quiz_then_body() {
    let address = spawn_app().await;
    let client = client();
    register(&client, &address, "checks").await;

    let missing = submit(&client, &address, &json!(4242), json!([])).await;
    assert_eq!(missing.status().as_u16(), 404);

    let quiz = create_quiz(&client, &address, &sample_quiz()).await;
    let bad = client
        .post(format!("{}/api/quizzes/{}/attempt", address, quiz["id"]))
        .json(&json!({ "answers": [ { "questionId": "q" } ] }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);

    let anonymous = submit(&reqwest::Client::new(), &address, &quiz["id"], json!([])).await;
    assert_eq!(anonymous.status().as_u16(), 401);
}

#[tokio::test]
async fn attempts_are_listed_per_user_and_per_quiz() {
    let address = spawn_app().await;
    let owner = client();
    let player = client();
    register(&owner, &address, "owner").await;
    register(&player, &address, "player").await;
    let quiz = create_quiz(&owner, &address, &sample_quiz()).await;

    let answers = json!([{
        "questionId": quiz["questions"][0]["id"],
        "selectedOptionId": option_id(&quiz, 0, true),
        "correct": true
    }]);
    submit(&player, &address, &quiz["id"], answers.clone()).await;
    submit(&owner, &address, &quiz["id"], answers).await;

    let mine: Vec<Value> = player
        .get(format!("{}/api/quiz-attempts/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    // 1 of 2 questions answered correctly
    assert_eq!(mine[0]["score"], 50);

    let all: Vec<Value> = owner
        .get(format!("{}/api/quizzes/{}/attempts", address, quiz["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn attempts_survive_quiz_deletion() {
    let address = spawn_app().await;
    let client = client();
    register(&client, &address, "keeper").await;
    let quiz = create_quiz(&client, &address, &sample_quiz()).await;

    let answers = json!([{
        "questionId": quiz["questions"][1]["id"],
        "selectedOptionId": option_id(&quiz, 1, true),
        "correct": true
    }]);
    submit(&client, &address, &quiz["id"], answers).await;

    client
        .delete(format!("{}/api/quizzes/{}", address, quiz["id"]))
        .send()
        .await
        .unwrap();

    let mine: Vec<Value> = client
        .get(format!("{}/api/quiz-attempts/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["quiz"]["title"], "World Capitals");
    assert_eq!(mine[0]["quiz"]["questions"], quiz["questions"]);
}
