use crate::helpers::{TEST_ACCESS_KEY, spawn_app, spawn_app_with_access_key};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

const VALID_BODY: &str = "name=Jane&email=jane%40example.com&topic=Hello&message=Hi%20there";

fn provider_success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true }))
}

#[tokio::test]
async fn contact_returns_a_200_for_valid_form_data() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(provider_success())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app.post_contact(VALID_BODY).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "success": true }));
}

#[tokio::test]
async fn contact_forwards_the_submission_to_the_provider() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(provider_success())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    app.post_contact(VALID_BODY).await;

    // Assert
    let submissions = app.provider_submissions().await;
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission["access_key"], TEST_ACCESS_KEY);
    assert_eq!(submission["name"], "Jane");
    assert_eq!(submission["email"], "jane@example.com");
    assert_eq!(submission["subject"], "[virtualpavi] Hello");
    assert_eq!(submission["message"], "Hi there");
}

#[tokio::test]
async fn contact_returns_a_400_when_data_is_missing() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(provider_success())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let test_cases = vec![
        ("email=jane%40example.com&topic=Hello&message=Hi", "missing the name"),
        ("name=Jane&topic=Hello&message=Hi", "missing the email"),
        ("name=Jane&email=jane%40example.com&message=Hi", "missing the topic"),
        ("name=Jane&email=jane%40example.com&topic=Hello", "missing the message"),
        ("name=&email=jane%40example.com&topic=Hello&message=Hi", "empty name"),
        ("name=Jane&email=jane%40example.com&topic=&message=Hi", "empty topic"),
        ("", "missing every field"),
    ];

    for (invalid_body, description) in test_cases {
        // Act
        let response = app.post_contact(invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "error": "All fields are required" }));
    }
}

#[tokio::test]
async fn contact_returns_a_400_when_the_body_is_not_a_form() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(provider_success())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app
        .api_client
        .post(format!("{}/api/contact", app.address))
        .json(&serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "topic": "Hello",
            "message": "Hi there"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn contact_returns_a_500_when_the_access_key_is_not_configured() {
    for access_key in [None, Some("")] {
        // Arrange
        let app = spawn_app_with_access_key(access_key).await;

        Mock::given(any())
            .respond_with(provider_success())
            .expect(0)
            .mount(&app.provider_server)
            .await;

        // Act
        let response = app.post_contact(VALID_BODY).await;

        // Assert
        assert_eq!(500, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Server configuration error" }));
    }
}

#[tokio::test]
async fn contact_surfaces_the_provider_rejection_message() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "quota exceeded"
        })))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app.post_contact(VALID_BODY).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "quota exceeded");
}

#[tokio::test]
async fn contact_returns_a_generic_500_when_the_provider_response_is_unreadable() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app.post_contact(VALID_BODY).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to send message");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn contact_does_not_deduplicate_repeated_submissions() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(provider_success())
        .expect(2)
        .mount(&app.provider_server)
        .await;

    // Act
    let first = app.post_contact(VALID_BODY).await;
    let second = app.post_contact(VALID_BODY).await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
}

#[tokio::test]
async fn contact_responses_allow_any_origin() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(provider_success())
        .mount(&app.provider_server)
        .await;

    let successful = app.post_contact(VALID_BODY).await;
    let rejected = app.post_contact("").await;

    for response in [successful, rejected] {
        assert_eq!(
            response.headers()["access-control-allow-origin"]
                .to_str()
                .unwrap(),
            "*"
        );
    }
}

#[tokio::test]
async fn contact_answers_cors_preflight_requests() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/contact", app.address),
        )
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(204, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap(),
        "POST, OPTIONS"
    );
    assert_eq!(
        response.headers()["access-control-allow-origin"]
            .to_str()
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn contact_accepts_multipart_form_data() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(provider_success())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app
        .post_contact_multipart(&[
            ("name", "Jane"),
            ("email", "jane@example.com"),
            ("topic", "Hello"),
            ("message", "Hi there"),
        ])
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let submissions = app.provider_submissions().await;
    assert_eq!(submissions[0]["subject"], "[virtualpavi] Hello");
    assert_eq!(submissions[0]["message"], "Hi there");
}

#[tokio::test]
async fn contact_returns_a_400_when_a_multipart_field_is_missing() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(provider_success())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app
        .post_contact_multipart(&[
            ("name", "Jane"),
            ("email", "jane@example.com"),
            ("message", "Hi there"),
        ])
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "All fields are required" }));
}

#[tokio::test]
async fn contact_forwards_a_long_message() {
    // Arrange
    let app = spawn_app().await;
    let message = "a".repeat(20_000);

    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(provider_success())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    // Act
    let response = app
        .post_contact_form(format!(
            "name=Jane&email=jane%40example.com&topic=Hello&message={}",
            message
        ))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let submissions = app.provider_submissions().await;
    assert_eq!(submissions[0]["message"], message);
}
