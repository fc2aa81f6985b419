mod common;

use country_redirect::domain::entities::StoredSettings;
use serde_json::{Value, json};

#[tokio::test]
async fn test_settings_requires_token() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server.get("/api/settings").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_settings_rejects_wrong_token() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .get("/api/settings")
        .add_header("Authorization", "Bearer wrong-token")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_get_settings() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .get("/api/settings")
        .add_header("Authorization", common::bearer())
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["redirect_enabled"], true);
    assert_eq!(json["cookie_days"], 7);
    assert_eq!(json["rules"].as_array().unwrap().len(), 2);
    assert_eq!(json["rules"][0]["country"], "ES");
    assert_eq!(json["rules"][0]["target_path"], "es");
    assert_eq!(json["rules"][1]["country"], "FR");
}

#[tokio::test]
async fn test_get_settings_trailing_slash() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .get("/api/settings/")
        .add_header("Authorization", common::bearer())
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_update_settings_partial() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .put("/api/settings")
        .add_header("Authorization", common::bearer())
        .json(&json!({"cookie_days": 30}))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["settings"]["cookie_days"], 30);
    assert_eq!(json["settings"]["redirect_enabled"], true);
    assert_eq!(json["settings"]["rules"].as_array().unwrap().len(), 2);
    assert!(json["settings"]["updated_at"].is_string());
    assert!(json["rejected"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_rules_reports_rejected() {
    let server = common::make_server(common::create_test_state(StoredSettings::default()));

    let response = server
        .put("/api/settings")
        .add_header("Authorization", common::bearer())
        .json(&json!({
            "rules": [
                {"country": "es", "url": "https://example.com/es/"},
                {"country": "Spain", "url": "/es"},
                {"country": "DE"},
                {"country": "IT", "url": "ftp://example.com/it"}
            ]
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    let rules = json["settings"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["country"], "ES");

    let rejected = json["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 3);
    assert_eq!(rejected[0]["index"], 1);
    assert_eq!(rejected[1]["index"], 2);
    assert_eq!(rejected[2]["index"], 3);
}

#[tokio::test]
async fn test_update_rejects_invalid_cookie_days() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .put("/api/settings")
        .add_header("Authorization", common::bearer())
        .json(&json!({"cookie_days": 0}))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_update_takes_effect_for_visitors() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    server
        .put("/api/settings")
        .add_header("Authorization", common::bearer())
        .json(&json!({"redirect_enabled": false}))
        .await
        .assert_status_ok();

    let response = server
        .get("/")
        .add_header("CF-IPCountry", "ES")
        .add_header("User-Agent", common::BROWSER)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_update_store_failure() {
    let state = common::create_state_with_repo(std::sync::Arc::new(common::FailingRepository));
    let server = common::make_server(state);

    let response = server
        .put("/api/settings")
        .add_header("Authorization", common::bearer())
        .json(&json!({"redirect_enabled": true}))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_admin_api_absent_without_token() {
    let server =
        common::make_server_without_admin(common::create_test_state(common::es_fr_settings()));

    let response = server
        .get("/api/settings")
        .add_header("Authorization", common::bearer())
        .await;

    response.assert_status_not_found();
}
