// End-to-end check runs against a scripted page, a temp state file and
// mock notification endpoints.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use stock_watcher::{AppError, NotifierCredentials, StockStatus};

fn in_stock_page() -> FakePage {
    FakePage::new()
        .button("Small")
        .button("Matte Black")
        .button("Add to cart")
}

fn webhook_only(server: &MockServer) -> NotifierCredentials {
    NotifierCredentials {
        discord_webhook_url: Some(format!("{}/api/webhooks/1/token", server.uri())),
        ..NotifierCredentials::default()
    }
}

#[tokio::test]
async fn test_first_run_records_in_stock_without_notifying() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_check(in_stock_page(), &state_path, &webhook_only(&server)).await.unwrap();

    assert_eq!(report.previous.as_str(), "unknown");
    assert_eq!(report.current, StockStatus::InStock);
    assert!(!report.restocked);
    assert!(report.dispatch.is_none());
    assert_eq!(read_state(&state_path), json!({ "last_status": "in_stock" }));
}

#[tokio::test]
async fn test_still_out_of_stock_rewrites_state_silently() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let page = FakePage::new()
        .button("Small")
        .button("Matte Black")
        .disabled_button("Add to cart");
    let report = run_check(page, &state_path, &NotifierCredentials::default()).await.unwrap();

    assert_eq!(report.current, StockStatus::OutOfStock);
    assert!(report.dispatch.is_none());
    assert_eq!(
        read_state(&state_path),
        json!({ "last_status": "out_of_stock" })
    );
}

#[tokio::test]
async fn test_restock_with_only_webhook_posts_once() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(body_json(json!({ "content": "Product is back in stock: https://x/p" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&webhook)
        .await;

    let bot_api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&bot_api)
        .await;

    let mut credentials = webhook_only(&webhook);
    credentials.telegram_api_base = Some(bot_api.uri());

    let report = run_check(in_stock_page(), &state_path, &credentials).await.unwrap();

    assert!(report.restocked);
    let dispatch = report.dispatch.expect("restock should dispatch");
    assert_eq!(dispatch.sent, vec!["Discord"]);
    assert_eq!(dispatch.skipped, vec!["Telegram"]);
    assert_eq!(read_state(&state_path), json!({ "last_status": "in_stock" }));
}

#[tokio::test]
async fn test_restock_notifies_both_channels() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botsecret/sendMessage"))
        .and(body_json(json!({
            "chat_id": "777",
            "text": "Product is back in stock: https://x/p"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = NotifierCredentials {
        discord_webhook_url: Some(format!("{}/api/webhooks/1/token", server.uri())),
        telegram_bot_token: Some("secret".to_string()),
        telegram_chat_id: Some("777".to_string()),
        telegram_api_base: Some(server.uri()),
    };

    let report = run_check(in_stock_page(), &state_path, &credentials).await.unwrap();

    let dispatch = report.dispatch.unwrap();
    assert_eq!(dispatch.sent, vec!["Discord", "Telegram"]);
    assert!(dispatch.failed.is_empty());
}

#[tokio::test]
async fn test_failed_notification_still_persists_state() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_check(in_stock_page(), &state_path, &webhook_only(&server)).await.unwrap();

    let dispatch = report.dispatch.unwrap();
    assert!(dispatch.sent.is_empty());
    assert_eq!(dispatch.failed.len(), 1);
    assert_eq!(read_state(&state_path), json!({ "last_status": "in_stock" }));
}

#[tokio::test]
async fn test_missing_add_to_cart_records_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let page = FakePage::new().button("Small").button("Matte Black");
    let report = run_check(page, &state_path, &NotifierCredentials::default()).await.unwrap();

    assert_eq!(report.current, StockStatus::Unknown);
    assert!(!report.restocked);
    // The unknown reading replaces the out_of_stock baseline.
    assert_eq!(read_state(&state_path), json!({ "last_status": "unknown" }));
}

#[tokio::test]
async fn test_unknown_baseline_suppresses_later_restock() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::Unknown);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_check(in_stock_page(), &state_path, &webhook_only(&server)).await.unwrap();

    assert_eq!(report.current, StockStatus::InStock);
    assert!(report.dispatch.is_none());
}

#[tokio::test]
async fn test_options_selected_by_text_then_first_match() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");

    let page = FakePage::new()
        .text("Small")
        .text("Matte Black")
        .text("Matte Black")
        .disabled_button("Add to Cart");
    let observer = page.clone();

    let report = run_check(page, &state_path, &NotifierCredentials::default()).await.unwrap();

    assert_eq!(report.current, StockStatus::OutOfStock);
    assert_eq!(observer.clicked(), vec!["text-0", "text-1"]);
}

#[tokio::test]
async fn test_missing_options_do_not_block_status() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");

    let page = FakePage::new().button("ADD TO CART");
    let observer = page.clone();

    let report = run_check(page, &state_path, &NotifierCredentials::default()).await.unwrap();

    assert_eq!(report.current, StockStatus::InStock);
    assert_eq!(report.degradations.len(), 2);
    assert!(observer.clicked().is_empty());
}

#[tokio::test]
async fn test_navigation_failure_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    write_state(&state_path, StockStatus::OutOfStock);

    let page = FakePage::new().unreachable();
    let result = run_check(page, &state_path, &NotifierCredentials::default()).await;

    assert!(matches!(result, Err(AppError::Navigation { .. })));
    assert_eq!(
        read_state(&state_path),
        json!({ "last_status": "out_of_stock" })
    );
}

#[tokio::test]
async fn test_unrecognized_previous_status_is_carried_raw() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    std::fs::write(&state_path, r#"{"last_status": "preorder"}"#).unwrap();

    let report = run_check(in_stock_page(), &state_path, &NotifierCredentials::default()).await.unwrap();

    assert_eq!(report.previous.as_str(), "preorder");
    assert!(!report.restocked);
    assert_eq!(read_state(&state_path), json!({ "last_status": "in_stock" }));
}
