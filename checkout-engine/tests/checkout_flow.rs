// checkout-engine/tests/checkout_flow.rs
// 端到端结算流程测试 (mock 目录服务)

use catalog_client::{CatalogClient, ClientConfig};
use checkout_engine::store::keys;
use checkout_engine::{
    CheckoutFlow, Config, Handoff, KeyValueStore, LocalStore, MemoryStore, PaymentOutcome,
    PersistedState, Route, TextReceiptSink,
};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, work_dir: &str) -> Config {
    let mut config = Config::with_overrides(work_dir, server.uri());
    config.page_size = 2;
    config.wallet_seed = dec!(2400);
    config.currency = "KES".into();
    config
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {"id": 1, "title": "Essence Mascara Lash Princess", "price": 1000, "discountPercentage": "10"},
                {"id": 2, "title": "Eyeshadow Palette with Mirror", "price": 500, "discountPercentage": 0}
            ],
            "total": 3,
            "skip": 0,
            "limit": 2
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {"id": 3, "title": "Powder Canister", "price": 300, "discountPercentage": {"bad": true}}
            ],
            "total": 3,
            "skip": 2,
            "limit": 2
        })))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "emilys",
            "email": "emily.johnson@x.dummyjson.com",
            "firstName": "Emily",
            "lastName": "Johnson",
            "accessToken": "access-token",
            "refreshToken": "refresh-token"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_browse_pay_receipt() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_login(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap());
    let store = Arc::new(MemoryStore::new());
    let mut flow = CheckoutFlow::new(PersistedState::new(store.clone()), &config);
    assert_eq!(flow.route(), Route::Login);

    let client = CatalogClient::new(&ClientConfig::new(server.uri())).unwrap();
    let response = client.login("emilys", "emilyspass").await.unwrap();
    assert_eq!(flow.login(&response), Route::Browse);
    assert_eq!(flow.auth().display_name().as_deref(), Some("EMILY"));

    assert!(flow.load_page(&client, 1).await);
    assert!(flow.pager().can_go_forward());
    assert_eq!(flow.pager().total_pages(), 2);

    flow.add_from_catalog(1);
    flow.add_from_catalog(1);
    flow.add_from_catalog(2);

    assert!(flow.pager_mut().next_page(&client).await);
    assert_eq!(flow.pager().current_page(), 2);
    flow.add_from_catalog(3);

    // 1800 + 500 + 300
    assert_eq!(flow.selection().total_deduction(), dec!(2600));
    assert!(flow.selection_mut().set_quantity(1, "1"));
    assert!(!flow.selection_mut().set_quantity(1, "abc"));
    assert_eq!(flow.selection().total_deduction(), dec!(1700));

    assert_eq!(flow.proceed_to_review(), Route::Review);
    let session = flow.session_mut().unwrap();
    assert_eq!(session.customer_label(), "Emily Johnson -1");
    session.pad_mut().fill("482913");

    assert_eq!(
        flow.attempt_payment().unwrap(),
        PaymentOutcome::Confirmed { balance: dec!(700) }
    );
    assert_eq!(
        store.get(keys::WALLET_BALANCE).unwrap().as_deref(),
        Some("700")
    );

    let mut sink = TextReceiptSink::new(Vec::new(), config.currency.clone());
    assert_eq!(
        flow.show_receipt(&mut sink, &config.currency).unwrap(),
        Handoff::Presented
    );
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert!(text.contains("Emily Johnson -1"));
    assert!(text.contains("1,700.00 KES"));

    assert!(flow.finish_payment());
    assert!(flow.selection().is_empty());
    assert_eq!(flow.wallet_balance(), dec!(700));
}

#[tokio::test]
async fn test_catalog_failure_keeps_page() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap());
    let store = Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, "t")]));
    let mut flow = CheckoutFlow::new(PersistedState::new(store), &config);

    let client = CatalogClient::new(&ClientConfig::new(server.uri())).unwrap();
    assert!(flow.load_page(&client, 1).await);
    assert_eq!(flow.pager().items().len(), 2);

    // Nothing mounted for skip=4
    assert!(flow.load_page(&client, 3).await);
    assert!(flow.pager().error().is_some());
    assert_eq!(flow.pager().current_page(), 1);
    assert_eq!(flow.pager().items().len(), 2);
}

#[tokio::test]
async fn test_balance_survives_restart() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap());
    let client = CatalogClient::new(&ClientConfig::new(server.uri())).unwrap();

    {
        let store = LocalStore::open(config.store_path()).unwrap();
        store.set(keys::AUTH_TOKEN, "t").unwrap();
        let mut flow = CheckoutFlow::new(PersistedState::new(Arc::new(store)), &config);
        flow.load_page(&client, 1).await;
        flow.add_from_catalog(2);
        flow.proceed_to_review();
        flow.session_mut().unwrap().pad_mut().fill("111111");
        flow.attempt_payment().unwrap();
    }

    let store = LocalStore::open(config.store_path()).unwrap();
    let mut flow = CheckoutFlow::new(PersistedState::new(Arc::new(store)), &config);
    assert_eq!(flow.route(), Route::Browse);
    assert_eq!(flow.wallet_balance(), dec!(1900));
    // The session itself is gone
    assert_eq!(flow.navigate(Route::Receipt), Route::Browse);
}
