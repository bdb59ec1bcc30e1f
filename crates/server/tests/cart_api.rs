use std::net::SocketAddr;
use std::sync::Arc;

use models::Product;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::cart::ports::mock::{MemoryStore, MockCatalog};
use service::cart::{CartDeps, CartStore, Notification, RecordingNotifier};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, cart::CartView, AppState};

const KEY: &str = "@RocketShoes:cart";

struct TestApp {
    base_url: String,
    catalog: Arc<MockCatalog>,
    storage: Arc<MemoryStore>,
    notes: Arc<RecordingNotifier>,
}

fn product(id: u64, price: f64) -> Product {
    Product { id, name: format!("Tênis {id}"), price, image: format!("https://img/{id}.jpg"), amount: 0 }
}

async fn start_server(catalog: MockCatalog, storage: MemoryStore) -> anyhow::Result<TestApp> {
    let catalog = Arc::new(catalog);
    let storage = Arc::new(storage);
    let notes = Arc::new(RecordingNotifier::new());
    let deps = CartDeps {
        catalog: catalog.clone(),
        stock: catalog.clone(),
        storage: storage.clone(),
        notifier: notes.clone(),
    };
    let cart = CartStore::load(KEY, deps).await?;
    let app = routes::build_router(AppState { cart: Arc::new(cart) }, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), catalog, storage, notes })
}

fn catalog() -> MockCatalog {
    MockCatalog::new().with_product(product(1, 179.9), 3).with_product(product(2, 139.9), 0)
}

#[tokio::test]
async fn health_and_empty_cart() -> anyhow::Result<()> {
    let app = start_server(catalog(), MemoryStore::new()).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["status"], "ok");

    let view: CartView = c.get(format!("{}/cart", app.base_url)).send().await?.json().await?;
    assert!(view.items.is_empty());
    assert_eq!(view.size, 0);
    Ok(())
}

#[tokio::test]
async fn add_update_remove_round_trip() -> anyhow::Result<()> {
    let app = start_server(catalog(), MemoryStore::new()).await?;
    let c = reqwest::Client::new();
    let item = format!("{}/cart/items/1", app.base_url);

    let res = c.post(&item).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let view: CartView = c.post(&item).send().await?.json().await?;
    assert_eq!(view.items[0].amount, 2);

    let view: CartView = c.put(&item).json(&json!({"amount": 3})).send().await?.json().await?;
    assert_eq!(view.items[0].amount, 3);
    assert_eq!(view.size, 1);
    assert!((view.total - 3.0 * 179.9).abs() < 1e-9);

    // the persisted blob mirrors what the API returned
    let stored: Vec<Product> = serde_json::from_str(&app.storage.slot(KEY).unwrap_or_default())?;
    assert_eq!(stored, view.items);

    let view: CartView = c.delete(&item).send().await?.json().await?;
    assert!(view.items.is_empty());

    let notes = app.notes.entries();
    assert_eq!(notes.len(), 4);
    assert!(notes.iter().all(|n| !n.is_error()));
    Ok(())
}

#[tokio::test]
async fn business_rule_failures_map_to_statuses() -> anyhow::Result<()> {
    let app = start_server(catalog(), MemoryStore::new()).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/cart/items/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], 2001);
    assert_eq!(body["message"], "Requested quantity is out of stock");

    let res = c
        .put(format!("{}/cart/items/1", app.base_url))
        .json(&json!({"amount": 2}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>().await?["code"], 2002);

    let res = c.delete(format!("{}/cart/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    assert_eq!(app.notes.entries().iter().filter(|n| n.is_error()).count(), 3);
    assert_eq!(app.storage.write_count(), 0);
    Ok(())
}

#[tokio::test]
async fn remote_failure_is_bad_gateway() -> anyhow::Result<()> {
    let app = start_server(catalog(), MemoryStore::new()).await?;
    app.catalog.fail_products(true);

    let res = reqwest::Client::new().post(format!("{}/cart/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_GATEWAY);
    assert_eq!(app.notes.entries(), vec![Notification::Error("Failed to add product".into())]);
    Ok(())
}

#[tokio::test]
async fn zero_amount_update_returns_cart_untouched() -> anyhow::Result<()> {
    let blob = serde_json::to_string(&vec![product(1, 179.9).with_amount(2)])?;
    let app = start_server(catalog(), MemoryStore::new().with_slot(KEY, blob)).await?;

    let view: CartView = reqwest::Client::new()
        .put(format!("{}/cart/items/1", app.base_url))
        .json(&json!({"amount": 0}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(view.items[0].amount, 2);
    assert!(app.notes.entries().is_empty());
    assert_eq!(app.catalog.stock_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn clear_drops_the_slot() -> anyhow::Result<()> {
    let blob = serde_json::to_string(&vec![product(1, 179.9).with_amount(2)])?;
    let app = start_server(catalog(), MemoryStore::new().with_slot(KEY, blob)).await?;

    let view: CartView = reqwest::Client::new().delete(format!("{}/cart", app.base_url)).send().await?.json().await?;
    assert!(view.items.is_empty());
    assert_eq!(app.storage.slot(KEY), None);
    Ok(())
}
