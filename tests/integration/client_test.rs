//! Store client against a live server instance.

use std::sync::Arc;

use brasa_api::AppState;
use brasa_core::config::AppConfig;
use brasa_database::memory::MemorySubscriptionStore;
use brasa_entity::subscription::store::{SaveOutcome, SubscriptionStore};
use brasa_push::SubscriptionStoreClient;
use brasa_push::store::SubscriptionSink;

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_server() -> (String, Arc<dyn SubscriptionStore>) {
    let store: Arc<dyn SubscriptionStore> = Arc::new(MemorySubscriptionStore::new());
    let state = AppState::new(Arc::new(AppConfig::default()), Arc::clone(&store), None);
    let app = brasa_api::build_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), store)
}

#[tokio::test]
async fn client_registers_and_deduplicates() {
    let (base_url, store) = spawn_server().await;
    let client = SubscriptionStoreClient::new(&base_url).unwrap();

    let first = client.save_token("tok-e2e").await.unwrap();
    assert_eq!(first, SaveOutcome::Created);

    let second = client.save_token("tok-e2e").await.unwrap();
    assert_eq!(second, SaveOutcome::AlreadyRegistered);

    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn client_rejects_blank_token_before_the_wire() {
    let (base_url, store) = spawn_server().await;
    let client = SubscriptionStoreClient::new(&base_url).unwrap();

    let err = client.save_token("   ").await.unwrap_err();
    assert_eq!(err.kind, brasa_core::error::ErrorKind::Validation);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn client_lists_the_fleet() {
    let (base_url, _store) = spawn_server().await;
    let client = SubscriptionStoreClient::new(&base_url).unwrap();

    client.save_token("tok-1").await.unwrap();
    client.save_token("tok-2").await.unwrap();

    let rows = client.list_active().await.unwrap();
    assert_eq!(rows.len(), 2);
}
