//! Listing, creating and deleting owners against an in-memory backend.

use clinic_auth::roles::ROLE_RECEPTIONIST;
use clinic_auth::testing::token_response;
use clinic_auth::{testing::fresh_token, SessionManager};
use clinic_gateway::Gateway;
use clinic_resources::catalog::OWNERS;
use clinic_resources::models::OwnerDraft;
use clinic_resources::{OwnerClient, ResourceClient};
use clinic_storage::{MemoryTokenStore, TokenVault};
use clinic_transport::{ApiResponse, HttpMethod, StubTransport};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn owners_backend(stub: &StubTransport) {
    let rows: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));

    let listing = rows.clone();
    stub.on(HttpMethod::Get, "owners", move |_| {
        let rows = listing.lock().unwrap();
        ApiResponse::json(
            200,
            &json!({ "content": *rows, "totalElements": rows.len(), "totalPages": 1 }),
        )
    });

    let inserts = rows.clone();
    stub.on(HttpMethod::Post, "owners", move |req| {
        let mut rows = inserts.lock().unwrap();
        let mut row = req.body.clone().unwrap_or(Value::Null);
        row["id"] = json!(rows.len() as i64 + 1);
        rows.push(row.clone());
        ApiResponse::json(201, &row)
    });

    let deletes = rows;
    stub.on(HttpMethod::Delete, "owners/1", move |_| {
        deletes.lock().unwrap().retain(|row| row["id"] != 1);
        ApiResponse::empty(204)
    });
}

async fn signed_in_client() -> (OwnerClient, Arc<StubTransport>) {
    let stub = Arc::new(StubTransport::new());
    stub.respond(
        HttpMethod::Post,
        "auth/login",
        token_response(&fresh_token("frontdesk", &[ROLE_RECEPTIONIST]), "r1"),
    );
    owners_backend(&stub);

    let vault = TokenVault::new(Arc::new(MemoryTokenStore::new()));
    let auth = Arc::new(SessionManager::new(vault, stub.clone()));
    auth.login("frontdesk", "secret").await.unwrap();

    let client = ResourceClient::new(Gateway::new(auth, stub.clone()), OWNERS);
    (client, stub)
}

#[tokio::test]
async fn test_created_owner_shows_up_in_next_listing() {
    let (client, stub) = signed_in_client().await;

    assert!(client.list(0, 10).await.unwrap().is_empty());

    let created = client
        .create(&OwnerDraft {
            full_name: "Jane Doe".to_string(),
            phone: "555-0100".to_string(),
            email: "jane@example.com".to_string(),
            address: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let page = client.list(0, 10).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].full_name, "Jane Doe");
    assert_eq!(page.items[0].email.as_deref(), Some("jane@example.com"));

    assert_eq!(stub.count(HttpMethod::Get, "owners"), 2);
    assert!(stub
        .requests()
        .iter()
        .filter(|r| r.route() != "auth/login")
        .all(|r| r.bearer.is_some()));
}

#[tokio::test]
async fn test_deleted_owner_disappears() {
    let (client, _stub) = signed_in_client().await;

    client
        .create(&OwnerDraft {
            full_name: "Jane Doe".to_string(),
            phone: "555-0100".to_string(),
            ..OwnerDraft::default()
        })
        .await
        .unwrap();
    client.remove(1).await.unwrap();

    assert!(client.list(0, 10).await.unwrap().is_empty());
}
