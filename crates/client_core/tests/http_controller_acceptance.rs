use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use client_core::{AccountController, AccountError, FormSession, HttpAccountService};
use shared::{
    domain::{AccountField, AccountId, AccountType},
    protocol::{AccountRecord, NewAccount},
};
use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

#[derive(Clone, Default)]
struct AccountServer {
    accounts: Arc<Mutex<Vec<AccountRecord>>>,
    next_id: Arc<AtomicU64>,
}

async fn list(State(server): State<AccountServer>) -> Json<Vec<AccountRecord>> {
    Json(server.accounts.lock().await.clone())
}

async fn create(
    State(server): State<AccountServer>,
    Json(body): Json<NewAccount>,
) -> Json<AccountRecord> {
    let id = server.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let record = body.with_id(AccountId::new(id.to_string()));
    server.accounts.lock().await.push(record.clone());
    Json(record)
}

async fn update(
    State(server): State<AccountServer>,
    Path(id): Path<String>,
    Json(body): Json<AccountRecord>,
) -> Result<Json<AccountRecord>, StatusCode> {
    let mut accounts = server.accounts.lock().await;
    let slot = accounts
        .iter_mut()
        .find(|record| record.id.as_str() == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = AccountRecord {
        id: slot.id.clone(),
        ..body
    };
    Ok(Json(slot.clone()))
}

async fn delete(State(server): State<AccountServer>, Path(id): Path<String>) -> StatusCode {
    server
        .accounts
        .lock()
        .await
        .retain(|record| record.id.as_str() != id);
    StatusCode::NO_CONTENT
}

async fn spawn_server() -> (Url, AccountServer) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let server = AccountServer::default();
    let app = Router::new()
        .route("/banque/comptes", get(list).post(create))
        .route("/banque/comptes/:id", put(update).delete(delete))
        .with_state(server.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}/banque/comptes")).expect("url");
    (url, server)
}

#[tokio::test]
async fn create_edit_delete_round_against_http_service() {
    let (url, server) = spawn_server().await;
    let controller = AccountController::new(Arc::new(HttpAccountService::new(url)));

    assert_eq!(controller.load().await.expect("initial load"), 0);

    controller
        .edit_field(AccountField::Balance, "100")
        .expect("balance");
    controller
        .edit_field(AccountField::CreationDate, "2024-01-01")
        .expect("date");
    let created = controller.submit().await.expect("create");
    assert_eq!(created.id, AccountId::from("1"));
    assert_eq!(controller.accounts(), vec![created.clone()]);

    controller.select_account(&created.id).expect("select");
    controller
        .edit_field(AccountField::AccountType, "EPARGNE")
        .expect("type");
    let updated = controller.submit().await.expect("update");
    assert_eq!(updated.account_type, AccountType::Savings);
    assert_eq!(controller.accounts()[0].account_type, AccountType::Savings);
    assert_eq!(controller.session(), FormSession::default());

    controller.select_account(&created.id).expect("select again");
    controller
        .delete_record(&created.id)
        .await
        .expect("delete");
    assert!(controller.accounts().is_empty());
    assert_eq!(controller.session(), FormSession::default());
    assert!(server.accounts.lock().await.is_empty());
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn update_of_account_removed_remotely_surfaces_failure() {
    let (url, server) = spawn_server().await;
    let controller = AccountController::new(Arc::new(HttpAccountService::new(url)));
    controller
        .edit_field(AccountField::Balance, "5")
        .expect("balance");
    controller
        .edit_field(AccountField::CreationDate, "2024-02-02")
        .expect("date");
    let created = controller.submit().await.expect("create");

    server.accounts.lock().await.clear();
    controller.select_account(&created.id).expect("select");
    let err = controller.submit().await.expect_err("remote 404");

    assert!(matches!(err, AccountError::Remote { .. }));
    assert!(err.to_string().contains("404"), "{err}");
    assert_eq!(controller.accounts(), vec![created]);
    assert!(controller.session().is_editing());
    assert!(!controller.is_busy());
}
