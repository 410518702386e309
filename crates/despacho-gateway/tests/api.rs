// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end API tests driving the router with in-memory backends.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use despacho_engine::DispatchEngine;
use despacho_gateway::{build_router, GatewayState};
use despacho_test_utils::{MemoryStore, MockNotifier};

fn make_app() -> (Router, MockNotifier) {
    let store = MemoryStore::new();
    let notifier = MockNotifier::new();
    let engine = Arc::new(DispatchEngine::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(notifier.clone()),
        Some("12345".to_string()),
        64,
    ));
    let state = GatewayState {
        engine,
        couriers: Arc::new(store.clone()),
        journeys: Arc::new(store.clone()),
        deliveries: Arc::new(store),
        channel: Arc::new(notifier.clone()),
    };
    (build_router(state), notifier)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn seed_courier(app: &Router, name: &str, user_id: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/entregadores",
        Some(json!({"nome": name, "userId": user_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn seed_journey(app: &Router, user_id: &str, courier_ids: &[&str]) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/jornadas",
        Some(json!({"userId": user_id, "entregadoresIds": courier_ids})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn seed_delivery(app: &Router, courier_id: &str, valor: f64) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/entregas",
        Some(json!({
            "cliente": "Padaria Pão Quente",
            "endereco": "Rua das Flores, 123",
            "pedido": "Nº 5589",
            "entregadorId": courier_id,
            "valorCobrar": valor,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn callback_update(token: &str, chat_id: i64, message_id: i32) -> Value {
    json!({
        "update_id": 1,
        "callback_query": {
            "id": "cb-1",
            "from": {"id": 777, "is_bot": false, "first_name": "Courier"},
            "chat_instance": "ci-1",
            "message": {
                "message_id": message_id,
                "date": 1700000000i64,
                "chat": {"id": chat_id, "type": "private", "first_name": "Courier"},
                "from": {"id": 777, "is_bot": false, "first_name": "Courier"},
                "text": "*Nova Entrega para Padaria Pão Quente!*",
            },
            "data": token,
        }
    })
}

#[tokio::test]
async fn full_delivery_lifecycle() {
    let (app, notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    let journey_id = seed_journey(&app, "u1", &[&courier_id]).await;

    let delivery = seed_delivery(&app, &courier_id, 15.5).await;
    assert_eq!(delivery["jornadaId"], journey_id.as_str());
    assert_eq!(delivery["userId"], "u1");
    assert_eq!(delivery["status"], "Em Trânsito");

    // The courier got a notification with the collect-amount line.
    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.text.contains("Cobrar R$ 15,50"));

    // Button press: completed.
    let delivery_id = delivery["id"].as_str().unwrap();
    let token = format!("update:{delivery_id}:completed");
    let (status, _) = request(
        &app,
        "POST",
        "/api/webhook/telegram",
        Some(callback_update(&token, 12345, 42)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The original message was edited with the status line.
    let edits = notifier.edits().await;
    assert_eq!(edits.len(), 1);
    assert!(edits[0].text.contains("Status atualizado para: Concluída ✅"));

    // Journey details show the transition and a populated event log.
    let (status, details) = request(
        &app,
        "GET",
        &format!("/api/jornadas/{journey_id}/detalhes"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["entregas"][0]["status"], "Concluída");
    let eventos = details["eventos"].as_array().unwrap();
    assert_eq!(eventos.len(), 2);
    assert_eq!(eventos[0]["tipo"], "CRIACAO");
    assert_eq!(eventos[1]["tipo"], "STATUS");
    assert_eq!(eventos[1]["novoStatus"], "Concluída");
}

#[tokio::test]
async fn monetary_amount_round_trips() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    seed_journey(&app, "u1", &[&courier_id]).await;
    seed_delivery(&app, &courier_id, 15.5).await;

    let (status, dados) = request(&app, "GET", "/api/dados", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dados["entregas"][0]["valorCobrar"], 15.5);
}

#[tokio::test]
async fn delivery_creation_failure_modes() {
    let (app, _notifier) = make_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/entregas",
        Some(json!({
            "cliente": "Padaria",
            "endereco": "Rua A, 1",
            "pedido": "Nº 1",
            "entregadorId": "ghost",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Entregador não encontrado.");

    // Courier exists but no active journey.
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/entregas",
        Some(json!({
            "cliente": "Padaria",
            "endereco": "Rua A, 1",
            "pedido": "Nº 1",
            "entregadorId": courier_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Nenhuma jornada ativa.");
}

#[tokio::test]
async fn courier_creation_requires_name_and_account() {
    let (app, _notifier) = make_app();
    let (status, body) = request(
        &app,
        "POST",
        "/api/entregadores",
        Some(json!({"nome": "Maria"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dados incompletos.");
}

#[tokio::test]
async fn second_active_journey_conflicts() {
    let (app, _notifier) = make_app();
    seed_journey(&app, "u1", &[]).await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/jornadas",
        Some(json!({"userId": "u1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Já existe uma jornada ativa.");
}

#[tokio::test]
async fn manager_status_patch_requires_status() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    seed_journey(&app, "u1", &[&courier_id]).await;
    let delivery = seed_delivery(&app, &courier_id, 0.0).await;
    let delivery_id = delivery["id"].as_str().unwrap();

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/entregas/{delivery_id}/status"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Status é obrigatório.");

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/entregas/{delivery_id}/status"),
        Some(json!({"status": "Falhou"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Status atualizado com sucesso.");

    let (status, body) = request(
        &app,
        "PATCH",
        "/api/entregas/ghost/status",
        Some(json!({"status": "Falhou"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Entrega não encontrada.");
}

#[tokio::test]
async fn duplicate_webhook_press_is_acknowledged_without_side_effects() {
    let (app, notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    seed_journey(&app, "u1", &[&courier_id]).await;
    let delivery = seed_delivery(&app, &courier_id, 0.0).await;
    let token = format!("update:{}:completed", delivery["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, _) = request(
            &app,
            "POST",
            "/api/webhook/telegram",
            Some(callback_update(&token, 12345, 42)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(notifier.edits().await.len(), 1);

    // A conflicting press after the terminal status is also acknowledged.
    let conflicting = format!("update:{}:failed", delivery["id"].as_str().unwrap());
    let (status, _) = request(
        &app,
        "POST",
        "/api/webhook/telegram",
        Some(callback_update(&conflicting, 12345, 42)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notifier.edits().await.len(), 1);
}

#[tokio::test]
async fn finalize_computes_summary_and_history_orders_desc() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;

    // First journey: one completed, one failed.
    let j1 = seed_journey(&app, "u1", &[&courier_id]).await;
    let d1 = seed_delivery(&app, &courier_id, 10.0).await;
    let d2 = seed_delivery(&app, &courier_id, 0.0).await;
    for (delivery, status) in [(&d1, "Concluída"), (&d2, "Falhou")] {
        let id = delivery["id"].as_str().unwrap();
        request(
            &app,
            "PATCH",
            &format!("/api/entregas/{id}/status"),
            Some(json!({"status": status})),
        )
        .await;
    }
    let (status, resumo) = request(
        &app,
        "POST",
        &format!("/api/jornadas/{j1}/finalizar"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumo["totalEntregas"], 2);
    assert_eq!(resumo["concluidas"], 1);
    assert_eq!(resumo["falhas"], 1);
    assert_eq!(resumo["taxaSucesso"], "50.0");

    // Second journey finalized later: empty.
    let j2 = seed_journey(&app, "u1", &[&courier_id]).await;
    let (_, resumo) = request(
        &app,
        "POST",
        &format!("/api/jornadas/{j2}/finalizar"),
        None,
    )
    .await;
    assert_eq!(resumo["taxaSucesso"], "0.0");

    let (status, history) = request(&app, "GET", "/api/jornadas/historico/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap().clone();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], j2.as_str());
    assert_eq!(history[1]["id"], j1.as_str());

    // KPIs aggregate the latest finalized journey (j2: empty).
    let (status, kpis) = request(&app, "GET", "/api/kpis/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kpis["totalEntregadores"], 1);
    assert_eq!(kpis["valorRecebido"], 0.0);
    assert_eq!(kpis["tempoMedioEntrega"], "—");
}

#[tokio::test]
async fn operacao_reflects_active_journey_membership() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;

    // No active journey: empty lists.
    let (status, body) = request(&app, "GET", "/api/operacao/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["entregadoresAtivos"].as_array().unwrap().is_empty());
    assert!(body["entregasAtivas"].as_array().unwrap().is_empty());

    seed_journey(&app, "u1", &[&courier_id]).await;
    seed_delivery(&app, &courier_id, 0.0).await;

    let (_, body) = request(&app, "GET", "/api/operacao/u1", None).await;
    assert_eq!(body["entregadoresAtivos"][0]["nome"], "Maria");
    assert_eq!(body["entregasAtivas"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn journey_details_unknown_id_is_not_found() {
    let (app, _notifier) = make_app();
    let (status, body) = request(&app, "GET", "/api/jornadas/ghost/detalhes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Jornada não encontrada.");
}

#[tokio::test]
async fn courier_update_and_delete() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/entregadores/{courier_id}"),
        Some(json!({"nome": "Maria Silva", "veiculo": "Moto"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Maria Silva");
    assert_eq!(body["veiculo"], "Moto");
    assert_eq!(body["userId"], "u1");

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/entregadores/{courier_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, dados) = request(&app, "GET", "/api/dados", None).await;
    assert!(dados["entregadores"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn free_text_reply_completes_last_delivery() {
    let (app, _notifier) = make_app();
    let courier_id = seed_courier(&app, "Maria", "u1").await;
    seed_journey(&app, "u1", &[&courier_id]).await;
    let delivery = seed_delivery(&app, &courier_id, 0.0).await;

    // Plain message from the notification target (chat id 12345).
    let (status, _) = request(
        &app,
        "POST",
        "/api/webhook/telegram",
        Some(json!({
            "update_id": 9,
            "message": {
                "message_id": 50,
                "date": 1700000000i64,
                "chat": {"id": 12345i64, "type": "private", "first_name": "Courier"},
                "from": {"id": 777, "is_bot": false, "first_name": "Courier"},
                "text": "entregue, tudo certo",
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, dados) = request(&app, "GET", "/api/dados", None).await;
    let delivery_id = delivery["id"].as_str().unwrap();
    let stored = dados["entregas"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"] == delivery_id)
        .unwrap();
    assert_eq!(stored["status"], "Concluída");
}

#[tokio::test]
async fn health_reports_channel_state() {
    let (app, _notifier) = make_app();
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["channel"], "healthy");
}
