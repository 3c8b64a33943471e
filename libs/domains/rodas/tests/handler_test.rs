//! Handler tests for the rodas domain
//!
//! These exercise the HTTP layer only, backed by the in-memory repository:
//! - auth gate on protected routes
//! - request deserialization (Portuguese field names)
//! - status codes and error bodies

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{ErrorResponse, JwtAuth, JwtConfig};
use domain_rodas::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "rodas-de-conversa-test-secret-0123456789";

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct TestApp {
    app: Router,
    auth: JwtAuth,
    repo: InMemoryRodaRepository,
}

impl TestApp {
    async fn new() -> Self {
        let repo = InMemoryRodaRepository::new();
        let service = Arc::new(RodaService::new(repo.clone(), Arc::new(NoopGeocoder)));
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));

        let app = Router::new()
            .nest("/rodas", handlers::router(service.clone(), auth.clone()))
            .nest("/faixas-etarias", handlers::age_brackets_router(service));

        Self { app, auth, repo }
    }

    async fn organizer(&self, name: &str) -> (Uuid, String) {
        let id = Uuid::now_v7();
        self.repo
            .insert_organizer(OrganizerSummary {
                id,
                name: name.to_string(),
                email: Some(format!("{}@example.com", name.to_lowercase())),
                municipality: Some("Fortaleza".to_string()),
            })
            .await;
        let token = self.auth.create_token(id, "12345678901").unwrap();
        (id, token)
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn roda_form(municipio: &str) -> Value {
    json!({
        "tema": "Saúde mental na juventude",
        "data": "2025-03-10",
        "hora_inicio": "14:30",
        "municipio": municipio,
        "local": "Av. Beira Mar, 100",
        "publico_alvo": "Estudantes",
        "numeroParticipantes": "30"
    })
}

async fn create(app: &TestApp, token: &str, municipio: &str) -> Value {
    let response = app.send(post_json("/rodas", Some(token), roda_form(municipio))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_roda_returns_201_with_organizer() {
    let app = TestApp::new().await;
    let (organizer_id, token) = app.organizer("Ana").await;

    let body = create(&app, &token, "Fortaleza").await;

    assert_eq!(body["tema"], "Saúde mental na juventude");
    assert_eq!(body["data"], "2025-03-10");
    assert_eq!(body["hora_inicio"], "2025-03-10T14:30:00");
    assert_eq!(body["numeroParticipantes"], 30);
    assert_eq!(body["status"], "active");
    assert_eq!(body["multiplicadorId"], organizer_id.to_string());
    assert_eq!(body["multiplicador"]["nome"], "Ana");
    assert_eq!(body["multiplicador"]["email"], "ana@example.com");
    assert!(body["latitude"].is_number());
}

#[tokio::test]
async fn test_create_roda_without_token_is_401() {
    let app = TestApp::new().await;

    let response = app.send(post_json("/rodas", None, roda_form("Fortaleza"))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_roda_with_forged_token_is_401() {
    let app = TestApp::new().await;
    let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-also-32-chars-long"));
    let forged = other.create_token(Uuid::now_v7(), "12345678901").unwrap();

    let response = app.send(post_json("/rodas", Some(&forged), roda_form("Fortaleza"))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_roda_accepts_cookie_token() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;

    let request = Request::builder()
        .method("POST")
        .uri("/rodas")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("theme=dark; token={token}"))
        .body(Body::from(roda_form("Sobral").to_string()))
        .unwrap();

    assert_eq!(app.send(request).await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_roda_missing_fields_is_400() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;

    let response = app
        .send(post_json("/rodas", Some(&token), json!({ "tema": "Sem data" })))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert!(error.message.contains("tema, data, hora_inicio, municipio, local, publico_alvo"));
}

#[tokio::test]
async fn test_create_roda_for_unregistered_organizer_is_404() {
    let app = TestApp::new().await;
    let token = app.auth.create_token(Uuid::now_v7(), "98765432100").unwrap();

    let response = app.send(post_json("/rodas", Some(&token), roda_form("Fortaleza"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "ORGANIZER_NOT_FOUND");
}

#[tokio::test]
async fn test_public_listing_needs_no_token_and_hides_email() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;
    create(&app, &token, "Fortaleza").await;

    let response = app.send(get("/rodas", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let rodas: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(rodas.len(), 1);
    assert_eq!(rodas[0]["multiplicador"]["nome"], "Ana");
    assert!(rodas[0]["multiplicador"].get("email").is_none());
}

#[tokio::test]
async fn test_my_rodas_only_lists_callers_active_rodas() {
    let app = TestApp::new().await;
    let (_, ana) = app.organizer("Ana").await;
    let (_, bia) = app.organizer("Bia").await;
    create(&app, &ana, "Fortaleza").await;
    create(&app, &bia, "Sobral").await;

    for path in ["/rodas/me", "/rodas/multiplicador"] {
        let response = app.send(get(path, Some(&ana))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let rodas: Vec<Roda> = json_body(response.into_body()).await;
        assert_eq!(rodas.len(), 1);
        assert_eq!(rodas[0].municipality.as_deref(), Some("Fortaleza"));
    }

    assert_eq!(app.send(get("/rodas/me", None)).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_close_roda_by_path() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;
    let created = create(&app, &token, "Fortaleza").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .send(post_json(
            &format!("/rodas/{id}/encerrar"),
            Some(&token),
            json!({
                "fotoFrequencia": "https://files.example/freq.jpg",
                "fotoRodaConversa": "https://files.example/roda.jpg",
                "resumo": "Roda muito participativa",
                "faixasEtarias": [2, 4]
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let closed: RodaWithBrackets = json_body(response.into_body()).await;
    assert_eq!(closed.roda.status, RodaStatus::Finalized);
    assert_eq!(closed.roda.summary.as_deref(), Some("Roda muito participativa"));
    let names: Vec<_> = closed.age_brackets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["13-17", "30-59"]);
}

#[tokio::test]
async fn test_close_roda_by_body_id() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;
    let created = create(&app, &token, "Sobral").await;

    let response = app
        .send(post_json(
            "/rodas/encerrar",
            Some(&token),
            json!({
                "rodaId": created["id"],
                "resumo": "Encerrada",
                "faixasEtarias": [5]
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let closed: Value = json_body(response.into_body()).await;
    assert_eq!(closed["status"], "finalized");
    assert_eq!(closed["faixasEtarias"][0]["nome"], "60+");
}

#[tokio::test]
async fn test_close_roda_of_someone_else_is_403() {
    let app = TestApp::new().await;
    let (_, ana) = app.organizer("Ana").await;
    let (_, bia) = app.organizer("Bia").await;
    let created = create(&app, &ana, "Fortaleza").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .send(post_json(
            &format!("/rodas/{id}/encerrar"),
            Some(&bia),
            json!({ "faixasEtarias": [1] }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let roda = app.repo.find_by_id(id.parse().unwrap()).await.unwrap().unwrap();
    assert_eq!(roda.status, RodaStatus::Active);
}

#[tokio::test]
async fn test_close_roda_without_brackets_is_400() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;
    let created = create(&app, &token, "Fortaleza").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .send(post_json(
            &format!("/rodas/{id}/encerrar"),
            Some(&token),
            json!({ "resumo": "x", "faixasEtarias": [] }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Selecione pelo menos uma faixa etária");
    assert!(app.repo.links_of(id.parse().unwrap()).await.is_empty());
}

#[tokio::test]
async fn test_close_roda_with_invalid_id_is_400() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;

    let response = app
        .send(post_json("/rodas/abc/encerrar", Some(&token), json!({ "faixasEtarias": [1] })))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "ID da roda inválido");
}

#[tokio::test]
async fn test_close_roda_twice_is_409() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;
    let created = create(&app, &token, "Fortaleza").await;
    let uri = format!("/rodas/{}/encerrar", created["id"].as_str().unwrap());

    let first = app.send(post_json(&uri, Some(&token), json!({ "faixasEtarias": [3] }))).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.send(post_json(&uri, Some(&token), json!({ "faixasEtarias": [3] }))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = json_body(second.into_body()).await;
    assert_eq!(error.error, "ALREADY_FINALIZED");
}

#[tokio::test]
async fn test_history_and_statistics() {
    let app = TestApp::new().await;
    let (_, token) = app.organizer("Ana").await;

    for (municipio, faixa) in [("Fortaleza", 3), ("Fortaleza", 3), ("Sobral", 4)] {
        let created = create(&app, &token, municipio).await;
        let uri = format!("/rodas/{}/encerrar", created["id"].as_str().unwrap());
        let response = app
            .send(post_json(&uri, Some(&token), json!({ "faixasEtarias": [faixa] })))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.send(get("/rodas/historico", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let history: Vec<RodaWithBrackets> = json_body(response.into_body()).await;
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|r| r.age_brackets.len() == 1));

    let response = app.send(get("/rodas/estatisticas", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = json_body(response.into_body()).await;
    assert_eq!(
        stats,
        json!({
            "totalRodas": 3,
            "municipios": { "Fortaleza": 2, "Sobral": 1 },
            "faixasEtarias": { "18-29": 2, "30-59": 1 },
            "municipiosCount": 2,
            "faixasEtariasCount": 2
        })
    );
}

#[tokio::test]
async fn test_list_age_brackets_is_public() {
    let app = TestApp::new().await;

    let response = app.send(get("/faixas-etarias", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let brackets: Vec<AgeBracket> = json_body(response.into_body()).await;
    let names: Vec<_> = brackets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["0-12", "13-17", "18-29", "30-59", "60+"]);
}
