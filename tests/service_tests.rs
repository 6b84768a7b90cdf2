//! End-to-end domain-service flows against an in-process upstream stub.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use pcount::config::ApiConfig;
use pcount::errors::{AuthError, ServiceError};
use pcount::gateway::ApiGateway;
use pcount::services::{
    AuthService, ContractService, LineService, ProductService, ProductionService,
};
use pcount::session::{CredentialStore, MemoryStore};
use pcount::types::{Contract, DashboardSearch, FallbackPolicy, ProductionFilters};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn gateway_for(app: Router) -> (ApiGateway, Arc<MemoryStore>) {
    let url = serve(app).await;
    let store = Arc::new(MemoryStore::new());
    let config = ApiConfig::new(url.as_str(), url.as_str());
    let gw = ApiGateway::new(config, store.clone()).unwrap();
    (gw, store)
}

fn search(usuario_id: &str, circuito_ids: Vec<&str>) -> DashboardSearch {
    DashboardSearch {
        usuario_id: usuario_id.to_string(),
        from: None,
        to: None,
        circuito_ids: circuito_ids.into_iter().map(String::from).collect(),
    }
}

// ── auth ─────────────────────────────────────────────────────────────

fn login_app() -> Router {
    Router::new().route(
        "/Account/Login",
        post(|Json(body): Json<Value>| async move {
            if body["email"] == "op@factory.io" && body["password"] == "secret" {
                (
                    StatusCode::OK,
                    Json(json!({
                        "user": { "id": "u1", "email": "op@factory.io", "name": "Operator" },
                        "token": "tok-1",
                        "refreshToken": "ref-1"
                    })),
                )
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({})))
            }
        }),
    )
}

#[tokio::test]
async fn login_persists_the_token_pair() {
    let (gw, store) = gateway_for(login_app()).await;
    let auth = AuthService::new(gw);

    let user = auth.login("op@factory.io", "secret").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(store.access_token().await.as_deref(), Some("tok-1"));
    assert_eq!(store.refresh_token().await.as_deref(), Some("ref-1"));
}

#[tokio::test]
async fn login_with_wrong_password_reads_as_invalid_credentials() {
    let (gw, store) = gateway_for(login_app()).await;
    let auth = AuthService::new(gw);

    let err = auth.login("op@factory.io", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(store.access_token().await.is_none());
}

#[tokio::test]
async fn login_against_a_dead_server_is_a_network_condition() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let config = ApiConfig::new("http://127.0.0.1:9", "http://127.0.0.1:9");
    let auth = AuthService::new(ApiGateway::new(config, store).unwrap());

    let err = auth.login("op@factory.io", "secret").await.unwrap_err();
    assert!(matches!(err, AuthError::Network));
}

#[tokio::test]
async fn login_maps_server_errors_distinctly() {
    let app = Router::new().route(
        "/Account/Login",
        post(|| async { (StatusCode::BAD_GATEWAY, Json(json!({}))) }),
    );
    let (gw, _) = gateway_for(app).await;
    let err = AuthService::new(gw)
        .login("op@factory.io", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Server { status: 502 }));
}

#[tokio::test]
async fn logout_clears_local_session_even_when_server_fails() {
    let app = Router::new().route(
        "/Account/Logout",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let (gw, store) = gateway_for(app).await;
    store.set_access_token("tok-1").await;

    AuthService::new(gw).logout().await;
    assert!(store.access_token().await.is_none());
}

#[tokio::test]
async fn validate_session_returns_none_when_unauthenticated() {
    let app = Router::new().route("/Account/Me", get(|| async { StatusCode::UNAUTHORIZED }));
    let (gw, _) = gateway_for(app).await;
    assert!(AuthService::new(gw).validate_session().await.is_none());
}

// ── contracts and lines ──────────────────────────────────────────────

#[tokio::test]
async fn contract_selection_scopes_the_session() {
    let app = Router::new().route(
        "/Contrato/List",
        get(|| async {
            Json(json!([
                { "id": "c1", "name": "Plant 1", "company": "Acme" },
                { "id": "c2", "name": "Plant 2" }
            ]))
        }),
    );
    let (gw, store) = gateway_for(app).await;
    let contracts = ContractService::new(gw.clone());

    let listed: Vec<Contract> = contracts.list().await.unwrap();
    assert_eq!(listed.len(), 2);

    contracts.select(&listed[1]).await;
    assert_eq!(store.contract_id().await.as_deref(), Some("c2"));
}

#[tokio::test]
async fn line_listing_decodes_upstream_statuses() {
    let app = Router::new().route(
        "/Circuito/c1/List",
        get(|| async {
            Json(json!([
                { "id": "1", "name": "P1-MQA5", "status": "produzindo", "code": "4GWL190175221" }
            ]))
        }),
    );
    let (gw, _) = gateway_for(app).await;

    let lines = LineService::new(gw)
        .list("c1", FallbackPolicy::Strict)
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].code, "4GWL190175221");
}

#[tokio::test]
async fn line_listing_fixture_policy_masks_upstream_failure() {
    let app = Router::new().route(
        "/Circuito/c1/List",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let (gw, _) = gateway_for(app).await;
    let service = LineService::new(gw);

    let strict = service.list("c1", FallbackPolicy::Strict).await;
    assert!(strict.is_err());

    let fixture = service
        .list("c1", FallbackPolicy::FixtureOnError)
        .await
        .unwrap();
    assert!(!fixture.is_empty());
}

// ── products ─────────────────────────────────────────────────────────

fn product_app() -> Router {
    Router::new()
        .route(
            "/Produto/c1/List",
            get(|| async {
                Json(json!([
                    { "id": "p1", "codigo": "P100.0001.CX24", "nome": "GUARAVITA NATURAL 290ML" },
                    { "id": "p2", "codigo": "P200.0003.CX12", "nome": "GUARAVITON ACAI 500ML",
                      "descricao": "Garrafa 500ml" }
                ]))
            }),
        )
        .route(
            "/Produto/c1/FormacaoPalete",
            get(|| async {
                Json(json!([
                    { "id": "f1",
                      "produto": { "codigo": "P100.0001.CX24", "nome": "GUARAVITA NATURAL 290ML" },
                      "quantidadePorPalete": 170 }
                ]))
            }),
        )
}

#[tokio::test]
async fn product_listing_decodes_catalog_entries() {
    let (gw, _) = gateway_for(product_app()).await;

    let products = ProductService::new(gw).list("c1").await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].code, "P100.0001.CX24");
    assert!(products[0].description.is_none());
    assert_eq!(products[1].description.as_deref(), Some("Garrafa 500ml"));
}

#[tokio::test]
async fn product_lookup_by_code_filters_the_listing() {
    let (gw, _) = gateway_for(product_app()).await;
    let service = ProductService::new(gw);

    let found = service
        .find_by_code("c1", "P200.0003.CX12")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "GUARAVITON ACAI 500ML");

    let missing = service.find_by_code("c1", "P999.0000.CX01").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn pallet_formation_reports_units_per_pallet() {
    let (gw, _) = gateway_for(product_app()).await;

    let formations = ProductService::new(gw)
        .pallet_formations("c1")
        .await
        .unwrap();
    assert_eq!(formations.len(), 1);
    assert_eq!(formations[0].product.code, "P100.0001.CX24");
    assert_eq!(formations[0].quantity_per_pallet, 170);
}

// ── productions and dashboard ────────────────────────────────────────

#[tokio::test]
async fn production_listing_passes_filters_as_query() {
    let app = Router::new().route(
        "/Producao/c1/List",
        get(
            |axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                assert_eq!(query.as_deref(), Some("lineId=l1&status=FINALIZADA"));
                Json(json!([]))
            },
        ),
    );
    let (gw, _) = gateway_for(app).await;

    let filters = ProductionFilters {
        line_id: Some("l1".to_string()),
        status: Some(pcount::types::ProductionStatus::Finished),
        ..ProductionFilters::default()
    };
    let listed = ProductionService::new(gw)
        .list("c1", &filters, FallbackPolicy::Strict)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn production_listing_encodes_query_values_with_spaces() {
    let app = Router::new().route(
        "/Producao/c1/List",
        get(
            |axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                assert_eq!(query.as_deref(), Some("status=EM+PRODUCAO"));
                Json(json!([]))
            },
        ),
    );
    let (gw, _) = gateway_for(app).await;

    let filters = ProductionFilters {
        status: Some(pcount::types::ProductionStatus::InProgress),
        ..ProductionFilters::default()
    };
    let listed = ProductionService::new(gw)
        .list("c1", &filters, FallbackPolicy::Strict)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn finish_marks_a_production_run_closed() {
    let app = Router::new().route(
        "/Producao/c1/Finish",
        put(|Json(body): Json<Value>| async move {
            assert_eq!(body["id"], "p1");
            Json(json!({
                "id": "p1",
                "lineId": "l1",
                "productCode": "P100.0001.CX24",
                "productName": "GUARAVITA NATURAL 290ML",
                "technician": "op@factory.io",
                "startDate": "27/08/2025 - 05:58",
                "endDate": "28/08/2025 - 05:20",
                "status": "FINALIZADA"
            }))
        }),
    );
    let (gw, _) = gateway_for(app).await;

    let production = ProductionService::new(gw).finish("c1", "p1").await.unwrap();
    assert_eq!(
        production.status,
        pcount::types::ProductionStatus::Finished
    );
    assert!(production.end_date.is_some());
}

#[tokio::test]
async fn dashboard_flow_sends_scope_and_derives_statistics() {
    let app = Router::new().route(
        "/Dashboard/c1/Search",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["usuarioId"], "u1");
            assert_eq!(body["circuitoIds"], json!(["l1", "l2"]));
            Json(json!({
                "horaProdutiva": "2:30",
                "horaOciosa": "1:00",
                "mediaHora": 120,
                "totalProduzido": { "maximo": 100, "minimo": 0, "total": 420 },
                "totalProduzidoHora": [ { "dataHora": "08", "valor1": 100, "valor2": 0 } ]
            }))
        }),
    );
    let (gw, _) = gateway_for(app).await;

    let stats = ProductionService::new(gw)
        .dashboard_stats("c1", &search("u1", vec!["l1", "l2"]), FallbackPolicy::Strict)
        .await
        .unwrap();

    assert_eq!(stats.operation_hours, "3.5");
    assert_eq!(stats.productive_hours, "2:30");
    assert_eq!(stats.avg_production, 120.0);
    assert_eq!(stats.total_produced, 420.0);
    assert_eq!(stats.hourly_production.len(), 1);
    assert_eq!(stats.hourly_production[0].hour, "08:00");
}

#[tokio::test]
async fn dashboard_derives_when_upstream_omits_durations() {
    let app = Router::new().route(
        "/Dashboard/c1/Search",
        post(|| async {
            Json(json!({
                "horaProdutiva": null,
                "horaOciosa": null,
                "mediaHora": 0,
                "totalProduzido": { "total": 300 },
                "totalProduzidoHora": [
                    { "dataHora": "09", "valor1": 100, "valor2": 0 },
                    { "dataHora": "10", "valor1": 0, "valor2": 50 },
                    { "dataHora": "11", "valor1": 200, "valor2": 0 }
                ]
            }))
        }),
    );
    let (gw, _) = gateway_for(app).await;

    let stats = ProductionService::new(gw)
        .dashboard_stats("c1", &search("u1", vec!["l1"]), FallbackPolicy::Strict)
        .await
        .unwrap();

    assert_eq!(stats.productive_hours, "2:00");
    assert_eq!(stats.operation_hours, "3.0");
    assert_eq!(stats.avg_production, 150.0);
}

#[tokio::test]
async fn dashboard_fixture_policy_is_explicit_and_logged_not_silent() {
    let app = Router::new().route(
        "/Dashboard/c1/Search",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let (gw, _) = gateway_for(app).await;
    let service = ProductionService::new(gw);

    let strict = service
        .dashboard_stats("c1", &search("u1", vec!["l1"]), FallbackPolicy::Strict)
        .await;
    assert!(matches!(strict, Err(ServiceError::Api(_))));

    let fixture = service
        .dashboard_stats("c1", &search("u1", vec!["l1"]), FallbackPolicy::FixtureOnError)
        .await
        .unwrap();
    assert_eq!(fixture.total_produced, 4082.0);
}

#[tokio::test]
async fn dashboard_treats_empty_body_as_no_data() {
    let app = Router::new().route(
        "/Dashboard/c1/Search",
        post(|| async { StatusCode::NO_CONTENT }),
    );
    let (gw, _) = gateway_for(app).await;

    let stats = ProductionService::new(gw)
        .dashboard_stats("c1", &search("u1", vec!["l1"]), FallbackPolicy::Strict)
        .await
        .unwrap();
    assert!(stats.hourly_production.is_empty());
    assert_eq!(stats.operation_hours, "0.0");
}
