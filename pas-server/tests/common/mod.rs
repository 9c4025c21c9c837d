//! Stub upstream servers and a running app for HTTP tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use pas_server::config::AppConfig;
use pas_server::web::{AppState, create_router};

/// Serve `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

pub fn unit(id: i64, name: &str, cep: &str, open_24h: u8, wait: &str) -> Value {
    json!({
        "id": id,
        "nome": name,
        "telefone": "(11) 4000-0000",
        "disponibilidade_24h": open_24h,
        "tempo_espera_geral": wait,
        "local": { "endereco": [{
            "cep": cep,
            "logradouro": "Rua Teste",
            "bairro": "Centro",
            "cidade": "Jandira"
        }]},
        "categoria": { "categoria": [{ "id": 1, "nome": "UBS" }] },
        "especialidades": { "especialidades": [{ "id": 2, "nome": "Pediatria" }] }
    })
}

/// Three units: 1 and 3 open 24h, 3 has an unresolvable postal code.
pub fn all_units() -> Value {
    json!({
        "status": true,
        "unidadesDeSaude": [
            unit(1, "UBS Centro", "06622-000", 1, "00:30:00"),
            unit(2, "UPA Norte", "06600-025", 0, "00:05:00"),
            unit(3, "Hospital Sul", "99999-999", 1, "00:10:00"),
            unit(1, "UBS Centro (duplicada)", "06622-000", 1, "00:01:00")
        ]
    })
}

/// Recorded traffic on the unit API stub.
#[derive(Default)]
pub struct UnitApiStub {
    pub list_hits: AtomicUsize,
    pub filter_bodies: Mutex<Vec<Value>>,
    pub name_terms: Mutex<Vec<String>>,
    pub category_hits: AtomicUsize,
    pub specialty_hits: AtomicUsize,
    /// When set, every unit endpoint answers 503.
    pub down: AtomicBool,
}

impl UnitApiStub {
    pub fn list_hits(&self) -> usize {
        self.list_hits.load(Ordering::SeqCst)
    }

    pub fn filter_bodies(&self) -> Vec<Value> {
        self.filter_bodies.lock().unwrap().clone()
    }

    pub fn name_terms(&self) -> Vec<String> {
        self.name_terms.lock().unwrap().clone()
    }

    fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "down").into_response()
}

async fn list_units(State(stub): State<Arc<UnitApiStub>>) -> Response {
    stub.list_hits.fetch_add(1, Ordering::SeqCst);
    if stub.is_down() {
        return unavailable();
    }
    Json(all_units()).into_response()
}

async fn filter_units(State(stub): State<Arc<UnitApiStub>>, Json(body): Json<Value>) -> Response {
    stub.filter_bodies.lock().unwrap().push(body);
    if stub.is_down() {
        return unavailable();
    }
    Json(json!({ "unidades": [unit(2, "UPA Norte", "06600-025", 0, "00:05:00")] })).into_response()
}

async fn unit_detail(State(stub): State<Arc<UnitApiStub>>, Path(id): Path<i64>) -> Response {
    if stub.is_down() {
        return unavailable();
    }
    if id == 1 {
        return Json(json!({
            "status": true,
            "unidadeDeSaude": unit(1, "UBS Centro", "06622-000", 1, "00:30:00")
        }))
        .into_response();
    }
    (StatusCode::NOT_FOUND, Json(json!({ "status": false }))).into_response()
}

async fn search_by_name(State(stub): State<Arc<UnitApiStub>>, Path(term): Path<String>) -> Response {
    stub.name_terms.lock().unwrap().push(term);
    if stub.is_down() {
        return unavailable();
    }
    let units: Vec<Value> = (10..17)
        .map(|id| unit(id, &format!("UBS {id}"), "06622-000", 0, "-"))
        .collect();
    Json(json!({ "status": true, "unidadesDeSaude": units })).into_response()
}

async fn categories(State(stub): State<Arc<UnitApiStub>>) -> Response {
    stub.category_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "status": true,
        "categorias": [{ "id": 1, "nome": "UBS" }, { "id": 2, "nome": "Hospital" }]
    }))
    .into_response()
}

/// Fails on the first call, then succeeds.
async fn specialties(State(stub): State<Arc<UnitApiStub>>) -> Response {
    if stub.specialty_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "status": true,
        "especialidades": [{ "id": 2, "nome": "Pediatria" }]
    }))
    .into_response()
}

pub fn unit_api_router(stub: Arc<UnitApiStub>) -> Router {
    Router::new()
        .route("/v1/pas/unidades/", get(list_units))
        .route("/v1/pas/unidades/filtrar", post(filter_units))
        .route("/v1/pas/unidades/nome/:term", get(search_by_name))
        .route("/v1/pas/unidades/:id", get(unit_detail))
        .route("/v1/pas/categoria", get(categories))
        .route("/v1/pas/especialidade", get(specialties))
        .with_state(stub)
}

/// Recorded traffic on the geocoder stub.
#[derive(Default)]
pub struct GeocoderStub {
    pub queries: Mutex<Vec<HashMap<String, String>>>,
    pub user_agents: Mutex<Vec<String>>,
}

impl GeocoderStub {
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn hits_for(&self, postal_code: &str) -> usize {
        self.queries()
            .iter()
            .filter(|q| q.get("postalcode").map(String::as_str) == Some(postal_code))
            .count()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

/// Postal code → position. `50000000` fails with a 500.
async fn nominatim_search(
    State(stub): State<Arc<GeocoderStub>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(ua) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        stub.user_agents.lock().unwrap().push(ua.to_string());
    }
    let code = query.get("postalcode").cloned().unwrap_or_default();
    stub.queries.lock().unwrap().push(query);

    match code.as_str() {
        "06622000" => Json(json!([{ "lat": "-23.52", "lon": "-46.89" }])).into_response(),
        "06600025" => Json(json!([{ "lat": "-23.70", "lon": "-46.89" }])).into_response(),
        "50000000" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(json!([])).into_response(),
    }
}

pub fn geocoder_router(stub: Arc<GeocoderStub>) -> Router {
    Router::new()
        .route("/search", get(nominatim_search))
        .with_state(stub)
}

/// A running app wired to fresh stubs.
pub struct TestApp {
    pub base: String,
    pub http: reqwest::Client,
    pub units: Arc<UnitApiStub>,
    pub geocoder: Arc<GeocoderStub>,
}

impl TestApp {
    pub async fn start() -> Self {
        let units = Arc::new(UnitApiStub::default());
        let geocoder = Arc::new(GeocoderStub::default());

        let units_addr = spawn(unit_api_router(units.clone())).await;
        let geocoder_addr = spawn(geocoder_router(geocoder.clone())).await;

        let mut config = AppConfig::default();
        config.unit_api = config
            .unit_api
            .with_base_url(format!("http://{units_addr}/v1/pas"));
        config.geocoder = config
            .geocoder
            .with_base_url(format!("http://{geocoder_addr}"));

        let state = AppState::from_config(&config).expect("state");
        let app_addr = spawn(create_router(state)).await;

        Self {
            base: format!("http://{app_addr}"),
            http: reqwest::Client::new(),
            units,
            geocoder,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.http.get(self.url(path)).send().await.expect("request")
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request")
    }
}

pub fn ids(units: &Value) -> Vec<i64> {
    units
        .as_array()
        .expect("array")
        .iter()
        .map(|u| u["id"].as_i64().expect("id"))
        .collect()
}
