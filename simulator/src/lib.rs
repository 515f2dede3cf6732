use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use casino_church_execution::{
    casino::{memecoin::MemecoinError, slots::SlotError},
    ticker::{Flow, Ticker},
    FileStorage, Memory, StorageError,
};
use casino_church_types::{progress::UnknownRealm, Realm};
use chrono::{SecondsFormat, Utc};
use commonware_cryptography::{sha256::Sha256, Hasher};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, RwLock},
    time::Duration,
};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

pub mod config;
pub mod table;

pub use config::{Config, ConfigError, ValidatedConfig};
use table::{Table, TableStorage};

/// Reported by the health check.
pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
}

impl From<SlotError> for ApiError {
    fn from(e: SlotError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<MemecoinError> for ApiError {
    fn from(e: MemecoinError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// A registered account.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    password_digest: [u8; 32],
}

fn digest_password(password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.finalize().0
}

/// Shared server state: one table, its timers and the account registry.
pub struct Simulator {
    table: Arc<Mutex<Table>>,
    decay_ticker: Mutex<Option<Ticker>>,
    price_ticker: Mutex<Option<Ticker>>,
    users: RwLock<HashMap<String, User>>,
    decay_interval: Duration,
    price_interval: Duration,
}

impl Simulator {
    pub fn new(table: Table, decay_interval: Duration, price_interval: Duration) -> Self {
        Self {
            table: Arc::new(Mutex::new(table)),
            decay_ticker: Mutex::new(None),
            price_ticker: Mutex::new(None),
            users: RwLock::new(HashMap::new()),
            decay_interval,
            price_interval,
        }
    }

    /// Build a simulator backed by the configured storage directory, or by
    /// memory when none is set.
    pub fn from_config(config: &ValidatedConfig) -> Result<Self, StorageError> {
        let storage: TableStorage = match &config.directory {
            Some(directory) => Box::new(FileStorage::new(directory)?),
            None => Box::new(Memory::default()),
        };
        Ok(Self::new(
            Table::new(storage, config.seed),
            config.decay_interval,
            config.price_interval,
        ))
    }

    fn table(&self) -> Result<MutexGuard<'_, Table>, ApiError> {
        self.table.lock().map_err(|e| {
            error!("Failed to acquire table lock: {}", e);
            ApiError::Internal
        })
    }

    /// Replace the decay timer with a fresh one starting now.
    fn restart_decay(&self) {
        let table = self.table.clone();
        let ticker = Ticker::spawn(self.decay_interval, move || match table.lock() {
            Ok(mut table) => {
                table.apply_decay();
                Flow::Continue
            }
            Err(e) => {
                error!("Failed to acquire table lock in decay timer: {}", e);
                Flow::Stop
            }
        });
        match self.decay_ticker.lock() {
            Ok(mut slot) => *slot = Some(ticker),
            Err(e) => error!("Failed to acquire decay timer lock: {}", e),
        }
    }

    /// Start the price timer unless one is already running.
    fn ensure_price_ticker(&self) {
        let mut slot = match self.price_ticker.lock() {
            Ok(slot) => slot,
            Err(e) => {
                error!("Failed to acquire price timer lock: {}", e);
                return;
            }
        };
        if slot.as_ref().is_some_and(|ticker| !ticker.is_finished()) {
            return;
        }
        let table = self.table.clone();
        *slot = Some(Ticker::spawn(self.price_interval, move || {
            let mut table = match table.lock() {
                Ok(table) => table,
                Err(e) => {
                    error!("Failed to acquire table lock in price timer: {}", e);
                    return Flow::Stop;
                }
            };
            match table.tick_memecoin() {
                Ok(None) => Flow::Continue,
                Ok(Some(outcome)) => {
                    info!(reason = %outcome.reason, "memecoin session ended by market");
                    Flow::Stop
                }
                Err(e) => {
                    debug!("Price timer stopped: {}", e);
                    Flow::Stop
                }
            }
        }));
    }

    fn stop_price_ticker(&self) {
        match self.price_ticker.lock() {
            Ok(mut slot) => *slot = None,
            Err(e) => error!("Failed to acquire price timer lock: {}", e),
        }
    }

    /// Register a new account. Usernames are unique.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let mut users = self.users.write().map_err(|e| {
            error!("Failed to acquire write lock in create_user: {}", e);
            ApiError::Internal
        })?;
        if users.contains_key(username) {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_digest: digest_password(password),
        };
        users.insert(username.to_string(), user.clone());
        info!(username, "user created");
        Ok(user)
    }

    pub fn verify_user(&self, username: &str, password: &str) -> bool {
        match self.users.read() {
            Ok(users) => users
                .get(username)
                .is_some_and(|user| user.password_digest == digest_password(password)),
            Err(e) => {
                error!("Failed to acquire read lock in verify_user: {}", e);
                false
            }
        }
    }
}

pub struct Api {
    simulator: Arc<Simulator>,
}

impl Api {
    pub fn new(simulator: Arc<Simulator>) -> Self {
        Self { simulator }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/api/health", get(health))
            .route("/api/users", post(create_user))
            .route("/api/progress", get(progress))
            .route("/api/progress/reset", post(reset_progress))
            .route("/api/realm/:realm", post(enter_realm))
            .route("/api/slots", get(slots))
            .route("/api/slots/spin", post(spin))
            .route("/api/slots/cashout", post(cashout))
            .route("/api/memecoin", get(memecoin))
            .route("/api/memecoin/buy", post(buy))
            .route("/api/memecoin/sell", post(sell))
            .route("/api/memecoin/reset", post(reset_memecoin))
            .fallback(not_found)
            .layer(cors)
            .with_state(self.simulator.clone())
    }
}

#[derive(Debug, Deserialize)]
struct NewUser {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct Bet {
    bet: f64,
}

#[derive(Debug, Deserialize)]
struct Amount {
    amount: f64,
}

/// Unwrap a JSON body, mapping malformed input to 400.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(inner)| inner).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ApiError::BadRequest(e.body_text())
    })
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": API_VERSION,
    }))
}

async fn create_user(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid = || ApiError::BadRequest("Invalid user data".to_string());
    let new_user = body(payload).map_err(|_| invalid())?;
    let username = new_user.username.trim();
    if username.is_empty() || new_user.password.is_empty() {
        return Err(invalid());
    }
    let user = simulator.create_user(username, &new_user.password)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
        })),
    ))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

async fn progress(AxumState(simulator): AxumState<Arc<Simulator>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(simulator.table()?.progress()))
}

async fn reset_progress(
    AxumState(simulator): AxumState<Arc<Simulator>>,
) -> Result<impl IntoResponse, ApiError> {
    let view = simulator.table()?.reset_progress();
    info!("progress reset to defaults");
    Ok(Json(view))
}

async fn enter_realm(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(realm): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let realm: Realm = realm
        .parse()
        .map_err(|e: UnknownRealm| ApiError::BadRequest(e.to_string()))?;
    let view = simulator.table()?.enter_realm(realm);
    simulator.restart_decay();
    info!(%realm, "entered realm");
    Ok(Json(view))
}

async fn slots(AxumState(simulator): AxumState<Arc<Simulator>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(simulator.table()?.slots()))
}

async fn spin(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    payload: Result<Json<Bet>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Bet { bet } = body(payload)?;
    let view = simulator.table()?.spin(bet)?;
    Ok(Json(view))
}

async fn cashout(AxumState(simulator): AxumState<Arc<Simulator>>) -> Result<impl IntoResponse, ApiError> {
    let view = simulator.table()?.cashout()?;
    Ok(Json(view))
}

async fn memecoin(AxumState(simulator): AxumState<Arc<Simulator>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(simulator.table()?.memecoin()))
}

async fn buy(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    payload: Result<Json<Amount>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Amount { amount } = body(payload)?;
    let view = simulator.table()?.buy(amount)?;
    simulator.ensure_price_ticker();
    Ok(Json(view))
}

async fn sell(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    payload: Result<Json<Amount>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Amount { amount } = body(payload)?;
    let view = simulator.table()?.sell(amount)?;
    simulator.stop_price_ticker();
    Ok(Json(view))
}

async fn reset_memecoin(
    AxumState(simulator): AxumState<Arc<Simulator>>,
) -> Result<impl IntoResponse, ApiError> {
    simulator.stop_price_ticker();
    let view = simulator.table()?.reset_memecoin();
    Ok(Json(view))
}
