use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    routing::get,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use woodcraft_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::{inventory_item, product, product_material, user},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

const TEST_JWT_SECRET: &str =
    "an_extremely_long_and_random_looking_test_secret_Kx93TqWz_mR7vGpLhD2_sNcJfYb";

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub auth_service: Arc<AuthService>,
    pub customer: user::Model,
    pub employee: user::Model,
    customer_token: String,
    employee_token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct a test application after tweaking the config (e.g. pointing
    /// payment provider base URLs at a mock server).
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // In-memory SQLite lives per-connection; keep the pool at one.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()), &cfg);

        let state = AppState {
            db: db_arc.clone(),
            config: cfg,
            event_sender,
            services,
        };

        let customer = seed_user(&state, "Ana Cruz", "ana@example.com", user::UserRole::Customer).await;
        let employee = seed_user(
            &state,
            "Ben Santos",
            "ben@woodcraft.example",
            user::UserRole::Employee,
        )
        .await;

        let customer_token = auth_service
            .generate_token(&customer)
            .expect("customer token")
            .access_token;
        let employee_token = auth_service
            .generate_token(&employee)
            .expect("employee token")
            .access_token;

        let auth_for_layer = auth_service.clone();
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .nest("/api/v1", woodcraft_api::api_v1_routes())
            .nest(
                "/auth",
                woodcraft_api::auth::auth_routes().with_state(auth_service.clone()),
            )
            .layer(axum::middleware::from_fn_with_state(
                auth_for_layer,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .layer(axum::middleware::from_fn(
                woodcraft_api::telemetry::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            auth_service,
            customer,
            employee,
            customer_token,
            employee_token,
            _event_task: event_task,
        }
    }

    pub fn customer_token(&self) -> &str {
        &self.customer_token
    }

    pub fn employee_token(&self) -> &str {
        &self.employee_token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn as_customer(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.customer_token()))
            .await
    }

    pub async fn as_employee(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.employee_token()))
            .await
    }

    /// Seed a finished product.
    pub async fn seed_product(&self, name: &str, price: Decimal, stock: i32) -> product::Model {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            stock: Set(stock),
            image_url: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed product")
    }

    /// Seed a raw-material inventory item.
    pub async fn seed_inventory_item(
        &self,
        sku: &str,
        name: &str,
        on_hand: i32,
    ) -> inventory_item::Model {
        inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            category: Set(Some("raw".to_string())),
            location: Set(None),
            unit: Set(Some("piece".to_string())),
            unit_cost: Set(None),
            supplier: Set(None),
            description: Set(None),
            quantity_on_hand: Set(on_hand),
            safety_stock: Set(0),
            reorder_point: Set(0),
            max_level: Set(0),
            lead_time_days: Set(0),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed inventory item")
    }

    /// Attach BOM lines to a product.
    pub async fn set_bom(&self, product_id: Uuid, lines: &[(Uuid, Decimal)]) {
        for (inventory_item_id, qty_per_unit) in lines {
            product_material::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                inventory_item_id: Set(*inventory_item_id),
                qty_per_unit: Set(*qty_per_unit),
            }
            .insert(&*self.state.db)
            .await
            .expect("seed BOM line");
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

async fn seed_user(state: &AppState, name: &str, email: &str, role: user::UserRole) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        // Password hashing is exercised through /auth/register; seeded users
        // authenticate with minted tokens.
        password_hash: Set(String::new()),
        role: Set(role),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(&*state.db)
    .await
    .expect("seed user")
}

/// Read a JSON body from a response.
pub async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("response body is json")
}

/// Assert a status and return the parsed body.
pub async fn expect_json(response: axum::response::Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status, "unexpected response status");
    read_json(response).await
}
