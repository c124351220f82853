use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::Secret;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use money_tracker_be::auth::TokenClaims;
use money_tracker_be::{database, routes};

static JWT_SECRET: &str = "test_jwt_secret_for_integration_tests";

/// Handle to a migrated test database. Each instance acts as a fresh, random user.
pub struct TestApp {
    pub pool: PgPool,
    pub user_id: Uuid,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }
}

#[allow(dead_code)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl TestApp {
    /// Connect to `DATABASE_URL` and migrate. Returns `None` when no database is configured,
    /// so database-backed tests can be skipped.
    pub async fn try_new() -> Option<Self> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to database for tests");

        database::run_migrations(&pool)
            .await
            .expect("Failed to run migrations for tests");

        Some(TestApp {
            pool,
            user_id: Uuid::new_v4(),
        })
    }

    /// Same database, different user
    #[allow(dead_code)]
    pub fn other_user(&self) -> Self {
        TestApp {
            pool: self.pool.clone(),
            user_id: Uuid::new_v4(),
        }
    }

    pub fn token(&self) -> String {
        token_for(self.user_id)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.call(Method::Get, path, None, Some(self.token())).await
    }

    #[allow(dead_code)]
    pub async fn post(&self, path: &str, payload: &Value) -> TestResponse {
        self.call(Method::Post, path, Some(payload), Some(self.token()))
            .await
    }

    #[allow(dead_code)]
    pub async fn put(&self, path: &str, payload: &Value) -> TestResponse {
        self.call(Method::Put, path, Some(payload), Some(self.token()))
            .await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.call(Method::Delete, path, None, Some(self.token()))
            .await
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        token: Option<String>,
    ) -> TestResponse {
        let jwt_secret = Secret::new(JWT_SECRET.to_string());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.pool.clone()))
                .app_data(web::Data::new(jwt_secret))
                .configure(routes::configure),
        )
        .await;

        let mut req = match method {
            Method::Get => test::TestRequest::get(),
            Method::Post => test::TestRequest::post(),
            Method::Put => test::TestRequest::put(),
            Method::Delete => test::TestRequest::delete(),
        }
        .uri(path);

        if let Some(token) = token {
            req = req.insert_header(("Authorization", format!("Bearer {token}")));
        }
        if let Some(payload) = payload {
            req = req.set_json(payload);
        }

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        TestResponse { status, body }
    }

    /// Number of rows stored for this user
    #[allow(dead_code)]
    pub async fn transaction_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
            .bind(self.user_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count transactions")
    }
}

pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(1)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}
