//! 集成测试公共工具
//!
//! 通过 `tower::ServiceExt::oneshot` 直接调用完整 Router (含中间件)，无网络开销。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use rental_server::db::DbService;
use rental_server::{AppState, Config, build_app};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// 内存数据库 + 初始管理员
pub async fn spawn_app() -> TestApp {
    spawn_app_with_url("sqlite::memory:").await
}

pub async fn spawn_app_with_url(database_url: &str) -> TestApp {
    let config = Config {
        database_url: database_url.to_string(),
        temp_order_cleanup_secs: 0,
        ..Config::default()
    };
    let db = DbService::new(&config.database_url)
        .await
        .expect("open test database");
    let state = AppState::with_pool(db.pool, config);
    state
        .ensure_bootstrap_admin()
        .await
        .expect("seed bootstrap admin");
    TestApp {
        app: build_app(state.clone()),
        state,
    }
}

impl TestApp {
    /// 发送请求，返回状态码与 JSON 响应体
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot call");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// 登录并返回令牌
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/admin/login",
                None,
                json!({"username": username, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USER, ADMIN_PASSWORD).await
    }

    /// 新建操作员账号并登录
    pub async fn operator_token(&self, admin_token: &str) -> String {
        let (status, body) = self
            .post(
                "/api/admin/user/save",
                Some(admin_token),
                json!({"username": "operator1", "password": "op123456", "role": "operator"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create operator failed: {body}");
        self.login("operator1", "op123456").await
    }

    /// 新增轮椅，返回 id
    pub async fn add_wheelchair(&self, token: &str, name: &str, price: f64, stock: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/admin/inventory/save",
                Some(token),
                json!({
                    "name": name,
                    "price": price,
                    "stock": stock,
                    "description": format!("{name} 描述"),
                    "manufacturer": "康复医疗器械厂",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add wheelchair failed: {body}");
        body["data"]["wheelchair"]["id"]
            .as_i64()
            .expect("wheelchair id")
    }

    /// 创建预订单，返回 pre_order_id
    pub async fn precreate(&self, wheelchair_id: i64) -> String {
        let (status, body) = self
            .post(
                "/api/order/precreate",
                None,
                json!({
                    "name": "张三",
                    "phone": "13800138000",
                    "address": "北京市朝阳区建国路1号",
                    "wheelchair_id": wheelchair_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "precreate failed: {body}");
        body["data"]["pre_order_id"]
            .as_str()
            .expect("pre_order_id")
            .to_string()
    }

    pub async fn wheelchair_stock(&self, token: &str, id: i64) -> i64 {
        let (status, body) = self
            .get(&format!("/api/admin/inventory/detail/{id}"), Some(token))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["stock"].as_i64().expect("stock")
    }
}
