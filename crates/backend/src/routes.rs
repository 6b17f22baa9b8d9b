use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::shared::app_state::AppState;
use crate::system::auth::middleware::{require_admin, require_auth};
use crate::system::middleware::request_logger::request_logger;
use crate::{handlers, system};

/// All application routes with auth, CORS and request logging applied
pub fn configure_routes(state: AppState) -> Router {
    let auth = || middleware::from_fn_with_state(state.clone(), require_auth);
    let admin = || middleware::from_fn_with_state(state.clone(), require_admin);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH
        // ========================================
        .route(
            "/api/system/auth/register",
            post(system::handlers::auth::register),
        )
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout).layer(auth()),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_account).layer(auth()),
        )
        // Customers (admin only)
        .route(
            "/api/customers",
            get(system::handlers::customers::list_all)
                .post(system::handlers::customers::create)
                .layer(admin()),
        )
        .route(
            "/api/customers/:id",
            get(system::handlers::customers::get_by_id)
                .put(system::handlers::customers::update)
                .delete(system::handlers::customers::delete)
                .layer(admin()),
        )
        // ========================================
        // A001 Menu
        // ========================================
        .route(
            "/api/menu",
            get(handlers::a001_menu_item::list_all)
                .merge(post(handlers::a001_menu_item::create).layer(admin())),
        )
        .route(
            "/api/menu/:id",
            get(handlers::a001_menu_item::get_by_id).merge(
                put(handlers::a001_menu_item::update)
                    .delete(handlers::a001_menu_item::delete)
                    .layer(admin()),
            ),
        )
        // ========================================
        // A002 Orders
        // ========================================
        .route(
            "/api/orders",
            get(handlers::a002_order::list_all)
                .post(handlers::a002_order::create)
                .layer(admin()),
        )
        .route(
            "/api/orders/mine",
            get(handlers::a002_order::list_mine).layer(auth()),
        )
        .route(
            "/api/orders/:id",
            get(handlers::a002_order::get_by_id)
                .delete(handlers::a002_order::cancel)
                .layer(auth()),
        )
        .route(
            "/api/orders/:id/tracking",
            get(handlers::a002_order::tracking).layer(auth()),
        )
        .route(
            "/api/orders/:id/status",
            put(handlers::a002_order::update_status).layer(admin()),
        )
        // ========================================
        // A003 Complaints
        // ========================================
        .route(
            "/api/complaints",
            post(handlers::a003_complaint::create)
                .layer(auth())
                .merge(get(handlers::a003_complaint::list_all).layer(admin())),
        )
        .route(
            "/api/complaints/mine",
            get(handlers::a003_complaint::list_mine).layer(auth()),
        )
        .route(
            "/api/complaints/:id/status",
            put(handlers::a003_complaint::update_status).layer(admin()),
        )
        // ========================================
        // A004 Promotions (admin only)
        // ========================================
        .route(
            "/api/promotions",
            get(handlers::a004_promotion::list_all)
                .post(handlers::a004_promotion::create)
                .layer(admin()),
        )
        .route(
            "/api/promotions/:id",
            put(handlers::a004_promotion::update)
                .delete(handlers::a004_promotion::delete)
                .layer(admin()),
        )
        .route(
            "/api/promotions/:id/toggle",
            post(handlers::a004_promotion::toggle).layer(admin()),
        )
        // ========================================
        // U501 Cart
        // ========================================
        .route("/api/cart", get(handlers::u501_cart::get_cart).layer(auth()))
        .route(
            "/api/cart/items",
            post(handlers::u501_cart::add_item).layer(auth()),
        )
        .route(
            "/api/cart/items/:menu_item_id",
            put(handlers::u501_cart::set_quantity)
                .delete(handlers::u501_cart::remove_item)
                .layer(auth()),
        )
        .route(
            "/api/cart/events",
            get(handlers::u501_cart::events).layer(auth()),
        )
        // ========================================
        // U502 Checkout
        // ========================================
        .route(
            "/api/checkout/start",
            post(handlers::u502_checkout::start).layer(auth()),
        )
        .route(
            "/api/checkout/draft",
            get(handlers::u502_checkout::get_draft)
                .patch(handlers::u502_checkout::update_draft)
                .layer(auth()),
        )
        .route(
            "/api/checkout/place-order",
            post(handlers::u502_checkout::place_order).layer(auth()),
        )
        // ========================================
        // U503 Menu import, U504 Favorites
        // ========================================
        .route(
            "/api/u503/import-menu",
            post(handlers::u503_import_menu::import_menu).layer(admin()),
        )
        .route(
            "/api/favorites",
            get(handlers::u504_favorites::list).layer(auth()),
        )
        .route(
            "/api/favorites/:menu_item_id/toggle",
            post(handlers::u504_favorites::toggle).layer(auth()),
        )
        // ========================================
        // Audit log
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .delete(handlers::logs::clear_all)
                .layer(admin()),
        )
        .layer(cors)
        .layer(middleware::from_fn(request_logger))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::Config;
    use crate::shared::data::db::test_support::{seed_admin, seed_customer, seed_menu_item, test_db};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(app: &Router, email: &str, role: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/system/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret1", "role": role })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_checkout_flow_over_http() {
        let (_dir, db) = test_db().await;
        seed_customer(&db, "a@x.com").await;
        let item = seed_menu_item(&db, "Kare-Kare", 299.0).await;
        let app = configure_routes(AppState::new(db, Config::default()));
        let token = login(&app, "a@x.com", "customer").await;

        let (status, cart) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(&token),
            Some(json!({ "menuItemId": item.id.value(), "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["subtotal"], json!(598.0));

        let (status, view) = send(&app, "POST", "/api/checkout/start", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["summary"]["total"], json!(618.0));

        let (status, order) = send(&app, "POST", "/api/checkout/place-order", Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["total"], json!(618.0));
        assert_eq!(order["status"], json!("Pending"));

        let (_, cart) = send(&app, "GET", "/api/cart", Some(&token), None).await;
        assert_eq!(cart["itemCount"], json!(0));

        let code = order["code"].as_str().unwrap();
        let (status, tracking) =
            send(&app, "GET", &format!("/api/orders/{}/tracking", code), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["progressPercent"], json!(10));
        assert_eq!(tracking["stepIndex"], Value::Null);
        assert_eq!(tracking["stages"][0]["reached"], json!(false));
    }

    #[tokio::test]
    async fn test_access_rules() {
        let (_dir, db) = test_db().await;
        seed_customer(&db, "a@x.com").await;
        seed_admin(&db, "boss@x.com").await;
        let app = configure_routes(AppState::new(db, Config::default()));

        let (status, _) = send(&app, "GET", "/api/menu", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", "/api/cart", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let customer = login(&app, "a@x.com", "customer").await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/menu",
            Some(&customer),
            Some(json!({ "name": "Adobo", "price": 180, "category": "Mains" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = login(&app, "boss@x.com", "admin").await;
        let (status, item) = send(
            &app,
            "POST",
            "/api/menu",
            Some(&admin),
            Some(json!({ "name": "Adobo", "price": 180, "category": "Mains" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "GET", "/api/menu/9999", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));

        let (status, _) = send(&app, "GET", &format!("/api/menu/{}", item["id"]), None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "POST", "/api/system/auth/logout", Some(&customer), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/api/system/auth/me", Some(&customer), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_and_role_scoped_login() {
        let (_dir, db) = test_db().await;
        let app = configure_routes(AppState::new(db, Config::default()));
        let registration = json!({ "email": "dup@x.com", "password": "secret1", "name": "Dup" });

        let (status, account) =
            send(&app, "POST", "/api/system/auth/register", None, Some(registration.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(account["role"], json!("customer"));

        let (status, _) = send(&app, "POST", "/api/system/auth/register", None, Some(registration)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            "/api/system/auth/login",
            None,
            Some(json!({ "email": "dup@x.com", "password": "secret1", "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_staff_order_and_status_guard() {
        let (_dir, db) = test_db().await;
        let customer = seed_customer(&db, "a@x.com").await;
        seed_admin(&db, "boss@x.com").await;
        let item = seed_menu_item(&db, "Chef Salad", 199.0).await;
        let app = configure_routes(AppState::new(db, Config::default()));
        let admin = login(&app, "boss@x.com", "admin").await;

        let (status, order) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&admin),
            Some(json!({
                "customerId": customer.id,
                "items": [{ "menuItemId": item.id.value(), "quantity": 2, "price": 199 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["total"], json!(418.0));
        let id = order["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/orders/{}/status", id),
            Some(&admin),
            Some(json!({ "status": "Delivered" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", &format!("/api/orders/{}", id), Some(&admin), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "PUT",
            "/api/orders/ORD-999999/status",
            Some(&admin),
            Some(json!({ "status": "Confirmed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_input_is_a_json_validation_error() {
        let (_dir, db) = test_db().await;
        let customer = seed_customer(&db, "a@x.com").await;
        seed_admin(&db, "boss@x.com").await;
        let item = seed_menu_item(&db, "Chef Salad", 199.0).await;
        let app = configure_routes(AppState::new(db, Config::default()));
        let admin = login(&app, "boss@x.com", "admin").await;
        let token = login(&app, "a@x.com", "customer").await;

        let (_, order) = send(
            &app,
            "POST",
            "/api/orders",
            Some(&admin),
            Some(json!({
                "customerId": customer.id,
                "items": [{ "menuItemId": item.id.value(), "quantity": 1, "price": 199 }]
            })),
        )
        .await;
        let code = order["code"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/orders/{}/status", code),
            Some(&admin),
            Some(json!({ "status": "Shipped" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("validation"));
        assert!(body["error"].as_str().unwrap().contains("Shipped"), "{body}");

        let (status, body) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(&token),
            Some(json!({ "menuItemId": item.id.value(), "quantity": 1.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("validation"));

        let (status, body) = send(
            &app,
            "POST",
            "/api/system/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1", "role": "superuser" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("validation"));

        let (status, body) = send(&app, "GET", "/api/menu/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("validation"));

        let (_, unchanged) =
            send(&app, "GET", &format!("/api/orders/{}", code), Some(&admin), None).await;
        assert_eq!(unchanged["status"], json!("Pending"));
    }

    #[tokio::test]
    async fn test_cart_stream_closes_with_its_session() {
        let (_dir, db) = test_db().await;
        seed_customer(&db, "a@x.com").await;
        let item = seed_menu_item(&db, "Leche Flan", 80.0).await;
        let app = configure_routes(AppState::new(db, Config::default()));
        let phone = login(&app, "a@x.com", "customer").await;
        let laptop = login(&app, "a@x.com", "customer").await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/cart/events")
            .header(header::AUTHORIZATION, format!("Bearer {}", phone))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Another session of the same account ending leaves this stream open
        let (status, _) = send(&app, "POST", "/api/system/auth/logout", Some(&laptop), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(&phone),
            Some(json!({ "menuItemId": item.id.value(), "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "POST", "/api/system/auth/logout", Some(&phone), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let body = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            response.into_body().collect(),
        )
        .await
        .expect("stream still open after logout")
        .unwrap()
        .to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("\"itemCount\":0"), "{text}");
        assert!(text.contains("\"itemCount\":1"), "{text}");
    }
}
