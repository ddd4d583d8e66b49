use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use traveloki::auth::StaticTokenAuth;
use traveloki::category::{Category, CategoryIds};
use traveloki::domain::NewAttraction;
use traveloki::moderation::ModerationService;
use traveloki::server::{create_router, AppState};
use traveloki::storage::{DirectoryStore, InMemoryDirectory};

fn test_router() -> Router {
    let store: Arc<dyn DirectoryStore> = Arc::new(InMemoryDirectory::seeded(vec![NewAttraction {
        name: "Warung Enak".to_string(),
        description: "Local favorites".to_string(),
        address: "Jl. Pandu".to_string(),
        lat: 3.59,
        lng: 98.67,
        category: Category::Food,
    }]));

    let auth = StaticTokenAuth::new();
    auth.issue("admin-token", "admin", true);
    auth.issue("user-token", "budi", false);

    let moderation = Arc::new(ModerationService::new(
        store.clone(),
        CategoryIds::default(),
    ));

    create_router(AppState {
        store,
        auth: Arc::new(auth),
        moderation,
        area: "medan".to_string(),
    })
}

async fn body_json(response: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn list_attractions_for_the_configured_area() -> Result<()> {
    let app = test_router();

    let response = app.clone().oneshot(get("/attractions/medan")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await?;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["food"][0]["name"], "Warung Enak");
    assert_eq!(json["data"]["fun"].as_array().unwrap().len(), 0);

    let response = app.oneshot(get("/attractions/jakarta")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn text_search_endpoint() -> Result<()> {
    let app = test_router();

    let response = app.clone().oneshot(get("/attractions/search?q=enak")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await?;
    assert_eq!(json["data"]["name"], "Warung Enak");

    // A miss is an explicit not-found, never a silent empty result.
    let response = app
        .clone()
        .oneshot(get("/attractions/search?q=zanzibar"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // An empty query is a no-op.
    let response = app.oneshot(get("/attractions/search?q=")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await?;
    assert!(json["data"].is_null());

    Ok(())
}

#[tokio::test]
async fn nearby_endpoint_returns_closest_first() -> Result<()> {
    let app = test_router();

    let response = app
        .oneshot(get("/attractions/nearby?lat=3.59&lng=98.67&radius=5"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await?;
    assert_eq!(json["data"][0]["name"], "Warung Enak");

    Ok(())
}

#[tokio::test]
async fn admin_routes_fail_closed() -> Result<()> {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(get("/attractions/recommendations/pending"))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut with_user_token = get("/attractions/recommendations/pending");
    with_user_token
        .headers_mut()
        .insert("authorization", "Bearer user-token".parse().unwrap());
    let response = app.clone().oneshot(with_user_token).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_json(
            "/attractions/recommend",
            None,
            serde_json::json!({
                "name": "X", "description": "Y", "lat": 3.5, "lng": 98.6, "category": "food"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn moderation_over_http_end_to_end() -> Result<()> {
    let app = test_router();

    // User submits a recommendation with category "Fun".
    let response = app
        .clone()
        .oneshot(post_json(
            "/attractions/recommend",
            Some("user-token"),
            serde_json::json!({
                "name": "Merdeka Walk",
                "description": "Open-air dining and events",
                "address": "Jl. Balai Kota",
                "lat": 3.5952,
                "lng": 98.6778,
                "category": "Fun"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let submitted = body_json(response).await?;
    let id = submitted["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(submitted["data"]["state"], "pending");

    // Admin sees it pending.
    let mut pending_req = get("/attractions/recommendations/pending");
    pending_req
        .headers_mut()
        .insert("authorization", "Bearer admin-token".parse().unwrap());
    let response = app.clone().oneshot(pending_req).await?;
    let pending = body_json(response).await?;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    // Approve with the storage-schema category id for fun.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/attractions/recommendations/{id}/approve"),
            Some("admin-token"),
            serde_json::json!({ "category_id": 2 }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let approved = body_json(response).await?;
    assert_eq!(approved["data"]["category"], "fun");
    let attraction_id = approved["data"]["id"].as_str().unwrap().to_string();

    // A second approval conflicts and publishes nothing new.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/attractions/recommendations/{id}/approve"),
            Some("admin-token"),
            serde_json::json!({ "category_id": 2 }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The queue is empty and the attraction is live under fun.
    let mut pending_req = get("/attractions/recommendations/pending");
    pending_req
        .headers_mut()
        .insert("authorization", "Bearer admin-token".parse().unwrap());
    let response = app.clone().oneshot(pending_req).await?;
    let pending = body_json(response).await?;
    assert!(pending["data"].as_array().unwrap().is_empty());

    let response = app.clone().oneshot(get("/attractions/medan")).await?;
    let listing = body_json(response).await?;
    assert_eq!(listing["data"]["fun"][0]["name"], "Merdeka Walk");

    // Admin deletes the published attraction.
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/attractions/{attraction_id}"))
        .header("authorization", "Bearer admin-token")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/attractions/medan")).await?;
    let listing = body_json(response).await?;
    assert!(listing["data"]["fun"].as_array().unwrap().is_empty());

    Ok(())
}
