//! End-to-end API tests through the router

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use namehub_common::{
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::{
        models::ModerationStatus, CategoryInput, CollectionInput, DbPool, NewGroupName,
        Repository,
    },
};
use namehub_gateway::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "s3cret";

async fn test_app() -> (Router, Repository) {
    let config = AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        },
        auth: AuthConfig {
            admin_token: Some(ADMIN_TOKEN.to_string()),
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    };

    let db = DbPool::new(&config.database).await.unwrap();
    let repo = Repository::new(db.clone());
    (create_router(AppState::new(config, db, None)), repo)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

/// Log in and return the `name=value` part of the session cookie
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/admin/login", json!({ "token": ADMIN_TOKEN })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

async fn seed_category(repo: &Repository, name: &str) -> i32 {
    repo.create_category(CategoryInput {
        name: name.to_string(),
        ..Default::default()
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Request::get("/ready").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn test_submit_validation() {
    let (app, repo) = test_app().await;
    let funny = seed_category(&repo, "搞笑").await;

    let (status, body) = send(&app, post_json("/api/submit", json!({ "name": "   ", "categoryId": funny }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, post_json("/api/submit", json!({ "name": "群".repeat(51), "categoryId": funny }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/api/submit", json!({ "name": "没有分类" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/api/submit", json!({ "name": "未知分类", "categoryId": 999 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stats = repo.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_names, 0);
}

#[tokio::test]
async fn test_submit_then_approve() {
    let (app, repo) = test_app().await;
    let funny = seed_category(&repo, "搞笑").await;

    let (status, body) = send(
        &app,
        post_json("/api/submit", json!({ "name": "  测试群名  ", "categoryId": funny })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["id"].as_i64().unwrap() as i32;

    let stored = repo.find_group_name(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "测试群名");
    assert_eq!(stored.status, ModerationStatus::Pending);
    assert!(stored.user_id.is_some());

    let (_, latest) = send(&app, Request::get("/api/latest").body(Body::empty()).unwrap()).await;
    assert_eq!(latest["total"], 0);

    let cookie = login(&app).await;

    let (status, _) = send(
        &app,
        with_cookie(post_json(&format!("/api/admin/group-names/{}/review", id), json!({ "status": "pending" })), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        with_cookie(post_json(&format!("/api/admin/group-names/{}/review", id), json!({ "status": "approved" })), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (_, latest) = send(&app, Request::get("/api/latest").body(Body::empty()).unwrap()).await;
    assert_eq!(latest["total"], 1);
    assert_eq!(latest["data"][0]["category"]["name"], "搞笑");
}

#[tokio::test]
async fn test_like_and_copy() {
    let (app, repo) = test_app().await;
    let created = repo
        .create_group_name(NewGroupName {
            name: "复制我".to_string(),
            category_id: None,
            collection_id: None,
            user_id: None,
            status: ModerationStatus::Approved,
        })
        .await
        .unwrap();

    for _ in 0..3 {
        let (status, body) = send(&app, post_json("/api/like", json!({ "id": created.id }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
    let (status, _) = send(&app, post_json("/api/copy", json!({ "id": created.id }))).await;
    assert_eq!(status, StatusCode::OK);

    let stored = repo.find_group_name(created.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 3);
    assert_eq!(stored.copies, 1);
    assert_eq!(stored.views, 1);

    let (status, _) = send(&app, post_json("/api/like", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let (app, _) = test_app().await;

    let (status, _) = send(&app, Request::get("/api/admin/stats").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = with_cookie(
        Request::get("/api/admin/check-auth").body(Body::empty()).unwrap(),
        "admin_session=1234abcd",
    );
    let (status, _) = send(&app, forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, post_json("/api/admin/login", json!({ "token": "wrong" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = login(&app).await;
    let (status, body) = send(
        &app,
        with_cookie(Request::get("/api/admin/check-auth").body(Body::empty()).unwrap(), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
async fn test_admin_add_defaults_to_approved() {
    let (app, repo) = test_app().await;
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        with_cookie(post_json("/api/admin/group-names", json!({ "name": "官方群名" })), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "approved");

    let (_, stats) = send(
        &app,
        with_cookie(Request::get("/api/admin/stats").body(Body::empty()).unwrap(), &cookie),
    )
    .await;
    assert_eq!(stats["totalNames"], 1);
    assert_eq!(stats["approvedNames"], 1);
    assert_eq!(stats["pendingNames"], 0);

    assert_eq!(repo.latest(12).await.unwrap().len(), 1);

    let missing = Request::delete("/api/admin/group-names/9999").body(Body::empty()).unwrap();
    let (status, _) = send(&app, with_cookie(missing, &cookie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_and_category_page() {
    let (app, repo) = test_app().await;
    let cute = seed_category(&repo, "可爱").await;
    repo.create_group_name(NewGroupName {
        name: "喵喵喵".to_string(),
        category_id: Some(cute),
        collection_id: None,
        user_id: None,
        status: ModerationStatus::Approved,
    })
    .await
    .unwrap();

    let (status, home) = send(&app, Request::get("/api/home").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(home["latest"].as_array().unwrap().len(), 1);
    assert_eq!(home["categories"].as_array().unwrap().len(), 1);

    let (status, page) = send(
        &app,
        Request::get(format!("/api/categories/{}", cute)).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["category"]["name"], "可爱");

    let (status, _) = send(&app, Request::get("/api/categories/9999").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, search) = send(&app, Request::get("/api/search?q=%20").body(Body::empty()).unwrap()).await;
    assert!(search["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_public_browse_filters() {
    let (app, repo) = test_app().await;
    let funny = seed_category(&repo, "搞笑").await;
    let dorm = repo
        .create_collection(CollectionInput {
            name: "寝室群名".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id;

    let rows = [
        ("欢乐宿舍", Some(funny), Some(dorm), ModerationStatus::Approved),
        ("欢乐家园", Some(funny), None, ModerationStatus::Approved),
        ("欢乐待审", Some(funny), Some(dorm), ModerationStatus::Pending),
        ("安静宿舍", None, Some(dorm), ModerationStatus::Approved),
    ];
    for (name, category_id, collection_id, status) in rows {
        repo.create_group_name(NewGroupName {
            name: name.to_string(),
            category_id,
            collection_id,
            user_id: None,
            status,
        })
        .await
        .unwrap();
    }

    let get = |uri: String| Request::get(uri).body(Body::empty()).unwrap();

    // A status parameter cannot widen the public listing
    let (status, body) = send(&app, get("/api/group-names?status=pending".to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert!(body["groupNames"]
        .as_array()
        .unwrap()
        .iter()
        .all(|g| g["status"] == "approved"));

    let (_, body) = send(&app, get(format!("/api/group-names?categoryId={}", funny))).await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(
        &app,
        get(format!(
            "/api/group-names?categoryId={}&collectionId={}&search=%E6%AC%A2%E4%B9%90",
            funny, dorm
        )),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["groupNames"][0]["name"], "欢乐宿舍");
    assert_eq!(body["totalPages"], 1);

    let (_, body) = send(&app, get("/api/group-names?page=999&limit=2".to_string())).await;
    assert!(body["groupNames"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_reassign_keeps_absent_fields() {
    let (app, repo) = test_app().await;
    let cookie = login(&app).await;
    let funny = seed_category(&repo, "搞笑").await;
    let cute = seed_category(&repo, "可爱").await;
    let dorm = repo
        .create_collection(CollectionInput {
            name: "寝室群名".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id;

    let id = repo
        .create_group_name(NewGroupName {
            name: "相亲相爱一家人".to_string(),
            category_id: Some(funny),
            collection_id: Some(dorm),
            user_id: None,
            status: ModerationStatus::Pending,
        })
        .await
        .unwrap()
        .id;

    let put_json = |body: Value| {
        let request = Request::put(format!("/api/admin/group-names/{}/update", id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        with_cookie(request, &cookie)
    };

    // Only the category moves
    let (status, body) = send(&app, put_json(json!({ "categoryId": cute }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categoryId"], cute);
    assert_eq!(body["collectionId"], dorm);
    assert_eq!(body["name"], "相亲相爱一家人");
    assert_eq!(body["status"], "pending");

    // Explicit null clears, absent keeps
    let (status, body) = send(&app, put_json(json!({ "collectionId": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categoryId"], cute);
    assert!(body["collectionId"].is_null());

    let (status, _) = send(&app, put_json(json!({ "categoryId": 9999 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = with_cookie(
        Request::put("/api/admin/group-names/9999/update")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap(),
        &cookie,
    );
    let (status, _) = send(&app, missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let anonymous = Request::put(format!("/api/admin/group-names/{}/update", id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&app, anonymous).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
