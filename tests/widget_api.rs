use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use bili_widget::common::client::client::BiliClient;
use bili_widget::common::config::{AppConfig, Credential, Endpoints, Variant};
use bili_widget::server::{self, AppState};
use bili_widget::Aggregator;

const TEST_COOKIE: &str = "SESSDATA=test-session; bili_jct=csrf";

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    Forbidden,
    Blocked,
    Banned,
    Empty,
}

#[derive(Clone)]
struct MockUpstream {
    hits: Arc<AtomicUsize>,
    mode: Mode,
}

fn not_logged_in() -> Response {
    Json(json!({ "code": -101, "message": "账号未登录", "ttl": 1 })).into_response()
}

fn has_cookie(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TEST_COOKIE)
}

async fn space_history(State(mock): State<MockUpstream>, headers: HeaderMap) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    match mock.mode {
        Mode::Forbidden => return StatusCode::FORBIDDEN.into_response(),
        Mode::Blocked => return StatusCode::PRECONDITION_FAILED.into_response(),
        Mode::Empty => {
            return Json(json!({ "code": 0, "message": "", "data": { "cards": null, "has_more": 0 } }))
                .into_response();
        }
        Mode::Banned => {
            return Json(json!({ "code": -352, "message": "风控校验失败" })).into_response();
        }
        Mode::Normal => {}
    }
    if !has_cookie(&headers) {
        return not_logged_in();
    }
    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if referer != "https://space.bilibili.com/42/dynamic" {
        return Json(json!({ "code": -400, "message": "bad referer" })).into_response();
    }

    let video = |bvid: &str, title: &str, ts: i64| {
        json!({
            "desc": { "type": 8, "timestamp": ts, "bvid": bvid },
            "card": json!({
                "title": title,
                "desc": "desc",
                "pic": "https://i0.hdslb.com/pic.jpg",
                "duration": 300,
                "stat": { "view": 99, "reply": 3 }
            }).to_string()
        })
    };

    Json(json!({
        "code": 0,
        "message": "",
        "data": {
            "has_more": 0,
            "cards": [
                video("BV1first", "first", 1704067200),
                { "desc": { "type": 1, "timestamp": 1704067100 }, "card": "{\"item\":{}}" },
                { "desc": { "type": 8, "timestamp": 1704067000, "bvid": "BV1broken" }, "card": "{broken" },
                video("BV1second", "second", 1704000000)
            ]
        }
    }))
    .into_response()
}

async fn space_info(State(mock): State<MockUpstream>, headers: HeaderMap) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    if !has_cookie(&headers) {
        return not_logged_in();
    }
    Json(json!({
        "code": 0,
        "message": "0",
        "data": {
            "mid": 42,
            "name": "测试UP",
            "face": "https://i0.hdslb.com/face.jpg",
            "sign": "",
            "live_room": {
                "roomStatus": 1,
                "liveStatus": 0,
                "url": "https://live.bilibili.com/777",
                "title": "过期的标题",
                "cover": "https://i0.hdslb.com/live-cover.jpg",
                "roomid": 777
            }
        }
    }))
    .into_response()
}

async fn room_info(State(mock): State<MockUpstream>, headers: HeaderMap) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    if !has_cookie(&headers) {
        return not_logged_in();
    }
    Json(json!({
        "code": 0,
        "msg": "ok",
        "message": "ok",
        "data": {
            "roomStatus": 1,
            "roundStatus": 0,
            "liveStatus": 1,
            "url": "https://live.bilibili.com/777",
            "title": "正在直播",
            "cover": "",
            "online": 1234,
            "roomid": 777
        }
    }))
    .into_response()
}

async fn user_card(State(mock): State<MockUpstream>, headers: HeaderMap) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    if !has_cookie(&headers) {
        return not_logged_in();
    }
    Json(json!({
        "code": 0,
        "message": "0",
        "data": {
            "card": {
                "mid": "42",
                "name": "测试UP",
                "face": "https://i0.hdslb.com/face.jpg",
                "fans": 2048,
                "attention": 64,
                "sign": ""
            },
            "following": false,
            "archive_count": 10,
            "follower": 2048
        }
    }))
    .into_response()
}

async fn start_upstream(mode: Mode) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let mock = MockUpstream {
        hits: Arc::clone(&hits),
        mode,
    };
    let app = Router::new()
        .route("/dynamic_svr/v1/dynamic_svr/space_history", get(space_history))
        .route("/x/web-interface/card", get(user_card))
        .route("/x/space/acc/info", get(space_info))
        .route("/room/v1/Room/getRoomInfoOld", get(room_info))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}

fn widget_app(base: &str, variant: Variant, cookie: Option<&str>, cache_seconds: u32) -> Router {
    let config = AppConfig {
        uid: 42,
        variant,
        credential: cookie.and_then(|c| Credential::parse(c).unwrap()),
        cache_seconds,
        endpoints: Endpoints::uniform(base),
    };
    // 本地 mock 不走系统代理
    let inner = reqwest::Client::builder()
        .no_proxy()
        .default_headers(BiliClient::get_default_headers())
        .build()
        .unwrap();
    let client = BiliClient::from_client(inner, config.endpoints.clone());

    server::router(AppState::new(Aggregator::new(client, &config), &config))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let (status, headers, body) = send(app, Method::GET, uri).await;
    (status, headers, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn options_is_empty_ok_even_without_cookie() {
    let app = widget_app("http://127.0.0.1:9", Variant::Live, None, 0);

    let (status, _, body) = send(app.clone(), Method::OPTIONS, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-requested-with")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(preflight).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn missing_cookie_fails_before_calling_upstream() {
    let (base, hits) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Live, None, 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("BI_COOKIE"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn feed_is_filtered_and_normalized() {
    let (base, hits) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Videos, Some(TEST_COOKIE), 0);

    let (status, headers, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers.get(header::CACHE_CONTROL).is_none());

    assert_eq!(body["success"], true);
    assert_eq!(body["uid"], "42");
    assert!(body.get("user").is_none());
    assert_eq!(body["video_count"], 2);

    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos[0]["bvid"], "BV1first");
    assert_eq!(videos[0]["url"], "https://www.bilibili.com/video/BV1first");
    assert_eq!(videos[0]["play"], 99);
    assert_eq!(videos[0]["comment"], 3);
    assert_eq!(videos[0]["length"], 300);
    assert_eq!(videos[0]["date"], "2024/1/1");
    assert_eq!(videos[1]["bvid"], "BV1second");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn root_path_serves_the_same_document() {
    let (base, _) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Videos, Some(TEST_COOKIE), 0);

    let (status, _, body) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video_count"], 2);
}

#[tokio::test]
async fn wrong_cookie_surfaces_business_error() {
    let (base, _) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Videos, Some("SESSDATA=expired"), 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("账号未登录"));
}

#[tokio::test]
async fn forbidden_upstream_yields_uniform_error() {
    let (base, _) = start_upstream(Mode::Forbidden).await;
    let app = widget_app(&base, Variant::Profile, Some(TEST_COOKIE), 60);

    let (status, headers, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("拦截"));
    assert!(error.contains("403"));
    assert!(body.get("videos").is_none());
    assert!(headers.get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn business_error_message_is_embedded() {
    let (base, _) = start_upstream(Mode::Banned).await;
    let app = widget_app(&base, Variant::Videos, Some(TEST_COOKIE), 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("风控校验失败"));
    assert!(error.contains("-352"));
}

#[tokio::test]
async fn profile_variant_includes_counts_and_cache_header() {
    let (base, hits) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Profile, Some(TEST_COOKIE), 120);

    let (status, headers, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "s-maxage=120, stale-while-revalidate"
    );
    assert_eq!(body["user"]["name"], "测试UP");
    assert_eq!(body["user"]["follower"], 2048);
    assert_eq!(body["user"]["following"], 64);
    assert!(body["user"].get("live").is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn live_variant_merges_room_over_space_info() {
    let (base, hits) = start_upstream(Mode::Normal).await;
    let app = widget_app(&base, Variant::Live, Some(TEST_COOKIE), 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::OK);

    let live = &body["user"]["live"];
    assert_eq!(live["is_live"], true);
    assert_eq!(live["title"], "正在直播");
    assert_eq!(live["cover"], "https://i0.hdslb.com/live-cover.jpg");
    assert_eq!(live["room_id"], 777);
    assert!(body["user"].get("follower").is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn risk_control_status_is_reported_as_blocked() {
    let (base, _) = start_upstream(Mode::Blocked).await;
    let app = widget_app(&base, Variant::Videos, Some(TEST_COOKIE), 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("拦截"));
    assert!(error.contains("412"));
    assert!(body.get("videos").is_none());
}

#[tokio::test]
async fn user_without_posts_gets_an_empty_list() {
    let (base, _) = start_upstream(Mode::Empty).await;
    let app = widget_app(&base, Variant::Videos, Some(TEST_COOKIE), 0);

    let (status, _, body) = get_json(app, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["video_count"], 0);
    assert_eq!(body["videos"], json!([]));
}
