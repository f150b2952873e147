use serde_json::{json, Value};
use skilltrack_core::DbPool;
use skilltrack_http::{build_router, AppState};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct TestServer {
    addr: SocketAddr,
    db_path: PathBuf,
    _dir: TempDir,
}

async fn spawn_server() -> TestServer {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("api.sqlite3");
    let pool = DbPool::open(&db_path, 2).expect("open pool");
    let app = build_router(AppState::new(pool));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    TestServer {
        addr,
        db_path,
        _dir: dir,
    }
}

async fn send_raw(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

async fn send_json(addr: SocketAddr, method: &str, path: &str, body: Value) -> (u16, Value) {
    let (status, _, raw) = send_raw(addr, method, path, &body.to_string()).await;
    (status, serde_json::from_str(&raw).expect("json body"))
}

async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let (status, _, raw) = send_raw(addr, "GET", path, "").await;
    (status, serde_json::from_str(&raw).expect("json body"))
}

fn seed_categories(db_path: &Path) {
    let conn = rusqlite::Connection::open(db_path).expect("open seed connection");
    conn.execute_batch(
        "INSERT INTO metadata (type, value, is_active) VALUES
            ('SKILL_CATEGORY', 'Engineering', 1),
            ('SKILL_CATEGORY', 'Retired', 0);",
    )
    .expect("seed metadata");
}

#[tokio::test]
async fn health_reports_ok_with_cors_header() {
    let server = spawn_server().await;
    let (status, head, body) = send_raw(server.addr, "GET", "/health", "").await;
    assert_eq!(status, 200);
    assert!(head
        .to_ascii_lowercase()
        .contains("access-control-allow-origin: *"));
    let body: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn preflight_is_answered_without_body() {
    let server = spawn_server().await;
    let (status, head, _) = send_raw(server.addr, "OPTIONS", "/api/tasks", "").await;
    assert_eq!(status, 204);
    let head = head.to_ascii_lowercase();
    assert!(head.contains("access-control-allow-methods"));
    assert!(head.contains("access-control-allow-origin: *"));
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let server = spawn_server().await;
    let addr = server.addr;

    let (status, listed) = get_json(addr, "/api/tasks").await;
    assert_eq!(status, 200);
    assert_eq!(listed, json!([]));

    let (status, created) = send_json(
        addr,
        "POST",
        "/api/tasks",
        json!({ "title": "write tests", "description": "router" }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["title"], "write tests");
    assert_eq!(created["completed"], false);
    let id = created["id"].as_str().expect("id").to_string();

    let (status, updated) = send_json(
        addr,
        "PUT",
        &format!("/api/tasks/{id}"),
        json!({ "title": "write tests", "description": "router", "completed": true }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, fetched) = get_json(addr, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, updated);

    let (status, deleted) = send_json(addr, "DELETE", &format!("/api/tasks/{id}"), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(deleted, json!({ "message": "Task deleted" }));

    let (status, missing) = get_json(addr, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(missing, json!({ "error": "Task not found" }));
}

#[tokio::test]
async fn malformed_body_and_id_are_bad_requests() {
    let server = spawn_server().await;
    let addr = server.addr;

    let (status, _, body) = send_raw(addr, "POST", "/api/tasks", "{not json").await;
    assert_eq!(status, 400);
    let body: Value = serde_json::from_str(&body).expect("json");
    assert!(body["error"].is_string());

    let (status, body) = get_json(addr, "/api/tasks/12345").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().expect("message").contains("12345"));

    let (status, _) = get_json(addr, "/api/progress/skill/not-a-skill").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn skill_routes_validate_category_and_join_parent() {
    let server = spawn_server().await;
    let addr = server.addr;
    seed_categories(&server.db_path);

    let (status, body) = send_json(
        addr,
        "POST",
        "/api/skills",
        json!({ "name": "Pottery", "category": "Retired" }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().expect("message").contains("Retired"));

    let (status, root) = send_json(
        addr,
        "POST",
        "/api/skills",
        json!({ "name": "Full Stack Development", "category": "Engineering" }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(root["parent_id"], Value::Null);
    let root_id = root["id"].as_str().expect("id").to_string();

    let (status, child) = send_json(
        addr,
        "POST",
        "/api/skills",
        json!({ "name": "Go Backend", "parent_id": root_id }),
    )
    .await;
    assert_eq!(status, 201);
    let child_id = child["id"].as_str().expect("id").to_string();

    let (status, loaded) = get_json(addr, &format!("/api/skills/{child_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(loaded["parent_data"]["name"], "Full Stack Development");

    let (status, loaded_root) = get_json(addr, &format!("/api/skills/{root_id}")).await;
    assert_eq!(status, 200);
    assert!(loaded_root.get("parent_data").is_none());

    let (status, _) = send_json(
        addr,
        "PUT",
        &format!("/api/skills/{root_id}"),
        json!({ "name": "Full Stack Development", "parent_id": child_id }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, listed) = get_json(addr, "/api/skills").await;
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().expect("array").len(), 2);

    let (status, deleted) =
        send_json(addr, "DELETE", &format!("/api/skills/{root_id}"), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(deleted["message"], "Skill deleted");

    let (status, orphan) = get_json(addr, &format!("/api/skills/{child_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(orphan["parent_id"], root_id.as_str());
    assert!(orphan.get("parent_data").is_none());
}

#[tokio::test]
async fn progress_routes_report_weight_percentages() {
    let server = spawn_server().await;
    let addr = server.addr;
    let skill_id = "0b8f8a3c-2f59-4c57-9a51-2d1f4f0c7e11";

    for (name, weightage) in [("routing", 5), ("handlers", 3), ("database", 13)] {
        let (status, _) = send_json(
            addr,
            "POST",
            "/api/progress",
            json!({ "parent_skill_id": skill_id, "name": name, "weightage": weightage }),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (status, rejected) = send_json(
        addr,
        "POST",
        "/api/progress",
        json!({ "parent_skill_id": skill_id, "name": "odd", "weightage": 7 }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(rejected["error"]
        .as_str()
        .expect("message")
        .contains("1, 3, 5, 8, 13, 21"));

    let (status, items) = get_json(addr, &format!("/api/progress/skill/{skill_id}")).await;
    assert_eq!(status, 200);
    let items = items.as_array().expect("array").clone();
    assert_eq!(items.len(), 3);
    let percents: Vec<f64> = items
        .iter()
        .map(|item| (item["weight_percent"].as_f64().expect("percent") * 100.0).round() / 100.0)
        .collect();
    assert_eq!(percents, vec![23.81, 14.29, 61.9]);

    let first_id = items[0]["id"].as_str().expect("id").to_string();
    let (status, updated) = send_json(
        addr,
        "PUT",
        &format!("/api/progress/{first_id}"),
        json!({ "name": "routing", "achieved": true, "weightage": 8 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["achieved"], true);
    assert!(updated.get("weight_percent").is_none());

    let (status, missing) = send_json(
        addr,
        "PUT",
        "/api/progress/9d7f3c1e-6a2b-4c8d-8e0f-1a2b3c4d5e6f",
        json!({ "name": "ghost", "weightage": 7 }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(missing["error"], "Progress item not found");

    let (status, deleted) =
        send_json(addr, "DELETE", &format!("/api/progress/{first_id}"), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(deleted["message"], "Progress item deleted");

    let (status, missing) =
        send_json(addr, "DELETE", &format!("/api/progress/{first_id}"), json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(missing["error"], "Progress item not found");

    let (status, empty) = get_json(
        addr,
        "/api/progress/skill/9d7f3c1e-6a2b-4c8d-8e0f-1a2b3c4d5e6f",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(empty, json!([]));
}
