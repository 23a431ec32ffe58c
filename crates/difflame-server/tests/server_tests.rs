use std::fs;
use std::path::Path;
use std::sync::Arc;

use difflame_server::{routes, ServeMode, ServerConfig};
use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;
use warp::http::StatusCode;

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("difflame", "difflame@example.com").unwrap();
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn create_test_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let repo = Repository::init(root).unwrap();

    write(root, "src/a.rs", "1\n2\n3\n");
    commit_all(&repo, "first");

    write(root, "src/a.rs", "1\n3\n4\n5\n");
    write(root, "docs/guide.md", "# Guide\n");
    commit_all(&repo, "second");

    temp
}

async fn get(config: ServerConfig, path: &str) -> warp::http::Response<warp::hyper::body::Bytes> {
    warp::test::request()
        .method("GET")
        .path(path)
        .reply(&routes(Arc::new(config)))
        .await
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_data_defaults_to_last_commit() {
    let repo = create_test_repo();
    let resp = get(ServerConfig::new(ServeMode::diffs(repo.path())), "/data").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/json");

    let body = json(resp.body());
    assert_eq!(body["name"], "root");
    assert_eq!(body["value"], 4);
    assert_eq!(body["added"], 3);
    assert_eq!(body["removed"], 1);

    let names: Vec<_> = body["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"src".to_string()));
    assert!(names.contains(&"docs".to_string()));
}

#[tokio::test]
async fn test_data_with_explicit_range() {
    let repo = create_test_repo();
    let resp = get(
        ServerConfig::new(ServeMode::diffs(repo.path())),
        "/data?from=HEAD&to=HEAD",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json(resp.body()),
        serde_json::json!({"name": "root", "value": 0, "added": 0, "removed": 0})
    );
}

#[tokio::test]
async fn test_unknown_revision_is_bad_request() {
    let repo = create_test_repo();
    let resp = get(
        ServerConfig::new(ServeMode::diffs(repo.path())),
        "/data?from=no-such-rev",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json(resp.body())["error"]
        .as_str()
        .unwrap()
        .contains("no-such-rev"));
}

#[tokio::test]
async fn test_missing_repository_is_server_error() {
    let temp = TempDir::new().unwrap();
    let resp = get(ServerConfig::new(ServeMode::diffs(temp.path())), "/data").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_file_mode_serves_raw_bytes() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first.json");
    let second = temp.path().join("second.json");
    fs::write(&first, r#"{"name":"root","value":1,"added":1,"removed":0}"#).unwrap();
    fs::write(&second, r#"{"name":"root","value":2,"added":0,"removed":2}"#).unwrap();

    let mode = ServeMode::files([&first, &second]).unwrap();

    let resp = get(ServerConfig::new(mode.clone()), "/data").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&resp.body()[..], fs::read(&first).unwrap().as_slice());

    let query = format!("/data?file={}", second.display());
    let resp = get(ServerConfig::new(mode), &query).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp.body())["value"], 2);
}

#[tokio::test]
async fn test_file_mode_rejects_unlisted_file() {
    let temp = TempDir::new().unwrap();
    let allowed = temp.path().join("tree.json");
    let secret = temp.path().join("secret.json");
    fs::write(&allowed, "{}").unwrap();
    fs::write(&secret, "top secret").unwrap();

    let query = format!("/data?file={}", secret.display());
    let resp = get(ServerConfig::new(ServeMode::files([&allowed]).unwrap()), &query).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!String::from_utf8_lossy(resp.body()).contains("top secret"));
}

#[tokio::test]
async fn test_index_page() {
    let repo = create_test_repo();
    let resp = get(ServerConfig::new(ServeMode::diffs(repo.path())), "/").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(resp.body());
    assert!(html.contains("d3.flameGraph"));
    assert!(html.contains("name=\"from\""));
}

#[tokio::test]
async fn test_post_is_rejected() {
    let repo = create_test_repo();
    let resp = warp::test::request()
        .method("POST")
        .path("/data")
        .reply(&routes(Arc::new(ServerConfig::new(ServeMode::diffs(repo.path())))))
        .await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
