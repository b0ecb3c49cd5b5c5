use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use clap::Parser;
use futures::StreamExt;
use libmpvremote_management::database::Database;
use libmpvremote_player::fake_player::{FakePlayer, PlayerCall};
use libmpvremote_player::remote_player::{PlayerError, PlayerEvent, RemotePlayer};
use mpvremoted::context::AppContext;
use mpvremoted::host::{HostAction, HostControl};
use mpvremoted::server::router;
use mpvremoted::settings::ServerSettings;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

#[ctor::ctor]
fn init() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .init();
}

#[derive(Default)]
struct RecordingHost {
    actions: Mutex<Vec<HostAction>>,
}

#[async_trait]
impl HostControl for RecordingHost {
    async fn run(&self, action: HostAction) -> io::Result<()> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

struct TestServer {
    app: Router,
    player: FakePlayer,
    remote: RemotePlayer,
    host: Arc<RecordingHost>,
    dir: TempDir,
}

struct TestOptions {
    use_local_db: bool,
    unsafe_filebrowsing: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            use_local_db: false,
            unsafe_filebrowsing: true,
        }
    }
}

async fn test_server(player: FakePlayer, options: TestOptions) -> TestServer {
    let dir = TempDir::new().unwrap();
    let media = dir.path().join("media");
    std::fs::create_dir_all(media.join("Season 1")).unwrap();
    std::fs::write(media.join("movie.mkv"), "").unwrap();

    let settings = ServerSettings::try_parse_from([
        "mpvremoted".to_owned(),
        "/tmp/mpv.sock".to_owned(),
        "--filebrowser-path".to_owned(),
        media.to_string_lossy().into_owned(),
        "--file-local-options-path".to_owned(),
        dir.path().join("options.json").to_string_lossy().into_owned(),
        "--use-local-db".to_owned(),
        options.use_local_db.to_string(),
        "--unsafe-filebrowsing".to_owned(),
        options.unsafe_filebrowsing.to_string(),
        "--status-timeout-ms".to_owned(),
        "200".to_owned(),
    ])
    .unwrap();

    let database = if options.use_local_db {
        let database = Database::connect(dir.path().join("remote.db"), true)
            .await
            .unwrap();
        database.migrate().await.unwrap();
        Some(database)
    } else {
        None
    };

    let remote = RemotePlayer::new(Arc::new(player.clone()), settings.player_settings());
    let host = Arc::new(RecordingHost::default());
    let context = AppContext::new(remote.clone(), database, host.clone(), settings);

    TestServer {
        app: router(context),
        player,
        remote,
        host,
        dir,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn success() -> Value {
    json!({ "message": "success" })
}

#[tokio::test]
async fn test_status_excludes_repeated_fields() {
    let player = FakePlayer::new()
        .with_property("pause", json!(true))
        .with_property("volume", json!(55));
    let server = test_server(player, TestOptions::default()).await;

    let (status, body) = send(
        &server.app,
        Method::GET,
        "/api/v1/status?exclude=playlist&exclude=track-list",
        None,
    )
    .await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!(true), body["pause"]);
    assert_eq!(json!(55), body["volume"]);
    let keys = body.as_object().unwrap();
    assert!(!keys.contains_key("playlist"));
    assert!(!keys.contains_key("track-list"));
    assert!(keys.contains_key("chapter-list"));
}

#[tokio::test]
async fn test_stalled_status_returns_cache() {
    let player = FakePlayer::new().with_property("volume", json!(20));
    let server = test_server(player, TestOptions::default()).await;

    let (_, first) = send(&server.app, Method::GET, "/api/v1/status", None).await;
    server.player.set("volume", json!(90));
    server.player.set_delay(Some(Duration::from_secs(5)));
    let (status, second) = tokio::time::timeout(
        Duration::from_secs(2),
        send(&server.app, Method::GET, "/api/v1/status", None),
    )
    .await
    .unwrap();

    assert_eq!(StatusCode::OK, status);
    assert_eq!(first, second);
}

#[rstest]
#[case("/api/v1/controls/play-pause", PlayerCall::Command("cycle".to_owned(), vec![json!("pause")]))]
#[case("/api/v1/controls/play", PlayerCall::Set("pause".to_owned(), json!(false)))]
#[case("/api/v1/controls/pause", PlayerCall::Set("pause".to_owned(), json!(true)))]
#[case("/api/v1/controls/volume/35", PlayerCall::Set("volume".to_owned(), json!(35.0)))]
#[case("/api/v1/playlist/next", PlayerCall::Command("playlist-next".to_owned(), vec![]))]
#[case("/api/v1/tracks/sub/font-size/40", PlayerCall::Set("sub-font-size".to_owned(), json!(40)))]
#[case("/api/v1/tracks/audio/timing/-0.5", PlayerCall::Set("audio-delay".to_owned(), json!(-0.5)))]
#[tokio::test]
async fn test_control_routes(#[case] uri: &str, #[case] expected: PlayerCall) {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;

    let (status, body) = send(&server.app, Method::POST, uri, None).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(success(), body);
    assert_eq!(vec![expected], server.player.mutations());
}

#[tokio::test]
async fn test_seek_flags() {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/controls/seek",
        Some(json!({ "target": 10.0 })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let (status, body) = send(
        &server.app,
        Method::POST,
        "/api/v1/controls/seek",
        Some(json!({ "target": 10.0, "flag": "sideways" })),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(json!({ "message": "Invalid seek flag: sideways" }), body);

    assert_eq!(
        vec![PlayerCall::Command(
            "seek".to_owned(),
            vec![json!(10.0), json!("relative")]
        )],
        server.player.mutations()
    );
}

#[tokio::test]
async fn test_malformed_requests_are_rejected() {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;

    let (status, body) = send(
        &server.app,
        Method::POST,
        "/api/v1/controls/volume/loud",
        None,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_matches!(body["message"], Value::String(_));

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/controls/seek",
        Some(json!({ "flag": "absolute" })),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/playlist/move?fromIndex=1",
        None,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(Vec::<PlayerCall>::new(), server.player.mutations());
}

#[tokio::test]
async fn test_playlist_routes() {
    let player = FakePlayer::new()
        .with_property("playlist-count", json!(1))
        .with_property("playlist/0/id", json!(1))
        .with_property("playlist/0/filename", json!("/media/a.mkv"))
        .with_property("playlist/0/current", json!(true));
    let server = test_server(player, TestOptions::default()).await;

    let (status, _) = send(
        &server.app,
        Method::DELETE,
        "/api/v1/playlist/remove/2",
        None,
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/playlist/move?fromIndex=0&toIndex=3",
        None,
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let (status, body) = send(&server.app, Method::POST, "/api/v1/playlist/play/0", None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!(1), body[0]["id"]);
    assert_eq!(json!("a.mkv"), body[0]["filename"]);

    assert_eq!(
        vec![
            PlayerCall::Command("playlist-remove".to_owned(), vec![json!(2)]),
            PlayerCall::Command("playlist-move".to_owned(), vec![json!(0), json!(3)]),
            PlayerCall::Command("playlist-play-index".to_owned(), vec![json!(0)]),
            PlayerCall::Set("pause".to_owned(), json!(false)),
        ],
        server.player.mutations()
    );
}

#[tokio::test]
async fn test_load_stores_file_local_options() {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;
    let file = server.dir.path().join("media").join("movie.mkv");

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/playlist",
        Some(json!({
            "filename": file,
            "file-local-options": { "sub-scale": 1.5 },
        })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let options = server.remote.file_local_options().read().await.unwrap();
    assert_eq!(
        Some(&json!(1.5)),
        options
            .get(&file.to_string_lossy().into_owned())
            .and_then(|o| o.get("sub-scale"))
    );

    let (status, body) = send(
        &server.app,
        Method::POST,
        "/api/v1/playlist",
        Some(json!({ "filename": "/nowhere/missing.mkv" })),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(json!({ "message": "/nowhere/missing.mkv does not exist" }), body);
}

#[tokio::test]
async fn test_player_failure_is_internal_error() {
    let player =
        FakePlayer::new().with_failure("stop", PlayerError::Command("error running command".to_owned()));
    let server = test_server(player, TestOptions::default()).await;

    let (status, body) = send(&server.app, Method::POST, "/api/v1/controls/stop", None).await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert_eq!(json!({ "message": "error running command" }), body);
}

#[tokio::test]
async fn test_mpvinfo() {
    let player = FakePlayer::new().with_property("mpv-version", json!("mpv 0.38.0"));
    let server = test_server(player, TestOptions::default()).await;

    let (status, body) = send(&server.app, Method::GET, "/api/v1/mpvinfo", None).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!("mpv 0.38.0"), body["mpv-version"]);
    assert_eq!(Value::Null, body["ffmpeg-version"]);
    assert_eq!(json!(env!("CARGO_PKG_VERSION")), body["mpvremoteVersion"]);
    assert_eq!(json!(false), body["mpvremoteConfig"]["use-local-db"]);
    assert_eq!(json!(8000), body["mpvremoteConfig"]["port"]);
}

#[tokio::test]
async fn test_computer_actions() {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;

    let (status, _) = send(&server.app, Method::POST, "/api/v1/computer/reboot", None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, _) = send(&server.app, Method::POST, "/api/v1/computer/quit", None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, body) = send(&server.app, Method::POST, "/api/v1/computer/dance", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(json!({ "message": "Invalid action: dance" }), body);

    assert_eq!(
        vec![HostAction::Reboot, HostAction::Quit],
        *server.host.actions.lock().unwrap()
    );
    assert_eq!(
        vec![
            PlayerCall::Command("stop".to_owned(), vec![]),
            PlayerCall::Command("stop".to_owned(), vec![]),
        ],
        server.player.mutations()
    );
}

#[tokio::test]
async fn test_events_stream_announcements() {
    let player = FakePlayer::new();
    let server = test_server(player, TestOptions::default()).await;
    let reactor = server.remote.spawn_reactor();

    let request = Request::builder()
        .uri("/api/v1/events")
        .body(Body::empty())
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        "text/event-stream",
        response.headers()[CONTENT_TYPE].to_str().unwrap()
    );

    server.player.emit(PlayerEvent::StatusChange {
        property: "pause".to_owned(),
        value: json!(true),
    });

    let mut body = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(2), body.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let frame = String::from_utf8(frame.to_vec()).unwrap();
    let data = frame
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .unwrap();
    assert_eq!(
        json!({
            "event": "status-change",
            "property": "pause",
            "value": true,
            "message": "Pause",
        }),
        serde_json::from_str::<Value>(data.trim()).unwrap()
    );
    reactor.abort();
}

#[tokio::test]
async fn test_file_browser() {
    let server = test_server(
        FakePlayer::new(),
        TestOptions {
            use_local_db: false,
            unsafe_filebrowsing: false,
        },
    )
    .await;
    let media = server.dir.path().join("media");

    let (status, body) = send(&server.app, Method::GET, "/api/v1/filebrowser/paths", None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(
        json!([{ "index": 0, "path": media.to_string_lossy() }]),
        body
    );

    let (status, body) = send(
        &server.app,
        Method::POST,
        "/api/v1/filebrowser/browse",
        Some(json!({ "path": media })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    let names: Vec<_> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].clone())
        .collect();
    assert_eq!(vec![json!("Season 1"), json!("movie.mkv")], names);

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/filebrowser/browse",
        Some(json!({ "path": server.dir.path() })),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);

    let (status, _) = send(
        &server.app,
        Method::POST,
        "/api/v1/filebrowser/browse",
        Some(json!({})),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);

    let (status, _) = send(&server.app, Method::GET, "/api/v1/drives", None).await;
    assert_eq!(StatusCode::FORBIDDEN, status);
}

#[tokio::test]
async fn test_collections_require_database() {
    let server = test_server(FakePlayer::new(), TestOptions::default()).await;

    let (status, body) = send(&server.app, Method::GET, "/api/v1/collections", None).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(json!({ "message": "mpvremote-uselocaldb disabled" }), body);
}

#[tokio::test]
async fn test_collections_crud() {
    let server = test_server(
        FakePlayer::new(),
        TestOptions {
            use_local_db: true,
            unsafe_filebrowsing: true,
        },
    )
    .await;
    let app = &server.app;

    let (status, created) = send(
        app,
        Method::POST,
        "/api/v1/collections",
        Some(json!({ "name": "Movies", "paths": [{ "path": "/media/movies" }] })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!(1), created["type"]);
    let id = created["id"].as_i64().unwrap();

    let (status, entry) = send(
        app,
        Method::POST,
        &format!("/api/v1/collections/{id}/entries"),
        Some(json!({ "path": "/media/more-movies" })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    let entry_id = entry["id"].as_i64().unwrap();

    let (status, updated) = send(
        app,
        Method::PATCH,
        &format!("/api/v1/collections/{id}"),
        Some(json!({ "name": "Films", "type": 2 })),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!("Films"), updated["name"]);
    assert_eq!(json!(2), updated["type"]);
    assert_eq!(2, updated["paths"].as_array().unwrap().len());

    let (status, list) = send(app, Method::GET, "/api/v1/collections", None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(1, list.as_array().unwrap().len());

    let uri = format!("/api/v1/collections/entries/{entry_id}");
    let (status, _) = send(app, Method::DELETE, &uri, None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, _) = send(app, Method::DELETE, &uri, None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    let (status, _) = send(app, Method::DELETE, &format!("/api/v1/collections/{id}"), None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, body) = send(app, Method::GET, &format!("/api/v1/collections/{id}"), None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(json!({ "message": format!("Collection {id} does not exist") }), body);
}
