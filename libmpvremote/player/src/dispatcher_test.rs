use std::collections::BTreeMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

use super::{CommandDispatcher, DispatchError};
use crate::backend::PlayerError;
use crate::dto::command::{LoadRequest, SeekRequest, TrackAddRequest};
use crate::fake_player::{FakePlayer, PlayerCall};
use crate::file_local_options::FileLocalOptionsStore;

struct Fixture {
    player: FakePlayer,
    dispatcher: CommandDispatcher,
    options: FileLocalOptionsStore,
    dir: TempDir,
}

fn fixture_with(player: FakePlayer) -> Fixture {
    let dir = TempDir::new().unwrap();
    let options = FileLocalOptionsStore::new(dir.path().join("options.json"));
    let dispatcher = CommandDispatcher::new(Arc::new(player.clone()), options.clone());
    Fixture {
        player,
        dispatcher,
        options,
        dir,
    }
}

fn fixture() -> Fixture {
    fixture_with(FakePlayer::new())
}

fn command(name: &str, args: Vec<Value>) -> PlayerCall {
    PlayerCall::Command(name.to_owned(), args)
}

#[rstest]
#[case(None, "relative")]
#[case(Some("absolute"), "absolute")]
#[case(Some("absolute-percent"), "absolute-percent")]
#[tokio::test]
async fn seek_forwards_flag(#[case] flag: Option<&str>, #[case] expected: &str) {
    let f = fixture();

    f.dispatcher
        .seek(SeekRequest {
            target: 30.0,
            flag: flag.map(str::to_owned),
        })
        .await
        .unwrap();

    assert_eq!(
        vec![command("seek", vec![json!(30.0), json!(expected)])],
        f.player.mutations()
    );
}

#[tokio::test]
async fn seek_rejects_unknown_flag() {
    let f = fixture();

    let result = f
        .dispatcher
        .seek(SeekRequest {
            target: 1.0,
            flag: Some("sideways".to_owned()),
        })
        .await;

    assert_matches!(result, Err(DispatchError::InvalidSeekFlag(flag)) if flag == "sideways");
    assert!(f.player.mutations().is_empty());
}

#[tokio::test]
async fn loading_directory_appends_playable_files() {
    let f = fixture();
    let media = f.dir.path().join("media");
    std::fs::create_dir(&media).unwrap();
    for name in ["a.mp4", "a.srt", "b.mkv", "readme.txt"] {
        std::fs::write(media.join(name), "").unwrap();
    }
    std::fs::create_dir(media.join("extras.mkv")).unwrap();

    f.dispatcher
        .load(LoadRequest::new(media.to_string_lossy()))
        .await
        .unwrap();

    let expected: Vec<_> = std::fs::read_dir(&media)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("mp4") | Some("mkv")
                )
        })
        .map(|p| {
            command(
                "loadfile",
                vec![json!(p.to_string_lossy()), json!("append-play")],
            )
        })
        .collect();
    assert_eq!(2, expected.len());
    assert_eq!(expected, f.player.mutations());
}

#[tokio::test]
async fn loading_file_stores_options_before_loading() {
    let f = fixture();
    let file = f.dir.path().join("movie.mkv");
    std::fs::write(&file, "").unwrap();
    let options = BTreeMap::from([("sub-delay".to_owned(), json!(2.5))]);

    f.dispatcher
        .load(LoadRequest {
            filename: file.to_string_lossy().into_owned(),
            flag: Some("replace".to_owned()),
            seek_to: Some(90.0),
            file_local_options: Some(options.clone()),
        })
        .await
        .unwrap();

    let stored = f.options.read().await.unwrap();
    assert_eq!(
        Some(&options),
        stored.get(file.to_string_lossy().as_ref())
    );
    assert_eq!(
        vec![
            command(
                "loadfile",
                vec![json!(file.to_string_lossy()), json!("replace")]
            ),
            command("seek", vec![json!(90.0), json!("absolute")]),
        ],
        f.player.mutations()
    );
}

#[tokio::test]
async fn loading_url_skips_filesystem() {
    let f = fixture();

    f.dispatcher
        .load(LoadRequest::new("https://example.com/video.mp4"))
        .await
        .unwrap();

    assert_eq!(
        vec![command(
            "loadfile",
            vec![json!("https://example.com/video.mp4"), json!("append-play")]
        )],
        f.player.mutations()
    );
}

#[tokio::test]
async fn loading_missing_path_fails() {
    let f = fixture();
    let missing = f.dir.path().join("missing.mkv");

    let result = f
        .dispatcher
        .load(LoadRequest::new(missing.to_string_lossy()))
        .await;

    assert_matches!(result, Err(DispatchError::PathNotFound(_)));
    assert!(f.player.mutations().is_empty());
}

#[tokio::test]
async fn play_index_unpauses() {
    let f = fixture();

    f.dispatcher.playlist_play_index(2).await.unwrap();

    assert_eq!(
        vec![
            command("playlist-play-index", vec![json!(2)]),
            PlayerCall::Set("pause".to_owned(), json!(false)),
        ],
        f.player.mutations()
    );
}

#[rstest]
#[case("2", json!(2))]
#[case("no", json!("no"))]
#[case("auto", json!("auto"))]
#[tokio::test]
async fn track_ids_keep_their_type(#[case] id: &str, #[case] expected: Value) {
    let f = fixture();

    f.dispatcher.set_sub_track(id).await.unwrap();

    assert_eq!(
        vec![PlayerCall::Set("sid".to_owned(), expected)],
        f.player.mutations()
    );
}

#[rstest]
#[case("true", true)]
#[case("TRUE", true)]
#[case("false", false)]
#[case("yes", false)]
#[tokio::test]
async fn sub_visibility_parses_true(#[case] value: &str, #[case] expected: bool) {
    let f = fixture();

    f.dispatcher.set_sub_visibility(value).await.unwrap();

    assert_eq!(
        vec![PlayerCall::Set("sub-visibility".to_owned(), json!(expected))],
        f.player.mutations()
    );
}

#[tokio::test]
async fn track_add_defaults_to_select() {
    let f = fixture();

    f.dispatcher
        .add_sub(TrackAddRequest {
            filename: "/media/movie.srt".to_owned(),
            flag: None,
        })
        .await
        .unwrap();

    assert_eq!(
        vec![command(
            "sub-add",
            vec![json!("/media/movie.srt"), json!("select")]
        )],
        f.player.mutations()
    );
}

#[tokio::test]
async fn player_failure_propagates() {
    let f = fixture_with(
        FakePlayer::new().with_failure("stop", PlayerError::Command("error running command".to_owned())),
    );

    let result = f.dispatcher.stop().await;

    assert_matches!(
        result,
        Err(DispatchError::Player(PlayerError::Command(message))) if message == "error running command"
    );
}
