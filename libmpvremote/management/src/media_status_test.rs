use std::path::MAIN_SEPARATOR;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

use super::directory_key;
use crate::database::Database;

async fn setup() -> (Database, TempDir) {
    let tempdir = TempDir::new().unwrap();
    let db = Database::connect(tempdir.path().join("remote.db"), true)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    (db, tempdir)
}

fn media_path(tempdir: &TempDir, name: &str) -> std::path::PathBuf {
    tempdir.path().join("shows").join(name)
}

#[rstest]
#[case(3.0)]
#[case(5.0)]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn barely_started_is_not_saved(#[case] percent: f64) {
    let (db, tempdir) = setup().await;
    let path = media_path(&tempdir, "episode1.mkv");

    let status = db.add_media_status_entry(&path, 20.0, percent).await.unwrap();

    assert_eq!(None, status);
    assert_eq!(None, db.get_media_status(&path).await.unwrap());
}

#[rstest]
#[case(50.0, false)]
#[case(90.0, true)]
#[case(99.5, true)]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn saves_progress(#[case] percent: f64, #[case] finished: bool) {
    let (db, tempdir) = setup().await;
    let path = media_path(&tempdir, "episode1.mkv");

    let status = db
        .add_media_status_entry(&path, 600.0, percent)
        .await
        .unwrap()
        .unwrap();

    assert_eq!("episode1.mkv", status.file_name);
    assert_eq!(
        Some(tempdir.path().join("shows").to_string_lossy().into_owned()),
        status.directory
    );
    assert_eq!(Some(600.0), status.current_time);
    assert_eq!(finished, status.finished);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn updates_existing_entry() {
    let (db, tempdir) = setup().await;
    let path = media_path(&tempdir, "episode1.mkv");

    let first = db
        .add_media_status_entry(&path, 100.0, 20.0)
        .await
        .unwrap()
        .unwrap();
    let second = db
        .add_media_status_entry(&path, 1400.0, 95.0)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(Some(1400.0), second.current_time);
    assert!(second.finished);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn lists_directory_entries() {
    let (db, tempdir) = setup().await;
    db.add_media_status_entry(media_path(&tempdir, "b.mkv"), 10.0, 50.0)
        .await
        .unwrap();
    db.add_media_status_entry(media_path(&tempdir, "a.mkv"), 10.0, 50.0)
        .await
        .unwrap();
    db.add_media_status_entry(tempdir.path().join("other.mkv"), 10.0, 50.0)
        .await
        .unwrap();

    let dir = format!(
        "{}{MAIN_SEPARATOR}",
        tempdir.path().join("shows").to_string_lossy()
    );
    let names: Vec<_> = db
        .get_media_status_for_directory(&dir)
        .await
        .unwrap()
        .into_iter()
        .map(|status| status.file_name)
        .collect();

    assert_eq!(vec!["a.mkv", "b.mkv"], names);
}

#[rstest]
#[case("/media/shows/", "/media/shows")]
#[case("/media/shows", "/media/shows")]
#[case("/", "/")]
fn trims_trailing_separator(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(expected, directory_key(std::path::Path::new(input)));
}
