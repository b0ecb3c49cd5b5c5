use std::io;

use axum::http::StatusCode;
use libmpvremote_management::db_error::DbError;
use libmpvremote_management::file_browser::BrowseError;
use libmpvremote_player::remote_player::{DispatchError, PlayerError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::ApiError;

#[rstest]
#[case(DispatchError::PathNotFound("/a.mkv".to_owned()), StatusCode::NOT_FOUND)]
#[case(DispatchError::InvalidSeekFlag("sideways".to_owned()), StatusCode::BAD_REQUEST)]
#[case(
    DispatchError::Player(PlayerError::Command("error running command".to_owned())),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[case(
    DispatchError::Io("/a".to_owned(), io::Error::from(io::ErrorKind::PermissionDenied)),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_dispatch_errors(#[case] err: DispatchError, #[case] expected: StatusCode) {
    assert_eq!(expected, ApiError::from(err).status());
}

#[rstest]
#[case(BrowseError::MissingTarget, StatusCode::BAD_REQUEST)]
#[case(BrowseError::OutsideRoots("/etc".to_owned()), StatusCode::BAD_REQUEST)]
#[case(BrowseError::DatabaseDisabled, StatusCode::BAD_REQUEST)]
#[case(BrowseError::UnsafeBrowsingDisabled, StatusCode::FORBIDDEN)]
#[case(BrowseError::NotFound("/gone".to_owned()), StatusCode::NOT_FOUND)]
#[case(BrowseError::Db(DbError::CollectionNotFound(3)), StatusCode::NOT_FOUND)]
#[case(BrowseError::Db(DbError::DbError("locked".to_owned())), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_browse_errors(#[case] err: BrowseError, #[case] expected: StatusCode) {
    assert_eq!(expected, ApiError::from(err).status());
}

#[test]
fn test_message_is_passed_through() {
    let err = ApiError::from(DispatchError::Player(PlayerError::Command(
        "error running command".to_owned(),
    )));
    assert_eq!("error running command", err.to_string());
}
