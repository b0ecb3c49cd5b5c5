use rstest::rstest;

use super::{format_time, is_url};

#[rstest]
#[case(0.0, "00:00:00")]
#[case(59.9, "00:00:59")]
#[case(61.0, "00:01:01")]
#[case(3725.5, "01:02:05")]
#[case(-4.0, "00:00:00")]
#[case(f64::NAN, "00:00:00")]
fn formats_time(#[case] seconds: f64, #[case] expected: &str) {
    assert_eq!(expected, format_time(seconds));
}

#[rstest]
#[case("https://example.com/video.mp4", true)]
#[case("ytdl://some-id", true)]
#[case("/home/user/video.mp4", false)]
#[case("C:\\Videos\\video.mp4", false)]
#[case("video.mp4", false)]
fn detects_urls(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(expected, is_url(input));
}
