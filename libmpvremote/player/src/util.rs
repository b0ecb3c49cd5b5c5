use url::Url;

/// Whether `input` should be handed to the player as a URL rather than resolved on disk.
/// Single-letter schemes are rejected so Windows drive letters like `C:\` stay paths.
pub fn is_url(input: &str) -> bool {
    Url::parse(input)
        .map(|url| url.scheme().len() > 1)
        .unwrap_or(false)
}

/// Formats a position in seconds as `HH:MM:SS`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
#[path = "./util_test.rs"]
mod util_test;
