//! Small helpers shared across the bot.

use std::path::PathBuf;

/// Joins `file_name` to `dir_path`.
pub fn get_path(dir_path: &str, file_name: &str) -> String {
    let path: PathBuf = [dir_path, file_name].iter().collect();
    path.to_string_lossy().into_owned()
}

/// Removes trailing slashes so paths can be appended with `format!("{}/...")`.
pub fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_path() {
        #[cfg(unix)]
        {
            assert_eq!(get_path("/var/chikis", "channel"), "/var/chikis/channel");
            assert_eq!(get_path(".", "session"), "./session");
        }
        #[cfg(windows)]
        assert_eq!(get_path("C:\\chikis", "channel"), "C:\\chikis\\channel");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://translate.googleapis.com/"),
            "https://translate.googleapis.com"
        );
        assert_eq!(normalize_url("http://localhost:8080//"), "http://localhost:8080");
        assert_eq!(normalize_url("http://localhost"), "http://localhost");
    }
}
