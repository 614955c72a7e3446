use std::env;

const DEFAULT_BASE_URL: &str = "https://api.clockify.me/api/v1";

#[derive(Debug, Clone)]
pub struct ClockifyUrl(String);

impl AsRef<str> for ClockifyUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ClockifyUrl {
    /// Creates the base URL, honoring the `CLOCKIFY_URL` environment variable
    /// when set (useful for pointing at a test server).
    pub fn from_env() -> Self {
        Self(env::var("CLOCKIFY_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_query(&self, key: &str, value: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}={}", self.0, key, value))
        } else {
            Self(format!("{}?{}={}", self.0, key, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = ClockifyUrl("https://api.clockify.me/api/v1/".to_string());
        assert_eq!(
            url.append_path("/workspaces/w1/projects").as_ref(),
            "https://api.clockify.me/api/v1/workspaces/w1/projects"
        );
    }

    #[test]
    fn with_query_uses_question_mark_then_ampersand() {
        let url = ClockifyUrl("https://api.clockify.me/api/v1/time-entries".to_string());
        let url = url.with_query("in-progress", "true").with_query("page-size", "50");
        assert_eq!(
            url.as_ref(),
            "https://api.clockify.me/api/v1/time-entries?in-progress=true&page-size=50"
        );
    }
}
