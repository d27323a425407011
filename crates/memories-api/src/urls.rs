use memories_media::storage::PUBLIC_PREFIX;

/// Turns stored, location-independent media paths into URLs clients can fetch.
///
/// Applied at read time only; the database keeps the relative form.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base_url: String,
}

impl UrlResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/x` and `uploads/x` are prefixed with the base URL. Anything else,
    /// including URLs that already carry a scheme, is returned unchanged.
    pub fn resolve(&self, stored: &str) -> String {
        if has_scheme(stored) {
            return stored.to_string();
        }
        if stored.starts_with('/') {
            return format!("{}{}", self.base_url, stored);
        }
        if stored
            .strip_prefix(PUBLIC_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
        {
            return format!("{}/{}", self.base_url, stored);
        }
        stored.to_string()
    }

    pub fn resolve_opt(&self, stored: Option<String>) -> Option<String> {
        stored.map(|s| self.resolve(&s))
    }
}

fn has_scheme(url: &str) -> bool {
    url.split_once("://").is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
