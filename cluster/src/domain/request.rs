//! Typed options and results for HTTP requests against a pushed app.

use std::collections::HashMap;

/// Credentials sent as an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

/// Options for [`crate::application::app::AppHandle::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOptions {
    /// Follow `3xx` responses. When `false` the redirect itself is returned.
    pub follow_redirects: bool,
    pub basic_auth: Option<BasicAuth>,
    /// Extra request headers, sent in order.
    pub headers: Vec<(String, String)>,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            basic_auth: None,
            headers: Vec::new(),
        }
    }
}

impl GetOptions {
    #[must_use]
    pub fn no_follow(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    #[must_use]
    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status, headers and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lowercase; repeated headers keep every value.
    pub headers: HashMap<String, Vec<String>>,
    pub body: String,
}

impl HttpResponse {
    /// First value of header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
