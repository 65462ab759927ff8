//! HTTP GET against a pushed app's route.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::redirect::Policy;

use crate::domain::{GetOptions, HttpResponse};

/// reqwest-backed client. Redirect handling is fixed per `reqwest::Client`,
/// so one client is built for each policy and chosen per request.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    follow: reqwest::Client,
    no_follow: reqwest::Client,
}

impl ReqwestHttpClient {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let follow = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("cannot build HTTP client")?;
        let no_follow = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .context("cannot build HTTP client")?;
        Ok(Self { follow, no_follow })
    }

    /// Issue a GET and read the whole body. Any status code is returned as a
    /// response; only transport failures are errors.
    pub async fn get(&self, url: &str, opts: &GetOptions) -> Result<HttpResponse> {
        let client = if opts.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };

        let mut request = client.get(url);
        for (name, value) in &opts.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = &opts.basic_auth {
            request = request.basic_auth(&auth.user, Some(&auth.password));
        }

        tracing::debug!(%url, follow_redirects = opts.follow_redirects, "GET");
        let response = request
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status().as_u16();
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        let body = response
            .text()
            .await
            .with_context(|| format!("reading body of GET {url}"))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
