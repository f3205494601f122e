use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin JSON client for the tastetrack server.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    admin_secret: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, admin_secret: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            admin_secret,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(path, request).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.http.post(self.url(path)).json(body);
        self.send(path, request).await
    }

    fn admin(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let secret = self
            .admin_secret
            .as_deref()
            .context("Admin secret required (--admin-secret or TASTETRACK_ADMIN_SECRET)")?;
        Ok(request.header("x-admin-secret", secret))
    }

    pub async fn admin_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.admin(self.http.get(self.url(path)))?;
        self.send(path, request).await
    }

    pub async fn admin_post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.admin(self.http.post(self.url(path)))?;
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base_url))?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response body")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            bail!("{} failed ({}): {}", path, status, message);
        }

        serde_json::from_str(&body).with_context(|| format!("Unexpected response from {}", path))
    }
}
