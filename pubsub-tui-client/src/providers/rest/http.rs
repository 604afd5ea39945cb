//! REST request helpers

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PubSubError, Result};

use super::error::{map_status, ErrorContext};
use super::RestPubSub;

impl RestPubSub {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        log::debug!("[rest] {method} {url}");
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(&self, builder: RequestBuilder, ctx: ErrorContext<'_>) -> Result<String> {
        let response = builder.send().await.map_err(|e| {
            log::error!("[rest] request failed: {e}");
            PubSubError::transport(e)
        })?;

        let status = response.status();
        log::debug!("[rest] Response Status: {status}");

        let text = response
            .text()
            .await
            .map_err(|e| PubSubError::transport(format!("failed to read response: {e}")))?;

        if status.is_success() {
            Ok(text)
        } else {
            let err = map_status(status.as_u16(), &text, ctx);
            if err.is_expected() {
                log::warn!("[rest] {err}");
            } else {
                log::error!("[rest] {err}");
            }
            Err(err)
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| {
            log::error!("[rest] JSON parse failed: {e}");
            log::error!("[rest] raw response: {text}");
            PubSubError::parse(e)
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: ErrorContext<'_>,
    ) -> Result<T> {
        let text = self.execute(self.request(Method::GET, path), ctx).await?;
        Self::decode(&text)
    }

    pub(crate) async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext<'_>,
    ) -> Result<T> {
        let text = self
            .execute(self.request(method, path).json(body), ctx)
            .await?;
        Self::decode(&text)
    }

    /// Like [`Self::send_json`] for endpoints whose response body is irrelevant.
    pub(crate) async fn send_unit<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext<'_>,
    ) -> Result<()> {
        let builder = self.request(method, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.execute(builder, ctx).await.map(|_| ())
    }
}
