use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{pin_details_path, CollectionApi, CREATE_PIN_PATH};
use crate::error::ApiError;
use crate::net::with_backoff;
use crate::types::{BoardKind, CollectionEntry, EntryId, Identification, ImagePayload, MoveRequest, Pin};

/// Keep server error bodies short enough for a log line
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub base_url: String,
    pub auth_token: Option<String>,
    /// `None` leaves list/detail/delete/move on the transport default
    pub request_timeout: Option<Duration>,
    /// Extra attempts for idempotent reads and moves
    pub retries: u8,
}

/// reqwest-backed client for the `/api/pins/...` endpoints
pub struct HttpCollectionClient {
    client: reqwest::Client,
    settings: HttpSettings,
}

impl HttpCollectionClient {
    pub fn new(settings: HttpSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str, timeout: Option<Duration>) -> RequestBuilder {
        let mut rb = self.client.request(method, self.url(path));
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }
        if let Some(token) = &self.settings.auth_token {
            rb = rb.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        rb
    }

    /// Send and classify the status. Anything outside 2xx becomes an error.
    async fn send(
        &self,
        rb: RequestBuilder,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<Response, ApiError> {
        let res = rb
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { path: path.to_string() });
        }

        let mut message = res.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        Err(ApiError::Server { status: status.as_u16(), message })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let timeout = self.settings.request_timeout;
        let this = self;
        with_backoff(path, self.settings.retries, || async move {
            let res = this.send(this.request(Method::GET, path, timeout), path, timeout).await?;
            res.json::<T>()
                .await
                .map_err(|e| ApiError::from_reqwest(e, timeout))
        })
        .await
    }
}

#[async_trait]
impl CollectionApi for HttpCollectionClient {
    async fn list_board(&self, board: BoardKind) -> Result<Vec<CollectionEntry>, ApiError> {
        log::debug!("[api] GET {}", board.endpoint());
        let mut entries: Vec<CollectionEntry> = self.get_json(board.endpoint()).await?;
        // The listing endpoint implies membership even when the payload omits it
        for entry in &mut entries {
            entry.board.get_or_insert(board);
        }
        log::info!("[api] {} returned {} entries", board, entries.len());
        Ok(entries)
    }

    async fn pin_detail(&self, id: &EntryId) -> Result<Pin, ApiError> {
        let path = pin_details_path(id);
        log::debug!("[api] GET {path}");
        self.get_json(&path).await
    }

    async fn delete_pin(&self, id: &EntryId) -> Result<(), ApiError> {
        let path = pin_details_path(id);
        let timeout = self.settings.request_timeout;
        log::info!("[api] DELETE {path}");
        // Not retried: a retry after a lost response would report NotFound
        self.send(self.request(Method::DELETE, &path, timeout), &path, timeout)
            .await?;
        Ok(())
    }

    async fn move_pin(&self, id: &EntryId, to: BoardKind) -> Result<(), ApiError> {
        let path = pin_details_path(id);
        let timeout = self.settings.request_timeout;
        let body = MoveRequest { board: to };
        log::info!("[api] PATCH {path} -> {to}");
        let this = self;
        let path_ref = path.as_str();
        with_backoff(path_ref, self.settings.retries, || async move {
            let rb = this.request(Method::PATCH, path_ref, timeout).json(&body);
            this.send(rb, path_ref, timeout).await.map(|_| ())
        })
        .await
    }

    async fn create_pin(
        &self,
        image: &ImagePayload,
        timeout: Duration,
    ) -> Result<Identification, ApiError> {
        log::info!(
            "[api] POST {} ({} byte payload, timeout {}ms)",
            CREATE_PIN_PATH,
            image.image.len(),
            timeout.as_millis()
        );
        let rb = self
            .request(Method::POST, CREATE_PIN_PATH, Some(timeout))
            .json(image);
        let res = self.send(rb, CREATE_PIN_PATH, Some(timeout)).await?;
        res.json::<Identification>()
            .await
            .map_err(|e| ApiError::from_reqwest(e, Some(timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpCollectionClient {
        HttpCollectionClient::new(HttpSettings {
            base_url: base.to_string(),
            auth_token: None,
            request_timeout: None,
            retries: 0,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            client("http://api.local/").url("/api/pins/wishlist/"),
            "http://api.local/api/pins/wishlist/"
        );
        assert_eq!(
            client("http://api.local").url("/api/pins/wishlist/"),
            "http://api.local/api/pins/wishlist/"
        );
    }
}
