//! REST backend speaking the JSON envelope over HTTP via `reqwest`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use super::backend::{Backend, BackendResult};
use crate::types::api::{
    ApiResponse, BookmarkPatch, BookmarkQueryParams, FolderPatch, LoginRequest, LoginResponse,
};
use crate::types::bookmark::{Bookmark, Counted, Folder, Tag};
use crate::types::errors::BackendError;

pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Mutex<Option<Zeroizing<String>>>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API route such as `["bookmarks", id]`.
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay inside their own path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::Network(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Network(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_slot().is_some()
    }

    fn token_slot(&self) -> MutexGuard<'_, Option<Zeroizing<String>>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, BackendError> {
        let builder = self.client.request(method, self.endpoint(segments)?);
        Ok(match self.token_slot().as_ref() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token.as_str())),
            None => builder,
        })
    }

    fn with_json<B: Serialize + ?Sized>(builder: RequestBuilder, body: &B) -> Result<RequestBuilder, BackendError> {
        let bytes = serde_json::to_vec(body)?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BackendResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!(%status, len = bytes.len(), "backend response");
        if bytes.is_empty() {
            // Some routes answer with an empty body; the status decides.
            return Ok(if status.is_success() {
                ApiResponse {
                    success: true,
                    data: None,
                    message: None,
                }
            } else {
                ApiResponse::failed(status.canonical_reason())
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse> {
        let builder = Self::with_json(self.request(Method::POST, &["auth", "login"])?, request)?;
        let response: ApiResponse<LoginResponse> = self.send(builder).await?;
        if response.success {
            if let Some(data) = &response.data {
                *self.token_slot() = Some(Zeroizing::new(data.token.clone()));
            }
        }
        Ok(response)
    }

    async fn logout(&self) -> BackendResult<()> {
        let result = match self.request(Method::POST, &["auth", "logout"]) {
            Ok(builder) => self.send(builder).await,
            Err(err) => Err(err),
        };
        *self.token_slot() = None;
        result
    }

    async fn get_bookmarks(&self, params: Option<&BookmarkQueryParams>) -> BackendResult<Vec<Bookmark>> {
        let mut builder = self.request(Method::GET, &["bookmarks"])?;
        if let Some(params) = params {
            builder = builder.query(&params.to_pairs());
        }
        self.send(builder).await
    }

    async fn create_bookmark(&self, bookmark: &Bookmark) -> BackendResult<Bookmark> {
        let builder = Self::with_json(self.request(Method::POST, &["bookmarks"])?, bookmark)?;
        self.send(builder).await
    }

    async fn update_bookmark(&self, id: &str, patch: &BookmarkPatch) -> BackendResult<Bookmark> {
        let builder = Self::with_json(self.request(Method::PUT, &["bookmarks", id])?, patch)?;
        self.send(builder).await
    }

    async fn delete_bookmark(&self, id: &str) -> BackendResult<String> {
        let mut response: ApiResponse<String> = self.send(self.request(Method::DELETE, &["bookmarks", id])?).await?;
        if response.success && response.data.is_none() {
            response.data = Some(id.to_string());
        }
        Ok(response)
    }

    async fn increment_visit(&self, id: &str) -> BackendResult<()> {
        self.send(self.request(Method::POST, &["bookmarks", id, "visit"])?).await
    }

    async fn get_folders(&self) -> BackendResult<Vec<Folder>> {
        self.send(self.request(Method::GET, &["folders"])?).await
    }

    async fn create_folder(&self, folder: &Folder) -> BackendResult<Folder> {
        let body = Counted::zero(folder);
        let builder = Self::with_json(self.request(Method::POST, &["folders"])?, &body)?;
        self.send(builder).await
    }

    async fn update_folder(&self, id: &str, patch: &FolderPatch) -> BackendResult<Folder> {
        let builder = Self::with_json(self.request(Method::PUT, &["folders", id])?, patch)?;
        self.send(builder).await
    }

    async fn move_folder(&self, id: &str, new_parent_id: &str) -> BackendResult<()> {
        let body = json!({ "parentId": new_parent_id });
        let builder = Self::with_json(self.request(Method::PUT, &["folders", id, "move"])?, &body)?;
        self.send(builder).await
    }

    async fn get_tags(&self) -> BackendResult<Vec<Tag>> {
        self.send(self.request(Method::GET, &["tags"])?).await
    }

    async fn create_tag(&self, tag: &Tag) -> BackendResult<Tag> {
        let body = Counted::zero(tag);
        let builder = Self::with_json(self.request(Method::POST, &["tags"])?, &body)?;
        self.send(builder).await
    }

    async fn reorder_tags(&self, tags: &[Tag]) -> BackendResult<()> {
        let body = json!({ "tags": tags });
        let builder = Self::with_json(self.request(Method::PUT, &["tags", "reorder"])?, &body)?;
        self.send(builder).await
    }
}
