//! HTTP remote for a hosted realtime database (REST + event stream)
//!
//! - `GET  {base}/{path}.json` reads a node
//! - `PUT  {base}/{path}.json` overwrites a node
//! - `GET  {base}/{path}.json` with `Accept: text/event-stream` streams changes

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::sse::{SseEvent, SseParser};
use super::{RemoteStore, RemoteWatch, non_null};
use crate::{RemoteConfig, SyncError, SyncResult};

/// HTTP client for the realtime database
#[derive(Debug, Clone)]
pub struct HttpRemote {
    /// Client for reads and writes (request timeout applies)
    client: Client,
    /// Client for long-lived event streams (connect timeout only)
    stream_client: Client,
    base_url: String,
    auth_token: Option<String>,
}

/// Payload of `put` / `patch` stream events
#[derive(Debug, Deserialize)]
struct StreamPayload {
    path: String,
    #[serde(default)]
    data: Value,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> SyncResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(SyncError::InvalidConfig("empty remote URL".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()?;
        let stream_client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()?;

        Ok(Self {
            client,
            stream_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }

    async fn check(response: Response) -> SyncResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    #[instrument(skip(self))]
    async fn read(&self, path: &str) -> SyncResult<Option<Value>> {
        let response = self.with_auth(self.client.get(self.url(path))).send().await?;
        let value: Value = Self::check(response).await?.json().await?;
        Ok(non_null(value))
    }

    #[instrument(skip(self, value))]
    async fn write(&self, path: &str, value: Value) -> SyncResult<()> {
        let response = self
            .with_auth(self.client.put(self.url(path)).json(&value))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn watch(&self, path: &str) -> SyncResult<RemoteWatch> {
        let response = self
            .with_auth(self.stream_client.get(self.url(path)))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = Self::check(response).await?;

        let state = WatchState {
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            parser: SseParser::new(),
            pending: VecDeque::new(),
            remote: self.clone(),
            path: path.to_string(),
            done: false,
        };
        Ok(futures::stream::unfold(state, WatchState::next).boxed())
    }
}

struct WatchState {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    parser: SseParser,
    pending: VecDeque<SseEvent>,
    remote: HttpRemote,
    path: String,
    done: bool,
}

impl WatchState {
    async fn next(mut self) -> Option<(SyncResult<Option<Value>>, Self)> {
        loop {
            if self.done {
                return None;
            }
            if let Some(event) = self.pending.pop_front() {
                if let Some(item) = self.handle(event).await {
                    return Some((item, self));
                }
                continue;
            }
            match self.body.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.parser.push(&chunk)),
                Some(Err(e)) => {
                    self.done = true;
                    return Some((Err(e.into()), self));
                }
                None => return None,
            }
        }
    }

    async fn handle(&mut self, event: SseEvent) -> Option<SyncResult<Option<Value>>> {
        match classify(&event) {
            StreamAction::Apply(value) => Some(Ok(value)),
            StreamAction::Reread => Some(self.remote.read(&self.path).await),
            StreamAction::Ignore => {
                if event.event != "keep-alive" {
                    tracing::debug!(path = %self.path, event = %event.event, "Ignoring stream event");
                }
                None
            }
            StreamAction::Cancel(reason) => {
                self.done = true;
                Some(Err(SyncError::WatchCancelled(reason)))
            }
        }
    }
}

/// What a watch does with one stream event
#[derive(Debug, PartialEq)]
enum StreamAction {
    /// Emit this value as the node's new state
    Apply(Option<Value>),
    /// Fetch the whole node again
    Reread,
    Ignore,
    /// End the watch
    Cancel(String),
}

fn classify(event: &SseEvent) -> StreamAction {
    match event.event.as_str() {
        "put" | "patch" => {
            // A root put carries the whole node; anything else is re-read
            if event.event == "put"
                && let Ok(payload) = serde_json::from_str::<StreamPayload>(&event.data)
                && payload.path == "/"
            {
                return StreamAction::Apply(non_null(payload.data));
            }
            StreamAction::Reread
        }
        "cancel" | "auth_revoked" => StreamAction::Cancel(event.event.clone()),
        _ => StreamAction::Ignore,
    }
}
