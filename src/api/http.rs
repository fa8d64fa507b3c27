// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP client for the model-library endpoints the widgets consume.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{
    InsertTextRequest, InsertTextResponse, PreviewInfo, PreviewResponse, SearchResponse,
    TriggerWordsResponse,
};
use super::{ApiError, LmApi};
use crate::config::SyncConfig;
use crate::model::ModelKind;

#[derive(Debug, Clone)]
pub struct HttpLmApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLmApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| ApiError::transport(path, err))?;
        decode(path, response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::transport(path, err))?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status { path: path.to_owned(), status: status.as_u16() });
    }
    response.json::<T>().await.map_err(|err| ApiError::Decode {
        path: path.to_owned(),
        message: err.to_string(),
    })
}

impl LmApi for HttpLmApi {
    async fn search(
        &self,
        kind: ModelKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, ApiError> {
        let path = format!("/lm/{}/relative-paths", kind.route());
        let limit = limit.to_string();
        let response: SearchResponse =
            self.get_json(&path, &[("search", query), ("limit", limit.as_str())]).await?;
        Ok(response.into_paths())
    }

    async fn trigger_words(&self, name: &str) -> Result<Vec<String>, ApiError> {
        let response: TriggerWordsResponse =
            self.get_json("/lm/loras/get-trigger-words", &[("name", name)]).await?;
        Ok(response.into_words())
    }

    async fn insert_text(&self, kind: ModelKind, relative_path: &str) -> Result<String, ApiError> {
        let path = format!("/lm/{}/insert-text", kind.route());
        let response: InsertTextResponse =
            self.post_json(&path, &InsertTextRequest { relative_path }).await?;
        match response.text {
            Some(text) if response.success => Ok(text),
            _ => Err(ApiError::Unsuccessful { path }),
        }
    }

    async fn preview(&self, kind: ModelKind, name: &str) -> Result<PreviewInfo, ApiError> {
        let path = format!("/lm/{}/preview-url", kind.route());
        let response: PreviewResponse = self.get_json(&path, &[("name", name)]).await?;
        response.into_preview(name).ok_or(ApiError::Unsuccessful { path })
    }
}
