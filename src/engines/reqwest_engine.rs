// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{DocumentFetcher, FetchError, FetchOptions, FetchedDocument};
use crate::utils::text_encoding;
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的单次GET抓取，使用客户端默认的重定向和超时策略
#[derive(Clone)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的抓取引擎
    ///
    /// # 参数
    ///
    /// * `user_agent` - 可选的 User-Agent，不设置时不发送自定义请求头
    pub fn new(user_agent: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent.to_string());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl DocumentFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedDocument)` - 解码后的文档
    /// * `Err(FetchError::Network)` - 连接失败或非成功状态码
    /// * `Err(FetchError::Parse)` - 响应不是可解析的文档
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchedDocument, FetchError> {
        let parsed = Url::parse(url)
            .map_err(|e| FetchError::Network(format!("Invalid URL '{}': {}", url, e)))?;

        let mut request = self.client.get(parsed);
        if let Some(user_agent) = options.user_agent.as_deref() {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        let start = Instant::now();
        let response = request.send().await?.error_for_status()?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !text_encoding::is_document_content_type(&content_type) {
            return Err(FetchError::Parse(format!(
                "Response from {} is not an HTML document (content type: {})",
                final_url, content_type
            )));
        }

        let bytes = response.bytes().await?;
        let body = text_encoding::decode_body(&bytes, &content_type);

        debug!(
            url = %final_url,
            status_code,
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched document"
        );

        Ok(FetchedDocument {
            url: final_url,
            status_code,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
