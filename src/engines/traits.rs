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

use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 连接、DNS、TLS 失败或非成功状态码
    #[error("{0}")]
    Network(String),
    /// 响应体不能作为HTML文档处理
    #[error("{0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// 抓取到的文档
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// 最终URL（跟随重定向后）
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 内容类型
    pub content_type: String,
    /// 解码后的HTML文本
    pub body: String,
}

/// 单次抓取的请求选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// 覆盖客户端默认值的 User-Agent
    pub user_agent: Option<String>,
}

/// 文档抓取特质
///
/// 单次请求，不重试，不缓存
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// 抓取URL对应的文档
    async fn fetch(&self, url: &str, options: &FetchOptions)
        -> Result<FetchedDocument, FetchError>;
}
