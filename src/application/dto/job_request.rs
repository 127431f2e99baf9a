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

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::job::NewJob;

/// 创建抓取任务请求
///
/// 必填字段缺失时由流水线报告字段级错误，这里只做长度限制
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequestDto {
    /// 目标URL
    #[validate(length(max = 2048, message = "targetUrl is too long"))]
    pub target_url: Option<String>,
    /// 简化选择器（`.class`、`#id` 或标签名）
    #[validate(length(max = 512, message = "cssSelector is too long"))]
    pub css_selector: Option<String>,
    /// 要关联的标签ID
    pub tag_ids: Option<Vec<i64>>,
}

impl CreateJobRequestDto {
    pub fn into_new_job(self, owner_id: i64) -> NewJob {
        NewJob {
            target_url: self.target_url.unwrap_or_default(),
            css_selector: self.css_selector.unwrap_or_default(),
            owner_id,
            tag_ids: self.tag_ids.unwrap_or_default(),
        }
    }
}

/// 替换任务标签请求
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobTagsRequestDto {
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// 结果分页查询参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ResultsQueryDto {
    /// 页码，从 1 开始
    #[validate(range(min = 1, max = 1_000_000))]
    pub page: Option<u64>,
    /// 每页条数
    #[validate(range(min = 1, max = 500))]
    pub page_size: Option<u64>,
}

impl ResultsQueryDto {
    pub const DEFAULT_PAGE_SIZE: u64 = 50;

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE)
    }
}
