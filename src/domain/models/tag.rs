// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 标签的默认颜色
pub const DEFAULT_TAG_COLOR: &str = "#6a11cb";

/// 标签实体
///
/// 用于对抓取任务进行分类，与任务为多对多关系，生命周期独立于任何运行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// 标签唯一标识符
    pub id: i64,
    /// 标签名称，忽略大小写唯一
    pub name: String,
    /// 十六进制颜色
    pub color: String,
}

/// 带使用统计的标签
#[derive(Debug, Clone, Serialize)]
pub struct TagUsage {
    #[serde(flatten)]
    pub tag: Tag,
    pub job_count: u64,
}

/// 规范化新标签的名称和颜色
///
/// 名称去除首尾空白；颜色为空时使用默认颜色
pub fn normalize_new_tag(name: &str, color: Option<&str>) -> (String, String) {
    let color = match color.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_TAG_COLOR.to_string(),
    };
    (name.trim().to_string(), color)
}
