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

use scraper::ElementRef;
use std::fmt;

/// 文档查询
///
/// 由简化选择器翻译而来，只支持类名、ID和标签名三种形式。
/// 其他语法不会被拒绝，而是当作字面标签名，通常什么也匹配不到。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorQuery {
    /// `.name`：class 属性规范化后包含该空格分隔的词
    Class(String),
    /// `#name`：id 属性等于该值
    Id(String),
    /// 其余情况：任意深度的同名元素
    Tag(String),
}

impl SelectorQuery {
    /// 翻译选择器字符串
    ///
    /// 纯函数，相同输入总是得到相同查询
    pub fn translate(selector: &str) -> Self {
        if let Some(class_name) = selector.strip_prefix('.') {
            SelectorQuery::Class(class_name.to_string())
        } else if let Some(id) = selector.strip_prefix('#') {
            SelectorQuery::Id(id.to_string())
        } else {
            SelectorQuery::Tag(selector.to_string())
        }
    }

    /// 判断元素是否匹配查询
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            SelectorQuery::Class(class_name) => value
                .attr("class")
                .map(|class| padded_class_list(class).contains(&format!(" {} ", class_name)))
                .unwrap_or(false),
            SelectorQuery::Id(id) => value.attr("id") == Some(id.as_str()),
            SelectorQuery::Tag(tag) => value.name().eq_ignore_ascii_case(tag),
        }
    }

    /// 等价的 XPath 表达式，仅用于日志和导出
    pub fn to_xpath(&self) -> String {
        match self {
            SelectorQuery::Class(class_name) => format!(
                "//*[contains(concat(' ', normalize-space(@class), ' '), ' {} ')]",
                class_name
            ),
            SelectorQuery::Id(id) => format!("//*[@id='{}']", id),
            SelectorQuery::Tag(tag) => format!("//{}", tag),
        }
    }
}

impl fmt::Display for SelectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_xpath())
    }
}

/// normalize-space 后两端各补一个空格
fn padded_class_list(class: &str) -> String {
    let normalized = class.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} ", normalized)
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
