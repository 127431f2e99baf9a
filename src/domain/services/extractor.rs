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

use crate::domain::services::selector::SelectorQuery;
use scraper::{ElementRef, Html};

/// 提取服务
///
/// 负责在已解析的文档上执行查询，输出去除首尾空白后非空的文本
pub struct Extractor;

impl Extractor {
    /// 在文档上执行查询
    ///
    /// 每个匹配元素取其全部后代文本拼接后去除首尾空白，
    /// 空白文本被丢弃。输出顺序与文档顺序一致。
    ///
    /// # 参数
    ///
    /// * `document` - 已解析的HTML文档
    /// * `query` - 翻译后的查询
    pub fn extract(document: &Html, query: &SelectorQuery) -> Vec<String> {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| query.matches(element))
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// 解析HTML并执行查询
    ///
    /// `Html` 不是 `Send`，因此解析和提取放在同一个同步调用中完成
    pub fn extract_from_html(html: &str, query: &SelectorQuery) -> Vec<String> {
        let document = Html::parse_document(html);
        Self::extract(&document, query)
    }
}
