// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建标签请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTagRequestDto {
    #[validate(length(max = 50, message = "Tag name is too long"))]
    pub name: String,
    #[validate(length(max = 16, message = "Color is too long"))]
    pub color: Option<String>,
}
