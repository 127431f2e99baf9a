// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_NAME: &str = "Default User";
pub const DEFAULT_AVATAR_URL: &str = "https://www.gravatar.com/avatar/?d=mp";

/// 用户抓取配置
///
/// 每个用户最多一份；`user_agent` 和 `delay_between_requests_ms`
/// 作用于该用户发起的每一次运行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub display_name: String,
    pub avatar_url: String,
    /// 为空时使用全局配置
    pub user_agent: Option<String>,
    /// 每条结果之间的延迟（毫秒），0 表示使用全局配置
    pub delay_between_requests_ms: u64,
}

impl UserProfile {
    /// 尚未保存过配置的用户使用的默认值
    pub fn default_for(user_id: i64) -> Self {
        Self {
            user_id,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            user_agent: None,
            delay_between_requests_ms: 0,
        }
    }
}

/// 配置更新，未提供的字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub user_agent: Option<String>,
    pub delay_between_requests_ms: Option<u64>,
}

impl ProfileUpdate {
    /// 应用更新；空白的 User-Agent 清除覆盖值，空白的名称和头像恢复默认
    pub fn apply_to(self, mut profile: UserProfile) -> UserProfile {
        if let Some(name) = self.display_name {
            let name = name.trim();
            profile.display_name = if name.is_empty() {
                DEFAULT_DISPLAY_NAME.to_string()
            } else {
                name.to_string()
            };
        }
        if let Some(avatar) = self.avatar_url {
            let avatar = avatar.trim();
            profile.avatar_url = if avatar.is_empty() {
                DEFAULT_AVATAR_URL.to_string()
            } else {
                avatar.to_string()
            };
        }
        if let Some(user_agent) = self.user_agent {
            let user_agent = user_agent.trim();
            profile.user_agent = (!user_agent.is_empty()).then(|| user_agent.to_string());
        }
        if let Some(delay) = self.delay_between_requests_ms {
            profile.delay_between_requests_ms = delay;
        }
        profile
    }
}
