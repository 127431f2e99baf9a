// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取任务（job）：任务、结果以及单次运行的状态机
/// - 任务事件（job_event）：推送给订阅者的生命周期事件
/// - 用户配置（profile）：显示名称、头像以及抓取时的 User-Agent 和延迟
/// - 标签（tag）：任务分类
/// - 用户（user）：账号、角色和密码摘要
pub mod job;
pub mod job_event;
pub mod profile;
pub mod tag;
pub mod user;
