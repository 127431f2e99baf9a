// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 访问策略（access_policy）：所有者或管理员授权规则
/// - 导出（export）：CSV 与 JSON 导出
/// - 提取器（extractor）：在解析后的文档上执行选择器
/// - 任务流水线（job_pipeline）：抓取 → 提取 → 持久化 → 通知
/// - 通知（notifier）：任务频道事件发布接口
/// - 选择器（selector）：简化选择器到查询的转换
pub mod access_policy;
pub mod export;
pub mod extractor;
pub mod job_pipeline;
pub mod notifier;
pub mod selector;
