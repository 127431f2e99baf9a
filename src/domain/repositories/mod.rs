// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层基于 SeaORM 提供。
///
/// 包含的仓库接口：
/// - 任务仓库（job_repository）：任务、结果和任务标签关联
/// - 标签仓库（tag_repository）：标签的增删查
/// - 用户仓库（user_repository）：账号和 API 密钥
pub mod job_repository;
pub mod tag_repository;
pub mod user_repository;
