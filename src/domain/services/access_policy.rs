// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::models::user::User;

/// 访问被拒绝
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Access denied")]
pub struct Forbidden;

/// 判断请求者是否可以操作某个资源
///
/// 管理员可以操作任何资源，其他人只能操作自己拥有的资源
pub fn can_access(requester_id: i64, requester_is_admin: bool, owner_id: i64) -> bool {
    requester_is_admin || requester_id == owner_id
}

/// 以用户身份执行访问检查
pub fn authorize(requester: &User, owner_id: i64) -> Result<(), Forbidden> {
    if can_access(requester.id, requester.is_admin(), owner_id) {
        Ok(())
    } else {
        Err(Forbidden)
    }
}

/// 仅管理员可执行的操作
pub fn require_admin(requester: &User) -> Result<(), Forbidden> {
    if requester.is_admin() {
        Ok(())
    } else {
        Err(Forbidden)
    }
}
