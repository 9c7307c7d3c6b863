//! API 模块常量定义
//!
//! 包含认证、Cookie 等相关的硬编码常量。

/// 会话 Cookie 名称
pub const JWT_COOKIE_NAME: &str = "jwt";

/// 登出时写入的占位值
pub const LOGGED_OUT_VALUE: &str = "loggedout";

/// 登出 Cookie 存活秒数
pub const LOGGED_OUT_COOKIE_SECS: i64 = 10;

/// Access token 类型标记
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";
