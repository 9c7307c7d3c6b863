pub mod ip;
pub mod password;
pub mod slug;
pub mod time_parser;
pub mod url_validator;
pub mod validation;

pub use slug::generate_slug;
pub use time_parser::TimeParser;

/// 生成随机字母数字串（用于临时密钥）
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}
