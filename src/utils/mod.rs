pub mod url_validator;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成由 [A-Za-z0-9] 组成的随机字符串
pub fn generate_random_code(length: usize) -> String {
    std::iter::repeat_with(|| ALPHANUMERIC[rand::random_range(0..ALPHANUMERIC.len())] as char)
        .take(length)
        .collect()
}

/// 生成 64 字符的随机密钥（用于未配置 jwt_secret 时）
pub fn generate_secure_token() -> String {
    generate_random_code(64)
}

/// 短码格式检查：1..=max_len 个 ASCII 字母或数字
pub fn is_valid_short_code(code: &str, max_len: usize) -> bool {
    !code.is_empty() && code.len() <= max_len && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 按字符（而非字节）计算长度
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
