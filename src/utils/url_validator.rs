//! 图片 URL 校验
//!
//! 帖子只保存图床返回的地址，这里只接受带主机名的 http(s) URL。

use url::Url;

/// Longest image URL accepted
pub const MAX_IMAGE_URL_LENGTH: usize = 2048;

#[derive(Debug, PartialEq, Eq)]
pub enum ImageUrlError {
    Empty,
    TooLong(usize),
    UnsupportedScheme(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for ImageUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "image_url cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "image_url is {} characters, the limit is {}",
                len, MAX_IMAGE_URL_LENGTH
            ),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme '{}'. Only http and https are allowed",
                scheme
            ),
            Self::MissingHost => write!(f, "image_url must include a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid image_url: {}", msg),
        }
    }
}

impl std::error::Error for ImageUrlError {}

/// 校验图片 URL，返回去除首尾空白后的地址
pub fn validate_image_url(raw: &str) -> Result<String, ImageUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ImageUrlError::Empty);
    }
    if trimmed.len() > MAX_IMAGE_URL_LENGTH {
        return Err(ImageUrlError::TooLong(trimmed.len()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ImageUrlError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ImageUrlError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ImageUrlError::MissingHost);
    }

    Ok(trimmed.to_string())
}
