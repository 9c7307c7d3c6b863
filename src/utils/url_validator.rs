//! URL 验证模块
//!
//! 图片、网站、社交主页、地图嵌入链接的格式检查，阻止危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    UnexpectedHost(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::UnexpectedHost(host) => write!(f, "Unexpected host: {}", host),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

const GOOGLE_MAPS_EMBED_PREFIX: &str = "https://www.google.com/maps/embed";

/// 验证 http(s) URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. URL 可解析且带主机名
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(parsed)
}

/// 网站地址：主机名中必须包含 `.`
pub fn validate_website_url(url: &str) -> Result<(), UrlValidationError> {
    let parsed = validate_url(url)?;
    match parsed.host_str() {
        Some(host) if host.contains('.') => Ok(()),
        Some(host) => Err(UrlValidationError::UnexpectedHost(host.to_string())),
        None => Err(UrlValidationError::InvalidFormat("missing host".to_string())),
    }
}

/// 社交主页：主机名为 `domain` 或 `www.domain`，且路径非空
pub fn validate_profile_url(url: &str, domain: &str) -> Result<(), UrlValidationError> {
    let parsed = validate_url(url)?;
    let host = parsed.host_str().unwrap_or_default();
    let expected_www = format!("www.{}", domain);
    if host != domain && host != expected_www {
        return Err(UrlValidationError::UnexpectedHost(host.to_string()));
    }
    if parsed.path().trim_matches('/').is_empty() {
        return Err(UrlValidationError::InvalidFormat("missing profile path".to_string()));
    }
    Ok(())
}

/// Google Maps 嵌入链接（区分大小写的前缀匹配）
pub fn is_google_maps_embed(url: &str) -> bool {
    url.starts_with(GOOGLE_MAPS_EMBED_PREFIX)
}
