//! 客户端 IP 解析
//!
//! 限流按客户端 IP 计数。只有连接来自可信代理时才采信 `X-Forwarded-For` /
//! `X-Real-IP`；未配置 `api.trusted_proxies` 时，私有地址与 localhost 视为代理。

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use tracing::{debug, warn};

/// 私有地址或 localhost（IPv6: ::1, fc00::/7, fe80::/10）
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback() || (head & 0xfe00) == 0xfc00 || (head & 0xffc0) == 0xfe80
        }
    }
}

/// 一条可信代理规则：单个地址或 CIDR 网段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProxyRule {
    network: IpAddr,
    prefix: u8,
}

impl ProxyRule {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (addr, prefix) = match raw.split_once('/') {
            Some((addr, prefix)) => (addr.parse::<IpAddr>().ok()?, Some(prefix.parse::<u8>().ok()?)),
            None => (raw.parse::<IpAddr>().ok()?, None),
        };
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let prefix = prefix.unwrap_or(max);
        (prefix <= max).then_some(Self {
            network: addr,
            prefix,
        })
    }

    fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
                u32::from(net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(self.prefix)).unwrap_or(0);
                u128::from(net) & mask == u128::from(*ip) & mask
            }
            _ => false,
        }
    }
}

/// 启动时解析的可信代理列表
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies {
    rules: Vec<ProxyRule>,
    configured: bool,
}

impl TrustedProxies {
    /// 无法解析的条目记录警告后忽略
    pub fn new(entries: &[String]) -> Self {
        let rules = entries
            .iter()
            .filter_map(|entry| {
                let rule = ProxyRule::parse(entry);
                if rule.is_none() {
                    warn!("Ignoring invalid trusted proxy entry: {}", entry);
                }
                rule
            })
            .collect();
        Self {
            rules,
            configured: !entries.is_empty(),
        }
    }

    pub fn is_trusted(&self, peer: &IpAddr) -> bool {
        if self.configured {
            self.rules.iter().any(|rule| rule.contains(peer))
        } else {
            is_private_or_local(peer)
        }
    }

    /// 限流使用的客户端 IP，`peer` 可以是 `ip` 或 `ip:port`
    pub fn client_ip(&self, peer: &str, headers: &HeaderMap) -> String {
        let Some(peer_ip) = parse_peer(peer) else {
            return peer.to_string();
        };
        if !self.is_trusted(&peer_ip) {
            return peer_ip.to_string();
        }
        match forwarded_ip(headers) {
            Some(real_ip) => {
                debug!("Proxy {} forwarded for {}", peer_ip, real_ip);
                real_ip.to_string()
            }
            None => peer_ip.to_string(),
        }
    }
}

fn parse_peer(peer: &str) -> Option<IpAddr> {
    peer.parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| peer.parse::<IpAddr>())
        .ok()
}

/// X-Forwarded-For 的第一个地址，其次 X-Real-IP；不是合法 IP 的值不采信
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| header("x-real-ip").and_then(|v| v.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(HeaderName::from_static(*name), HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_private_ranges() {
        for ip in ["10.0.0.1", "172.16.0.1", "192.168.1.1", "127.0.0.1", "::1", "fd00::1", "fe80::1"] {
            assert!(is_private_or_local(&ip.parse().unwrap()), "{}", ip);
        }
        for ip in ["8.8.8.8", "2001:4860:4860::8888"] {
            assert!(!is_private_or_local(&ip.parse().unwrap()), "{}", ip);
        }
    }

    #[test]
    fn test_proxy_rules() {
        let proxies = TrustedProxies::new(&[
            "192.168.1.0/24".into(),
            "10.0.0.1".into(),
            "2001:db8::/32".into(),
            "not-an-ip".into(),
            "10.0.0.0/40".into(),
        ]);
        assert_eq!(proxies.rules.len(), 3);
        assert!(proxies.is_trusted(&"192.168.1.50".parse().unwrap()));
        assert!(proxies.is_trusted(&"10.0.0.1".parse().unwrap()));
        assert!(proxies.is_trusted(&"2001:db8::1".parse().unwrap()));
        assert!(!proxies.is_trusted(&"10.0.0.2".parse().unwrap()));
        assert!(!proxies.is_trusted(&"192.168.2.1".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_header_only_from_trusted_peer() {
        let proxies = TrustedProxies::new(&["10.0.0.0/8".into()]);
        let forwarded = headers(&[("x-forwarded-for", "203.0.113.9, 10.1.1.1")]);

        assert_eq!(proxies.client_ip("10.1.2.3:5000", &forwarded), "203.0.113.9");
        assert_eq!(proxies.client_ip("198.51.100.7:5000", &forwarded), "198.51.100.7");
    }

    #[test]
    fn test_auto_detect_without_configuration() {
        let proxies = TrustedProxies::new(&[]);
        let real_ip = headers(&[("x-real-ip", "203.0.113.9")]);

        assert_eq!(proxies.client_ip("127.0.0.1", &real_ip), "203.0.113.9");
        assert_eq!(proxies.client_ip("8.8.8.8", &real_ip), "8.8.8.8");
        assert_eq!(proxies.client_ip("127.0.0.1", &HeaderMap::new()), "127.0.0.1");
    }

    #[test]
    fn test_garbage_forwarded_value_is_ignored() {
        let proxies = TrustedProxies::new(&[]);
        let forged = headers(&[("x-forwarded-for", "<script>")]);
        assert_eq!(proxies.client_ip("127.0.0.1:1", &forged), "127.0.0.1");
    }
}
