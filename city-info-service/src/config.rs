use common::tracing::LogFormat;
use std::env;
use std::net::{IpAddr, Ipv4Addr};

/// Upper bound on `UPSTREAM_MAX_RETRIES`
pub const MAX_UPSTREAM_RETRIES: u32 = 10;

pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub city_api_url: String,
    pub api_key: String,
    pub upstream_timeout_secs: u64,
    pub upstream_max_retries: u32,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: resolve_host(
                env::var("HOST").ok().as_deref(),
                env::var_os("RENDER_EXTERNAL_URL").is_some(),
            ),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            city_api_url: env::var("CITY_API_URL")
                .unwrap_or_else(|_| "https://api-ugi2pflmha-ew.a.run.app".to_string()),
            api_key: env::var("API_KEY").unwrap_or_default(),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            // Upstream failures surface immediately unless retries are opted into
            upstream_max_retries: env::var("UPSTREAM_MAX_RETRIES")
                .ok()
                .and_then(|r| r.parse::<u32>().ok())
                .map(|r| r.min(MAX_UPSTREAM_RETRIES))
                .unwrap_or(0),
            log_format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or_default(),
        }
    }
}

/// Bind address: a deployed instance listens on every interface, otherwise
/// `HOST` (an IP or `localhost`) is used, falling back to loopback.
fn resolve_host(host: Option<&str>, deployed: bool) -> IpAddr {
    if deployed {
        return IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    }

    match host.map(str::trim) {
        Some(h) if h.eq_ignore_ascii_case("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Some(h) => h.parse().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        None => IpAddr::V4(Ipv4Addr::LOCALHOST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_defaults_to_loopback() {
        assert_eq!(resolve_host(None, false), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(resolve_host(Some("localhost"), false), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(resolve_host(Some("not an ip"), false), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn explicit_host_is_used() {
        assert_eq!(
            resolve_host(Some("0.0.0.0"), false),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        assert_eq!(resolve_host(Some("::1"), false), "::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn deployed_instance_binds_all_interfaces() {
        assert_eq!(resolve_host(None, true), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(
            resolve_host(Some("127.0.0.1"), true),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
