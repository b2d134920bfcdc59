//! Proxy URL parsing
//!
//! Turns `scheme://[user[:pass]@]host:port` into a [`ProxyDescriptor`]
//! and back into the URL form the MTProto transport accepts.

use std::fmt;

use url::{Host, Url};

use crate::error::{Error, Result};

/// Kind of proxy the connection is tunneled through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyType {
    Http,
    Socks5,
    Socks4,
}

impl ProxyType {
    /// Map a URL scheme to a proxy type. The scheme must already be lowercase.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "http" | "https" => Some(ProxyType::Http),
            "socks5" | "socks" => Some(ProxyType::Socks5),
            "socks4" | "socks4a" => Some(ProxyType::Socks4),
            _ => None,
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyType::Http => "http",
            ProxyType::Socks5 => "socks5",
            ProxyType::Socks4 => "socks4",
        }
    }
}

/// Resolved proxy endpoint with optional credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub proxy_type: ProxyType,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyDescriptor {
    /// Normalized proxy URL, credentials included.
    pub fn to_url(&self) -> String {
        self.render(false)
    }

    /// Whether the MTProto transport can tunnel through this proxy.
    /// Only SOCKS5 is implemented by the transport.
    pub fn is_tunnelable(&self) -> bool {
        self.proxy_type == ProxyType::Socks5
    }

    fn render(&self, mask_password: bool) -> String {
        let mut out = format!("{}://", self.proxy_type.scheme());
        if let Some(user) = &self.username {
            out.push_str(&urlencoding::encode(user));
            if let Some(pass) = &self.password {
                out.push(':');
                if mask_password {
                    out.push_str("***");
                } else {
                    out.push_str(&urlencoding::encode(pass));
                }
            }
            out.push('@');
        }
        if self.host.contains(':') {
            out.push('[');
            out.push_str(&self.host);
            out.push(']');
        } else {
            out.push_str(&self.host);
        }
        out.push(':');
        out.push_str(&self.port.to_string());
        out
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Parse a proxy URL taken from the environment.
pub fn parse_proxy_url(raw: &str) -> Result<ProxyDescriptor> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|e| Error::InvalidProxyUrl(format!("{raw} ({e})")))?;

    let scheme = url.scheme().to_ascii_lowercase();
    let proxy_type =
        ProxyType::from_scheme(&scheme).ok_or_else(|| Error::UnsupportedProxyScheme(scheme))?;

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_ascii_lowercase(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        _ => return Err(Error::InvalidProxyUrl(raw.to_string())),
    };

    // `url` drops a port equal to the scheme default (http://h:80), so
    // fall back to the known default only when the port was written out.
    let port = url.port().or_else(|| {
        if has_explicit_port(raw) {
            url.port_or_known_default()
        } else {
            None
        }
    });
    let port = match port {
        Some(port) if port != 0 => port,
        _ => return Err(Error::InvalidProxyUrl(raw.to_string())),
    };

    // `url` hands back userinfo percent-encoded; keep it as it was written.
    let username = Some(url.username())
        .filter(|user| !user.is_empty())
        .map(decode_userinfo);
    let password = url.password().map(decode_userinfo);

    Ok(ProxyDescriptor {
        proxy_type,
        host,
        port,
        username,
        password,
    })
}

fn decode_userinfo(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

fn has_explicit_port(raw: &str) -> bool {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    match host_port.rsplit_once(':') {
        Some((host, port)) => {
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!host.starts_with('[') || host.ends_with(']'))
        }
        None => false,
    }
}
