//! Response cookies and their `Set-Cookie` representation.
//!
//! # Design
//! The foundation response keeps cookies as structured values next to its
//! headers; the standard response only has headers. `to_set_cookie` flattens a
//! cookie into the header value and `parse` recovers it for the reverse
//! direction. Values are emitted verbatim, without percent-encoding.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Cookie date with hyphenated day-month-year, always in GMT.
const COOKIE_DATE: &str = "%a, %d-%b-%Y %H:%M:%S GMT";

/// IMF-fixdate, accepted when parsing only.
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Latest expiry with a four-digit year: 9999-12-31 23:59:59 UTC.
const MAX_EXPIRES: i64 = 253_402_300_799;

/// `SameSite` policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "lax",
            SameSite::Strict => "strict",
            SameSite::None => "none",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "lax" => Some(SameSite::Lax),
            "strict" => Some(SameSite::Strict),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cookie set on a response.
///
/// `expires` is a unix timestamp in seconds; `0` marks a session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub expires: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl Cookie {
    /// A session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: 0,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn with_expires(mut self, expires: i64) -> Self {
        self.expires = expires;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Serialize into a `Set-Cookie` header value.
    pub fn to_set_cookie(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);

        if self.expires != 0 {
            if self.expires > MAX_EXPIRES {
                tracing::warn!(
                    cookie = %self.name,
                    expires = self.expires,
                    "cookie expiry past year 9999, clamping"
                );
            }
            match DateTime::from_timestamp(self.expires.min(MAX_EXPIRES), 0) {
                Some(at) => {
                    out.push_str("; expires=");
                    out.push_str(&at.format(COOKIE_DATE).to_string());
                }
                None => tracing::warn!(
                    cookie = %self.name,
                    expires = self.expires,
                    "cookie expiry out of range, emitting without expires"
                ),
            }
        }
        if let Some(path) = &self.path {
            out.push_str("; path=");
            out.push_str(path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; domain=");
            out.push_str(domain);
        }
        if self.secure {
            out.push_str("; secure");
        }
        if self.http_only {
            out.push_str("; httponly");
        }
        if let Some(same_site) = self.same_site {
            out.push_str("; samesite=");
            out.push_str(same_site.as_str());
        }
        out
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// The value is kept verbatim; only the name and attributes are trimmed.
    /// Attribute names are matched case-insensitively and unknown attributes
    /// are ignored. An unparseable `expires` leaves the cookie a session
    /// cookie.
    pub fn parse(header: &str) -> Result<Self, BridgeError> {
        let mut parts = header.split(';');
        let pair = parts.next().unwrap_or_default();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| BridgeError::InvalidCookie(header.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BridgeError::InvalidCookie(header.to_string()));
        }

        let mut cookie = Cookie::new(name, value);
        for attribute in parts {
            let (key, val) = match attribute.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (attribute.trim(), None),
            };
            match (key.to_ascii_lowercase().as_str(), val) {
                ("expires", Some(v)) => {
                    if let Some(ts) = parse_cookie_date(v) {
                        cookie.expires = ts;
                    }
                }
                ("path", Some(v)) => cookie.path = Some(v.to_string()),
                ("domain", Some(v)) => cookie.domain = Some(v.to_string()),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                ("samesite", Some(v)) => cookie.same_site = SameSite::parse(v),
                _ => {}
            }
        }
        Ok(cookie)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_set_cookie())
    }
}

fn parse_cookie_date(value: &str) -> Option<i64> {
    [COOKIE_DATE, IMF_FIXDATE]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|at| at.and_utc().timestamp())
}
