//! Protocol version recovery from server variables.

use crate::foundation::ServerBag;

/// Server variable carrying the request line's protocol, e.g. `HTTP/1.1`.
pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";

/// Extract `"<major>.<minor>"` from `SERVER_PROTOCOL`.
///
/// Absent or malformed values fall back to `default`. A malformed value is
/// tolerated but logged, since it usually means a misconfigured upstream.
pub fn protocol_version(server: &ServerBag, default: &str) -> String {
    let Some(raw) = server.get(SERVER_PROTOCOL) else {
        return default.to_string();
    };
    match parse_protocol(raw) {
        Some(version) => version.to_string(),
        None => {
            tracing::warn!(
                server_protocol = %raw,
                fallback = default,
                "malformed SERVER_PROTOCOL, using default protocol version"
            );
            default.to_string()
        }
    }
}

/// Return the `<major>.<minor>` part of `HTTP/<major>.<minor>`.
pub fn parse_protocol(raw: &str) -> Option<&str> {
    let version = raw.strip_prefix("HTTP/")?;
    let (major, minor) = version.split_once('.')?;
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (numeric(major) && numeric(minor)).then_some(version)
}
