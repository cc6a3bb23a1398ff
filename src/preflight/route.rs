//! Mapping between the preflight mode and the `/preflight?mode=` route.
//!
//! Two one-directional conversions: [`PreflightRoute::for_mode`] writes
//! state into a route, [`PreflightRoute::parse`] plus
//! [`PreflightRoute::mode`] read it back.

use crate::model::{ParseModeError, PreflightMode};
use std::fmt;

/// Path of the preflight screen.
pub const PREFLIGHT_PATH: &str = "/preflight";

const MODE_PARAM: &str = "mode";

/// A parsed application route: path plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightRoute {
    path: String,
    query: Vec<(String, String)>,
}

impl PreflightRoute {
    /// Route for the preflight screen carrying `mode`.
    #[must_use]
    pub fn for_mode(mode: Option<PreflightMode>) -> Self {
        Self {
            path: PREFLIGHT_PATH.to_string(),
            query: mode
                .map(|m| vec![(MODE_PARAM.to_string(), m.as_str().to_string())])
                .unwrap_or_default(),
        }
    }

    /// Parse a path with optional query, or a full `http(s)://` URL.
    ///
    /// Parsing never fails: anything that is not a recognizable route
    /// yields a path that simply will not match the preflight screen.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let without_origin = ["https://", "http://"]
            .iter()
            .find_map(|scheme| input.strip_prefix(scheme))
            .map_or(input, |rest| rest.find('/').map_or("/", |i| &rest[i..]));
        let without_fragment = without_origin
            .split_once('#')
            .map_or(without_origin, |(before, _)| before);
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(k), percent_decode(v))
            })
            .collect();

        Self {
            path: if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            },
            query,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the route points at the preflight screen.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        self.path.trim_end_matches('/') == PREFLIGHT_PATH
    }

    /// Mode carried by the route. `None` when absent or empty.
    #[must_use]
    pub fn mode(&self) -> Option<Result<PreflightMode, ParseModeError>> {
        self.query_param(MODE_PARAM)
            .filter(|v| !v.is_empty())
            .map(str::parse)
    }
}

impl Default for PreflightRoute {
    fn default() -> Self {
        Self::for_mode(None)
    }
}

impl fmt::Display for PreflightRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{}={}", percent_encode(k), percent_encode(v))?;
        }
        Ok(())
    }
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_mode_renders_query() {
        assert_eq!(
            PreflightRoute::for_mode(Some(PreflightMode::Live)).to_string(),
            "/preflight?mode=live"
        );
        assert_eq!(PreflightRoute::for_mode(None).to_string(), "/preflight");
    }

    #[test]
    fn test_parse_path_and_mode() {
        let route = PreflightRoute::parse("/preflight?mode=experimentation");
        assert!(route.is_preflight());
        assert_eq!(route.mode(), Some(Ok(PreflightMode::Experimentation)));
    }

    #[test]
    fn test_parse_full_url_with_fragment() {
        let route = PreflightRoute::parse("https://app.example.com/preflight/?foo=1&mode=live#top");
        assert!(route.is_preflight());
        assert_eq!(route.query_param("foo"), Some("1"));
        assert_eq!(route.mode(), Some(Ok(PreflightMode::Live)));
    }

    #[test]
    fn test_parse_other_path() {
        let route = PreflightRoute::parse("/insights?mode=live");
        assert!(!route.is_preflight());
        assert_eq!(PreflightRoute::parse("http://host").path(), "/");
    }

    #[test]
    fn test_unknown_and_empty_mode() {
        assert!(matches!(
            PreflightRoute::parse("/preflight?mode=staging").mode(),
            Some(Err(_))
        ));
        assert_eq!(PreflightRoute::parse("/preflight?mode=").mode(), None);
        assert_eq!(PreflightRoute::parse("/preflight").mode(), None);
    }

    #[test]
    fn test_percent_round_trip() {
        let route = PreflightRoute::parse("/preflight?note=a%20b%2Bc&x=y+z&bad=%zz");
        assert_eq!(route.query_param("note"), Some("a b+c"));
        assert_eq!(route.query_param("x"), Some("y z"));
        assert_eq!(route.query_param("bad"), Some("%zz"));
        assert_eq!(route.to_string(), "/preflight?note=a%20b%2Bc&x=y%20z&bad=%25zz");
    }
}
