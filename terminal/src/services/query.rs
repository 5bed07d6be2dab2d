//! Route and query parameters.
//!
//! The desktop app has no address bar, but selections that the web client kept
//! in the URL (`market`, `trader`) are still tracked here so they survive
//! screen switches and can be rendered as a shareable link.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Swap,
    Data,
}

impl Route {
    pub fn all() -> [Route; 3] {
        [Route::Home, Route::Swap, Route::Data]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Swap => "/swap",
            Route::Data => "/data",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Swap => "Swap",
            Route::Data => "Data",
        }
    }
}

/// Ordered key/value query parameters. Setting an existing key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `?a=b&c=d` (leading `?` optional). Malformed escapes keep the raw text.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.strip_prefix('?').unwrap_or(query);
        for part in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            params.set(decode(key), decode(value));
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let mut params = QueryParams::parse("?market=abc&trader=x%2By");
        assert_eq!(params.get("market"), Some("abc"));
        assert_eq!(params.get("trader"), Some("x+y"));

        params.set("market", "def");
        assert_eq!(params.to_string(), "?market=def&trader=x%2By");
    }

    #[test]
    fn test_empty_query() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
        assert_eq!(QueryParams::new().to_string(), "");
    }

    #[test]
    fn test_routes() {
        assert_eq!(Route::default(), Route::Home);
        assert_eq!(Route::Data.path(), "/data");
    }
}
