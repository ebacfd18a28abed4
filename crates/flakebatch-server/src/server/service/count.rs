//! Validation of the `count` query parameter.
//!
//! - absent or empty: defaults to [`DEFAULT_COUNT`]
//! - otherwise it must parse as a base-10 `i64` and fall in `0..=max_count`
//!
//! `count=0` is valid and yields an empty batch. A leading `+` is accepted
//! (that is what `i64::from_str` accepts); whitespace and values that
//! overflow `i64` are rejected. If `count` appears more than once, the first
//! occurrence wins.

use super::AppState;
use crate::server::error::Error;
use axum::{extract::FromRequestParts, extract::Query, http::request::Parts};

/// Batch size used when the request does not specify one.
pub const DEFAULT_COUNT: usize = 1;

const COUNT_PARAM: &str = "count";

/// Resolves a raw `count` value against `max_count`.
///
/// # Errors
///
/// Returns [`Error::InvalidCount`] if the value is not an integer in
/// `0..=max_count`.
pub fn parse_count(raw: Option<&str>, max_count: usize) -> Result<usize, Error> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_COUNT);
    };

    raw.parse::<i64>()
        .ok()
        .and_then(|count| usize::try_from(count).ok())
        .filter(|&count| count <= max_count)
        .ok_or(Error::InvalidCount { max_count })
}

/// Extractor for a validated batch size.
///
/// Rejects with [`Error::InvalidCount`] (400) before the handler runs, so no
/// identifier is generated for an invalid request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(pub usize);

impl BatchSize {
    pub const fn get(self) -> usize {
        self.0
    }
}

impl FromRequestParts<AppState> for BatchSize {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let max_count = state.max_count();

        // A query string that cannot be decoded at all is as invalid as a bad
        // `count` value.
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|_| Error::InvalidCount { max_count })?;

        let raw = pairs
            .iter()
            .find(|(key, _)| key == COUNT_PARAM)
            .map(|(_, value)| value.as_str());

        parse_count(raw, max_count).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1000;

    fn is_invalid(raw: &str) -> bool {
        matches!(
            parse_count(Some(raw), MAX),
            Err(Error::InvalidCount { max_count: MAX })
        )
    }

    #[test]
    fn defaults_when_absent_or_empty() {
        assert_eq!(parse_count(None, MAX).unwrap(), DEFAULT_COUNT);
        assert_eq!(parse_count(Some(""), MAX).unwrap(), DEFAULT_COUNT);
    }

    #[test]
    fn accepts_inclusive_bounds() {
        assert_eq!(parse_count(Some("0"), MAX).unwrap(), 0);
        assert_eq!(parse_count(Some("1"), MAX).unwrap(), 1);
        assert_eq!(parse_count(Some("1000"), MAX).unwrap(), 1000);
        assert_eq!(parse_count(Some("+7"), MAX).unwrap(), 7);
        assert_eq!(parse_count(Some("-0"), MAX).unwrap(), 0);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(is_invalid("1001"));
        assert!(is_invalid("-1"));
        assert!(is_invalid("9223372036854775807"));
    }

    #[test]
    fn rejects_non_integers() {
        assert!(is_invalid("abc"));
        assert!(is_invalid("1.5"));
        assert!(is_invalid(" 5"));
        assert!(is_invalid("5 "));
        assert!(is_invalid("0x10"));
        assert!(is_invalid("99999999999999999999"));
    }

    #[test]
    fn respects_configured_limit() {
        assert_eq!(parse_count(Some("5"), 5).unwrap(), 5);
        assert!(matches!(
            parse_count(Some("6"), 5),
            Err(Error::InvalidCount { max_count: 5 })
        ));
    }
}
