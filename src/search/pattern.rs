use log::warn;

use crate::error::Error;
use crate::keys::x25519::ENCODED_LEN;

/// Longest accepted search string: the data characters of a 32-byte key.
pub const MAX_PATTERN_LEN: usize = ENCODED_LEN - 1;

/// Characters that can end the data part of a 32-byte key's encoding.
///
/// 32 bytes leave 4 bits for the last of the 43 data characters, padded with
/// two zero bits, so only indices that are multiples of 4 appear there.
pub const FINAL_CHARS: &str = "AEIMQUYcgkosw048";

fn is_base64_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'+' || c == b'/'
}

/// A validated search string.
///
/// A key matches when its encoding starts with the string (prefix) or ends
/// with the string followed by the `=` pad (suffix).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    prefix: String,
    suffix: String,
}

impl Pattern {
    /// Validates `search`: non-empty, at most [`MAX_PATTERN_LEN`] characters,
    /// standard base64 alphabet only (no `=`).
    pub fn new(search: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidPattern {
            pattern: search.to_owned(),
            reason,
        };

        if search.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if !search.bytes().all(is_base64_char) {
            return Err(invalid("only base64 characters [A-Za-z0-9+/] are allowed"));
        }
        if search.len() > MAX_PATTERN_LEN {
            return Err(invalid("longer than the 43 data characters of a key"));
        }

        Ok(Pattern {
            prefix: search.to_owned(),
            suffix: format!("{search}="),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether some key encoding can end with this pattern.
    pub fn suffix_reachable(&self) -> bool {
        self.prefix
            .bytes()
            .last()
            .is_some_and(|c| FINAL_CHARS.as_bytes().contains(&c))
    }

    #[inline]
    pub fn matches(&self, encoded: &[u8]) -> bool {
        encoded.starts_with(self.prefix.as_bytes()) || encoded.ends_with(self.suffix.as_bytes())
    }
}

/// Validates every search string, warning about suffixes that cannot occur.
pub fn parse_patterns<S: AsRef<str>>(searches: &[S]) -> Result<Vec<Pattern>, Error> {
    if searches.is_empty() {
        return Err(Error::InvalidConfig("at least one search string is required".into()));
    }

    searches
        .iter()
        .map(|search| {
            let pattern = Pattern::new(search.as_ref())?;

            if !pattern.suffix_reachable() {
                warn!(
                    "{:?} can only match as a prefix: key encodings end in one of {FINAL_CHARS} before '='",
                    pattern.prefix()
                );
            }

            Ok(pattern)
        })
        .collect()
}

/// True if any pattern matches `encoded`.
#[inline]
pub fn matches_any(patterns: &[Pattern], encoded: &[u8]) -> bool {
    patterns.iter().any(|pattern| pattern.matches(encoded))
}
