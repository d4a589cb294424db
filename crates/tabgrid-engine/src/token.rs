use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of digits a single token can hold
pub const MAX_TOKEN_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token {0:?} is longer than {MAX_TOKEN_LEN} characters")]
    TooLong(String),
    #[error("token {token:?} contains non-digit character {found:?}")]
    NonDigit { token: String, found: char },
}

/// A fret number on one string at one column: zero, one or two ASCII digits.
///
/// The empty token means "no note". `"0"` is a real note (open string) and is
/// distinct from empty. Tokens are `Copy` and only constructed through the
/// validating constructors below, so every value upholds the digit/length invariant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token {
    digits: [u8; MAX_TOKEN_LEN],
    len: u8,
}

impl Token {
    pub const EMPTY: Token = Token {
        digits: [0; MAX_TOKEN_LEN],
        len: 0,
    };

    /// Single-digit token, `None` if `digit` is not 0-9
    pub fn from_digit(digit: u8) -> Option<Self> {
        (digit <= 9).then(|| Token {
            digits: [b'0' + digit, 0],
            len: 1,
        })
    }

    pub fn parse(text: &str) -> Result<Self, TokenError> {
        if text.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLong(text.to_string()));
        }
        let mut token = Token::EMPTY;
        for c in text.chars() {
            let Some(digit) = c.to_digit(10) else {
                return Err(TokenError::NonDigit {
                    token: text.to_string(),
                    found: c,
                });
            };
            token.digits[token.len as usize] = b'0' + digit as u8;
            token.len += 1;
        }
        Ok(token)
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored
        std::str::from_utf8(&self.digits[..self.len as usize]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == MAX_TOKEN_LEN
    }

    /// True for the open-string token `"0"`
    pub fn is_zero(&self) -> bool {
        self.len == 1 && self.digits[0] == b'0'
    }

    /// Token with `digit` appended, `None` if full or `digit` is not 0-9
    pub fn appended(self, digit: u8) -> Option<Self> {
        if self.is_full() || digit > 9 {
            return None;
        }
        let mut next = self;
        next.digits[next.len as usize] = b'0' + digit;
        next.len += 1;
        Some(next)
    }

    /// Token with its last digit removed; empty stays empty
    pub fn truncated(self) -> Self {
        let mut next = self;
        if next.len > 0 {
            next.len -= 1;
            next.digits[next.len as usize] = 0;
        }
        next
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?})", self.as_str())
    }
}

impl TryFrom<String> for Token {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Token::parse(&value)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("0", 1)]
    #[case("7", 1)]
    #[case("12", 2)]
    #[case("24", 2)]
    fn test_parse_valid_tokens(#[case] text: &str, #[case] len: usize) {
        let token = Token::parse(text).unwrap();
        assert_eq!(token.as_str(), text);
        assert_eq!(token.len(), len);
    }

    #[rstest]
    #[case("123")]
    #[case("x")]
    #[case("1a")]
    #[case("-1")]
    fn test_parse_rejects_invalid_tokens(#[case] text: &str) {
        assert!(Token::parse(text).is_err());
    }

    #[test]
    fn test_zero_is_distinct_from_empty() {
        let zero = Token::from_digit(0).unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_empty());
        assert_ne!(zero, Token::EMPTY);
        assert!(Token::EMPTY.is_empty());
        assert!(!Token::EMPTY.is_zero());
    }

    #[test]
    fn test_from_digit_rejects_out_of_range() {
        assert_eq!(Token::from_digit(10), None);
        assert_eq!(Token::from_digit(9).unwrap().as_str(), "9");
    }

    #[test]
    fn test_appended_and_truncated() {
        let one = Token::from_digit(1).unwrap();
        let twelve = one.appended(2).unwrap();
        assert_eq!(twelve.as_str(), "12");
        assert!(twelve.is_full());
        assert_eq!(twelve.appended(3), None);

        assert_eq!(twelve.truncated(), one);
        assert_eq!(one.truncated(), Token::EMPTY);
        assert_eq!(Token::EMPTY.truncated(), Token::EMPTY);
    }

    #[test]
    fn test_truncated_token_equals_parsed_token() {
        // Stale digits past `len` must not affect equality
        let twelve = Token::parse("12").unwrap();
        assert_eq!(twelve.truncated(), Token::parse("1").unwrap());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let token = Token::parse("12").unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"12\"");

        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);

        assert!(serde_json::from_str::<Token>("\"abc\"").is_err());
    }
}
