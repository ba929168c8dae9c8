use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Loose email shape check: something@something.something, no whitespace.
    /// - Valid: "jane@company.com", "a.b+c@mail.example.org"
    /// - Invalid: "jane", "jane@", "@company.com", "a b@c.d"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Phone numbers: optional leading +, then digits, spaces, dashes, parens.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[\d\s\-()]+$").unwrap();
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex_valid() {
        assert!(EMAIL_REGEX.is_match("jane@company.com"));
        assert!(EMAIL_REGEX.is_match("a.b+c@mail.example.org"));
        assert!(EMAIL_REGEX.is_match("x@y.z"));
    }

    #[test]
    fn test_email_regex_invalid() {
        assert!(!EMAIL_REGEX.is_match("jane"));
        assert!(!EMAIL_REGEX.is_match("jane@"));
        assert!(!EMAIL_REGEX.is_match("@company.com"));
        assert!(!EMAIL_REGEX.is_match("a b@c.d"));
        assert!(!EMAIL_REGEX.is_match(""));
        assert!(!EMAIL_REGEX.is_match("jane@company"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+92-300-0000000"));
        assert!(PHONE_REGEX.is_match("(042) 111 222"));
        assert!(!PHONE_REGEX.is_match("call me"));
    }
}
