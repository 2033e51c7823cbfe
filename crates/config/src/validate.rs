//! Shape checks for key material read from the environment.

use crate::{Error, Result};

/// Number of hex digits in a 32-byte key.
pub const KEY_HEX_LEN: usize = 64;

/// Check that `value` is a 32-byte hex string, with or without a `0x` prefix.
pub fn validate_hex_key(name: &str, value: &str) -> Result<()> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.len() != KEY_HEX_LEN {
        return Err(Error::invalid_env(
            name,
            format!(
                "expected {KEY_HEX_LEN} hex digits, got {}",
                digits.len()
            ),
        ));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(Error::invalid_env(
            name,
            format!("non-hex character '{bad}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[rstest]
    #[case::bare(KEY.to_string())]
    #[case::prefixed(format!("0x{KEY}"))]
    #[case::upper_prefix(format!("0X{}", KEY.to_uppercase()))]
    fn accepts_valid_keys(#[case] value: String) {
        assert!(validate_hex_key("WALLET_KEY", &value).is_ok());
    }

    #[rstest]
    #[case::empty("")]
    #[case::short("0xabcd")]
    #[case::too_long("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef00")]
    #[case::non_hex("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdeg")]
    fn rejects_invalid_keys(#[case] value: &str) {
        let err = validate_hex_key("ENCRYPTION_KEY", value).unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { ref name, .. } if name == "ENCRYPTION_KEY"));
    }
}
