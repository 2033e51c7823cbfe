use {secrecy::Secret, tracing::debug};

use crate::{
    Error, Result,
    schema::{BotConfig, NetworkEnv},
    validate::validate_hex_key,
};

pub const WALLET_KEY_VAR: &str = "WALLET_KEY";
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";
pub const NETWORK_ENV_VAR: &str = "XMTP_ENV";

impl BotConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config using a custom lookup function.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let wallet_key = get(WALLET_KEY_VAR).ok_or_else(|| Error::missing_env(WALLET_KEY_VAR))?;
        validate_hex_key(WALLET_KEY_VAR, wallet_key.trim())?;

        let encryption_key =
            get(ENCRYPTION_KEY_VAR).ok_or_else(|| Error::missing_env(ENCRYPTION_KEY_VAR))?;
        validate_hex_key(ENCRYPTION_KEY_VAR, encryption_key.trim())?;

        let env = match get(NETWORK_ENV_VAR) {
            Some(raw) => raw
                .parse::<NetworkEnv>()
                .map_err(|reason| Error::invalid_env(NETWORK_ENV_VAR, reason))?,
            None => {
                debug!("{NETWORK_ENV_VAR} not set, defaulting to dev");
                NetworkEnv::default()
            },
        };

        Ok(Self {
            wallet_key: Secret::new(wallet_key.trim().to_string()),
            encryption_key: Secret::new(encryption_key.trim().to_string()),
            env,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::collections::HashMap};

    const WALLET: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const DB_KEY: &str = "2222222222222222222222222222222222222222222222222222222222222222";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn loads_full_config() {
        let cfg = BotConfig::from_lookup(lookup(&[
            (WALLET_KEY_VAR, WALLET),
            (ENCRYPTION_KEY_VAR, DB_KEY),
            (NETWORK_ENV_VAR, "production"),
        ]))
        .unwrap();
        assert_eq!(cfg.wallet_key.expose_secret(), WALLET);
        assert_eq!(cfg.encryption_key.expose_secret(), DB_KEY);
        assert_eq!(cfg.env, NetworkEnv::Production);
    }

    #[test]
    fn env_defaults_to_dev() {
        let cfg = BotConfig::from_lookup(lookup(&[
            (WALLET_KEY_VAR, WALLET),
            (ENCRYPTION_KEY_VAR, DB_KEY),
        ]))
        .unwrap();
        assert_eq!(cfg.env, NetworkEnv::Dev);
    }

    #[test]
    fn missing_wallet_key_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&[(ENCRYPTION_KEY_VAR, DB_KEY)])).unwrap_err();
        assert_eq!(err.to_string(), "WALLET_KEY must be set");
    }

    #[test]
    fn blank_encryption_key_counts_as_missing() {
        let err = BotConfig::from_lookup(lookup(&[
            (WALLET_KEY_VAR, WALLET),
            (ENCRYPTION_KEY_VAR, "  "),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "ENCRYPTION_KEY must be set");
    }

    #[test]
    fn unknown_env_is_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            (WALLET_KEY_VAR, WALLET),
            (ENCRYPTION_KEY_VAR, DB_KEY),
            (NETWORK_ENV_VAR, "mainnet"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { ref name, .. } if name == NETWORK_ENV_VAR));
    }

    #[test]
    fn malformed_wallet_key_is_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            (WALLET_KEY_VAR, "0x1234"),
            (ENCRYPTION_KEY_VAR, DB_KEY),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { ref name, .. } if name == WALLET_KEY_VAR));
    }
}
