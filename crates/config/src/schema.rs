use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Messaging network the client connects to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkEnv {
    Local,
    #[default]
    Dev,
    Production,
}

impl NetworkEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for NetworkEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NetworkEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "unknown network '{other}' (expected local, dev or production)"
            )),
        }
    }
}

/// Validated startup configuration handed to the bot.
#[derive(Clone, Serialize)]
pub struct BotConfig {
    /// Private key of the wallet backing the bot's identity.
    #[serde(serialize_with = "serialize_redacted")]
    pub wallet_key: Secret<String>,

    /// Key protecting the client's local message database.
    #[serde(serialize_with = "serialize_redacted")]
    pub encryption_key: Secret<String>,

    pub env: NetworkEnv,
}

impl BotConfig {
    /// Link a user can open to start a direct conversation with the bot.
    pub fn dm_url(&self, address: &str) -> String {
        format!("http://xmtp.chat/dm/{address}?env={}", self.env)
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("wallet_key", &"[REDACTED]")
            .field("encryption_key", &"[REDACTED]")
            .field("env", &self.env)
            .finish()
    }
}

fn serialize_redacted<S: serde::Serializer>(
    _secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    fn config() -> BotConfig {
        BotConfig {
            wallet_key: Secret::new("0xsecret-wallet".into()),
            encryption_key: Secret::new("secret-db".into()),
            env: NetworkEnv::Production,
        }
    }

    #[test]
    fn parse_network_env() {
        assert_eq!("LOCAL".parse::<NetworkEnv>(), Ok(NetworkEnv::Local));
        assert_eq!(" dev ".parse::<NetworkEnv>(), Ok(NetworkEnv::Dev));
        assert_eq!(
            "production".parse::<NetworkEnv>(),
            Ok(NetworkEnv::Production)
        );
        assert!("mainnet".parse::<NetworkEnv>().is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = config();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("Production"));
        assert_eq!(cfg.wallet_key.expose_secret(), "0xsecret-wallet");
    }

    #[test]
    fn serialize_redacts_keys() {
        let json = serde_json::to_value(config()).unwrap();
        assert_eq!(json["wallet_key"], "[REDACTED]");
        assert_eq!(json["encryption_key"], "[REDACTED]");
        assert_eq!(json["env"], "production");
    }

    #[test]
    fn dm_url_includes_env() {
        assert_eq!(
            config().dm_url("0xabc"),
            "http://xmtp.chat/dm/0xabc?env=production"
        );
    }
}
