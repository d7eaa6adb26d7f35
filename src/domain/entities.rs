//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use clap::ValueEnum;
use regex::Regex;
use serde::Deserialize;

use crate::domain::error::DomainError;

/// Deployment environment a node runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Prod,
    Test,
    Dev,
}

impl Environment {
    /// All environments, in display order.
    pub const ALL: [Environment; 3] = [Environment::Prod, Environment::Test, Environment::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Test => "test",
            Environment::Dev => "dev",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployable component of a node installation.
///
/// `NodeClean` is the node image started with a wiped chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    Boot,
    Node,
    NodeClean,
    Keos,
}

impl Component {
    /// All components, in display order.
    pub const ALL: [Component; 4] = [
        Component::Boot,
        Component::Node,
        Component::NodeClean,
        Component::Keos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Boot => "boot",
            Component::Node => "node",
            Component::NodeClean => "node-clean",
            Component::Keos => "keos",
        }
    }

    /// Image this component runs. `node-clean` reuses the node image.
    pub fn image(&self) -> &'static str {
        match self {
            Component::Boot => "boot",
            Component::Node | Component::NodeClean => "node",
            Component::Keos => "keos",
        }
    }

    /// Whether the component starts from a wiped chain state.
    pub fn fresh_state(&self) -> bool {
        matches!(self, Component::NodeClean)
    }

    /// Deterministic container name for an environment, e.g. `dev_node_1`.
    pub fn container_name(&self, env: Environment) -> String {
        format!("{}_{}_1", env, self.as_str())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap())
}

/// Replace every character a Docker tag cannot carry with `_`.
///
/// Git tags like `release/1.2` are valid refs but invalid image tags.
pub fn sanitize_tag(tag: &str) -> String {
    tag_regex().replace_all(tag, "_").into_owned()
}

/// A token amount in base units, rendered with a fixed precision.
///
/// `Asset { amount: 10000, precision: 4, symbol: "RUSH" }` displays as
/// `1.0000 RUSH`. Precision 0 renders without a decimal point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub amount: u64,
    pub symbol: String,
    pub precision: u32,
}

impl Asset {
    pub fn new(amount: u64, symbol: impl Into<String>, precision: u32) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
            precision,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol);
        }
        let scale = 10u64.pow(self.precision);
        write!(
            f,
            "{}.{:0width$} {}",
            self.amount / scale,
            self.amount % scale,
            self.symbol,
            width = self.precision as usize
        )
    }
}

/// Key pair as reported by `cleos create key --to-console`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public: String,
    pub private: String,
}

impl KeyPair {
    /// Extract a key pair from the wallet client's console output.
    ///
    /// Expected shape:
    /// ```text
    /// Private key: 5K...
    /// Public key: EOS...
    /// ```
    pub fn parse_create_key(output: &str) -> Result<Self, DomainError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"Private key:\s*(\S+)\s*\nPublic key:\s*(\S+)").unwrap()
        });
        let caps = re
            .captures(output)
            .ok_or_else(|| DomainError::KeyOutputMismatch(output.to_string()))?;
        Ok(Self {
            private: caps[1].to_string(),
            public: caps[2].to_string(),
        })
    }
}

/// RAM quota for a staked account.
///
/// Config syntax: `"default"` (leave the chain default) or `"<n>kb"` / `"<n>mb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RamQuota {
    #[default]
    Default,
    Bytes(u64),
}

impl RamQuota {
    pub fn bytes(&self) -> Option<u64> {
        match self {
            RamQuota::Default => None,
            RamQuota::Bytes(n) => Some(*n),
        }
    }
}

impl FromStr for RamQuota {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            return Ok(RamQuota::Default);
        }
        let (size, multiplier) = if let Some(size) = s.strip_suffix("kb") {
            (size, 1024u64)
        } else if let Some(size) = s.strip_suffix("mb") {
            (size, 1024 * 1024)
        } else {
            return Err(DomainError::InvalidRamQuota(s.to_string()));
        };
        let size: u64 = size
            .parse()
            .map_err(|_| DomainError::InvalidRamQuota(s.to_string()))?;
        Ok(RamQuota::Bytes(size * multiplier))
    }
}

impl TryFrom<String> for RamQuota {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// NET/CPU bandwidth weight for a staked account.
///
/// Config syntax: `"default"` (weight 1) or a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandwidthWeight(pub u64);

impl Default for BandwidthWeight {
    fn default() -> Self {
        BandwidthWeight(1)
    }
}

impl<'de> Deserialize<'de> for BandwidthWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Value(u64),
            Keyword(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Value(n) if n >= 1 => Ok(BandwidthWeight(n)),
            Repr::Value(n) => Err(D::Error::custom(DomainError::InvalidBandwidthWeight(
                n.to_string(),
            ))),
            Repr::Keyword(s) if s == "default" => Ok(BandwidthWeight::default()),
            Repr::Keyword(s) => Err(D::Error::custom(DomainError::InvalidBandwidthWeight(s))),
        }
    }
}
