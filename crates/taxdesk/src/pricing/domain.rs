use serde::{Deserialize, Deserializer, Serialize};

/// Preparation effort tier, ordered from least to most involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl Complexity {
    pub const fn ordered() -> [Complexity; 4] {
        [
            Self::Simple,
            Self::Moderate,
            Self::Complex,
            Self::VeryComplex,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::VeryComplex => "very-complex",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    New,
    Returning,
    Vip,
    Enterprise,
}

impl ClientType {
    pub const fn ordered() -> [ClientType; 4] {
        [Self::New, Self::Returning, Self::Vip, Self::Enterprise]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Returning => "returning",
            Self::Vip => "vip",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoyaltyLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyLevel {
    pub const fn ordered() -> [LoyaltyLevel; 4] {
        [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Urban,
    Suburban,
    Rural,
}

impl Location {
    pub const fn ordered() -> [Location; 3] {
        [Self::Urban, Self::Suburban, Self::Rural]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urban => "urban",
            Self::Suburban => "suburban",
            Self::Rural => "rural",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Inbound quote parameters. Unrecognised tier names deserialize as `None`
/// so that they fall back to neutral pricing instead of rejecting the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_complexity",
        skip_serializing_if = "Option::is_none"
    )]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub is_rush: bool,
    #[serde(
        default,
        deserialize_with = "lenient_client_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_type: Option<ClientType>,
    #[serde(
        default,
        deserialize_with = "lenient_location",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_factor: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_loyalty_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub loyalty_level: Option<LoyaltyLevel>,
}

impl QuoteRequest {
    pub fn for_service(service_type: impl Into<String>) -> Self {
        Self {
            service_type: Some(service_type.into()),
            ..Self::default()
        }
    }

    pub fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    /// Seasonal multiplier actually applied; non-finite or negative input counts as absent.
    pub fn effective_seasonal_factor(&self) -> f64 {
        match self.seasonal_factor {
            Some(factor) if factor.is_finite() && factor >= 0.0 => factor,
            _ => 1.0,
        }
    }
}

fn lenient_tier<'de, D, T>(deserializer: D, parse: fn(&str) -> Option<T>) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse))
}

fn lenient_complexity<'de, D>(deserializer: D) -> Result<Option<Complexity>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_tier(deserializer, Complexity::parse)
}

fn lenient_client_type<'de, D>(deserializer: D) -> Result<Option<ClientType>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_tier(deserializer, ClientType::parse)
}

fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_tier(deserializer, Location::parse)
}

fn lenient_loyalty_level<'de, D>(deserializer: D) -> Result<Option<LoyaltyLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_tier(deserializer, LoyaltyLevel::parse)
}
