//! Records shared by the storage, domain and read sides.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PickupPointId, ProductId, ReceptionId};

/// A stored string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Cities a pickup point may be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Москва", alias = "Moscow")]
    Moscow,
    #[serde(rename = "Санкт-Петербург", alias = "Saint Petersburg")]
    SaintPetersburg,
    #[serde(rename = "Казань", alias = "Kazan")]
    Kazan,
}

impl City {
    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl FromStr for City {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Москва" | "Moscow" => Ok(City::Moscow),
            "Санкт-Петербург" | "Saint Petersburg" => Ok(City::SaintPetersburg),
            "Казань" | "Kazan" => Ok(City::Kazan),
            other => Err(ParseEnumError {
                kind: "city",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of goods that can be scanned into a reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "электроника", alias = "electronics")]
    Electronics,
    #[serde(rename = "одежда", alias = "clothes")]
    Clothes,
    #[serde(rename = "обувь", alias = "shoes")]
    Shoes,
}

impl ProductType {
    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothes => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl FromStr for ProductType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "электроника" | "electronics" => Ok(ProductType::Electronics),
            "одежда" | "clothes" => Ok(ProductType::Clothes),
            "обувь" | "shoes" => Ok(ProductType::Shoes),
            other => Err(ParseEnumError {
                kind: "product type",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of a reception in its lifecycle.
///
/// ```text
/// InProgress ──close──► Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatus {
    /// Products may be scanned in and removed.
    #[default]
    InProgress,

    /// The batch is finished (terminal state).
    Closed,
}

impl ReceptionStatus {
    /// Returns true if products can be added or removed in this state.
    pub fn can_modify_products(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }

    /// Returns true if the reception can be closed in this state.
    pub fn can_close(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReceptionStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "closed",
        }
    }
}

impl FromStr for ReceptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "closed" => Ok(ReceptionStatus::Closed),
            other => Err(ParseEnumError {
                kind: "reception status",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical location that receives shipped goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    pub id: PickupPointId,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

/// A batch of scanned goods at a pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: ReceptionId,
    pub date_time: DateTime<Utc>,
    pub pvz_id: PickupPointId,
    pub status: ReceptionStatus,
}

/// A single scanned item owned by a reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub reception_id: ReceptionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_in_progress() {
        assert_eq!(ReceptionStatus::default(), ReceptionStatus::InProgress);
    }

    #[test]
    fn only_in_progress_accepts_changes() {
        assert!(ReceptionStatus::InProgress.can_modify_products());
        assert!(ReceptionStatus::InProgress.can_close());
        assert!(!ReceptionStatus::Closed.can_modify_products());
        assert!(!ReceptionStatus::Closed.can_close());
        assert!(ReceptionStatus::Closed.is_terminal());
        assert!(!ReceptionStatus::InProgress.is_terminal());
    }

    #[test]
    fn status_parses_its_stored_form() {
        for status in [ReceptionStatus::InProgress, ReceptionStatus::Closed] {
            assert_eq!(status.as_str().parse::<ReceptionStatus>(), Ok(status));
        }
        assert!("open".parse::<ReceptionStatus>().is_err());
    }

    #[test]
    fn city_accepts_english_alias() {
        assert_eq!("Kazan".parse::<City>(), Ok(City::Kazan));
        assert_eq!("Казань".parse::<City>(), Ok(City::Kazan));
        let city: City = serde_json::from_str("\"Kazan\"").unwrap();
        assert_eq!(city, City::Kazan);
        assert_eq!(serde_json::to_string(&city).unwrap(), "\"Казань\"");
    }

    #[test]
    fn unknown_city_is_rejected() {
        let err = "Paris".parse::<City>().unwrap_err();
        assert_eq!(err.kind, "city");
        assert_eq!(err.to_string(), "unknown city: Paris");
    }

    #[test]
    fn product_type_wire_name() {
        let product = Product {
            id: ProductId::new(),
            date_time: Utc::now(),
            product_type: ProductType::Shoes,
            reception_id: ReceptionId::new(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "обувь");
        assert!(json.get("receptionId").is_some());
    }
}
