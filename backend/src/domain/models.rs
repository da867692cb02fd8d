use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of gear a pro can be tracked with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EquipmentType {
    Paddle,
    Shoe,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 2] = [EquipmentType::Paddle, EquipmentType::Shoe];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Paddle => "PADDLE",
            EquipmentType::Shoe => "SHOE",
        }
    }
}

impl FromStr for EquipmentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PADDLE" => Ok(EquipmentType::Paddle),
            "SHOE" => Ok(EquipmentType::Shoe),
            other => bail!("Unknown equipment type: {}", other),
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tournament tier, drives the points multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TournamentTier {
    Major,
    Ppa,
    Mlp,
    App,
    Other,
}

impl TournamentTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentTier::Major => "MAJOR",
            TournamentTier::Ppa => "PPA",
            TournamentTier::Mlp => "MLP",
            TournamentTier::App => "APP",
            TournamentTier::Other => "OTHER",
        }
    }
}

impl FromStr for TournamentTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MAJOR" => Ok(TournamentTier::Major),
            "PPA" => Ok(TournamentTier::Ppa),
            "MLP" => Ok(TournamentTier::Mlp),
            "APP" => Ok(TournamentTier::App),
            "OTHER" => Ok(TournamentTier::Other),
            other => bail!("Unknown tournament tier: {}", other),
        }
    }
}

/// Retailers we hold affiliate agreements with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Selkirk,
    JustPaddles,
    PickleballSuperstore,
    Amazon,
}

impl Retailer {
    pub const ALL: [Retailer; 4] = [
        Retailer::Selkirk,
        Retailer::JustPaddles,
        Retailer::PickleballSuperstore,
        Retailer::Amazon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Retailer::Selkirk => "selkirk",
            Retailer::JustPaddles => "justpaddles",
            Retailer::PickleballSuperstore => "pickleballsuperstore",
            Retailer::Amazon => "amazon",
        }
    }
}

impl FromStr for Retailer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Retailer::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown retailer: {}", s))
    }
}

// --- Equipment specs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreMaterial {
    Polymer,
    Nomex,
    Aluminum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceMaterial {
    Carbon,
    Fiberglass,
    Graphite,
    Composite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtType {
    Indoor,
    Outdoor,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleSpecs {
    pub weight: f64,
    pub grip_size: f64,
    pub length: f64,
    pub width: f64,
    pub core_material: CoreMaterial,
    pub surface_material: SurfaceMaterial,
    pub core_thickness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing_weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoeSpecs {
    pub weight: f64,
    pub drop_height: f64,
    pub court_type: CourtType,
}

/// Type-specific specs; the variant always agrees with the owning
/// equipment's `EquipmentType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EquipmentSpecs {
    Paddle(PaddleSpecs),
    Shoe(ShoeSpecs),
}

impl EquipmentSpecs {
    /// Interpret a raw JSON spec blob according to the equipment type
    pub fn from_json(kind: EquipmentType, value: Value) -> serde_json::Result<Self> {
        match kind {
            EquipmentType::Paddle => serde_json::from_value(value).map(EquipmentSpecs::Paddle),
            EquipmentType::Shoe => serde_json::from_value(value).map(EquipmentSpecs::Shoe),
        }
    }

    pub fn kind(&self) -> EquipmentType {
        match self {
            EquipmentSpecs::Paddle(_) => EquipmentType::Paddle,
            EquipmentSpecs::Shoe(_) => EquipmentType::Shoe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_specs_follow_equipment_type() {
        let raw = json!({
            "weight": 8.2,
            "gripSize": 4.125,
            "length": 16.5,
            "width": 7.5,
            "coreMaterial": "polymer",
            "surfaceMaterial": "carbon",
            "coreThickness": 16
        });

        let specs = EquipmentSpecs::from_json(EquipmentType::Paddle, raw.clone()).unwrap();
        assert_eq!(specs.kind(), EquipmentType::Paddle);

        // Paddle fields never satisfy the shoe schema
        assert!(EquipmentSpecs::from_json(EquipmentType::Shoe, raw).is_err());
    }

    #[test]
    fn test_specs_serialize_without_tag() {
        let specs = EquipmentSpecs::Shoe(ShoeSpecs {
            weight: 340.0,
            drop_height: 9.0,
            court_type: CourtType::Both,
        });

        let value = serde_json::to_value(&specs).unwrap();
        assert_eq!(value, json!({"weight": 340.0, "dropHeight": 9.0, "courtType": "both"}));
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("paddle".parse::<EquipmentType>().unwrap(), EquipmentType::Paddle);
        assert_eq!("Major".parse::<TournamentTier>().unwrap(), TournamentTier::Major);
        assert!("racket".parse::<EquipmentType>().is_err());
        assert_eq!("amazon".parse::<Retailer>().unwrap(), Retailer::Amazon);
    }
}
