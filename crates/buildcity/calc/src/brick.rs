use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CalcError, CalcResult};

pub const DEFAULT_WASTE_PERCENT: f64 = 10.0;

/// Brick sizes sold in the app's market, by exposed face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickType {
    Small,
    #[default]
    Standard,
    Big,
}

impl BrickType {
    /// Face length × height in cm.
    pub fn face_cm(self) -> (f64, f64) {
        match self {
            Self::Small => (20.0, 6.5),
            Self::Standard => (21.5, 6.5),
            Self::Big => (20.0, 9.9),
        }
    }

    pub fn face_area_cm2(self) -> f64 {
        let (length, height) = self.face_cm();
        length * height
    }
}

impl fmt::Display for BrickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Standard => "standard",
            Self::Big => "big",
        };
        f.write_str(name)
    }
}

impl FromStr for BrickType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "standard" => Ok(Self::Standard),
            "big" => Ok(Self::Big),
            other => Err(CalcError::UnknownOption {
                kind: "brick type",
                value: other.to_string(),
            }),
        }
    }
}

/// Wall dimensions in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrickInput {
    pub wall_length_cm: f64,
    pub wall_height_cm: f64,
    pub brick: BrickType,
    pub waste_percent: f64,
    pub price_per_brick: f64,
}

impl Default for BrickInput {
    fn default() -> Self {
        Self {
            wall_length_cm: 0.0,
            wall_height_cm: 0.0,
            brick: BrickType::default(),
            waste_percent: DEFAULT_WASTE_PERCENT,
            price_per_brick: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrickEstimate {
    pub bricks: u64,
    pub total_cost: f64,
}

impl BrickInput {
    pub fn estimate(&self) -> CalcResult<BrickEstimate> {
        let length = non_negative("wall length", self.wall_length_cm)?;
        let height = non_negative("wall height", self.wall_height_cm)?;
        let waste = non_negative("waste percentage", self.waste_percent)?;
        let price = non_negative("price per brick", self.price_per_brick)?;

        let wall_area = length * height;
        let bricks = (wall_area / self.brick.face_area_cm2() * (1.0 + waste / 100.0)).ceil() as u64;
        debug!(brick = %self.brick, bricks, "Bricks estimated");
        Ok(BrickEstimate {
            bricks,
            total_cost: bricks as f64 * price,
        })
    }
}
