use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CalcError, CalcResult};

pub const DEFAULT_COATS: f64 = 2.0;
pub const DEFAULT_COVERAGE_M2_PER_L: f64 = 10.0;

/// Areas in square metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintInput {
    pub wall_area_m2: f64,
    pub door_area_m2: f64,
    pub coats: f64,
    pub coverage_m2_per_l: f64,
    pub price_per_l: f64,
}

impl Default for PaintInput {
    fn default() -> Self {
        Self {
            wall_area_m2: 0.0,
            door_area_m2: 0.0,
            coats: DEFAULT_COATS,
            coverage_m2_per_l: DEFAULT_COVERAGE_M2_PER_L,
            price_per_l: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintEstimate {
    pub paintable_area_m2: f64,
    /// Rounded up to the next 0.1 L
    pub litres: f64,
    /// Priced on the unrounded volume
    pub total_cost: f64,
}

impl PaintInput {
    pub fn estimate(&self) -> CalcResult<PaintEstimate> {
        let wall = non_negative("wall area", self.wall_area_m2)?;
        let doors = non_negative("door area", self.door_area_m2)?;
        let coats = non_negative("coats", self.coats)?;
        let coverage = non_negative("coverage", self.coverage_m2_per_l)?;
        let price = non_negative("price per litre", self.price_per_l)?;
        if coverage == 0.0 {
            return Err(CalcError::InvalidInput {
                field: "coverage",
                reason: "must be greater than zero".into(),
            });
        }

        let area = (wall - doors).max(0.0);
        let litres = area * coats / coverage;
        let estimate = PaintEstimate {
            paintable_area_m2: area,
            litres: ceil_tenth(litres),
            total_cost: litres * price,
        };
        debug!(area_m2 = area, litres = estimate.litres, "Paint estimated");
        Ok(estimate)
    }
}

fn ceil_tenth(value: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    // absorb representation error so 9.2 stays 9.2
    ((value * 10.0) - 1e-9).ceil() / 10.0
}
