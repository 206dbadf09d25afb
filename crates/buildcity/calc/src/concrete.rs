use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CalcResult};

/// Volume one bag of mix fills.
pub const BAG_VOLUME_M3: f64 = 0.01;

const CM3_PER_BAG: f64 = BAG_VOLUME_M3 * 1_000_000.0;

/// Slab dimensions in centimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcreteInput {
    pub length_cm: f64,
    pub width_cm: f64,
    pub depth_cm: f64,
    pub price_per_bag: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConcreteEstimate {
    pub volume_m3: f64,
    pub bags: u64,
    pub total_cost: f64,
}

impl ConcreteInput {
    pub fn estimate(&self) -> CalcResult<ConcreteEstimate> {
        let length = non_negative("length", self.length_cm)?;
        let width = non_negative("width", self.width_cm)?;
        let depth = non_negative("depth", self.depth_cm)?;
        let price = non_negative("price per bag", self.price_per_bag)?;

        let volume_cm3 = length * width * depth;
        // bag count is taken from cm³ so whole-bag volumes don't round up
        let bags = (volume_cm3 / CM3_PER_BAG).ceil() as u64;
        let estimate = ConcreteEstimate {
            volume_m3: volume_cm3 / 1_000_000.0,
            bags,
            total_cost: bags as f64 * price,
        };
        debug!(volume_m3 = estimate.volume_m3, bags, "Concrete estimated");
        Ok(estimate)
    }
}
