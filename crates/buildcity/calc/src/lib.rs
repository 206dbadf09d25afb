//! BuildCity calculators.
//!
//! Pure functions over plain inputs. Each calculator validates its input,
//! returns a serializable result and never touches storage; callers decide
//! what to persist (the weight calculator's daily target, for instance, is
//! saved as the calorie goal by the CLI).

mod error;

pub mod brick;
pub mod concrete;
pub mod electrical;
pub mod paint;
pub mod weight;

pub use brick::{BrickEstimate, BrickInput, BrickType};
pub use concrete::{ConcreteEstimate, ConcreteInput};
pub use electrical::{Appliance, ElectricalEstimate, ElectricalInput, SafetyFactor, Voltage};
pub use error::{CalcError, CalcResult};
pub use paint::{PaintEstimate, PaintInput};
pub use weight::{ActivityLevel, DeficitLevel, Sex, WeightInput, WeightPlan};

/// Reject negative and non-finite measurements.
pub(crate) fn non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput {
            field,
            reason: format!("must be a non-negative number, got {value}"),
        })
    }
}
