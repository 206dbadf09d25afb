use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{non_negative, CalcError, CalcResult};

pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Supply voltage. Shown alongside the result; it does not change the load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voltage {
    #[serde(rename = "120V")]
    V120,
    #[default]
    #[serde(rename = "240V")]
    V240,
    #[serde(rename = "415V")]
    V415,
}

impl Voltage {
    pub fn volts(self) -> u32 {
        match self {
            Self::V120 => 120,
            Self::V240 => 240,
            Self::V415 => 415,
        }
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}V", self.volts())
    }
}

impl FromStr for Voltage {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['V', 'v']);
        match digits {
            "120" => Ok(Self::V120),
            "240" => Ok(Self::V240),
            "415" => Ok(Self::V415),
            _ => Err(CalcError::UnknownOption {
                kind: "voltage",
                value: s.to_string(),
            }),
        }
    }
}

/// Headroom multiplier applied to the summed load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyFactor {
    None,
    #[default]
    Standard,
    High,
}

impl SafetyFactor {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Standard => 1.25,
            Self::High => 1.5,
        }
    }
}

impl fmt::Display for SafetyFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.multiplier())
    }
}

impl FromStr for SafetyFactor {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.0" | "none" => Ok(Self::None),
            "1.25" | "standard" => Ok(Self::Standard),
            "1.5" | "1.50" | "high" => Ok(Self::High),
            other => Err(CalcError::UnknownOption {
                kind: "safety factor",
                value: other.to_string(),
            }),
        }
    }
}

/// One kind of load, `amount` units of `power_w` each.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub power_w: f64,
    pub amount: f64,
}

impl Appliance {
    pub fn new(power_w: f64, amount: f64) -> Self {
        Self { power_w, amount }
    }
}

impl FromStr for Appliance {
    type Err = CalcError;

    /// `POWER` or `POWERxAMOUNT`, e.g. `1500x2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalcError::InvalidInput {
            field: "appliance",
            reason: format!("expected POWER or POWERxAMOUNT, got {s:?}"),
        };
        let (power, amount) = match s.trim().split_once(['x', 'X', '*']) {
            Some((power, amount)) => (power, amount.trim().parse().map_err(|_| invalid())?),
            None => (s, 1.0),
        };
        let power = power.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(power, amount))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectricalInput {
    pub appliances: Vec<Appliance>,
    pub hours_per_day: f64,
    pub safety: SafetyFactor,
    pub voltage: Voltage,
    pub price_per_kwh: f64,
}

impl Default for ElectricalInput {
    fn default() -> Self {
        Self {
            appliances: Vec::new(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            safety: SafetyFactor::default(),
            voltage: Voltage::default(),
            price_per_kwh: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectricalEstimate {
    /// Summed load including the safety factor
    pub total_power_w: f64,
    pub voltage: Voltage,
    pub daily_kwh: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
}

impl ElectricalInput {
    pub fn estimate(&self) -> CalcResult<ElectricalEstimate> {
        let hours = non_negative("hours per day", self.hours_per_day)?;
        if hours > 24.0 {
            return Err(CalcError::InvalidInput {
                field: "hours per day",
                reason: format!("a day has 24 hours, got {hours}"),
            });
        }
        let price = non_negative("price per kWh", self.price_per_kwh)?;

        let mut load = 0.0;
        for appliance in &self.appliances {
            load += non_negative("appliance power", appliance.power_w)?
                * non_negative("appliance amount", appliance.amount)?;
        }

        let total_power_w = load * self.safety.multiplier();
        let daily_kwh = total_power_w * hours / 1000.0;
        let daily_cost = daily_kwh * price;
        debug!(
            appliances = self.appliances.len(),
            total_power_w,
            voltage = %self.voltage,
            "Electrical load estimated"
        );
        Ok(ElectricalEstimate {
            total_power_w,
            voltage: self.voltage,
            daily_kwh,
            daily_cost,
            monthly_cost: daily_cost * DAYS_PER_MONTH,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn load_with_default_safety_factor() {
        let estimate = ElectricalInput {
            appliances: vec![Appliance::new(1000.0, 2.0), Appliance::new(500.0, 1.0)],
            price_per_kwh: 0.2,
            ..Default::default()
        }
        .estimate()
        .unwrap();

        assert!(close(estimate.total_power_w, 3125.0));
        assert!(close(estimate.daily_kwh, 25.0));
        assert!(close(estimate.daily_cost, 5.0));
        assert!(close(estimate.monthly_cost, 150.0));
        assert_eq!(estimate.voltage, Voltage::V240);
    }

    #[test]
    fn voltage_does_not_change_the_load() {
        let base = ElectricalInput {
            appliances: vec![Appliance::new(2000.0, 1.0)],
            safety: SafetyFactor::None,
            ..Default::default()
        };
        let high_voltage = ElectricalInput {
            voltage: Voltage::V415,
            ..base.clone()
        };

        assert_eq!(
            base.estimate().unwrap().total_power_w,
            high_voltage.estimate().unwrap().total_power_w
        );
    }

    #[test]
    fn parses_cli_forms() {
        assert_eq!("1500x2".parse::<Appliance>().unwrap(), Appliance::new(1500.0, 2.0));
        assert_eq!("60".parse::<Appliance>().unwrap(), Appliance::new(60.0, 1.0));
        assert!("lamp".parse::<Appliance>().is_err());
        assert_eq!("415V".parse::<Voltage>().unwrap(), Voltage::V415);
        assert_eq!("1.5".parse::<SafetyFactor>().unwrap(), SafetyFactor::High);
        assert!("2".parse::<SafetyFactor>().is_err());
    }

    #[test]
    fn no_appliances_costs_nothing() {
        let estimate = ElectricalInput {
            price_per_kwh: 0.3,
            ..Default::default()
        }
        .estimate()
        .unwrap();
        assert_eq!(estimate.total_power_w, 0.0);
        assert_eq!(estimate.monthly_cost, 0.0);
    }
}
