//! Weight-loss calorie target.
//!
//! Basal metabolic rate uses the Mifflin-St Jeor equation, scaled by an
//! activity multiplier to daily expenditure and reduced by a fixed deficit.
//! Time to target assumes 7700 kcal per kilogram of body fat.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CalcError, CalcResult};

pub const KCAL_PER_KG_FAT: f64 = 7700.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(CalcError::UnknownOption {
                kind: "sex",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Sedentary lifestyle
    Minimal,
    /// 1-3 workouts per week
    #[default]
    Light,
    /// 3-5 workouts per week
    Moderate,
    /// 6-7 workouts per week
    High,
    /// Hard training twice a day
    VeryHigh,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Minimal => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::High => 1.725,
            Self::VeryHigh => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "minimal" | "1.2" => Ok(Self::Minimal),
            "light" | "1.375" => Ok(Self::Light),
            "moderate" | "1.55" => Ok(Self::Moderate),
            "high" | "1.725" => Ok(Self::High),
            "very_high" | "1.9" => Ok(Self::VeryHigh),
            other => Err(CalcError::UnknownOption {
                kind: "activity level",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficitLevel {
    Light,
    #[default]
    Moderate,
    Aggressive,
}

impl DeficitLevel {
    /// Daily deficit in kcal.
    pub fn kcal(self) -> u32 {
        match self {
            Self::Light => 250,
            Self::Moderate => 500,
            Self::Aggressive => 750,
        }
    }
}

impl fmt::Display for DeficitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{} kcal/day", self.kcal())
    }
}

impl FromStr for DeficitLevel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(CalcError::UnknownOption {
                kind: "deficit level",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightInput {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub current_kg: f64,
    pub target_kg: f64,
    pub activity: ActivityLevel,
    pub deficit: DeficitLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightPlan {
    pub bmr: f64,
    pub tdee: f64,
    /// Intake target, whole kcal
    pub daily_calories: u32,
    pub estimated_weeks: u32,
    pub estimated_months: u32,
}

impl WeightInput {
    /// Mifflin-St Jeor basal metabolic rate in kcal/day.
    pub fn bmr(&self) -> f64 {
        let base = 10.0 * self.current_kg + 6.25 * self.height_cm - 5.0 * f64::from(self.age_years);
        match self.sex {
            Sex::Male => base + 5.0,
            Sex::Female => base - 161.0,
        }
    }

    pub fn plan(&self) -> CalcResult<WeightPlan> {
        self.validate()?;

        let bmr = self.bmr();
        let tdee = bmr * self.activity.multiplier();
        let deficit = f64::from(self.deficit.kcal());
        let daily = (tdee - deficit).round();
        if daily <= 0.0 {
            return Err(CalcError::InvalidInput {
                field: "deficit",
                reason: format!("leaves no intake ({daily} kcal/day)"),
            });
        }

        let days = (self.current_kg - self.target_kg) * KCAL_PER_KG_FAT / deficit;
        let estimated_weeks = (days / 7.0).ceil() as u32;
        let estimated_months = estimated_weeks.div_ceil(4);
        debug!(bmr, tdee, daily_calories = daily, estimated_weeks, "Weight plan computed");

        Ok(WeightPlan {
            bmr,
            tdee,
            daily_calories: daily as u32,
            estimated_weeks,
            estimated_months,
        })
    }

    fn validate(&self) -> CalcResult<()> {
        in_range("age", f64::from(self.age_years), 10.0, 100.0)?;
        in_range("height", self.height_cm, 100.0, 250.0)?;
        in_range("current weight", self.current_kg, 30.0, 300.0)?;
        in_range("target weight", self.target_kg, 30.0, 300.0)?;
        if self.target_kg >= self.current_kg {
            return Err(CalcError::TargetNotBelowCurrent);
        }
        Ok(())
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> CalcResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalcError::InvalidInput {
            field,
            reason: format!("must be between {min} and {max}, got {value}"),
        })
    }
}
