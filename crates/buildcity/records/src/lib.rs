//! BuildCity records.
//!
//! Typed CRUD over the string key-value store. Every collection is one JSON
//! document under a fixed key (see [`buildcity_store::keys`]); field names
//! stay camelCase so data written by earlier app versions still loads.
//!
//! Unreadable JSON never fails a read: lists come back empty and scalar
//! settings fall back to their defaults, with a warning logged.

mod error;
mod json;
pub mod nutrition;
pub mod onboarding;
pub mod projects;
pub mod settings;

pub use error::{RecordsError, RecordsResult};
pub use nutrition::{
    CalorieGoal, DayMeals, Meal, MealSource, MealUpdate, NewMeal, NutritionStore,
    DEFAULT_CALORIE_GOAL,
};
pub use onboarding::{InstallTracker, Onboarding};
pub use projects::{Material, NewProject, Project, ProjectStatus, ProjectStore, MAX_MEDIA_IMAGES};
pub use settings::{Settings, DEFAULT_USERNAME};
