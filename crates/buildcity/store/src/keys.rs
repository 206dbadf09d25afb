//! Keys persisted by the app.
//!
//! Each key has exactly one writer; see the owning crate noted per key.

/// Gate redirect cache. Written only by the gate resolver.
pub const CACHED_GATE_URL: &str = "cached_gate_url";

/// Onboarding completion flag (value `"true"`). Written by onboarding.
pub const HAS_SEEN_ONBOARDING: &str = "has_seen_onboarding";

/// First-launch marker (value `"true"`).
pub const APP_INSTALL_TRACKED: &str = "app_install_tracked";

/// JSON array of meals.
pub const NUTRITION_MEALS: &str = "nutrition_meals";

/// JSON calorie goal.
pub const NUTRITION_CALORIE_GOAL: &str = "nutrition_calorie_goal";

/// JSON array of construction projects.
pub const PROJECTS: &str = "builder_city_projects";

/// Display name.
pub const USERNAME: &str = "builder_city_username";

/// Truthy value written for boolean flags.
pub const FLAG_TRUE: &str = "true";
