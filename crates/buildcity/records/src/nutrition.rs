//! Meal log and daily calorie goal.

use std::collections::BTreeMap;
use std::sync::Arc;

use buildcity_store::{keys, KeyValueStore};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::json;
use crate::{RecordsError, RecordsResult};

/// Goal used until the user sets one.
pub const DEFAULT_CALORIE_GOAL: u32 = 2000;

/// How a meal entered the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSource {
    Manual,
    Ai,
}

/// One logged meal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub calories: u32,
    /// ISO date or date-time; the calendar day is the part before `T`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_by: MealSource,
}

impl Meal {
    /// `YYYY-MM-DD` part of [`Meal::date`].
    pub fn day(&self) -> &str {
        day_of(&self.date)
    }
}

/// A meal before it has an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub name: String,
    pub calories: u32,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub added_by: MealSource,
}

impl NewMeal {
    /// Meal eaten at `at`.
    pub fn at(
        name: impl Into<String>,
        calories: u32,
        added_by: MealSource,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            calories,
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            time: at.format("%H:%M").to_string(),
            image_uri: None,
            notes: None,
            added_by,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    fn validate(&self) -> RecordsResult<()> {
        if self.name.trim().is_empty() {
            return Err(RecordsError::InvalidInput("meal name must not be empty".into()));
        }
        validate_date(&self.date)?;
        validate_time(&self.time)
    }
}

/// Partial update; `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub calories: Option<u32>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

/// Stored calorie goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieGoal {
    pub daily_goal: u32,
    pub updated_at: DateTime<Utc>,
}

/// Meals of one calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMeals {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Latest first
    pub meals: Vec<Meal>,
    pub total_calories: u64,
}

/// Meal and calorie-goal storage.
#[derive(Clone)]
pub struct NutritionStore {
    store: Arc<dyn KeyValueStore>,
}

impl NutritionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn all_meals(&self) -> RecordsResult<Vec<Meal>> {
        json::load_list(self.store.as_ref(), keys::NUTRITION_MEALS).await
    }

    /// Meals whose calendar day matches the day part of `date`.
    pub async fn meals_by_date(&self, date: &str) -> RecordsResult<Vec<Meal>> {
        let day = day_of(date);
        Ok(self
            .all_meals()
            .await?
            .into_iter()
            .filter(|meal| meal.day() == day)
            .collect())
    }

    /// One entry per day for the last `days` days ending at `today`, newest
    /// day first. Days without meals are present with a zero total.
    pub async fn meals_grouped_by_date(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> RecordsResult<Vec<DayMeals>> {
        let mut grouped: BTreeMap<String, Vec<Meal>> = (0..days)
            .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
            .map(|day| (day.format("%Y-%m-%d").to_string(), Vec::new()))
            .collect();

        for meal in self.all_meals().await? {
            if let Some(bucket) = grouped.get_mut(meal.day()) {
                bucket.push(meal);
            }
        }

        Ok(grouped
            .into_iter()
            .rev()
            .map(|(date, mut meals)| {
                meals.sort_by(|a, b| b.time.cmp(&a.time));
                let total_calories = meals.iter().map(|m| u64::from(m.calories)).sum();
                DayMeals {
                    date,
                    meals,
                    total_calories,
                }
            })
            .collect())
    }

    pub async fn add_meal(&self, meal: NewMeal) -> RecordsResult<Meal> {
        meal.validate()?;
        let mut meals = self.all_meals().await?;
        let meal = Meal {
            id: json::new_id(),
            name: meal.name.trim().to_string(),
            calories: meal.calories,
            date: meal.date,
            time: meal.time,
            image_uri: meal.image_uri,
            notes: meal.notes,
            added_by: meal.added_by,
        };
        meals.push(meal.clone());
        json::save(self.store.as_ref(), keys::NUTRITION_MEALS, &meals).await?;
        info!(meal_id = %meal.id, calories = meal.calories, "Meal added");
        Ok(meal)
    }

    pub async fn get_meal(&self, id: &str) -> RecordsResult<Option<Meal>> {
        Ok(self.all_meals().await?.into_iter().find(|m| m.id == id))
    }

    /// Apply `update` to meal `id`. Returns false when no such meal exists.
    pub async fn update_meal(&self, id: &str, update: MealUpdate) -> RecordsResult<bool> {
        if let Some(date) = &update.date {
            validate_date(date)?;
        }
        if let Some(time) = &update.time {
            validate_time(time)?;
        }

        let mut meals = self.all_meals().await?;
        let Some(meal) = meals.iter_mut().find(|m| m.id == id) else {
            debug!(meal_id = id, "Update for unknown meal ignored");
            return Ok(false);
        };

        if let Some(name) = update.name {
            meal.name = name;
        }
        if let Some(calories) = update.calories {
            meal.calories = calories;
        }
        if let Some(date) = update.date {
            meal.date = date;
        }
        if let Some(time) = update.time {
            meal.time = time;
        }
        if let Some(uri) = update.image_uri {
            meal.image_uri = Some(uri);
        }
        if let Some(notes) = update.notes {
            meal.notes = Some(notes);
        }

        json::save(self.store.as_ref(), keys::NUTRITION_MEALS, &meals).await?;
        Ok(true)
    }

    /// Returns false when no such meal exists.
    pub async fn delete_meal(&self, id: &str) -> RecordsResult<bool> {
        let mut meals = self.all_meals().await?;
        let before = meals.len();
        meals.retain(|m| m.id != id);
        if meals.len() == before {
            return Ok(false);
        }
        json::save(self.store.as_ref(), keys::NUTRITION_MEALS, &meals).await?;
        info!(meal_id = id, "Meal deleted");
        Ok(true)
    }

    pub async fn calorie_goal(&self) -> RecordsResult<u32> {
        let goal: Option<CalorieGoal> =
            json::load(self.store.as_ref(), keys::NUTRITION_CALORIE_GOAL).await?;
        Ok(goal.map_or(DEFAULT_CALORIE_GOAL, |g| g.daily_goal))
    }

    pub async fn set_calorie_goal(&self, daily_goal: u32) -> RecordsResult<CalorieGoal> {
        if daily_goal == 0 {
            return Err(RecordsError::InvalidInput(
                "daily calorie goal must be positive".into(),
            ));
        }
        let goal = CalorieGoal {
            daily_goal,
            updated_at: Utc::now(),
        };
        json::save(self.store.as_ref(), keys::NUTRITION_CALORIE_GOAL, &goal).await?;
        info!(daily_goal, "Calorie goal updated");
        Ok(goal)
    }

    /// Summed as `u64` so no number of accepted meals can overflow.
    pub async fn today_calories(&self, today: NaiveDate) -> RecordsResult<u64> {
        let day = today.format("%Y-%m-%d").to_string();
        Ok(self
            .meals_by_date(&day)
            .await?
            .iter()
            .map(|m| u64::from(m.calories))
            .sum())
    }

    /// Drop meals and the calorie goal.
    pub async fn clear(&self) -> RecordsResult<()> {
        self.store
            .multi_remove(&[keys::NUTRITION_MEALS, keys::NUTRITION_CALORIE_GOAL])
            .await?;
        Ok(())
    }
}

fn day_of(date: &str) -> &str {
    date.split_once('T').map_or(date, |(day, _)| day)
}

fn validate_date(date: &str) -> RecordsResult<()> {
    NaiveDate::parse_from_str(day_of(date), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| RecordsError::InvalidInput(format!("invalid meal date: {date}")))
}

fn validate_time(time: &str) -> RecordsResult<()> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| RecordsError::InvalidInput(format!("invalid meal time: {time}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildcity_store::InMemoryStore;
    use chrono::TimeZone;

    fn store() -> (Arc<InMemoryStore>, NutritionStore) {
        let kv = Arc::new(InMemoryStore::new());
        (kv.clone(), NutritionStore::new(kv))
    }

    fn meal_on(day: &str, time: &str, calories: u32) -> NewMeal {
        NewMeal {
            name: format!("meal {time}"),
            calories,
            date: format!("{day}T{time}:00.000Z"),
            time: time.to_string(),
            image_uri: None,
            notes: None,
            added_by: MealSource::Manual,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn add_and_filter_by_date() {
        let (_, nutrition) = store();
        nutrition.add_meal(meal_on("2024-05-01", "08:15", 350)).await.unwrap();
        nutrition.add_meal(meal_on("2024-05-01", "13:00", 700)).await.unwrap();
        nutrition.add_meal(meal_on("2024-05-02", "09:00", 400)).await.unwrap();

        let first = nutrition.meals_by_date("2024-05-01T23:59:00Z").await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(nutrition.today_calories(day("2024-05-01")).await.unwrap(), 1050);
        assert_eq!(nutrition.today_calories(day("2024-05-03")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn huge_calorie_entries_do_not_overflow_totals() {
        let (_, nutrition) = store();
        nutrition
            .add_meal(meal_on("2024-05-01", "08:00", 3_000_000_000))
            .await
            .unwrap();
        nutrition
            .add_meal(meal_on("2024-05-01", "09:00", 3_000_000_000))
            .await
            .unwrap();

        assert_eq!(
            nutrition.today_calories(day("2024-05-01")).await.unwrap(),
            6_000_000_000
        );
        let grouped = nutrition
            .meals_grouped_by_date(1, day("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(grouped[0].total_calories, 6_000_000_000);
    }

    #[tokio::test]
    async fn grouping_covers_exactly_n_days_newest_first() {
        let (_, nutrition) = store();
        nutrition.add_meal(meal_on("2024-05-07", "08:00", 300)).await.unwrap();
        nutrition.add_meal(meal_on("2024-05-07", "19:30", 800)).await.unwrap();
        nutrition.add_meal(meal_on("2024-05-05", "12:00", 500)).await.unwrap();
        // outside the window
        nutrition.add_meal(meal_on("2024-04-01", "12:00", 900)).await.unwrap();

        let grouped = nutrition
            .meals_grouped_by_date(3, day("2024-05-07"))
            .await
            .unwrap();

        let dates: Vec<_> = grouped.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-07", "2024-05-06", "2024-05-05"]);
        assert_eq!(grouped[0].total_calories, 1100);
        assert_eq!(grouped[0].meals[0].time, "19:30");
        assert!(grouped[1].meals.is_empty());
        assert_eq!(grouped[2].total_calories, 500);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let (_, nutrition) = store();
        let meal = nutrition.add_meal(meal_on("2024-05-01", "08:15", 350)).await.unwrap();

        let updated = nutrition
            .update_meal(
                &meal.id,
                MealUpdate {
                    calories: Some(420),
                    notes: Some("extra toast".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated);

        let stored = nutrition.get_meal(&meal.id).await.unwrap().unwrap();
        assert_eq!(stored.calories, 420);
        assert_eq!(stored.notes.as_deref(), Some("extra toast"));

        assert!(!nutrition.update_meal("nope", MealUpdate::default()).await.unwrap());
        assert!(nutrition.delete_meal(&meal.id).await.unwrap());
        assert!(!nutrition.delete_meal(&meal.id).await.unwrap());
        assert!(nutrition.all_meals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_meals_read_as_empty() {
        let (kv, nutrition) = store();
        kv.set(keys::NUTRITION_MEALS, "[{broken").await.unwrap();

        assert!(nutrition.all_meals().await.unwrap().is_empty());
        let grouped = nutrition
            .meals_grouped_by_date(7, day("2024-05-07"))
            .await
            .unwrap();
        assert_eq!(grouped.len(), 7);
    }

    #[tokio::test]
    async fn reads_records_written_by_the_app() {
        let (kv, nutrition) = store();
        kv.set(
            keys::NUTRITION_MEALS,
            r#"[{"id":"17150000001abc","name":"Oatmeal","calories":320,"date":"2024-05-01T07:30:00.000Z","time":"07:30","addedBy":"ai","imageUri":"file:///oat.jpg"}]"#,
        )
        .await
        .unwrap();

        let meals = nutrition.all_meals().await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].added_by, MealSource::Ai);
        assert_eq!(meals[0].day(), "2024-05-01");
    }

    #[tokio::test]
    async fn calorie_goal_defaults_and_persists() {
        let (kv, nutrition) = store();
        assert_eq!(nutrition.calorie_goal().await.unwrap(), DEFAULT_CALORIE_GOAL);

        nutrition.set_calorie_goal(1850).await.unwrap();
        assert_eq!(nutrition.calorie_goal().await.unwrap(), 1850);

        kv.set(keys::NUTRITION_CALORIE_GOAL, "not json").await.unwrap();
        assert_eq!(nutrition.calorie_goal().await.unwrap(), DEFAULT_CALORIE_GOAL);

        assert!(nutrition.set_calorie_goal(0).await.is_err());
    }

    #[tokio::test]
    async fn invalid_meals_are_rejected() {
        let (_, nutrition) = store();
        let mut meal = meal_on("2024-05-01", "08:15", 350);
        meal.time = "8am".into();
        assert!(matches!(
            nutrition.add_meal(meal).await,
            Err(RecordsError::InvalidInput(_))
        ));

        let blank = NewMeal {
            name: "  ".into(),
            ..meal_on("2024-05-01", "08:15", 350)
        };
        assert!(nutrition.add_meal(blank).await.is_err());
    }

    #[tokio::test]
    async fn new_meal_at_formats_date_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 18, 45, 0).unwrap();
        let meal = NewMeal::at("Soup", 250, MealSource::Manual, at).with_notes("lentil");

        assert_eq!(meal.date, "2024-05-01T18:45:00.000Z");
        assert_eq!(meal.time, "18:45");
        assert_eq!(meal.notes.as_deref(), Some("lentil"));
    }

    #[tokio::test]
    async fn clear_drops_meals_and_goal() {
        let (kv, nutrition) = store();
        nutrition.add_meal(meal_on("2024-05-01", "08:15", 350)).await.unwrap();
        nutrition.set_calorie_goal(1500).await.unwrap();

        nutrition.clear().await.unwrap();
        assert!(kv.is_empty());
    }
}
