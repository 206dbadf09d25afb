//! Meal log commands

use anyhow::bail;
use buildcity_records::{MealSource, NewMeal, NutritionStore};
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use colored::*;

use super::AppContext;
use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Meal subcommands
#[derive(Subcommand)]
pub enum MealCommands {
    /// List meals of one day
    List {
        /// Day as YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Log a meal
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        calories: u32,

        /// Day as YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Time as HH:MM, defaults to now
        #[arg(short, long)]
        time: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Mark the meal as recognized from a photo
        #[arg(long)]
        ai: bool,
    },

    /// Delete a meal
    Delete { id: String },

    /// Show or set the daily calorie goal
    Goal { calories: Option<u32> },

    /// Daily totals for the last N days
    History {
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
}

/// Execute a meal command
pub async fn execute(command: MealCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let nutrition = NutritionStore::new(ctx.store.clone());
    let today = Local::now().date_naive();

    match command {
        MealCommands::List { date } => {
            let day = date.unwrap_or(today).format("%Y-%m-%d").to_string();
            let mut meals = nutrition.meals_by_date(&day).await?;
            meals.sort_by(|a, b| b.time.cmp(&a.time));
            if ctx.format == OutputFormat::Json {
                return print_json(&meals);
            }
            if meals.is_empty() {
                println!("{}", "No meals".dimmed());
                return Ok(());
            }
            let goal = nutrition.calorie_goal().await?;
            let total: u32 = meals.iter().map(|m| m.calories).sum();
            for meal in &meals {
                let source = match meal.added_by {
                    MealSource::Ai => " (ai)",
                    MealSource::Manual => "",
                };
                println!(
                    "{}  {:>5} kcal  {}{}  {}",
                    meal.time,
                    meal.calories,
                    meal.name,
                    source.dimmed(),
                    meal.id.dimmed()
                );
            }
            println!("Total: {} / {} kcal", total, goal);
            Ok(())
        }

        MealCommands::Add {
            name,
            calories,
            date,
            time,
            notes,
            ai,
        } => {
            let now = Local::now();
            let meal = NewMeal {
                name,
                calories,
                date: date.unwrap_or(today).format("%Y-%m-%d").to_string(),
                time: time.unwrap_or_else(|| now.format("%H:%M").to_string()),
                image_uri: None,
                notes,
                added_by: if ai { MealSource::Ai } else { MealSource::Manual },
            };
            let meal = nutrition.add_meal(meal).await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&meal);
            }
            print_success(&format!("Logged {} ({} kcal) as {}", meal.name, meal.calories, meal.id));
            Ok(())
        }

        MealCommands::Delete { id } => {
            if nutrition.delete_meal(&id).await? {
                print_success("Meal deleted");
            } else {
                print_warning(&format!("No meal with id {}", id));
            }
            Ok(())
        }

        MealCommands::Goal { calories: None } => {
            let goal = nutrition.calorie_goal().await?;
            let eaten = nutrition.today_calories(today).await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "daily_goal": goal, "today": eaten }));
            }
            println!("Daily goal: {} kcal ({} eaten today)", goal, eaten);
            Ok(())
        }

        MealCommands::Goal {
            calories: Some(calories),
        } => {
            nutrition.set_calorie_goal(calories).await?;
            print_success(&format!("Daily goal set to {} kcal", calories));
            Ok(())
        }

        MealCommands::History { days } => {
            if days == 0 {
                bail!("--days must be at least 1");
            }
            let history = nutrition.meals_grouped_by_date(days, today).await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&history);
            }
            let goal = nutrition.calorie_goal().await?;
            for day in &history {
                let total = format!("{:>5} kcal", day.total_calories);
                let total = if day.total_calories > u64::from(goal) {
                    total.red()
                } else {
                    total.normal()
                };
                println!("{}  {}  {} meal(s)", day.date, total, day.meals.len());
            }
            Ok(())
        }
    }
}
