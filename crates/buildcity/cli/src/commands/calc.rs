//! Calculator commands

use buildcity_calc::{
    ActivityLevel, Appliance, BrickInput, BrickType, ConcreteInput, DeficitLevel, ElectricalInput,
    PaintInput, SafetyFactor, Sex, Voltage, WeightInput,
};
use buildcity_records::NutritionStore;
use clap::Subcommand;
use tracing::warn;

use super::AppContext;
use crate::output::{money, print_json, print_success, OutputFormat};

/// Calculator subcommands
#[derive(Subcommand)]
pub enum CalcCommands {
    /// Concrete bags for a slab (dimensions in cm)
    Concrete {
        #[arg(long, default_value_t = 0.0)]
        length: f64,
        #[arg(long, default_value_t = 0.0)]
        width: f64,
        #[arg(long, default_value_t = 0.0)]
        depth: f64,
        /// Price per bag
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },

    /// Bricks for a wall (dimensions in cm)
    Brick {
        #[arg(long, default_value_t = 0.0)]
        length: f64,
        #[arg(long, default_value_t = 0.0)]
        height: f64,
        /// small, standard or big
        #[arg(long, default_value = "standard")]
        brick: BrickType,
        /// Waste allowance in percent
        #[arg(long, default_value_t = 10.0)]
        waste: f64,
        /// Price per brick
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },

    /// Paint for walls (areas in m²)
    Paint {
        #[arg(long, default_value_t = 0.0)]
        wall: f64,
        #[arg(long, default_value_t = 0.0)]
        doors: f64,
        #[arg(long, default_value_t = 2.0)]
        coats: f64,
        /// m² covered per litre
        #[arg(long, default_value_t = 10.0)]
        coverage: f64,
        /// Price per litre
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },

    /// Electrical load and running cost
    Electrical {
        /// POWER or POWERxAMOUNT in watts, repeatable
        #[arg(short, long = "appliance")]
        appliances: Vec<Appliance>,
        #[arg(long, default_value_t = 8.0)]
        hours: f64,
        /// 1.0, 1.25 or 1.5
        #[arg(long, default_value = "1.25")]
        safety: SafetyFactor,
        /// 120V, 240V or 415V
        #[arg(long, default_value = "240V")]
        voltage: Voltage,
        /// Price per kWh
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },

    /// Daily calorie target for a weight-loss goal
    Weight {
        /// male or female
        #[arg(long, default_value = "male")]
        sex: Sex,
        #[arg(long)]
        age: u32,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Current weight in kg
        #[arg(long)]
        current: f64,
        /// Target weight in kg
        #[arg(long)]
        target: f64,
        /// minimal, light, moderate, high or very-high
        #[arg(long, default_value = "light")]
        activity: ActivityLevel,
        /// light, moderate or aggressive
        #[arg(long, default_value = "moderate")]
        deficit: DeficitLevel,
        /// Don't store the result as the daily calorie goal
        #[arg(long)]
        no_save: bool,
    },
}

/// Execute a calculator command
pub async fn execute(command: CalcCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let json = ctx.format == OutputFormat::Json;
    match command {
        CalcCommands::Concrete {
            length,
            width,
            depth,
            price,
        } => {
            let estimate = ConcreteInput {
                length_cm: length,
                width_cm: width,
                depth_cm: depth,
                price_per_bag: price,
            }
            .estimate()?;
            if json {
                return print_json(&estimate);
            }
            println!("Volume:      {:.2} m³", estimate.volume_m3);
            println!("Bags:        {}", estimate.bags);
            println!("Total cost:  {}", money(estimate.total_cost));
        }

        CalcCommands::Brick {
            length,
            height,
            brick,
            waste,
            price,
        } => {
            let estimate = BrickInput {
                wall_length_cm: length,
                wall_height_cm: height,
                brick,
                waste_percent: waste,
                price_per_brick: price,
            }
            .estimate()?;
            if json {
                return print_json(&estimate);
            }
            println!("Bricks:      {}", estimate.bricks);
            println!("Total cost:  {}", money(estimate.total_cost));
        }

        CalcCommands::Paint {
            wall,
            doors,
            coats,
            coverage,
            price,
        } => {
            let estimate = PaintInput {
                wall_area_m2: wall,
                door_area_m2: doors,
                coats,
                coverage_m2_per_l: coverage,
                price_per_l: price,
            }
            .estimate()?;
            if json {
                return print_json(&estimate);
            }
            println!("Area:        {:.2} m²", estimate.paintable_area_m2);
            println!("Paint:       {:.1} L", estimate.litres);
            println!("Total cost:  {}", money(estimate.total_cost));
        }

        CalcCommands::Electrical {
            appliances,
            hours,
            safety,
            voltage,
            price,
        } => {
            let estimate = ElectricalInput {
                appliances,
                hours_per_day: hours,
                safety,
                voltage,
                price_per_kwh: price,
            }
            .estimate()?;
            if json {
                return print_json(&estimate);
            }
            println!("Total load:    {:.0} W at {}", estimate.total_power_w, estimate.voltage);
            println!("Daily energy:  {:.2} kWh", estimate.daily_kwh);
            println!("Daily cost:    {}", money(estimate.daily_cost));
            println!("Monthly cost:  {}", money(estimate.monthly_cost));
        }

        CalcCommands::Weight {
            sex,
            age,
            height,
            current,
            target,
            activity,
            deficit,
            no_save,
        } => {
            let plan = WeightInput {
                sex,
                age_years: age,
                height_cm: height,
                current_kg: current,
                target_kg: target,
                activity,
                deficit,
            }
            .plan()?;

            // a failed save does not invalidate the plan
            let saved = if no_save {
                false
            } else {
                match NutritionStore::new(ctx.store.clone())
                    .set_calorie_goal(plan.daily_calories)
                    .await
                {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(error = %e, "Error saving calorie goal");
                        false
                    }
                }
            };

            if json {
                return print_json(&plan);
            }
            println!("Daily calories:  {} kcal", plan.daily_calories);
            println!("Estimated time:  {} weeks (~{} months)", plan.estimated_weeks, plan.estimated_months);
            if saved {
                print_success(&format!("Daily goal set to {} kcal", plan.daily_calories));
            }
        }
    }
    Ok(())
}
