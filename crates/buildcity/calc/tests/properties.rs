use buildcity_calc::{BrickInput, BrickType, ConcreteInput, PaintInput};
use proptest::prelude::*;

fn arb_brick() -> impl Strategy<Value = BrickType> {
    prop_oneof![
        Just(BrickType::Small),
        Just(BrickType::Standard),
        Just(BrickType::Big),
    ]
}

proptest! {
    #[test]
    fn more_waste_never_needs_fewer_bricks(
        length in 0.0f64..2_000.0,
        height in 0.0f64..500.0,
        brick in arb_brick(),
        waste in 0.0f64..50.0,
        extra in 0.0f64..50.0,
    ) {
        let base = BrickInput {
            wall_length_cm: length,
            wall_height_cm: height,
            brick,
            waste_percent: waste,
            price_per_brick: 0.0,
        };
        let more = BrickInput { waste_percent: waste + extra, ..base };
        prop_assert!(more.estimate().unwrap().bricks >= base.estimate().unwrap().bricks);
    }

    #[test]
    fn bags_cover_the_volume(
        length in 0.0f64..1_000.0,
        width in 0.0f64..1_000.0,
        depth in 0.0f64..100.0,
    ) {
        let estimate = ConcreteInput {
            length_cm: length,
            width_cm: width,
            depth_cm: depth,
            price_per_bag: 1.0,
        }
        .estimate()
        .unwrap();

        prop_assert!(estimate.bags as f64 * 0.01 + 1e-9 >= estimate.volume_m3);
        prop_assert_eq!(estimate.total_cost, estimate.bags as f64);
    }

    #[test]
    fn rounded_litres_stay_within_a_tenth(
        wall in 0.0f64..500.0,
        doors in 0.0f64..50.0,
        coats in 1u32..4,
        coverage in 1.0f64..20.0,
    ) {
        let input = PaintInput {
            wall_area_m2: wall,
            door_area_m2: doors,
            coats: f64::from(coats),
            coverage_m2_per_l: coverage,
            price_per_l: 1.0,
        };
        let estimate = input.estimate().unwrap();
        let exact = estimate.total_cost;

        prop_assert!(estimate.litres + 1e-6 >= exact);
        prop_assert!(estimate.litres < exact + 0.1 + 1e-6);
    }
}
