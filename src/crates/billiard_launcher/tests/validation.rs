use billiard_launcher::{
    validate, FormInput, InitialState, SimulationMode, TableGeometry, ValidationError,
};
use proptest::prelude::*;

const RADIUS: f64 = 7.5;

fn state(mode: SimulationMode, x: f64, y: f64) -> InitialState {
    InitialState::new(mode, x, y, 0.0)
}

#[test]
fn default_form_is_admissible() {
    let state = FormInput::default().parse().expect("defaults should parse");
    assert_eq!(state, InitialState::new(SimulationMode::Circular, 2.0, 1.0, 0.5));
    assert_eq!(validate(&state, &TableGeometry::STANDARD), Ok(()));
}

#[test]
fn point_on_the_boundary_is_out_of_bounds() {
    let err = validate(
        &state(SimulationMode::Circular, 7.5, 0.0),
        &TableGeometry::STANDARD,
    )
    .expect_err("boundary point must be rejected");

    match err {
        ValidationError::OutOfBounds { distance, radius, .. } => {
            assert_eq!(distance, 7.5);
            assert_eq!(radius, RADIUS);
        }
        other => panic!("expected OutOfBounds, got {other:?}"),
    }
}

#[test]
fn out_of_bounds_message_reports_distance_and_radius() {
    let err = validate(
        &state(SimulationMode::Circular, 6.0, 6.0),
        &TableGeometry::STANDARD,
    )
    .expect_err("point is outside");
    let message = err.to_string();
    assert!(message.contains("8.49"), "distance missing from {message:?}");
    assert!(message.contains("7.5"), "radius missing from {message:?}");
}

#[test]
fn containment_is_checked_before_hemisphere() {
    let err = validate(
        &state(SimulationMode::SemiCircular, 0.0, -8.0),
        &TableGeometry::STANDARD,
    )
    .expect_err("point is outside and below");
    assert!(matches!(err, ValidationError::OutOfBounds { .. }));
}

#[test]
fn semi_circular_rejects_negative_y() {
    let err = validate(
        &state(SimulationMode::SemiCircular, 0.0, -1.0),
        &TableGeometry::STANDARD,
    )
    .expect_err("negative y on a half table");
    assert_eq!(err, ValidationError::InvalidHemisphere { y: -1.0 });
}

#[test]
fn semi_circular_accepts_the_flat_wall() {
    assert_eq!(
        validate(
            &state(SimulationMode::SemiCircular, 3.0, 0.0),
            &TableGeometry::STANDARD
        ),
        Ok(())
    );
}

#[test]
fn nan_coordinates_are_rejected() {
    let err = validate(
        &state(SimulationMode::Circular, f64::NAN, 0.0),
        &TableGeometry::STANDARD,
    )
    .expect_err("NaN is not on the table");
    assert!(matches!(err, ValidationError::OutOfBounds { .. }));
}

#[test]
fn form_rejects_non_numeric_fields() {
    let form = FormInput::new(SimulationMode::Circular, "2.0", "one", "0.5");
    let err = form.parse().expect_err("y is not a number");
    assert_eq!(err.field, "y");
    assert_eq!(err.value, "one");
}

#[test]
fn form_rejects_non_finite_fields() {
    for text in ["nan", "inf", "-infinity"] {
        let form = FormInput::new(SimulationMode::Circular, "0.0", "0.0", text);
        let err = form.parse().expect_err("non-finite angle");
        assert_eq!(err.field, "angle");
    }
}

#[test]
fn form_trims_whitespace() {
    let form = FormInput::new(SimulationMode::SemiCircular, " 1.5 ", "2", "\t-3.25");
    let state = form.parse().expect("padded numbers parse");
    assert_eq!(state, InitialState::new(SimulationMode::SemiCircular, 1.5, 2.0, -3.25));
}

#[test]
fn mode_parses_codes_and_names() {
    assert_eq!("1".parse::<SimulationMode>(), Ok(SimulationMode::Circular));
    assert_eq!("circular".parse::<SimulationMode>(), Ok(SimulationMode::Circular));
    assert_eq!("2".parse::<SimulationMode>(), Ok(SimulationMode::SemiCircular));
    assert_eq!("Semi-Circular".parse::<SimulationMode>(), Ok(SimulationMode::SemiCircular));
    assert!("3".parse::<SimulationMode>().is_err());
}

fn any_mode() -> impl Strategy<Value = SimulationMode> {
    prop_oneof![Just(SimulationMode::Circular), Just(SimulationMode::SemiCircular)]
}

proptest! {
    #[test]
    fn outside_the_circle_is_always_out_of_bounds(
        mode in any_mode(),
        theta in 0.0..std::f64::consts::TAU,
        distance in RADIUS..100.0,
        angle in -1.0e6..1.0e6,
    ) {
        let (x, y) = (distance * theta.cos(), distance * theta.sin());
        prop_assume!(x * x + y * y >= RADIUS * RADIUS);
        let result = validate(&InitialState::new(mode, x, y, angle), &TableGeometry::STANDARD);
        let is_out_of_bounds = matches!(result, Err(ValidationError::OutOfBounds { .. }));
        prop_assert!(is_out_of_bounds);
    }

    #[test]
    fn inside_lower_half_is_invalid_for_semi_circular(
        x in -7.4..7.4f64,
        y in -7.4..-1.0e-9f64,
    ) {
        prop_assume!(x * x + y * y < RADIUS * RADIUS);
        let result = validate(
            &InitialState::new(SimulationMode::SemiCircular, x, y, 0.0),
            &TableGeometry::STANDARD,
        );
        prop_assert_eq!(result, Err(ValidationError::InvalidHemisphere { y }));
    }

    #[test]
    fn inside_is_admissible_when_mode_allows(
        mode in any_mode(),
        x in -7.4..7.4f64,
        y in -7.4..7.4f64,
        angle in -100.0..100.0f64,
    ) {
        prop_assume!(x * x + y * y < RADIUS * RADIUS);
        prop_assume!(mode == SimulationMode::Circular || y >= 0.0);
        prop_assert_eq!(
            validate(&InitialState::new(mode, x, y, angle), &TableGeometry::STANDARD),
            Ok(())
        );
    }
}
