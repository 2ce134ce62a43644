use billiard_launcher::{
    encode, format_number, EngineRequest, InitialState, RequestParseError, SimulationMode,
};
use proptest::prelude::*;

#[test]
fn encodes_default_run_exactly() {
    let request = encode(&InitialState::new(SimulationMode::Circular, 2.0, 1.0, 0.5));
    assert_eq!(request.as_str(), "1\n2.0\n1.0\n0.5\n");
}

#[test]
fn semi_circular_uses_code_two() {
    let request = encode(&InitialState::new(SimulationMode::SemiCircular, -3.25, 0.0, 7.0));
    assert_eq!(request.as_str(), "2\n-3.25\n0.0\n7.0\n");
}

#[test]
fn angle_outside_one_turn_is_passed_through() {
    let request = encode(&InitialState::new(SimulationMode::Circular, 0.0, 0.0, -12.5));
    assert!(request.as_str().ends_with("\n-12.5\n"));
}

#[test]
fn whole_numbers_keep_a_decimal_point() {
    assert_eq!(format_number(3.0), "3.0");
    assert_eq!(format_number(-0.0), "-0.0");
    assert_eq!(format_number(0.1), "0.1");
    assert_eq!(format_number(1e-7), "0.0000001");
}

#[test]
fn encoding_is_deterministic() {
    let state = InitialState::new(SimulationMode::SemiCircular, 1.0 / 3.0, 2.0 / 7.0, 0.123456789);
    assert_eq!(encode(&state).as_bytes(), encode(&state).as_bytes());
}

#[test]
fn parse_requires_trailing_newline() {
    assert_eq!(
        EngineRequest::parse("1\n2.0\n1.0\n0.5"),
        Err(RequestParseError::MissingTerminator)
    );
}

#[test]
fn parse_rejects_wrong_line_count() {
    assert_eq!(
        EngineRequest::parse("1\n2.0\n1.0\n"),
        Err(RequestParseError::LineCount(3))
    );
    assert_eq!(
        EngineRequest::parse("1\n2.0\n1.0\n0.5\n\n"),
        Err(RequestParseError::LineCount(5))
    );
}

#[test]
fn parse_rejects_unknown_mode_code() {
    let err = EngineRequest::parse("3\n2.0\n1.0\n0.5\n").expect_err("mode 3 is unknown");
    assert!(matches!(err, RequestParseError::Field { line: 1, .. }));
}

proptest! {
    #[test]
    fn newline_split_recovers_encoded_values(
        semi in any::<bool>(),
        x in -7.5..7.5f64,
        y in -7.5..7.5f64,
        angle in -1.0e3..1.0e3f64,
    ) {
        let mode = if semi { SimulationMode::SemiCircular } else { SimulationMode::Circular };
        let state = InitialState::new(mode, x, y, angle);
        let request = encode(&state);

        let lines: Vec<&str> = request.as_str().split_terminator('\n').collect();
        prop_assert_eq!(lines.len(), 4);
        prop_assert_eq!(lines[0], mode.code().to_string());
        prop_assert_eq!(lines[1].parse::<f64>().unwrap(), x);
        prop_assert_eq!(lines[2].parse::<f64>().unwrap(), y);
        prop_assert_eq!(lines[3].parse::<f64>().unwrap(), angle);

        prop_assert_eq!(EngineRequest::parse(request.as_str()), Ok(state));
    }
}
