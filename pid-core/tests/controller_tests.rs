use pid_core::utils::{
    ConfigError, Controller, ControllerConfig, Gains, IncrementalPid, Pid, PidCommand, PidMode,
    PositionalPid,
};

/// Tolerance for comparing controller outputs.
const EPS: f64 = 1e-9;

/// Drive any controller through the shared contract and collect its outputs.
fn drive(
    pid: &mut dyn Controller,
    measured: &[f64],
) -> Vec<f64> {
    measured.iter().map(|&m| pid.calculate(m)).collect()
}

/// The ramp used by the demo loop: start at 2.1, +1.3 per tick.
fn ramp(n: usize) -> Vec<f64> {
    (1..=n).map(|k| 2.1 + 1.3 * k as f64).collect()
}

#[test]
fn first_cycle_matches_across_variants_without_derivative() {
    let gains = Gains::new(0.3, 0.5, 0.0);
    let mut inc = Pid::new(PidMode::Incremental, 50.0).with_gains(gains);
    let mut pos = Pid::new(PidMode::Positional, 50.0).with_gains(gains);

    let a = inc.calculate(3.4);
    let b = pos.calculate(3.4);
    assert!((a - 37.28).abs() < EPS);
    assert!((b - 37.28).abs() < EPS);
    assert!((pos.integral_sum().unwrap() - 46.6).abs() < EPS);

    // second cycle diverges: positional keeps summing, incremental does not
    let a = inc.calculate(5.0);
    let b = pos.calculate(5.0);
    assert!((a - b).abs() > 1.0);
}

#[test]
fn incremental_deltas_sum_to_positional_output() {
    // Summed incremental deltas reproduce the positional output when no clamp is set.
    let gains = Gains::new(0.2, 0.5, 0.1);
    let mut inc = IncrementalPid::new(50.0).with_gains(gains);
    let mut pos = PositionalPid::new(50.0).with_gains(gains);

    let mut actuation = 0.0;
    for m in ramp(40) {
        actuation += inc.calculate(m);
        let absolute = pos.calculate(m);
        assert!(
            (actuation - absolute).abs() < 1e-6,
            "diverged at measured={}: {} vs {}",
            m,
            actuation,
            absolute
        );
    }
}

#[test]
fn integral_sum_equals_sum_of_errors() {
    let mut pid = PositionalPid::new(50.0).with_gains(Gains::new(0.2, 0.5, 0.0));
    let mut errors = 0.0;
    for m in ramp(93) {
        pid.calculate(m);
        errors += pid.current_error();
    }
    assert!((pid.integral_sum() - errors).abs() < 1e-6);
}

#[test]
fn callers_see_one_contract() {
    let mut controllers: Vec<Box<dyn Controller>> = vec![
        Box::new(IncrementalPid::new(10.0)),
        Box::new(PositionalPid::new(10.0)),
        Box::new(Pid::new(PidMode::Positional, 10.0)),
    ];
    for pid in controllers.iter_mut() {
        pid.set_parameters(1.0, 0.0, 0.0);
        pid.set_target(20.0);
        assert_eq!(pid.target(), 20.0);
        let out = drive(pid.as_mut(), &[15.0]);
        assert!((out[0] - 5.0).abs() < EPS, "{:?}: {}", pid.mode(), out[0]);
    }
}

#[test]
fn initialize_at_setpoint_gives_zero() {
    for mode in [PidMode::Incremental, PidMode::Positional] {
        let mut pid = Pid::new(mode, 0.0).with_gains(Gains::new(0.7, 0.3, 0.2));
        drive(&mut pid, &[3.0, -2.0, 8.0]);
        pid.initialize(42.0);
        assert_eq!(pid.calculate(42.0), 0.0, "{:?}", mode);
        assert_eq!(pid.current_error(), 0.0);
    }
}

#[test]
fn clamp_keeps_outputs_in_range() {
    let config = ControllerConfig {
        mode: PidMode::Positional,
        target: 50.0,
        gains: Gains::new(0.2, 0.5, 0.0),
        output_max: Some(100.0),
    };
    let mut pid = Pid::from_config(&config).unwrap();
    for out in drive(&mut pid, &ramp(93)) {
        assert!((0.0..=100.0).contains(&out), "out of range: {}", out);
    }
}

#[test]
fn config_decodes_from_json() {
    let json = r#"{"mode":"incremental","target":50.0,"gains":{"kp":0.2,"ki":0.5,"kd":0.0}}"#;
    let config: ControllerConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.mode, PidMode::Incremental);
    assert_eq!(config.gains, Gains::new(0.2, 0.5, 0.0));
    assert_eq!(config.output_max, None);

    let minimal: ControllerConfig =
        serde_json::from_str(r#"{"mode":"positional","target":1.5}"#).unwrap();
    assert_eq!(minimal.gains, Gains::default());
}

#[test]
fn unknown_mode_is_rejected() {
    let res = serde_json::from_str::<ControllerConfig>(r#"{"mode":"velocity","target":1.0}"#);
    assert!(res.is_err());
}

#[test]
fn commands_decode_from_json() {
    let cmd: PidCommand =
        serde_json::from_str(r#"{"pc":"set_parameters","kp":1.0,"ki":0.5,"kd":0.0}"#).unwrap();
    assert_eq!(
        cmd,
        PidCommand::SetParameters {
            kp: 1.0,
            ki: 0.5,
            kd: 0.0
        }
    );
    let cmd: PidCommand = serde_json::from_str(r#"{"pc":"set_output_max","max":null}"#).unwrap();
    assert_eq!(cmd, PidCommand::SetOutputMax { max: None });
}

#[test]
fn bad_ceiling_command_is_an_error() {
    let mut pid = Pid::new(PidMode::Incremental, 0.0);
    let err = pid
        .ex_command(PidCommand::SetOutputMax { max: Some(-1.0) })
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidOutputMax(-1.0));
    assert_eq!(pid.output_clamp(), None);
}
