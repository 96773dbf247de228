use hp_project::schema::*;
use hp_project::{
    ProjectError, ValidationError, from_yaml_str, load, load_yaml, save_json, save_yaml,
};
use hp_sim::{HopperState, IntegratorType, SimOptions, SimulationParameters};

#[test]
fn roundtrip_yaml_default_scenario() {
    let scenario = Scenario::named("Default hopper");

    let path = std::env::temp_dir().join("hp_project_roundtrip_default.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_with_overrides() {
    let mut scenario = Scenario::named("Strong feedback");
    scenario.parameters.sigma = Some(4.0);
    scenario.parameters.amp = Some(3.5);
    scenario.initial_state.x = 1.2;
    scenario.run.integrator = IntegratorType::ForwardEuler;
    scenario.run.max_t = 5.0;

    let path = std::env::temp_dir().join("hp_project_roundtrip_overrides.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: minimal
"#;
    let scenario = from_yaml_str(yaml).unwrap();
    let params = hp_project::validate::resolve_parameters(&scenario.parameters).unwrap();
    assert_eq!(params, SimulationParameters::default());
    assert_eq!(
        HopperState::from(scenario.initial_state),
        HopperState::new(1.0, 0.0, 0.0, 0.0)
    );
    assert_eq!(SimOptions::from(&scenario.run), SimOptions::default());
}

#[test]
fn partial_yaml_overrides() {
    let yaml = r#"
version: 1
name: tuned
parameters:
  sigma: 1.2
  omega: 6.0
initial_state:
  y: -0.5
run:
  max_t: 4.0
  integrator: euler
"#;
    let scenario = from_yaml_str(yaml).unwrap();
    let params = hp_project::validate::resolve_parameters(&scenario.parameters).unwrap();
    assert_eq!(params.sigma, 1.2);
    assert_eq!(params.omega, 6.0);
    assert_eq!(params.dur, hp_sim::params::default_duration(6.0));
    assert_eq!(scenario.initial_state.x, 1.0);
    assert_eq!(scenario.initial_state.y, -0.5);
    assert_eq!(scenario.run.dt, 1.0e-4);
    assert_eq!(scenario.run.integrator, IntegratorType::ForwardEuler);
}

#[test]
fn invalid_yaml_reports_field() {
    let yaml = r#"
version: 1
name: broken
parameters:
  k: 0.0
"#;
    match from_yaml_str(yaml) {
        Err(ProjectError::Validation(ValidationError::InvalidValue { field, .. })) => {
            assert_eq!(field, "parameters.k");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn positional_yaml_layout() {
    let yaml = r#"
version: 1
name: positional
parameters:
  positional: [0.1, 0.2, 5.0, 1.0, 9.81, 0.0, 5.0, 0.0, 4.0, 0.3, 2.0, 5.0]
"#;
    let scenario = from_yaml_str(yaml).unwrap();
    let params = hp_project::validate::resolve_parameters(&scenario.parameters).unwrap();
    assert_eq!(params.dur, 0.3);
    assert_eq!(params.sigma, 2.0);
    assert_eq!(params.phase, 5.0);
}
