//! Scenario validation logic.

use hp_sim::{SimError, SimOptions, SimulationParameters};

use crate::schema::{ParameterDef, Scenario};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Conflicting fields: {what}")]
    Conflict { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    resolve_parameters(&scenario.parameters)?;

    let s = &scenario.initial_state;
    for (field, value) in [
        ("initial_state.x", s.x),
        ("initial_state.y", s.y),
        ("initial_state.phi", s.phi),
        ("initial_state.dphi", s.dphi),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    let opts = SimOptions::from(&scenario.run);
    opts.validate().map_err(|e| {
        to_validation(e, "run", |field| match field {
            "dt" => opts.dt.to_string(),
            "max_t" => opts.max_t.to_string(),
            "stride" => opts.stride.to_string(),
            "max_steps" => opts.max_steps.to_string(),
            _ => String::new(),
        })
    })?;

    Ok(())
}

/// Resolve and validate the parameter block.
pub fn resolve_parameters(def: &ParameterDef) -> Result<SimulationParameters, ValidationError> {
    if let Some(slots) = &def.positional {
        if def.has_named() {
            return Err(ValidationError::Conflict {
                what: "parameters: `positional` cannot be combined with named fields".to_string(),
            });
        }
        return SimulationParameters::from_positional(slots).map_err(|e| {
            to_validation(e, "parameters", |field| {
                let idx = field
                    .parse::<hp_sim::ParameterField>()
                    .map(|f| f.index())
                    .ok();
                idx.and_then(|i| slots.get(i))
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| format!("{} slots", slots.len()))
            })
        });
    }

    let params = def.apply_named();
    params.validate().map_err(|e| {
        to_validation(e, "parameters", |field| {
            field
                .parse::<hp_sim::ParameterField>()
                .map(|f| params.get(f).to_string())
                .unwrap_or_default()
        })
    })?;
    Ok(params)
}

fn to_validation(
    err: SimError,
    section: &str,
    value_of: impl Fn(&str) -> String,
) -> ValidationError {
    match err {
        SimError::Configuration { field, reason } => ValidationError::InvalidValue {
            field: format!("{section}.{field}"),
            value: value_of(field),
            reason: reason.to_string(),
        },
        other => ValidationError::InvalidValue {
            field: section.to_string(),
            value: String::new(),
            reason: other.to_string(),
        },
    }
}
