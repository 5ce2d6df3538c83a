//! Evaluate predicates against JSON input

use super::{CliError, parse_input, parse_values, set_to_json};
use crate::{Config, MapEnv, evaluate_with};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The predicate to evaluate
    pub predicate: String,
    /// JSON object to evaluate against
    pub input: Option<String>,
    /// JSON array of bound placeholder values
    pub values: Option<String>,
    /// Only validate syntax and types, don't evaluate
    pub syntax_only: bool,
    pub config: Config,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// The predicate parsed and type-checked
    SyntaxValid { parameters: usize },
    /// The predicate was evaluated
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let predicate = options.config.parse(&options.predicate)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid {
            parameters: predicate.parameters,
        });
    }

    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let doc = parse_input(input)?;
    let env = MapEnv::from_value(&doc).ok_or(CliError::InputNotObject)?;
    let values = parse_values(options.values.as_deref())?;

    let set = evaluate_with(&env, &predicate, &values)?;
    Ok(CheckResult::Success(serde_json::json!({
        "matched": !set.is_empty(),
        "result": set_to_json(&set),
    })))
}
