/// Calculator Tool Implementation
///
/// Four-function arithmetic on two numbers. Division by zero is a domain
/// error rather than an infinite or NaN result.

use serde::Deserialize;
use std::fmt;

use crate::core::error::ToolError;
use crate::core::protocol::CallToolResult;
use crate::core::registry::ToolRegistry;
use crate::core::schema::{FieldKind, ObjectSchema};

pub const NAME: &str = "calculator";

const OPERATIONS: &[&str] = &["add", "subtract", "multiply", "divide"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize)]
struct CalculatorArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

/// Apply `op` to `a` and `b`.
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64, ToolError> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide => {
            if b == 0.0 {
                return Err(ToolError::domain("Division by zero is not allowed"));
            }
            Ok(a / b)
        }
    }
}

pub fn schema() -> ObjectSchema {
    ObjectSchema::new()
        .required(
            "operation",
            FieldKind::Enum(OPERATIONS),
            "The mathematical operation to perform",
        )
        .required("a", FieldKind::Number { min: None, max: None }, "The first number")
        .required("b", FieldKind::Number { min: None, max: None }, "The second number")
}

async fn calculate(args: CalculatorArgs) -> Result<CallToolResult, ToolError> {
    let result = evaluate(args.operation, args.a, args.b)?;
    Ok(CallToolResult::text(format!(
        "Result: {} {} {} = {}",
        args.a, args.operation, args.b, result
    )))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register_typed(NAME, "Perform basic mathematical operations", schema(), calculate);
}
