/// Tools Module
///
/// Each tool lives in its own module and exports a `register` function.
/// The two registries below define what each server binary advertises.

pub mod alerts;
pub mod calculator;
pub mod current_time;
pub mod echo;
pub mod forecast;
pub mod nws;

use crate::core::registry::ToolRegistry;
use crate::tools::nws::NwsClient;

/// Tools of the simple server: echo, calculator, current_time.
pub fn simple_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    echo::register(&mut registry);
    calculator::register(&mut registry);
    current_time::register(&mut registry);
    registry
}

/// Tools of the weather server, backed by `client`.
pub fn weather_registry(client: NwsClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    alerts::register(&mut registry, client.clone());
    forecast::register(&mut registry, client);
    registry
}
