//! Value representation and coercion rules.

pub mod coerce;
mod function;
mod pending;
mod value;

pub use function::FunctionValue;
pub use pending::Pending;
pub use value::{ObjectMap, RegexValue, Value};

#[cfg(test)]
mod coerce_test;
#[cfg(test)]
mod value_test;
