/// Host value conversions.
///
/// Defines the [`FromValue`](convert::FromValue) and
/// [`IntoValue`](convert::IntoValue) traits that map Rust host types onto
/// runtime values and static value types. Parameter tuples and result types
/// of compiled evaluators go through these traits.
pub mod convert;

pub mod core;
