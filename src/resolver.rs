/// The name-resolution contract.
///
/// Defines the [`Resolver`](core::Resolver) trait compiled expressions use to
/// read host properties and call host functions, together with the
/// [`FunctionSignature`](core::FunctionSignature) a resolver may publish so
/// calls can be checked while compiling.
pub mod core;

/// Resolvers over registered host members.
///
/// A host type implements [`Reflect`](object::Reflect) to list its properties
/// and functions once; [`ObjectResolver`](object::ObjectResolver) exposes an
/// instance of it with configurable visibility and name matching.
pub mod object;

/// Resolvers over static members only.
pub mod static_library;

/// An ordered chain of resolvers tried one after another.
pub mod composite;

pub use self::{
    composite::{CompositeResolver, UnknownMember},
    core::{FunctionSignature, Resolver},
    object::{Members, ObjectResolver, Reflect, ResolverOptions, Visibility},
    static_library::StaticLibrary,
};
