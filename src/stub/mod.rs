//! Stub construction and public surface
//!
//! `StubBuilder` assembles clauses, module, and options; every invalid
//! configuration is rejected at `build` time, never at dispatch time.
//! The built [`Stub`] exposes one `invoke` entry point forwarding to the
//! dispatcher and one `inspect` entry point consumed by the query layer.

mod builder;
mod contract;
mod stub;

pub use builder::StubBuilder;
pub use contract::ContractDescriptor;
pub use stub::Stub;
