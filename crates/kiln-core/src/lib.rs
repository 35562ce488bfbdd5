//! # kiln-core
//!
//! Foundation types for the kiln build-orchestration core.
//!
//! This crate provides the shared vocabulary that the other kiln crates
//! depend on:
//!
//! - **Branded IDs**: [`ComponentId`](ids::ComponentId) as a newtype for type safety
//! - **Components**: [`Component`](component::Component) with its source files and isolation state
//! - **Artifacts**: [`Dist`](dist::Dist) / [`Dists`](dist::Dists) build outputs and the
//!   [`CompileResponse`](dist::CompileResponse) compiler-output envelope
//! - **Errors**: [`ContractViolation`](errors::ContractViolation),
//!   [`CompilerError`](errors::CompilerError), [`StoreError`](errors::StoreError)

#![deny(unsafe_code)]

pub mod component;
pub mod constants;
pub mod dist;
pub mod errors;
pub mod ids;
