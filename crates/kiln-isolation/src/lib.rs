//! # kiln-isolation
//!
//! Disposable, isolated filesystem environments for building components
//! outside a persistent workspace.
//!
//! An environment is created under a fresh temporary root, populated with one
//! component plus its transitive dependency closure, handed to a build body,
//! and destroyed when the body finishes. Destruction is unconditional on
//! every failure path; retention (`keep`) is honored only for successful
//! runs.
//!
//! - [`EnvironmentProvider`](environment::EnvironmentProvider) /
//!   [`EnvironmentFactory`](environment::EnvironmentFactory): the provider ports
//! - [`with_isolated_environment`](provision::with_isolated_environment):
//!   the create → isolate → body → destroy lifecycle wrapper
//! - [`LocalEnvironmentProvider`](provision::LocalEnvironmentProvider): the
//!   in-tree tempdir-backed provider

#![deny(unsafe_code)]

pub mod environment;
pub mod errors;
pub mod provision;
