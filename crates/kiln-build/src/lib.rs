//! # kiln-build
//!
//! The build-orchestration core: given a component and a set of pluggable
//! compilers, decide whether a rebuild is needed, run every compiler
//! concurrently — in a workspace, in the component's existing isolated
//! environment, or in a freshly provisioned one — validate and aggregate
//! the outputs into the component's dists, and optionally persist them.
//!
//! - [`traits`]: the [`Compiler`](traits::Compiler) capability and the
//!   [`Workspace`](traits::Workspace) / [`Store`](traits::Store) ports
//! - [`policy`]: the rebuild decision and the no-compiler branch
//! - [`executor`]: one compiler invocation against one build root
//! - [`orchestrator`]: the concurrent multi-compiler build
//!
//! Compiler invocation order is preserved in the resulting dists regardless
//! of completion order. A failed build never touches previously stored
//! dists.

#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod errors;
pub mod executor;
pub mod options;
pub mod orchestrator;
pub mod policy;
pub mod traits;
