//! # kiln-hooks
//!
//! Lifecycle hooks around a component's compilation.
//!
//! Hooks fire at a closed set of phases:
//! [`PreCompile`](types::HookPhase::PreCompile) before compilation and
//! [`PostCompile`](types::HookPhase::PostCompile) after, carrying the
//! computed dists. The compile step itself is not a broadcast — it is the
//! typed [`CompileDelegate`](lifecycle::CompileDelegate) capability whose
//! return value becomes the component's dists.
//!
//! ## Fail-Open
//!
//! Observer errors never fail a build. They are logged and dispatch
//! continues with the next observer.
//!
//! ## Version pipeline
//!
//! [`LifecycleAdapter`](lifecycle::LifecycleAdapter) is the integration
//! point for the tagging/versioning machinery: `pre_tag` runs the
//! pre → compile → post sequence and caches the resulting dists per
//! component; `pre_save_version` attaches the cached dists to the version
//! record being persisted. The cache is owned by the adapter instance — its
//! lifetime is the enclosing build/tag session.

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod errors;
pub mod lifecycle;
pub mod observer;
pub mod registry;
pub mod types;
