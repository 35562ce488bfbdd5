//! Core types for the hook system.
//!
//! The phase set is closed: notification observers can subscribe to
//! [`HookPhase::PreCompile`] and [`HookPhase::PostCompile`]. The compile
//! step between them is a typed delegate, not a phase — see
//! [`lifecycle`](crate::lifecycle).

use serde::{Deserialize, Serialize};

use kiln_core::dist::Dists;
use kiln_core::ids::ComponentId;

/// Lifecycle notification phase around one component's compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPhase {
    /// Before compilation starts. Fire-and-forget notification.
    PreCompile,
    /// After compilation finished, carrying the computed dists.
    PostCompile,
}

impl HookPhase {
    /// Returns all phase variants.
    #[must_use]
    pub fn all() -> &'static [HookPhase] {
        &[Self::PreCompile, Self::PostCompile]
    }
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreCompile => write!(f, "preCompile"),
            Self::PostCompile => write!(f, "postCompile"),
        }
    }
}

/// Payload handed to observers of a phase.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum HookContext {
    /// Compilation is about to start.
    #[serde(rename = "preCompile")]
    PreCompile {
        /// Component about to be compiled.
        component_id: ComponentId,
        /// Serialized component.
        component: serde_json::Value,
    },
    /// Compilation finished.
    #[serde(rename = "postCompile")]
    PostCompile {
        /// Component that was compiled.
        component_id: ComponentId,
        /// Serialized component.
        component: serde_json::Value,
        /// The computed build output.
        dists: Dists,
    },
}

impl HookContext {
    /// The phase this context belongs to.
    #[must_use]
    pub fn phase(&self) -> HookPhase {
        match self {
            Self::PreCompile { .. } => HookPhase::PreCompile,
            Self::PostCompile { .. } => HookPhase::PostCompile,
        }
    }

    /// Id of the component the phase fired for.
    #[must_use]
    pub fn component_id(&self) -> &ComponentId {
        match self {
            Self::PreCompile { component_id, .. } | Self::PostCompile { component_id, .. } => {
                component_id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_camel_case() {
        assert_eq!(HookPhase::PreCompile.to_string(), "preCompile");
        assert_eq!(HookPhase::PostCompile.to_string(), "postCompile");
    }

    #[test]
    fn all_lists_every_phase() {
        assert_eq!(HookPhase::all().len(), 2);
    }

    #[test]
    fn context_reports_its_phase() {
        let context = HookContext::PreCompile {
            component_id: ComponentId::new("pkg/a"),
            component: serde_json::Value::Null,
        };
        assert_eq!(context.phase(), HookPhase::PreCompile);
        assert_eq!(context.component_id().as_str(), "pkg/a");
    }
}
