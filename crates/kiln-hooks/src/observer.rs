//! Compile observer trait.
//!
//! Observers are registered with the [`HookRegistry`](crate::registry::HookRegistry)
//! and notified by the [`HookDispatcher`](crate::dispatcher::HookDispatcher)
//! when their phase fires.

use async_trait::async_trait;

use crate::errors::HookError;
use crate::types::{HookContext, HookPhase};

/// A lifecycle observer for one notification phase.
///
/// Notifications are fire-and-forget from the build's perspective: an
/// observer error is logged by the dispatcher and never fails the build
/// (fail-open).
#[async_trait]
pub trait CompileObserver: Send + Sync {
    /// Unique name for this observer.
    fn name(&self) -> &str;

    /// Which phase this observer subscribes to.
    fn phase(&self) -> HookPhase;

    /// Optional filter. Return `false` to skip this observer for a context.
    fn should_notify(&self, _context: &HookContext) -> bool {
        true
    }

    /// Receive the notification.
    async fn notify(&self, context: &HookContext) -> Result<(), HookError>;
}

#[cfg(test)]
mod tests {
    use kiln_core::ids::ComponentId;

    use super::*;

    struct NoopObserver;

    #[async_trait]
    impl CompileObserver for NoopObserver {
        fn name(&self) -> &str {
            "noop"
        }

        fn phase(&self) -> HookPhase {
            HookPhase::PreCompile
        }

        async fn notify(&self, _context: &HookContext) -> Result<(), HookError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_filter_always_notifies() {
        let observer = NoopObserver;
        let context = HookContext::PreCompile {
            component_id: ComponentId::new("pkg/a"),
            component: serde_json::Value::Null,
        };
        assert!(observer.should_notify(&context));
        observer.notify(&context).await.unwrap();
    }
}
