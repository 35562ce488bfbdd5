//! Hook dispatcher.
//!
//! Walks a phase's observers in registration order. Observer failures are
//! logged and skipped — a notification can never fail the build that
//! triggered it.

use tracing::{debug, warn};

use crate::registry::HookRegistry;
use crate::types::HookContext;

/// Dispatches phase notifications to registered observers.
#[derive(Default)]
pub struct HookDispatcher {
    registry: HookRegistry,
}

impl HookDispatcher {
    /// Create a dispatcher over a registry.
    #[must_use]
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Mutable access to the underlying registry.
    pub fn registry_mut(&mut self) -> &mut HookRegistry {
        &mut self.registry
    }

    /// Notify every observer of the context's phase, in registration order.
    ///
    /// Observers that decline via `should_notify` are skipped. Observer
    /// errors are logged and do not interrupt dispatch (fail-open).
    pub async fn dispatch(&self, context: &HookContext) {
        let phase = context.phase();
        for observer in self.registry.observers_for(phase) {
            if !observer.should_notify(context) {
                continue;
            }
            debug!(observer = observer.name(), phase = %phase, "notifying observer");
            if let Err(err) = observer.notify(context).await {
                warn!(
                    observer = observer.name(),
                    phase = %phase,
                    error = %err,
                    "observer failed, continuing"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use kiln_core::ids::ComponentId;

    use crate::errors::HookError;
    use crate::observer::CompileObserver;
    use crate::types::HookPhase;

    use super::*;

    struct RecordingObserver {
        name: String,
        phase: HookPhase,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl CompileObserver for RecordingObserver {
        fn name(&self) -> &str {
            &self.name
        }

        fn phase(&self) -> HookPhase {
            self.phase
        }

        async fn notify(&self, _context: &HookContext) -> Result<(), HookError> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(HookError::Observer {
                    name: self.name.clone(),
                    message: "boom".into(),
                });
            }
            Ok(())
        }
    }

    fn pre_compile_context() -> HookContext {
        HookContext::PreCompile {
            component_id: ComponentId::new("pkg/a"),
            component: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn dispatch_notifies_only_matching_phase() {
        let calls = Arc::new(AtomicUsize::new(0));
        let other_calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(RecordingObserver {
            name: "pre".into(),
            phase: HookPhase::PreCompile,
            calls: Arc::clone(&calls),
            fail: false,
        }));
        registry.register(Arc::new(RecordingObserver {
            name: "post".into(),
            phase: HookPhase::PostCompile,
            calls: Arc::clone(&other_calls),
            fail: false,
        }));

        let dispatcher = HookDispatcher::new(registry);
        dispatcher.dispatch(&pre_compile_context()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(other_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_observer_does_not_stop_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(RecordingObserver {
            name: "failing".into(),
            phase: HookPhase::PreCompile,
            calls: Arc::clone(&calls),
            fail: true,
        }));
        registry.register(Arc::new(RecordingObserver {
            name: "second".into(),
            phase: HookPhase::PreCompile,
            calls: Arc::clone(&calls),
            fail: false,
        }));

        let dispatcher = HookDispatcher::new(registry);
        dispatcher.dispatch(&pre_compile_context()).await;

        // Both observers ran despite the first one failing.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
