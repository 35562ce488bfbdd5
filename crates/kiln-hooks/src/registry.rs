//! Hook registry.
//!
//! Maintains an ordered collection of [`CompileObserver`] instances per
//! [`HookPhase`]. The registry is the source of truth for which observers
//! are active and what order they run in: registration order, with same-name
//! registration replacing the previous observer.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::observer::CompileObserver;
use crate::types::HookPhase;

/// Registry of compile lifecycle observers.
#[derive(Default)]
pub struct HookRegistry {
    observers: HashMap<HookPhase, Vec<Arc<dyn CompileObserver>>>,
}

impl HookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
        }
    }

    /// Register an observer for its declared phase.
    ///
    /// An observer with the same name already registered for the phase is
    /// replaced; otherwise the observer is appended, preserving
    /// registration order for dispatch.
    pub fn register(&mut self, observer: Arc<dyn CompileObserver>) {
        let phase = observer.phase();
        let name = observer.name().to_owned();

        let observers = self.observers.entry(phase).or_default();
        observers.retain(|existing| existing.name() != name);
        debug!(name = %name, phase = %phase, "registering observer");
        observers.push(observer);
    }

    /// Unregister an observer by name, across all phases.
    ///
    /// Returns `true` if an observer was found and removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let mut found = false;
        for observers in self.observers.values_mut() {
            let before = observers.len();
            observers.retain(|observer| observer.name() != name);
            if observers.len() < before {
                found = true;
            }
        }
        if found {
            debug!(name = %name, "unregistered observer");
        }
        found
    }

    /// Observers for a phase, in registration order.
    #[must_use]
    pub fn observers_for(&self, phase: HookPhase) -> Vec<Arc<dyn CompileObserver>> {
        self.observers.get(&phase).cloned().unwrap_or_default()
    }

    /// Names of all registered observers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .observers
            .values()
            .flatten()
            .map(|observer| observer.name().to_owned())
            .collect();
        names.sort();
        names
    }

    /// Total number of registered observers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.observers.values().map(Vec::len).sum()
    }

    /// Whether the registry has no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::errors::HookError;
    use crate::types::HookContext;

    use super::*;

    struct TestObserver {
        name: String,
        phase: HookPhase,
    }

    #[async_trait]
    impl CompileObserver for TestObserver {
        fn name(&self) -> &str {
            &self.name
        }

        fn phase(&self) -> HookPhase {
            self.phase
        }

        async fn notify(&self, _context: &HookContext) -> Result<(), HookError> {
            Ok(())
        }
    }

    fn observer(name: &str, phase: HookPhase) -> Arc<dyn CompileObserver> {
        Arc::new(TestObserver {
            name: name.to_owned(),
            phase,
        })
    }

    #[test]
    fn register_preserves_registration_order() {
        let mut registry = HookRegistry::new();
        registry.register(observer("first", HookPhase::PreCompile));
        registry.register(observer("second", HookPhase::PreCompile));

        let names: Vec<_> = registry
            .observers_for(HookPhase::PreCompile)
            .iter()
            .map(|o| o.name().to_owned())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn same_name_registration_replaces() {
        let mut registry = HookRegistry::new();
        registry.register(observer("tagger", HookPhase::PostCompile));
        registry.register(observer("tagger", HookPhase::PostCompile));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn unregister_removes_across_phases() {
        let mut registry = HookRegistry::new();
        registry.register(observer("tagger", HookPhase::PreCompile));
        registry.register(observer("tagger", HookPhase::PostCompile));
        assert!(registry.unregister("tagger"));
        assert!(registry.is_empty());
        assert!(!registry.unregister("tagger"));
    }

    #[test]
    fn observers_for_unknown_phase_is_empty() {
        let registry = HookRegistry::new();
        assert!(registry.observers_for(HookPhase::PostCompile).is_empty());
    }
}
