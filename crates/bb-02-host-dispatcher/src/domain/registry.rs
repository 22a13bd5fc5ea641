//! # Handler Registry
//!
//! Maps decoded actions to handlers. Built once, then shared immutably by
//! every binding that uses it.

use crate::ports::inbound::ActionHandler;
use shared_protocol::BridgeAction;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<BridgeAction, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with<H>(mut self, action: impl Into<BridgeAction>, handler: H) -> Self
    where
        H: ActionHandler + 'static,
    {
        self.insert(action, Arc::new(handler));
        self
    }

    /// Register `handler` for `action`, replacing any previous one.
    ///
    /// Names outside the known vocabulary register under
    /// [`BridgeAction::Unknown`], which is how hosts add extension actions.
    pub fn insert(
        &mut self,
        action: impl Into<BridgeAction>,
        handler: Arc<dyn ActionHandler>,
    ) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.insert(action.into(), handler)
    }

    pub fn get(&self, action: &BridgeAction) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(action).cloned()
    }

    pub fn contains(&self, action: &BridgeAction) -> bool {
        self.handlers.contains_key(action)
    }

    /// Wire names of every registered action, sorted.
    pub fn actions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().map(|a| a.name().to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("actions", &self.actions())
            .finish()
    }
}
