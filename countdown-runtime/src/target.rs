//! Render targets
//!
//! A render target is anything that can show a countdown's formatted text:
//! a terminal line, a widget, an overlay label. Targets are shared as
//! `Arc<dyn RenderTarget>` and identified by pointer, so one `Arc` is one
//! target no matter how many clones of it the host keeps.

use std::sync::{Arc, Mutex, PoisonError};

/// Destination for formatted countdown text
pub trait RenderTarget: Send + Sync {
    /// Replace the displayed content
    fn render(&self, content: &str);

    /// Remove the displayed content
    fn clear(&self);

    /// Name used in logs and errors
    fn label(&self) -> String {
        "target".to_string()
    }
}

/// Shared handle to a render target
pub type SharedTarget = Arc<dyn RenderTarget>;

/// Identity of a target, derived from its allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TargetKey(usize);

impl TargetKey {
    pub(crate) fn of(target: &SharedTarget) -> Self {
        Self(Arc::as_ptr(target) as *const () as usize)
    }
}

/// In-memory target holding the last rendered text
#[derive(Debug, Default)]
pub struct TextTarget {
    name: String,
    content: Mutex<String>,
}

impl TextTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Mutex::new(String::new()),
        }
    }

    /// Create a target already wrapped for sharing with a scheduler
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    pub fn content(&self) -> String {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderTarget for TextTarget {
    fn render(&self, content: &str) {
        let mut current = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        current.clear();
        current.push_str(content);
    }

    fn clear(&self) {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
