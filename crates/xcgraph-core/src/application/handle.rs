use std::sync::{Arc, Weak};

use crate::{application::ApplicationError, domain::RawProject};

/// Non-owning reference to a raw project that is being mapped.
///
/// Mapping holds one of these instead of the project itself, so dropping
/// every owner mid-pass surfaces as [`ApplicationError::ProjectObjectsReleased`]
/// rather than keeping stale data alive.
#[derive(Debug, Clone)]
pub struct ProjectHandle(Weak<RawProject>);

impl ProjectHandle {
    pub fn new(project: &Arc<RawProject>) -> Self {
        Self(Arc::downgrade(project))
    }

    /// A handle whose project is already gone.
    pub fn released() -> Self {
        Self(Weak::new())
    }

    pub fn upgrade(&self) -> Result<Arc<RawProject>, ApplicationError> {
        self.0.upgrade().ok_or(ApplicationError::ProjectObjectsReleased)
    }

    pub fn is_released(&self) -> bool {
        self.0.strong_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_fails_once_owner_is_dropped() {
        let project = Arc::new(RawProject::default());
        let handle = ProjectHandle::new(&project);
        assert!(handle.upgrade().is_ok());

        drop(project);
        assert!(handle.is_released());
        assert_eq!(
            handle.upgrade().unwrap_err(),
            ApplicationError::ProjectObjectsReleased
        );
    }
}
