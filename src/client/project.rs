//! Current project selection.
//!
//! The executor only reads the current project id to parameterize task
//! calls. Login and signup record the backend's project map here.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage for the current project and the known projects.
pub trait ProjectStore: Send + Sync {
    /// The currently selected project id.
    fn current_project(&self) -> Option<String>;

    /// Replace the known projects and the selection.
    fn set_projects(&self, current: Option<String>, projects: HashMap<String, String>);

    /// Known projects, name to id.
    fn projects(&self) -> HashMap<String, String>;

    /// Select a project by name. Returns the selected id, or `None` if the
    /// name is unknown (the selection is left unchanged).
    fn select_by_name(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Default)]
struct Selection {
    current: Option<String>,
    projects: HashMap<String, String>,
}

/// Process-lifetime [`ProjectStore`].
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    inner: RwLock<Selection>,
}

impl InMemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `project_id` selected.
    pub fn with_current(project_id: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.write().current = Some(project_id.into());
        store
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn current_project(&self) -> Option<String> {
        self.inner.read().current.clone()
    }

    fn set_projects(&self, current: Option<String>, projects: HashMap<String, String>) {
        let mut inner = self.inner.write();
        inner.current = current;
        inner.projects = projects;
    }

    fn projects(&self) -> HashMap<String, String> {
        self.inner.read().projects.clone()
    }

    fn select_by_name(&self, name: &str) -> Option<String> {
        let mut inner = self.inner.write();
        let id = inner.projects.get(name).cloned()?;
        inner.current = Some(id.clone());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_by_name() {
        let store = InMemoryProjectStore::new();
        store.set_projects(
            Some("p1".into()),
            HashMap::from([
                ("Inbox".to_string(), "p1".to_string()),
                ("Launch".to_string(), "p2".to_string()),
            ]),
        );

        assert_eq!(store.current_project().as_deref(), Some("p1"));
        assert_eq!(store.select_by_name("Launch").as_deref(), Some("p2"));
        assert_eq!(store.current_project().as_deref(), Some("p2"));

        assert_eq!(store.select_by_name("Missing"), None);
        assert_eq!(store.current_project().as_deref(), Some("p2"));
    }
}
