//! Dashboard composer - named widget collections
//!
//! An injected repository object (never a module-level global) owning
//! the dashboard map. Mutations are last-write-wins at upsert
//! granularity: concurrent upserts on the same id simply overwrite.
//! Visibility enforcement lives in the access-control collaborator, not
//! here.

use super::model::{Dashboard, Visibility, Widget};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
pub enum ComposerError {
    DashboardNotFound(String),
}

impl std::fmt::Display for ComposerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposerError::DashboardNotFound(id) => write!(f, "Dashboard not found: {}", id),
        }
    }
}

impl std::error::Error for ComposerError {}

pub struct DashboardStore {
    dashboards: Mutex<HashMap<String, Dashboard>>,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self {
            dashboards: Mutex::new(HashMap::new()),
        }
    }

    /// Create an empty private dashboard with a fresh id.
    pub fn create(&self, name: &str, description: Option<&str>) -> Dashboard {
        let now = chrono::Utc::now();
        let dashboard = Dashboard {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(String::from),
            widgets: Vec::new(),
            visibility: Visibility::Private,
            created_at: now,
            updated_at: now,
        };

        let mut dashboards = self.dashboards.lock().unwrap();
        dashboards.insert(dashboard.id.clone(), dashboard.clone());
        log::info!("📋 Created dashboard '{}' ({})", dashboard.name, dashboard.id);
        dashboard
    }

    pub fn get_by_id(&self, id: &str) -> Option<Dashboard> {
        self.dashboards.lock().unwrap().get(id).cloned()
    }

    /// Replace-or-insert, bumping `updated_at`.
    pub fn upsert(&self, mut dashboard: Dashboard) -> Dashboard {
        dashboard.updated_at = chrono::Utc::now();
        let mut dashboards = self.dashboards.lock().unwrap();
        dashboards.insert(dashboard.id.clone(), dashboard.clone());
        dashboard
    }

    /// Append a widget, assigning an id if the widget carries none.
    /// Insertion order is render order.
    pub fn append_widget(
        &self,
        dashboard_id: &str,
        mut widget: Widget,
    ) -> Result<Widget, ComposerError> {
        let mut dashboards = self.dashboards.lock().unwrap();
        let dashboard = dashboards
            .get_mut(dashboard_id)
            .ok_or_else(|| ComposerError::DashboardNotFound(dashboard_id.to_string()))?;

        if widget.id.is_empty() {
            widget.id = Uuid::new_v4().to_string();
        }
        dashboard.widgets.push(widget.clone());
        dashboard.updated_at = chrono::Utc::now();
        Ok(widget)
    }

    /// Fork a dashboard: fresh id, derived name, deep-copied widget
    /// list. The source dashboard is untouched.
    pub fn fork(&self, source: &Dashboard) -> Dashboard {
        let now = chrono::Utc::now();
        let fork = Dashboard {
            id: Uuid::new_v4().to_string(),
            name: format!("{} (copy)", source.name),
            description: source.description.clone(),
            widgets: source.widgets.clone(),
            visibility: Visibility::Private,
            created_at: now,
            updated_at: now,
        };

        let mut dashboards = self.dashboards.lock().unwrap();
        dashboards.insert(fork.id.clone(), fork.clone());
        log::info!("🍴 Forked dashboard '{}' → {}", source.name, fork.id);
        fork
    }

    pub fn delete(&self, id: &str) -> bool {
        self.dashboards.lock().unwrap().remove(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.dashboards.lock().unwrap().len()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
