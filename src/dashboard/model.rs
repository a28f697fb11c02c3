//! Dashboard and widget data model

use crate::viz::{RenderModel, WidgetConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Public,
}

/// Grid placement of a widget on its dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for WidgetLayout {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 4,
            height: 3,
        }
    }
}

/// One chart/table/counter bound to a query and a render configuration.
///
/// An empty `id` means "not yet inserted"; the composer assigns one on
/// insertion. Ids are unique only within the owning dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub query: String,
    pub config: WidgetConfig,
    /// Last render model computed by the editor; the composer never
    /// recomputes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_cache: Option<RenderModel>,
    #[serde(default)]
    pub layout: WidgetLayout,
}

/// Named, ordered collection of widgets. Widget order is render order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub widgets: Vec<Widget>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
