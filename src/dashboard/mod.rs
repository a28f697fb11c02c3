//! Dashboard layer - widget collections and their repository

pub mod composer;
pub mod model;

pub use composer::{ComposerError, DashboardStore};
pub use model::{Dashboard, Visibility, Widget, WidgetLayout};
