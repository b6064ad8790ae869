use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::loader::TableCache;
use crate::data::model::Table;
use crate::data::view::ViewKind;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once table snapshots, keyed by source path.
    pub cache: TableCache,

    /// Path of the currently displayed survey file.
    pub source_path: Option<PathBuf>,

    /// Loaded table (None until a file is opened).
    pub table: Option<Arc<Table>>,

    /// Currently selected dashboard view.
    pub view: ViewKind,

    /// Per-view requested variables, in selection order.  An empty list
    /// means "show the view's full default set".
    selections: BTreeMap<ViewKind, Vec<String>>,

    /// Scatter comparison axes (Variables Relation view).
    pub scatter_x: String,
    pub scatter_y: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let scatter = ViewKind::VariablesRelation.scatter_variables();
        Self {
            cache: TableCache::new(),
            source_path: None,
            table: None,
            view: ViewKind::Overview,
            selections: BTreeMap::new(),
            scatter_x: scatter.first().copied().unwrap_or_default().to_string(),
            scatter_y: scatter.get(1).copied().unwrap_or_default().to_string(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Open a survey file through the cache.  On failure the previous table
    /// stays in place and the error lands in `status_message`.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                log::info!(
                    "opened {} ({} rows, columns {:?})",
                    path.display(),
                    table.len(),
                    table.column_names()
                );
                self.table = Some(table);
                self.source_path = Some(path.to_path_buf());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("failed to open {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current file from disk, bypassing the cache.
    pub fn reload(&mut self) {
        let Some(path) = self.source_path.clone() else {
            return;
        };
        match self.cache.reload(&path) {
            Ok(table) => {
                log::info!("reloaded {} ({} rows)", path.display(), table.len());
                self.table = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("failed to reload {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_view(&mut self, view: ViewKind) {
        if self.view != view {
            log::debug!("switching view to {}", view.name());
            self.view = view;
        }
    }

    /// The requested variables of the current view, in selection order.
    pub fn requested(&self) -> &[String] {
        self.selections
            .get(&self.view)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.requested().iter().any(|c| c == column)
    }

    /// Toggle a variable in the current view's request, keeping the order
    /// in which variables were picked.
    pub fn toggle_variable(&mut self, column: &str) {
        let request = self.selections.entry(self.view).or_default();
        if let Some(pos) = request.iter().position(|c| c == column) {
            request.remove(pos);
        } else {
            request.push(column.to_string());
        }
    }

    /// Clear the current view's request, falling back to its default set.
    pub fn clear_selection(&mut self) {
        self.selections.remove(&self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_preserves_selection_order() {
        let mut state = AppState::default();
        state.set_view(ViewKind::CustomerBehavior);

        state.toggle_variable("Daily_Customers");
        state.toggle_variable("Sales_Tracking");
        assert_eq!(state.requested(), ["Daily_Customers", "Sales_Tracking"]);

        state.toggle_variable("Daily_Customers");
        assert_eq!(state.requested(), ["Sales_Tracking"]);

        state.clear_selection();
        assert!(state.requested().is_empty());
    }

    #[test]
    fn selections_are_scoped_per_view() {
        let mut state = AppState::default();
        state.set_view(ViewKind::CustomerBehavior);
        state.toggle_variable("Daily_Customers");

        state.set_view(ViewKind::FoodPreparation);
        assert!(state.requested().is_empty());

        state.set_view(ViewKind::CustomerBehavior);
        assert_eq!(state.requested(), ["Daily_Customers"]);
    }

    #[test]
    fn default_scatter_axes_differ() {
        let state = AppState::default();
        assert_ne!(state.scatter_x, state.scatter_y);
    }
}
