//! Host-supplied dropdown entries.

use std::sync::Arc;

/// Callback invoked when an entry is selected.
pub type ActionCallback = Arc<dyn Fn() + Send + Sync>;

/// One entry in the table's Actions or Export dropdown.
///
/// The table only renders the label and invokes the callback; what the
/// action does (bulk edit, CSV download, …) is entirely the host's.
#[derive(Clone)]
pub struct ActionItem {
    pub label: String,
    on_select: ActionCallback,
}

impl ActionItem {
    pub fn new(label: impl Into<String>, on_select: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_select: Arc::new(on_select),
        }
    }

    /// Invoke the entry's callback.
    pub fn invoke(&self) {
        (self.on_select)();
    }
}

impl std::fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionItem")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
