//! Per-category filter selection.
//!
//! Every list starts with the "all" option (id 0) selected. At any time
//! either "all" is the only selected option, or one or more specific options
//! are selected and "all" is not.

use serde::{Deserialize, Serialize};

use pazar_core::FilterId;

/// Display name of the "all" option.
pub const ALL_FILTER_NAME: &str = "Tümü";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: FilterId,
    pub name: String,
    pub selected: bool,
}

impl FilterOption {
    /// The "all" option, selected.
    #[must_use]
    pub fn all() -> Self {
        Self {
            id: FilterId::ALL,
            name: ALL_FILTER_NAME.to_string(),
            selected: true,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.id.is_all()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    options: Vec<FilterOption>,
}

impl FilterSelection {
    /// Seed a selection from a category's specific options. The "all" option
    /// is prepended and selected; any input using id 0 is ignored.
    pub fn new<'a>(specific: impl IntoIterator<Item = (FilterId, &'a str)>) -> Self {
        let options = std::iter::once(FilterOption::all())
            .chain(
                specific
                    .into_iter()
                    .filter(|(id, _)| !id.is_all())
                    .map(|(id, name)| FilterOption {
                        id,
                        name: name.to_string(),
                        selected: false,
                    }),
            )
            .collect();
        Self { options }
    }

    /// Toggle the option with `id`.
    ///
    /// Selecting "all" clears every specific option. Toggling a specific
    /// option deselects "all", and deselecting the last specific option
    /// falls back to "all". Unknown ids are ignored.
    pub fn toggle(&mut self, id: FilterId) {
        if id.is_all() {
            self.select_only_all();
            return;
        }

        let Some(option) = self.options.iter_mut().find(|o| o.id == id) else {
            return;
        };
        option.selected = !option.selected;

        if self.options.iter().any(|o| !o.is_all() && o.selected) {
            for option in self.options.iter_mut().filter(|o| o.is_all()) {
                option.selected = false;
            }
        } else {
            self.select_only_all();
        }
    }

    /// The currently selected options, in display order.
    #[must_use]
    pub fn apply(&self) -> Vec<FilterOption> {
        self.options.iter().filter(|o| o.selected).cloned().collect()
    }

    #[must_use]
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// True when no narrowing is in effect.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.options.iter().any(|o| o.is_all() && o.selected)
    }

    fn select_only_all(&mut self) {
        for option in &mut self.options {
            option.selected = option.is_all();
        }
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
