//! Central state container.
//!
//! The [`Store`] owns the cart, favorites, session, and per-category filter
//! state. Callers read it through accessors and change it only by
//! dispatching an [`Intent`]. Every intent is total: intents that refer to
//! something absent are silent no-ops.

pub mod cart;
pub mod favorites;
pub mod filters;
pub mod session;

use std::collections::HashMap;

use pazar_core::{CategoryId, FilterId, Product, ProductId};

pub use cart::{Cart, CartEntry};
pub use favorites::Favorites;
pub use filters::{FilterOption, FilterSelection};
pub use session::{Session, User};

/// A requested state change.
#[derive(Debug, Clone)]
pub enum Intent {
    AddToCart(Product),
    RemoveFromCart(ProductId),
    /// Non-positive quantities remove the entry.
    UpdateQuantity {
        id: ProductId,
        quantity: i64,
    },
    IncrementQuantity(ProductId),
    DecrementQuantity(ProductId),
    ClearCart,
    ToggleFavorite(Product),
    ClearFavorites,
    SetUser(User),
    ClearUser,
    /// Reseed the filter screen for a category, discarding unapplied toggles.
    OpenFilters {
        category: CategoryId,
        selection: FilterSelection,
    },
    ToggleFilter {
        category: CategoryId,
        filter: FilterId,
    },
    /// Make the category's current selection the active filter set.
    ApplyFilters(CategoryId),
}

impl Intent {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::IncrementQuantity(_) => "increment_quantity",
            Self::DecrementQuantity(_) => "decrement_quantity",
            Self::ClearCart => "clear_cart",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::ClearFavorites => "clear_favorites",
            Self::SetUser(_) => "set_user",
            Self::ClearUser => "clear_user",
            Self::OpenFilters { .. } => "open_filters",
            Self::ToggleFilter { .. } => "toggle_filter",
            Self::ApplyFilters(_) => "apply_filters",
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    cart: Cart,
    favorites: Favorites,
    session: Session,
    filters: HashMap<CategoryId, FilterSelection>,
    applied: HashMap<CategoryId, Vec<FilterOption>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, intent: Intent) {
        tracing::debug!(intent = intent.name(), "Dispatching intent");

        match intent {
            Intent::AddToCart(product) => self.cart.add(product),
            Intent::RemoveFromCart(id) => self.cart.remove(id),
            Intent::UpdateQuantity { id, quantity } => self.cart.update_quantity(id, quantity),
            Intent::IncrementQuantity(id) => self.cart.increment(id),
            Intent::DecrementQuantity(id) => self.cart.decrement(id),
            Intent::ClearCart => self.cart.clear(),
            Intent::ToggleFavorite(product) => {
                self.favorites.toggle(product);
            }
            Intent::ClearFavorites => self.favorites.clear(),
            Intent::SetUser(user) => self.session.set_user(user),
            Intent::ClearUser => self.session.clear_user(),
            Intent::OpenFilters {
                category,
                selection,
            } => {
                self.filters.insert(category, selection);
            }
            Intent::ToggleFilter { category, filter } => {
                if let Some(selection) = self.filters.get_mut(&category) {
                    selection.toggle(filter);
                }
            }
            Intent::ApplyFilters(category) => {
                if let Some(selection) = self.filters.get(&category) {
                    self.applied.insert(category, selection.apply());
                }
            }
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The filter screen state for `category`, if it has been opened.
    #[must_use]
    pub fn filter_selection(&self, category: CategoryId) -> Option<&FilterSelection> {
        self.filters.get(&category)
    }

    /// The active filter set for `category`. Empty until filters are applied.
    #[must_use]
    pub fn applied_filters(&self, category: CategoryId) -> &[FilterOption] {
        self.applied
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use pazar_core::{Email, Price};
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    use crate::store::cart::tests::product;

    fn electronics() -> FilterSelection {
        FilterSelection::new([
            (FilterId::new(1), "Telefonlar"),
            (FilterId::new(2), "Laptoplar"),
        ])
    }

    #[test]
    fn test_cart_intents() {
        let mut store = Store::new();
        for _ in 0..3 {
            store.dispatch(Intent::AddToCart(product(7, 999)));
        }
        store.dispatch(Intent::AddToCart(product(8, 100)));
        store.dispatch(Intent::IncrementQuantity(ProductId::new(8)));
        store.dispatch(Intent::DecrementQuantity(ProductId::new(7)));

        let cart = store.cart();
        assert_eq!(cart.get(ProductId::new(7)).unwrap().quantity, 2);
        assert_eq!(cart.get(ProductId::new(8)).unwrap().quantity, 2);
        assert_eq!(cart.total(), Price::from_cents(2198));

        store.dispatch(Intent::UpdateQuantity {
            id: ProductId::new(7),
            quantity: 0,
        });
        assert!(!store.cart().contains(ProductId::new(7)));

        store.dispatch(Intent::RemoveFromCart(ProductId::new(99)));
        store.dispatch(Intent::ClearCart);
        assert!(store.cart().is_empty());
        assert_eq!(store.cart().total(), Price::ZERO);
    }

    #[test]
    fn test_favorite_intents() {
        let mut store = Store::new();
        store.dispatch(Intent::ToggleFavorite(product(1, 100)));
        store.dispatch(Intent::ToggleFavorite(product(2, 100)));
        store.dispatch(Intent::ToggleFavorite(product(1, 100)));
        assert!(!store.favorites().is_favorite(ProductId::new(1)));
        assert!(store.favorites().is_favorite(ProductId::new(2)));

        store.dispatch(Intent::ClearFavorites);
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_session_intents() {
        let mut store = Store::new();
        let email = Email::parse("eve.holt@reqres.in").unwrap();
        store.dispatch(Intent::SetUser(User::new(email, "QpwL5tke4Pnpja7X4")));
        assert!(store.session().is_authenticated());

        store.dispatch(Intent::ClearUser);
        assert!(!store.session().is_authenticated());
    }

    #[test]
    fn test_filters_are_applied_per_category() {
        let mut store = Store::new();
        let phones = CategoryId::new(1);
        store.dispatch(Intent::OpenFilters {
            category: phones,
            selection: electronics(),
        });
        store.dispatch(Intent::ToggleFilter {
            category: phones,
            filter: FilterId::new(1),
        });

        // toggling is not applying
        assert!(store.applied_filters(phones).is_empty());

        store.dispatch(Intent::ApplyFilters(phones));
        let applied = store.applied_filters(phones);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, "Telefonlar");
        assert!(store.applied_filters(CategoryId::new(2)).is_empty());
    }

    #[test]
    fn test_reopening_filters_discards_unapplied_toggles() {
        let mut store = Store::new();
        let phones = CategoryId::new(1);
        store.dispatch(Intent::OpenFilters {
            category: phones,
            selection: electronics(),
        });
        store.dispatch(Intent::ToggleFilter {
            category: phones,
            filter: FilterId::new(2),
        });
        store.dispatch(Intent::OpenFilters {
            category: phones,
            selection: electronics(),
        });
        assert!(store.filter_selection(phones).unwrap().is_all());
    }

    #[test]
    fn test_filter_intents_for_unopened_category_are_ignored() {
        let mut store = Store::new();
        let category = CategoryId::new(3);
        store.dispatch(Intent::ToggleFilter {
            category,
            filter: FilterId::new(1),
        });
        store.dispatch(Intent::ApplyFilters(category));
        assert!(store.filter_selection(category).is_none());
        assert!(store.applied_filters(category).is_empty());
    }

    fn intent() -> impl Strategy<Value = Intent> {
        let id = 1..5_i32;
        let phones = CategoryId::new(1);
        prop_oneof![
            3 => (id.clone(), 1..2_000_u32)
                .prop_map(|(id, cents)| Intent::AddToCart(product(id, cents))),
            1 => id.clone().prop_map(|id| Intent::RemoveFromCart(ProductId::new(id))),
            1 => (id.clone(), -2..6_i64).prop_map(|(id, quantity)| Intent::UpdateQuantity {
                id: ProductId::new(id),
                quantity,
            }),
            1 => id.clone().prop_map(|id| Intent::IncrementQuantity(ProductId::new(id))),
            1 => id.clone().prop_map(|id| Intent::DecrementQuantity(ProductId::new(id))),
            1 => Just(Intent::ClearCart),
            2 => id.prop_map(|id| Intent::ToggleFavorite(product(id, 100))),
            1 => Just(Intent::OpenFilters {
                category: phones,
                selection: electronics(),
            }),
            3 => (0..4_i32).prop_map(move |filter| Intent::ToggleFilter {
                category: phones,
                filter: FilterId::new(filter),
            }),
            1 => Just(Intent::ApplyFilters(phones)),
        ]
    }

    proptest! {
        #![proptest_config(Config::with_cases(256))]

        #[test]
        fn test_invariants_hold_for_any_intent_sequence(
            intents in proptest::collection::vec(intent(), 0..60)
        ) {
            let phones = CategoryId::new(1);
            let mut store = Store::new();
            for intent in intents {
                store.dispatch(intent);

                let cart = store.cart();
                let expected: Price = cart.entries().iter().map(CartEntry::line_total).sum();
                prop_assert_eq!(cart.total(), expected);
                prop_assert!(cart.entries().iter().all(|e| e.quantity >= 1));

                if let Some(selection) = store.filter_selection(phones) {
                    let specific = selection
                        .options()
                        .iter()
                        .filter(|o| !o.is_all() && o.selected)
                        .count();
                    prop_assert!(selection.is_all() != (specific >= 1));
                }

                let applied = store.applied_filters(phones);
                let applied_all = applied.iter().any(FilterOption::is_all);
                prop_assert!(!applied_all || applied.len() == 1);
            }
        }
    }
}
