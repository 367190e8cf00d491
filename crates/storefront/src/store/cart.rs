//! Shopping cart.
//!
//! Entries are kept in insertion order for display. The total is a cached
//! view recomputed from the entries after every mutation, never adjusted
//! on its own.

use serde::Serialize;

use pazar_core::{Price, Product, ProductId};

/// A product snapshot with its quantity. `quantity` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Cart state: at most one entry per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
    total: Price,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`. An existing entry keeps its original
    /// snapshot and has its quantity incremented.
    pub fn add(&mut self, product: Product) {
        match self.position(product.id) {
            Some(idx) => {
                if let Some(entry) = self.entries.get_mut(idx) {
                    entry.quantity = entry.quantity.saturating_add(1);
                }
            }
            None => self.entries.push(CartEntry {
                product,
                quantity: 1,
            }),
        }
        self.recompute();
    }

    /// Remove the entry for `id`. Absent ids are ignored.
    pub fn remove(&mut self, id: ProductId) {
        self.entries.retain(|entry| entry.product.id != id);
        self.recompute();
    }

    /// Set the quantity for `id`. A quantity of zero or less removes the
    /// entry; absent ids are ignored.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(entry) = self.entry_mut(id) {
            entry.quantity = quantity;
            self.recompute();
        }
    }

    /// Add one unit to an existing entry.
    pub fn increment(&mut self, id: ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, i64::from(quantity) + 1);
        }
    }

    /// Take one unit from an existing entry, removing it at zero.
    pub fn decrement(&mut self, id: ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, i64::from(quantity) - 1);
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = Price::ZERO;
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.product.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Σ price × quantity over current entries.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.product.id == id)
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.product.id == id)
    }

    fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|entry| entry.quantity)
    }

    fn recompute(&mut self) {
        self.total = self.entries.iter().map(CartEntry::line_total).sum();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    use pazar_core::{Category, CategoryId, ImageList};
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use rust_decimal::Decimal;

    pub(crate) fn product(id: i32, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            description: String::new(),
            images: ImageList::single(format!("https://cdn.example.com/{id}.png")).unwrap(),
            category: Category::new(CategoryId::new(1), "Elektronik"),
        }
    }

    fn expected_total(cart: &Cart) -> Price {
        cart.entries()
            .iter()
            .map(|e| e.product.price.times(e.quantity))
            .sum()
    }

    #[test]
    fn test_add_same_product_accumulates() {
        let mut cart = Cart::new();
        let p = product(7, 999);
        for _ in 0..3 {
            cart.add(p.clone());
        }

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.get(ProductId::new(7)).unwrap().quantity, 3);
        assert_eq!(cart.total().amount(), Decimal::new(2997, 2));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product(3, 100));
        cart.add(product(1, 100));
        cart.add(product(3, 100));
        let ids: Vec<i32> = cart.entries().iter().map(|e| e.product.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add(product(7, 999));
        cart.add(product(7, 1));
        assert_eq!(cart.total(), Price::from_cents(1998));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        cart.add(product(2, 250));

        cart.remove(ProductId::new(1));
        let after_first = cart.clone();
        cart.remove(ProductId::new(1));

        assert_eq!(cart, after_first);
        assert_eq!(cart.total(), Price::from_cents(250));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        cart.update_quantity(ProductId::new(1), 0);
        assert!(!cart.contains(ProductId::new(1)));
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        cart.update_quantity(ProductId::new(1), -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        cart.update_quantity(ProductId::new(1), 4);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 4);
        assert_eq!(cart.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        let before = cart.clone();
        cart.update_quantity(ProductId::new(99), 3);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = Cart::new();
        cart.add(product(1, 100));
        cart.increment(ProductId::new(1));
        assert_eq!(cart.item_count(), 2);
        cart.decrement(ProductId::new(1));
        cart.decrement(ProductId::new(1));
        assert!(cart.is_empty());
        // absent id
        cart.increment(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_resets_total() {
        let mut cart = Cart::new();
        cart.add(product(1, 500));
        cart.add(product(2, 700));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_total_matches_entries_after_every_mutation() {
        let mut cart = Cart::new();
        let steps: Vec<Box<dyn Fn(&mut Cart)>> = vec![
            Box::new(|c| c.add(product(1, 199))),
            Box::new(|c| c.add(product(2, 1050))),
            Box::new(|c| c.add(product(1, 199))),
            Box::new(|c| c.update_quantity(ProductId::new(2), 5)),
            Box::new(|c| c.decrement(ProductId::new(1))),
            Box::new(|c| c.remove(ProductId::new(3))),
            Box::new(|c| c.update_quantity(ProductId::new(1), 0)),
            Box::new(|c| c.add(product(4, 1))),
            Box::new(Cart::clear),
        ];
        for step in steps {
            step(&mut cart);
            assert_eq!(cart.total(), expected_total(&cart));
        }
    }

    #[derive(Debug, Clone)]
    enum CartOp {
        Add(i32, u32),
        Remove(i32),
        Update(i32, i64),
        Increment(i32),
        Decrement(i32),
        Clear,
    }

    fn cart_op() -> impl Strategy<Value = CartOp> {
        let id = 1..6_i32;
        prop_oneof![
            4 => (id.clone(), 0..5_000_u32).prop_map(|(id, cents)| CartOp::Add(id, cents)),
            1 => id.clone().prop_map(CartOp::Remove),
            1 => (id.clone(), -3..10_i64).prop_map(|(id, qty)| CartOp::Update(id, qty)),
            1 => id.clone().prop_map(CartOp::Increment),
            1 => id.prop_map(CartOp::Decrement),
            1 => Just(CartOp::Clear),
        ]
    }

    fn apply(cart: &mut Cart, op: &CartOp) {
        match *op {
            CartOp::Add(id, cents) => cart.add(product(id, cents)),
            CartOp::Remove(id) => cart.remove(ProductId::new(id)),
            CartOp::Update(id, qty) => cart.update_quantity(ProductId::new(id), qty),
            CartOp::Increment(id) => cart.increment(ProductId::new(id)),
            CartOp::Decrement(id) => cart.decrement(ProductId::new(id)),
            CartOp::Clear => cart.clear(),
        }
    }

    proptest! {
        #![proptest_config(Config::with_cases(256))]

        #[test]
        fn test_quantity_equals_number_of_adds(
            ids in proptest::collection::vec(1..6_i32, 0..40)
        ) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(product(*id, 100));
            }
            for id in 1..6 {
                let adds = u32::try_from(ids.iter().filter(|&&i| i == id).count()).unwrap();
                let quantity = cart.get(ProductId::new(id)).map_or(0, |e| e.quantity);
                prop_assert_eq!(quantity, adds);
            }
        }

        #[test]
        fn test_entries_and_total_hold_after_any_mutation(
            ops in proptest::collection::vec(cart_op(), 0..60)
        ) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
                prop_assert_eq!(cart.total(), expected_total(&cart));
                prop_assert!(cart.entries().iter().all(|e| e.quantity >= 1));

                let mut ids: Vec<i32> =
                    cart.entries().iter().map(|e| e.product.id.as_i32()).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.entries().len());
            }
        }

        #[test]
        fn test_second_remove_changes_nothing(
            ops in proptest::collection::vec(cart_op(), 0..40),
            id in 1..6_i32
        ) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
            }
            cart.remove(ProductId::new(id));
            let once = cart.clone();
            cart.remove(ProductId::new(id));
            prop_assert_eq!(&cart, &once);
            prop_assert!(!cart.contains(ProductId::new(id)));
        }

        #[test]
        fn test_non_positive_quantity_removes(
            ops in proptest::collection::vec(cart_op(), 0..40),
            id in 1..6_i32,
            quantity in -5..=0_i64
        ) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
            }
            cart.add(product(id, 100));
            cart.update_quantity(ProductId::new(id), quantity);
            prop_assert!(!cart.contains(ProductId::new(id)));
            prop_assert_eq!(cart.total(), expected_total(&cart));
        }
    }
}
