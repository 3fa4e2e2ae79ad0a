use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{load_json, save_json, LocalStore, StoreError};

const CART_KEY: &str = "cart";

/// A shop catalog item as offered to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    EmptyCart,
    /// Payments are not wired up; the cart is left untouched.
    NotAvailable,
}

/// Shopping cart hydrated from and written back to the local store.
///
/// Line items are unique by product id. The open/closed panel flag is UI
/// state only and is not persisted.
pub struct Cart {
    store: Arc<dyn LocalStore>,
    items: Vec<CartItem>,
    open: bool,
}

impl Cart {
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let items = load_json(store.as_ref(), CART_KEY).unwrap_or_default();
        Self {
            store,
            items,
            open: false,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`, starting a new line if needed.
    pub fn add(&mut self, product: &Product) -> Result<(), StoreError> {
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.id == product.id) {
            Some(line) => line.quantity += 1,
            None => items.push(CartItem {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: 1,
            }),
        }
        self.commit(items)?;
        tracing::debug!(product_id = product.id, "Added to cart");
        Ok(())
    }

    pub fn remove(&mut self, id: u32) -> Result<(), StoreError> {
        let mut items = self.items.clone();
        items.retain(|i| i.id != id);
        self.commit(items)
    }

    /// Set a line's quantity; zero removes the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: u32, quantity: u32) -> Result<(), StoreError> {
        if quantity == 0 {
            return self.remove(id);
        }
        let mut items = self.items.clone();
        if let Some(line) = items.iter_mut().find(|i| i.id == id) {
            line.quantity = quantity;
        }
        self.commit(items)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(Vec::new())
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.price * f64::from(i.quantity))
            .sum()
    }

    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn checkout(&self) -> CheckoutOutcome {
        if self.items.is_empty() {
            CheckoutOutcome::EmptyCart
        } else {
            CheckoutOutcome::NotAvailable
        }
    }

    /// Write `items` first; the in-memory cart changes only if that succeeds.
    fn commit(&mut self, items: Vec<CartItem>) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), CART_KEY, &items)?;
        self.items = items;
        Ok(())
    }
}
