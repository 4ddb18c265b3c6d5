use std::fmt;

use crate::menu::MenuItem;

/// What a customer hands to the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    pub customer_id: usize,
    pub item: MenuItem,
}

impl Order {
    pub fn new(customer_id: usize, item: MenuItem) -> Self {
        Self { customer_id, item }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for Customer #{}", self.item, self.customer_id)
    }
}
