use bigdecimal::{BigDecimal, Signed};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    match price.is_negative() {
        false => Ok(()),
        true => Err(ValidationError::new("INVALID_PRICE")
            .with_message(Cow::from("Price cannot be negative"))),
    }
}

/// An ingredient added to or removed from a cart line.
#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartItemModification {
    pub ingredient_id: i32,
    #[serde(default)]
    pub ingredient_name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: BigDecimal,
    #[serde(default)]
    pub extra: bool,
    #[serde(default)]
    pub removed: bool,
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_item_id: i32,
    #[serde(default)]
    pub menu_item_name: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom(function = "validate_price"))]
    pub unit_price: BigDecimal,
    #[validate(custom(function = "validate_price"))]
    pub base_price: BigDecimal,
    #[serde(default)]
    #[validate(nested)]
    pub modifications: Vec<CartItemModification>,
}

/// Number of pizzas in the cart, ignoring nonsensical negative quantities.
/// Saturates instead of overflowing on absurd carts.
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .map(|item| item.quantity.max(0) as u32)
        .fold(0, u32::saturating_add)
}
