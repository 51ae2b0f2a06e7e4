use crate::{modules::cart::types::validate_price, utils::money};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemModification {
    #[serde(default)]
    pub ingredient_name: Option<String>,
    #[serde(default)]
    pub extra: bool,
    #[serde(default)]
    pub removed: bool,
}

/// One cart line as shown on the hosted payment page.
#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    #[validate(length(min = 1, message = "Menu item name is required"))]
    pub menu_item_name: String,
    #[serde(default)]
    pub menu_item_description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub unit_price: BigDecimal,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(nested)]
    pub modifications: Vec<CheckoutItemModification>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub payment_status: String,
    #[serde(serialize_with = "money::serialize_as_number")]
    pub total_amount: BigDecimal,
}
