pub mod cart;
pub mod checkout;
pub mod location;
pub mod menu;
pub mod notification;
pub mod order;
pub mod payment;

mod router;
pub use router::get_router;
