//! Bet storage and cell encodings

pub mod legs;
pub mod store;

// Re-export commonly used types
pub use legs::{parse_legs, serialize_legs};
pub use store::BetStore;
