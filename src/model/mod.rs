//! Domain records. The store hooks live in [`crate::cheese_actor`] and [`crate::user_actor`].

pub mod cheese_listing;
pub mod derived;
pub mod user;

pub use cheese_listing::*;
pub use user::*;
