//! Domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. Row-to-domain conversion lives next to the queries in [`crate::db`].

pub mod cart;
pub mod catalog;
pub mod credential;
pub mod order;
pub mod review;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use catalog::{Category, Product, ProductFilter};
pub use credential::{PasswordResetToken, TwoFactorCode};
pub use order::{Order, OrderItem, OrderWithItems};
pub use review::Review;
pub use session::{CurrentUser, PendingLogin, keys as session_keys};
pub use user::User;
