//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Auth
//! POST /auth/register                   - Create an account
//! POST /auth/login                      - First factor (password); emails a code
//! POST /auth/two-factor/verify          - Second factor; logs the session in
//! POST /auth/logout                     - Clear the session
//! POST /auth/password-reset             - Email a reset link
//! POST /auth/password-reset/confirm     - Redeem a reset token
//!
//! # Account (requires auth)
//! GET  /account                         - Profile
//! PUT  /account                         - Partial profile update
//! POST /account/password                - Change password
//!
//! # Catalog (reads public, mutations staff-only)
//! GET    /categories                    - List categories
//! POST   /categories                    - Create category
//! GET    /categories/{id}               - Category detail
//! PUT    /categories/{id}               - Replace category
//! DELETE /categories/{id}               - Delete category
//! GET    /products                      - List/search products
//! POST   /products                      - Create product
//! GET    /products/{id}                 - Product detail
//! PUT    /products/{id}                 - Replace product
//! DELETE /products/{id}                 - Delete product
//!
//! # Reviews
//! GET  /products/{id}/reviews           - List reviews (staff see unapproved)
//! POST /products/{id}/reviews           - Submit a review (requires auth)
//! POST /reviews/{id}/approve            - Approve a review (staff)
//!
//! # Cart (requires auth)
//! GET    /cart                          - List cart lines
//! POST   /cart/items                    - Add a product
//! PUT    /cart/items/{id}               - Set line quantity
//! DELETE /cart/items/{id}               - Remove a line
//!
//! # Orders (requires auth)
//! GET  /orders                          - Order history
//! POST /orders                          - Place an order from the cart
//! GET  /orders/{id}                     - Order detail with items
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/two-factor/verify", post(auth::verify_two_factor))
        .route("/logout", post(auth::logout))
        .route("/password-reset", post(auth::request_password_reset))
        .route(
            "/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).put(account::update_profile))
        .route("/password", post(account::change_password))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
}

/// Create the product routes router, including nested reviews.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route(
            "/{id}/reviews",
            get(reviews::index).post(reviews::create),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::place))
        .route("/{id}", get(orders::show))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .route("/reviews/{id}/approve", post(reviews::approve))
}
