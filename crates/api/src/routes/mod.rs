//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness check
//! GET    /health/ready                        - Readiness check (hits the database)
//!
//! # Auth (public)
//! POST   /api/v1/auth/register                - Register (first account becomes admin)
//! POST   /api/v1/auth/login                   - Login
//! POST   /api/v1/auth/logout                  - Expire the session cookie
//!
//! # Users
//! GET    /api/v1/users                        - List non-admin users (admin)
//! GET    /api/v1/users/showMe                 - Echo the caller's token identity
//! PATCH  /api/v1/users/updateUser             - Update own name/email (re-issues cookie)
//! PATCH  /api/v1/users/updateUserPassword     - Update own password
//! GET    /api/v1/users/{id}                   - Show a user (owner or admin)
//!
//! # Products
//! POST   /api/v1/products                     - Create (admin)
//! GET    /api/v1/products                     - List (public)
//! POST   /api/v1/products/uploadImage         - Upload product image (admin)
//! GET    /api/v1/products/{id}                - Show with reviews (public)
//! PATCH  /api/v1/products/{id}                - Partial update (admin)
//! DELETE /api/v1/products/{id}                - Delete with its reviews (admin)
//! GET    /api/v1/products/{id}/reviews        - Reviews of one product (public)
//!
//! # Reviews
//! POST   /api/v1/reviews                      - Create (authenticated, one per product)
//! GET    /api/v1/reviews                      - List with product/author summaries (public)
//! GET    /api/v1/reviews/{id}                 - Show (public)
//! PATCH  /api/v1/reviews/{id}                 - Update (owner or admin)
//! DELETE /api/v1/reviews/{id}                 - Delete (owner or admin)
//!
//! # Orders
//! POST   /api/v1/orders                       - Checkout a cart
//! GET    /api/v1/orders                       - List all (admin)
//! GET    /api/v1/orders/showAllMyOrders       - List own orders
//! GET    /api/v1/orders/{id}                  - Show (owner or admin)
//! PATCH  /api/v1/orders/{id}                  - Confirm payment (owner or admin)
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/showMe", get(users::show_me))
        .route("/updateUser", patch(users::update_user))
        .route("/updateUserPassword", patch(users::update_password))
        .route("/{id}", get(users::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::index))
        .route("/uploadImage", post(products::upload_image))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/{id}/reviews", get(products::reviews))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create).get(reviews::index))
        .route(
            "/{id}",
            get(reviews::show)
                .patch(reviews::update)
                .delete(reviews::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/showAllMyOrders", get(orders::show_mine))
        .route("/{id}", get(orders::show).patch(orders::update))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/users", user_routes())
        .nest("/api/v1/products", product_routes())
        .nest("/api/v1/reviews", review_routes())
        .nest("/api/v1/orders", order_routes())
}
