//! Business services.
//!
//! Everything with real invariants lives here, as explicit steps the route
//! handlers compose: authentication, the session-token contract, the
//! ownership guard, the order pipeline, and the rating aggregator.

pub mod auth;
pub mod checkout;
pub mod payments;
pub mod permissions;
pub mod ratings;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService};
pub use payments::{PaymentError, PaymentGateway, StripeClient};
pub use permissions::{PermissionError, check_permissions};
pub use token::{TOKEN_COOKIE, TokenError, TokenSessions};
