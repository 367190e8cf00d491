//! Services that sit between the HTTP surface and the outside world.
//!
//! - `auth` - login and sign-up against the external token API
//! - `payment` - mocked card payment over the current cart

pub mod auth;
pub mod payment;
