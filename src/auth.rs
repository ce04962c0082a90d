//! Client credentials, bearer token models, and the token lifecycle manager.

pub mod credentials;
pub mod manager;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use manager::*;
pub use secret::*;
pub use token::*;
