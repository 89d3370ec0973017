//! Credential handling for authenticated downloads
//!
//! The launcher supports a single optional bearer token, read from the
//! environment (or a `.env` file loaded at startup).
//!
//! # Examples
//!
//! ```rust
//! use fooocus_launcher::auth::Credential;
//!
//! let credential = Credential::new("hf_example").unwrap();
//! assert_eq!(credential.authorization_header(), "Bearer hf_example");
//! ```

pub mod credentials;

// Re-export main public API
pub use credentials::{AuthStatus, Credential};
