//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the rendering core and external
//! collaborators: time, credentials and signing.

mod clock;
mod credentials_provider;
mod request_signer;

pub use clock::{Clock, SystemClock};
pub use credentials_provider::{CredentialsError, CredentialsProvider};
pub use request_signer::{RequestSigner, SigningError};
