//! Application use cases (business logic orchestration).

mod sign_request;

pub use sign_request::*;
