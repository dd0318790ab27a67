//! Outgoing request types

mod method;
mod params;

pub use method::HttpMethod;
pub use params::RequestParams;
