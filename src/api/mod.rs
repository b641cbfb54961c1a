//! Request and response bodies of the HTTP API.

pub mod requests;
pub mod responses;

pub use requests::{decode, parse_id, Validate};
