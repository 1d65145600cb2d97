//! Wrappers over native browser APIs.
//!
//! Lightweight replacements for the gloo-* crates, trimming the WASM bundle:
//! fetch, LocalStorage and the History API each get a small typed surface.

mod http;
pub mod route;
pub mod router;
mod storage;

pub use http::{HttpClient, HttpError};
pub use storage::LocalStorage;
