//! Shared request/response contracts between the frontend and the backend.
//!
//! Plain serde data types only; no behavior lives here.

pub mod system;
