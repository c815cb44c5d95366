//! REST API for the wait list.
//!
//! Reads are answered from the store's published snapshot and the runtime's
//! countdown board. Mutations are forwarded to the runtime and awaited.

pub mod handlers;
pub mod router;
pub mod server;
