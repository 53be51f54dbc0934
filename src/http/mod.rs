//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, inbound rule match, upstream forward)
//!     → request.rs (add request ID)
//!     → response.rs (rewrite Location through outbound rules)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, RequestIdLayer, X_REQUEST_ID};
pub use response::rewrite_location;
pub use server::{AppState, GatewayServer};
