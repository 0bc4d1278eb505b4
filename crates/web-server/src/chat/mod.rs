//! Real-time chat transport
//!
//! WebSocket routing lives in its own table, separate from the page routes.

mod hub;
mod protocol;
mod socket;

pub use hub::ChatHub;
pub use protocol::{ClientEvent, ServerEvent};
pub use socket::router;
