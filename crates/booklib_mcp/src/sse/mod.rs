//! HTTP transport with server-sent events.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! it must POST its messages to. Responses come back on the event stream as
//! `message` events, in the order the requests finished.

mod router;
mod server;
mod session;

pub use router::{build_router, SseState, MESSAGES_PATH, SSE_PATH};
pub use server::SseServer;
pub use session::SessionRegistry;
