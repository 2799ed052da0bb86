//! Route handlers and server wiring for the rill HTTP server.
//!
//! This crate sits on top of [`rill_http`]: it owns the route table, the
//! three route handlers (static files, arithmetic, sleep) and the listener
//! that spawns one connection task per accepted stream.

mod handler;
mod request;
mod responder;
mod server;

pub mod handlers;
pub mod router;

pub use handler::RequestHandler;
pub use request::PathParams;
pub use request::RequestContext;
pub use responder::Responder;
pub use router::Router;
pub use server::Server;
pub use server::ServerBuildError;
