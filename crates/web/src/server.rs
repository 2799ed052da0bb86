use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Response, StatusCode};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use rill_http::connection::HttpConnection;
use rill_http::handler::Handler;
use rill_http::protocol::RequestHead;

use crate::request::RequestContext;
use crate::responder::Responder;
use crate::router::Router;

/// Connections served at once before the listener stops accepting
const DEFAULT_MAX_CONNECTIONS: usize = 1024;

pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<Vec<SocketAddr>>,
    max_connections: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None, max_connections: DEFAULT_MAX_CONNECTIONS }
    }

    /// Sets the listen address; resolution failures surface at [`Self::build`].
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = address.to_socket_addrs().ok().map(|addrs| addrs.collect());
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Caps the number of simultaneously served connections.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.filter(|addrs| !addrs.is_empty()).ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { router, address, max_connections: self.max_connections })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("a resolvable listen address must be set")]
    MissingAddress,
}

/// The accept loop plus the route dispatch that every connection shares.
///
/// The server itself is the connection layer's [`Handler`]: each accepted
/// stream gets its own task and its own [`HttpConnection`], all of them
/// calling back into [`Server::dispatch`].
pub struct Server {
    router: Router,
    address: Vec<SocketAddr>,
    max_connections: usize,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Accepts connections until the process is stopped.
    ///
    /// Failing to bind is fatal and returned to the caller; everything after
    /// that terminates at most its own connection.
    pub async fn start(self) -> Result<(), std::io::Error> {
        info!(address = ?self.address, max_connections = self.max_connections, "start listening");
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        let limiter = Arc::new(Semaphore::new(self.max_connections));
        let handler = Arc::new(self);

        loop {
            // holding a permit before accepting bounds the number of live
            // connections; excess peers queue in the kernel backlog
            let permit = Arc::clone(&limiter).acquire_owned().await.expect("connection limiter never closes");

            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(handler).await {
                    Ok(()) => {
                        info!(peer = %remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(peer = %remote_addr, cause = %e, "connection closed on protocol error");
                    }
                }
                drop(permit);
            });
        }
    }

    async fn dispatch(&self, head: RequestHead) -> Response<Bytes> {
        // the reference server speaks GET only; everything else is refused
        // before routing
        if head.method() != Method::GET {
            return (StatusCode::METHOD_NOT_ALLOWED, "Only GET supported").into_response();
        }

        match self.router.at(head.uri().path()) {
            Some(matched) => {
                let ctx = RequestContext::new(&head, matched.params());
                matched.handler().invoke(ctx).await
            }
            None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}

#[async_trait]
impl Handler for Server {
    type Error = Infallible;

    async fn call(&self, head: RequestHead) -> Result<Response<Bytes>, Self::Error> {
        Ok(self.dispatch(head).await)
    }
}
