//! The `rill` server binary.
//!
//! Wires the route table to the listener: `/static/` serves files from the
//! local `static` directory, `/calc/` does integer arithmetic, `/sleep/`
//! stalls its own connection. The only flag is `-p <port>`.

use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use rill_web::handlers::{CalcHandler, SleepHandler, StaticFileHandler};
use rill_web::{Router, Server};

/// Port the server listens on when `-p` is not given
const DEFAULT_PORT: u16 = 8080;

/// Directory served under `/static/`
const STATIC_ROOT: &str = "./static";

/// Connections served at once before the listener stops accepting
const MAX_CONNECTIONS: usize = 1024;

/// A minimal pipelined HTTP/1.1 server
#[derive(Debug, Parser)]
#[command(name = "rill")]
struct Args {
    /// Port to listen on
    #[arg(short = 'p', default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .route("/static/{*path}", StaticFileHandler::new(STATIC_ROOT))
        .route("/calc/{op}/{a}/{b}", CalcHandler)
        // calc paths with the wrong shape still answer 400, not 404
        .route("/calc/{*rest}", CalcHandler)
        .route("/sleep/{seconds}", SleepHandler)
        .build();

    let server = match Server::builder()
        .address((Ipv4Addr::UNSPECIFIED, args.port))
        .router(router)
        .max_connections(MAX_CONNECTIONS)
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(port = args.port, root = STATIC_ROOT, "rill server starting");
    match server.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "server terminated");
            ExitCode::FAILURE
        }
    }
}
