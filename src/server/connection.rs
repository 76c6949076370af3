// Connection handling module
// Serves one TCP connection with HTTP/1.1 in its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::guard::HeadGuard;
use crate::config::AppState;
use crate::handler;
use crate::http;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// Requests on one connection are served in order; with keep-alive enabled the
/// connection stays open until the client closes it.
/// Errors end this connection only.
pub fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(HeadGuard::new(stream));

        // Build HTTP/1 connection; header names go out as `Cache-Control`, not `cache-control`.
        // Half-close keeps an in-flight response alive when the guard ends the read side.
        let mut builder = http1::Builder::new();
        builder
            .keep_alive(state.config.server.keep_alive)
            .half_close(true)
            .title_case_headers(true);

        let service_state = Arc::clone(&state);
        let service =
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state)));

        match builder.serve_connection(io, service).without_shutdown().await {
            Ok(parts) => close(parts.io.into_inner(), peer_addr, &state).await,
            Err(err) if err.is_incomplete_message() => {
                logger::log_debug(&format!("Client {peer_addr} closed mid-request: {err}"));
            }
            Err(err) => logger::log_connection_error(&format!("{peer_addr}: {err}")),
        }
    });
}

/// Answer a refused request head, then close the socket
async fn close(guard: HeadGuard<TcpStream>, peer_addr: SocketAddr, state: &AppState) {
    let rejected = guard.rejected();
    let mut stream = guard.into_inner();

    if let Some(status) = rejected {
        logger::log_warning(&format!("Refused request from {peer_addr}: {status}"));
        let response = http::encode_raw_error(status, &state.config.http.server_name);
        if let Err(e) = stream.write_all(&response).await {
            logger::log_debug(&format!("Could not send {status} to {peer_addr}: {e}"));
        }
    }

    let _ = stream.shutdown().await;
}
