// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop
///
/// Returns once `shutdown` is notified. The listener is dropped on return, so
/// no new connections are accepted. Open connections are told to shut down
/// gracefully: idle keep-alive connections close at once, a request in
/// flight gets its response first. The returned counter reaches zero when
/// the last connection task ends.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Arc<AtomicUsize> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (drain_tx, drain_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &drain_rx);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_info("Shutdown requested, closing listener");
                drain_tx.send_replace(true);
                break;
            }
        }
    }

    active_connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::poetry::Catalog;
    use crate::server::listener::create_listener;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn quiet_state(keep_alive_timeout: u64) -> Arc<AppState> {
        let mut config = Config::defaults();
        config.logging.access_log = false;
        config.performance.keep_alive_timeout = keep_alive_timeout;
        Arc::new(AppState::new(config, Catalog::embedded().unwrap()))
    }

    /// Send a keep-alive health check and read its whole response
    async fn keep_alive_healthz(stream: &mut TcpStream) -> String {
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        while !raw.ends_with(b"}") {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the response completed");
            raw.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8(raw).unwrap()
    }

    async fn wait_for_zero(counter: &AtomicUsize, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if counter.load(Ordering::SeqCst) == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        counter.load(Ordering::SeqCst) == 0
    }

    #[tokio::test]
    async fn test_serves_call_over_tcp_and_stops() {
        let mut config = Config::defaults();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(config, Catalog::embedded().unwrap()));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(run_server_loop(listener, state, Arc::clone(&shutdown)));

        let body = r#"{"keyword": "霜"}"#;
        let request = format!(
            "POST /mcp/call HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let response = String::from_utf8(raw).unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("静夜思"));

        shutdown.notify_one();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive_connections() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(run_server_loop(listener, quiet_state(75), Arc::clone(&shutdown)));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let response = keep_alive_healthz(&mut stream).await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");

        shutdown.notify_one();
        let active = server.await.unwrap();
        assert!(
            wait_for_zero(&active, Duration::from_secs(2)).await,
            "{} connection(s) still open after shutdown",
            active.load(Ordering::SeqCst)
        );

        let mut rest = Vec::new();
        let n = tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut rest))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_idle_keep_alive_connection_times_out() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(run_server_loop(listener, quiet_state(1), Arc::clone(&shutdown)));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        keep_alive_healthz(&mut stream).await;

        // Server hangs up once the idle timeout passes
        let mut rest = Vec::new();
        let closed = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut rest)).await;
        assert!(closed.is_ok(), "idle connection was not closed");

        shutdown.notify_one();
        server.await.unwrap();
    }
}
