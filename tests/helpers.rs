// Shared test helpers for range cache setup and fake network peers.
//
// Included by other test files with `mod helpers;`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::SqlitePool;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use wifi_locator::error_handling::ProviderError;
use wifi_locator::storage::{init_db_pool_with_path, run_migrations};
use wifi_locator::{LocationResult, LocationSource};

/// Creates a file-backed pool with migrations applied.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool_with_path(db_path: &Path) -> Arc<SqlitePool> {
    let pool = init_db_pool_with_path(db_path)
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Serves `body` as a 200 JSON response to up to `count` HTTP requests.
/// Returns the base URL and the number of requests served so far.
#[allow(dead_code)]
pub async fn serve_json(body: &'static str, count: usize) -> (String, Arc<std::sync::atomic::AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&served);
    tokio::spawn(async move {
        for _ in 0..count {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });
    (format!("http://{}/", addr), served)
}

/// Answers up to `count` WHOIS queries with `text`, recording each query line.
#[allow(dead_code)]
pub async fn serve_whois(
    text: &'static str,
    count: usize,
) -> (u16, Arc<std::sync::Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let queries = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = Arc::clone(&queries);
    tokio::spawn(async move {
        for _ in 0..count {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 256];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            seen.lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf[..n]).into_owned());
            let _ = socket.write_all(text.as_bytes()).await;
        }
    });
    (port, queries)
}

/// What a [`StubSource`] does when located.
#[allow(dead_code)]
pub enum Stub {
    At(f64, f64),
    Nothing,
    Broken,
}

/// Location source with a fixed answer after a fixed delay.
pub struct StubSource {
    pub module: &'static str,
    pub delay: Duration,
    pub stub: Stub,
}

#[allow(dead_code)]
pub fn stub(module: &'static str, delay_ms: u64, stub: Stub) -> Arc<dyn LocationSource> {
    Arc::new(StubSource {
        module,
        delay: Duration::from_millis(delay_ms),
        stub,
    })
}

impl LocationSource for StubSource {
    fn module(&self) -> &str {
        self.module
    }

    fn locate(&self) -> BoxFuture<'_, Result<Option<LocationResult>, ProviderError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            match self.stub {
                Stub::At(lat, lon) => Ok(Some(
                    LocationResult::found(self.module, lat, lon).with_bssid("00:11:22:aa:bb:cc"),
                )),
                Stub::Nothing => Ok(None),
                Stub::Broken => Err(ProviderError::Malformed("connection reset by peer".into())),
            }
        })
    }
}
