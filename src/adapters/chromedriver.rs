use crate::utils::error::{Result, WatchError};
use std::net::TcpListener;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};

const READY_POLL: Duration = Duration::from_millis(200);

/// 由本程式啟動並擁有的 chromedriver 行程；結束時必須呼叫 `shutdown`
pub struct ChromeDriverService {
    child: Child,
    port: u16,
}

impl ChromeDriverService {
    /// 在空閒的本機埠啟動 chromedriver，等到埠可連線為止
    pub async fn spawn(path: &Path, ready_timeout: Duration) -> Result<Self> {
        let port = free_port()?;

        let mut cmd = Command::new(path);
        cmd.arg(format!("--port={}", port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| WatchError::SessionLaunchError {
            message: format!("Failed to start chromedriver at {}: {}", path.display(), e),
        })?;
        tracing::debug!("Spawned chromedriver on port {}", port);

        let attempts = (ready_timeout.as_millis() / READY_POLL.as_millis()).max(1);
        for _ in 0..attempts {
            tokio::time::sleep(READY_POLL).await;

            if let Ok(Some(status)) = child.try_wait() {
                return Err(WatchError::SessionLaunchError {
                    message: format!(
                        "chromedriver exited before accepting connections (status: {})",
                        status
                    ),
                });
            }

            if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                return Ok(Self { child, port });
            }
        }

        // child 在 drop 時被終止
        Err(WatchError::SessionLaunchError {
            message: format!(
                "chromedriver did not listen on port {} within {}s",
                port,
                ready_timeout.as_secs()
            ),
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Ok(Some(status)) = self.child.try_wait() {
            tracing::debug!("chromedriver already exited ({})", status);
            return Ok(());
        }
        self.child
            .kill()
            .await
            .map_err(|e| WatchError::BrowserError {
                message: format!("chromedriver did not stop: {}", e),
            })?;
        tracing::debug!("chromedriver on port {} stopped", self.port);
        Ok(())
    }
}

fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
