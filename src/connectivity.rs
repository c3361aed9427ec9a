//! Network reachability checks.

use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Reports whether the network is currently reachable.
pub trait Connectivity: Send + Sync {
  fn is_connected(&self) -> impl Future<Output = bool> + Send;
}

/// Probes reachability by opening a TCP connection to the API host.
pub struct TcpProbe {
  addr: String,
  timeout: Duration,
}

impl TcpProbe {
  pub fn new(addr: impl Into<String>) -> Self {
    Self {
      addr: addr.into(),
      timeout: Duration::from_secs(5),
    }
  }

  /// Probe the host and port `base_url` points at.
  pub fn for_url(base_url: &Url) -> Option<Self> {
    let host = base_url.host_str()?;
    let port = base_url.port_or_known_default()?;
    Some(Self::new(format!("{}:{}", host, port)))
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn addr(&self) -> &str {
    &self.addr
  }
}

impl Connectivity for TcpProbe {
  async fn is_connected(&self) -> bool {
    let connected = matches!(
      tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(&self.addr)).await,
      Ok(Ok(_))
    );
    debug!(addr = %self.addr, connected, "Connectivity probe");
    connected
  }
}

/// Fixed answer; used when the user forces a state and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl Connectivity for StaticConnectivity {
  async fn is_connected(&self) -> bool {
    self.0
  }
}

/// Either a live probe or a forced answer, chosen at startup.
pub enum Oracle {
  Probe(TcpProbe),
  Static(StaticConnectivity),
}

impl Connectivity for Oracle {
  async fn is_connected(&self) -> bool {
    match self {
      Self::Probe(probe) => probe.is_connected().await,
      Self::Static(fixed) => fixed.is_connected().await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_probe_address_from_url() {
    let url = Url::parse("https://hadeethenc.com/api/v1").unwrap();
    assert_eq!(TcpProbe::for_url(&url).unwrap().addr(), "hadeethenc.com:443");

    let url = Url::parse("http://127.0.0.1:8080/api").unwrap();
    assert_eq!(TcpProbe::for_url(&url).unwrap().addr(), "127.0.0.1:8080");
  }

  #[tokio::test]
  async fn test_probe_reaches_local_listener() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let probe = TcpProbe::new(addr.to_string());
    assert!(probe.is_connected().await);
  }

  #[tokio::test]
  async fn test_probe_fails_on_closed_port() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let probe = TcpProbe::new(addr.to_string()).with_timeout(Duration::from_millis(500));
    assert!(!probe.is_connected().await);
  }

  #[tokio::test]
  async fn test_static_connectivity() {
    assert!(StaticConnectivity(true).is_connected().await);
    assert!(!StaticConnectivity(false).is_connected().await);
  }
}
