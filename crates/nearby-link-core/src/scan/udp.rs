//! UDP beacon scan driver.
//!
//! Listens for advertisement datagrams broadcast by beacon peers on the
//! local network. Uses SO_REUSEPORT so several tools can scan concurrently.

use std::net::SocketAddr;
use std::sync::Mutex;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use super::{DetectionSink, ScanDriver};
use crate::error::ScanError;
use crate::types::{Advertisement, Detection};

/// Default UDP port beacons advertise on
pub const ADVERTISEMENT_PORT: u16 = 3737;

/// Create a UDP socket with SO_REUSEPORT for concurrent operation.
pub fn create_reusable_socket(port: u16) -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], port));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Parse an advertisement datagram into a `Detection`.
///
/// This is a standalone function to allow easy testing without requiring a socket.
pub fn parse_advertisement(data: &[u8]) -> Result<Detection, ScanError> {
    let json: serde_json::Value = serde_json::from_slice(data)?;

    let id = match json["id"].as_str() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ScanError::MissingIdentity),
    };

    let advertisement = Advertisement {
        name: json["name"].as_str().map(|s| s.to_string()),
        uri: json["uri"].as_str().map(|s| s.to_string()),
        tx_power: json["txPower"].as_i64().map(|v| v as i8),
    };

    Ok(Detection::new(id, json["rssi"].as_i64().unwrap_or(-127) as i16, advertisement))
}

/// Scan driver that listens for UDP advertisement datagrams.
pub struct UdpBeaconDriver {
    port: u16,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl UdpBeaconDriver {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            listener: Mutex::new(None),
        }
    }
}

impl Default for UdpBeaconDriver {
    fn default() -> Self {
        Self::new(ADVERTISEMENT_PORT)
    }
}

impl ScanDriver for UdpBeaconDriver {
    fn start_scan(&self, sink: DetectionSink) -> Result<(), ScanError> {
        let std_socket = create_reusable_socket(self.port)?;
        let socket = UdpSocket::from_std(std_socket)?;

        let handle = tokio::spawn(async move {
            let mut buf = vec![0u8; 2048];

            loop {
                match socket.recv_from(&mut buf).await {
                    Ok((len, addr)) => match parse_advertisement(&buf[..len]) {
                        Ok(detection) => {
                            if sink.send(detection).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(%addr, error = %e, "ignoring malformed advertisement");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "UDP receive error");
                    }
                }
            }
        });

        if let Some(previous) = self.listener.lock().unwrap().replace(handle) {
            previous.abort();
        }

        Ok(())
    }

    fn stop_scan(&self) {
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for UdpBeaconDriver {
    fn drop(&mut self) {
        self.stop_scan();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PeerId;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_parse_advertisement() {
        let json = r#"{
            "id": "AA:BB:CC:DD:EE:FF",
            "name": "lobby-beacon",
            "uri": "https://example.com/lobby",
            "rssi": -62,
            "txPower": -4
        }"#;

        let detection = parse_advertisement(json.as_bytes()).unwrap();

        assert_eq!(detection.id, PeerId::from("AA:BB:CC:DD:EE:FF"));
        assert_eq!(detection.rssi, -62);
        assert_eq!(detection.advertisement.name.as_deref(), Some("lobby-beacon"));
        assert_eq!(detection.advertisement.uri.as_deref(), Some("https://example.com/lobby"));
        assert_eq!(detection.advertisement.tx_power, Some(-4));
    }

    #[test]
    fn test_parse_minimal_advertisement() {
        // Minimal datagram with only the identity
        let json = r#"{"id": "AA:BB"}"#;

        let detection = parse_advertisement(json.as_bytes()).unwrap();

        assert_eq!(detection.id, PeerId::from("AA:BB"));
        assert_eq!(detection.rssi, -127);
        assert_eq!(detection.advertisement.name, None);
        assert_eq!(detection.advertisement.uri, None);
    }

    #[test]
    fn test_parse_advertisement_invalid_json() {
        let result = parse_advertisement(b"not valid json");
        assert!(matches!(result, Err(ScanError::Parse(_))));
    }

    #[test]
    fn test_parse_advertisement_missing_identity() {
        let result = parse_advertisement(br#"{"uri": "https://example.com"}"#);
        assert!(matches!(result, Err(ScanError::MissingIdentity)));

        let result = parse_advertisement(br#"{"id": "", "rssi": -50}"#);
        assert!(matches!(result, Err(ScanError::MissingIdentity)));
    }

    #[tokio::test]
    async fn test_udp_driver_delivers_detections() {
        let port = 43737;
        let driver = UdpBeaconDriver::new(port);
        let (tx, mut rx) = mpsc::channel(16);

        driver.start_scan(tx).unwrap();

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(
                br#"{"id": "AA:BB", "uri": "https://example.com", "rssi": -55}"#,
                ("127.0.0.1", port),
            )
            .unwrap();

        let detection = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for detection")
            .expect("sink closed");

        assert_eq!(detection.id, PeerId::from("AA:BB"));
        assert_eq!(detection.rssi, -55);

        driver.stop_scan();
    }

    #[tokio::test]
    async fn test_udp_driver_restart_cycle() {
        let port = 43738;
        let driver = UdpBeaconDriver::new(port);
        let (tx, _rx) = mpsc::channel(16);

        // stop without an active scan is a no-op
        driver.stop_scan();

        driver.start_scan(tx.clone()).unwrap();
        driver.stop_scan();
        driver.start_scan(tx).unwrap();
        driver.stop_scan();
    }
}
