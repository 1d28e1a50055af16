//! One-shot position sources.

use log::debug;
use serde::Deserialize;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::PositionError;
use crate::models::{Location, LocationSource};

const GPSD_WATCH: &str = "?WATCH={\"enable\":true,\"json\":true};\n";

#[derive(Debug, Clone, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Blocking, one-shot position request. Called from a worker thread.
pub trait PositionProvider: Send + Sync {
    fn current_position(&self, options: &PositionOptions) -> Result<Location, PositionError>;
}

pub fn from_source(source: &LocationSource) -> Option<Arc<dyn PositionProvider>> {
    match source {
        LocationSource::Gpsd { host, port } => Some(Arc::new(GpsdProvider::new(host, *port))),
        LocationSource::Fixed {
            latitude,
            longitude,
        } => Some(Arc::new(FixedProvider(Location::new(*latitude, *longitude)))),
        LocationSource::None => None,
    }
}

/// Always answers with the configured coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedProvider(pub Location);

impl PositionProvider for FixedProvider {
    fn current_position(&self, _options: &PositionOptions) -> Result<Location, PositionError> {
        Ok(self.0)
    }
}

/// Client for the gpsd JSON protocol.
///
/// Opens a fresh connection per request, enables watching and returns the
/// first TPV report carrying a 2D or 3D fix. gpsd only reports receiver
/// fixes, so every reading is a fresh high-accuracy one. A daemon that is not
/// listening counts as "no position capability".
#[derive(Debug, Clone)]
pub struct GpsdProvider {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct GpsdReport {
    class: String,
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl GpsdProvider {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }

    fn connect(&self, timeout: Duration) -> Result<TcpStream, PositionError> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| PositionError::Unavailable(format!("resolve {}: {}", self.host, e)))?
            .next()
            .ok_or_else(|| PositionError::Unavailable(format!("no address for {}", self.host)))?;

        TcpStream::connect_timeout(&addr, timeout).map_err(|e| match e.kind() {
            ErrorKind::ConnectionRefused => PositionError::Unsupported,
            _ => PositionError::Unavailable(e.to_string()),
        })
    }
}

impl PositionProvider for GpsdProvider {
    fn current_position(&self, options: &PositionOptions) -> Result<Location, PositionError> {
        let deadline = Instant::now() + options.timeout;
        let mut stream = self.connect(options.timeout)?;
        stream
            .write_all(GPSD_WATCH.as_bytes())
            .map_err(|e| PositionError::Unavailable(e.to_string()))?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }
            reader
                .get_ref()
                .set_read_timeout(Some(remaining))
                .map_err(|e| PositionError::Unavailable(e.to_string()))?;

            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    return Err(PositionError::Unavailable(
                        "gpsd closed the connection".to_string(),
                    ));
                }
                Ok(_) => {
                    if let Some(location) = parse_fix(&line) {
                        return Ok(location);
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Err(timed_out());
                }
                Err(e) => return Err(PositionError::Unavailable(e.to_string())),
            }
        }
    }
}

fn timed_out() -> PositionError {
    PositionError::Unavailable("timed out waiting for a fix".to_string())
}

fn parse_fix(line: &str) -> Option<Location> {
    let report: GpsdReport = match serde_json::from_str(line.trim()) {
        Ok(report) => report,
        Err(e) => {
            debug!("event=gpsd_line module=location status=skipped error={}", e);
            return None;
        }
    };

    if report.class != "TPV" || report.mode < 2 {
        return None;
    }
    Some(Location::new(report.lat?, report.lon?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    fn fake_gpsd(lines: &'static [&'static str]) -> (u16, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut watch = [0u8; GPSD_WATCH.len()];
            socket.read_exact(&mut watch).unwrap();
            for line in lines {
                socket.write_all(line.as_bytes()).unwrap();
                socket.write_all(b"\n").unwrap();
            }
            // Hold the socket open until the client is done.
            thread::sleep(Duration::from_millis(300));
            String::from_utf8(watch.to_vec()).unwrap()
        });
        (port, handle)
    }

    fn options(timeout_ms: u64) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_millis(timeout_ms),
            ..PositionOptions::default()
        }
    }

    #[test]
    fn first_real_fix_wins() {
        let (port, server) = fake_gpsd(&[
            r#"{"class":"VERSION","release":"3.25"}"#,
            r#"{"class":"TPV","mode":1}"#,
            r#"{"class":"TPV","mode":3,"lat":48.858370,"lon":2.294481}"#,
            r#"{"class":"TPV","mode":3,"lat":1.0,"lon":1.0}"#,
        ]);

        let location = GpsdProvider::new("127.0.0.1", port)
            .current_position(&options(2000))
            .unwrap();
        assert_eq!(location, Location::new(48.858370, 2.294481));
        assert_eq!(server.join().unwrap(), GPSD_WATCH);
    }

    #[test]
    fn silence_times_out_as_unavailable() {
        let (port, _server) = fake_gpsd(&[r#"{"class":"SKY"}"#]);
        let err = GpsdProvider::new("127.0.0.1", port)
            .current_position(&options(100))
            .unwrap_err();
        assert!(matches!(err, PositionError::Unavailable(_)));
    }

    #[test]
    fn no_daemon_means_unsupported() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = GpsdProvider::new("127.0.0.1", port)
            .current_position(&options(500))
            .unwrap_err();
        assert_eq!(err, PositionError::Unsupported);
    }

    #[test]
    fn tpv_without_coordinates_is_skipped() {
        assert_eq!(parse_fix(r#"{"class":"TPV","mode":2}"#), None);
        assert_eq!(parse_fix("not json"), None);
        assert_eq!(
            parse_fix(r#"{"class":"TPV","mode":2,"lat":-33.5,"lon":151.25}"#),
            Some(Location::new(-33.5, 151.25))
        );
    }

    #[test]
    fn source_none_has_no_provider() {
        assert!(from_source(&LocationSource::None).is_none());
        let fixed = from_source(&LocationSource::Fixed {
            latitude: 10.0,
            longitude: 20.0,
        })
        .unwrap();
        assert_eq!(
            fixed.current_position(&PositionOptions::default()),
            Ok(Location::new(10.0, 20.0))
        );
    }
}
