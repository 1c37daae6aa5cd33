//! HTTP upload of sprite containers to a device.
//!
//! One blocking multipart POST per call, bounded by a fixed timeout and never
//! retried. Files are validated before any connection is opened.

use std::error::Error as _;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::error::{NetworkError, Result, SpriteError};
use crate::schema::UploadConfig;
use crate::sprite::Validator;

/// Directory on the device where uploaded containers are stored.
pub const DEVICE_ANIMATION_DIR: &str = "/animations";

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// HTTP status returned by the device.
    pub status: u16,
    /// Parsed JSON body of the device's answer.
    pub response: serde_json::Value,
    /// Path the device stores the file under.
    pub device_path: String,
}

/// Blocking upload client.
#[derive(Debug)]
pub struct Uploader {
    agent: ureq::Agent,
    config: UploadConfig,
    validator: Validator,
}

impl Uploader {
    /// Build a client from validated settings, using the default size ceiling.
    pub fn new(config: UploadConfig) -> Result<Self> {
        config.validate()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Ok(Self {
            agent,
            config,
            validator: Validator::default(),
        })
    }

    /// Replace the pre-upload validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Full endpoint URL for `host`. A bare host gets an `http://` scheme.
    pub fn endpoint(&self, host: &str) -> String {
        let host = host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}{}", host, self.config.path)
        } else {
            format!("http://{}{}", host, self.config.path)
        }
    }

    /// Validate and upload the container at `path`.
    pub fn upload_file<P: AsRef<Path>>(&self, host: &str, path: P) -> Result<UploadReceipt> {
        let path = path.as_ref();
        self.validator.validate_file(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SpriteError::InvalidFormat(format!("{} has no file name", path.display()))
            })?;
        let bytes = fs::read(path)?;
        self.upload_bytes(host, &filename, &bytes)
    }

    /// Validate and upload an in-memory container under `filename`.
    pub fn upload_bytes(&self, host: &str, filename: &str, bytes: &[u8]) -> Result<UploadReceipt> {
        check_filename(filename)?;
        self.validator.validate(bytes)?;

        let url = self.endpoint(host);
        let boundary = boundary_for(bytes);
        let body = multipart_body(&boundary, filename, bytes);
        log::info!("Uploading {} ({} bytes) to {}", filename, bytes.len(), url);

        let response = self
            .agent
            .post(&url)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send_bytes(&body)
            .map_err(|e| self.map_error(&url, e))?;

        let status = response.status();
        let text = response
            .into_string()
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
        if status != 200 {
            return Err(NetworkError::Status { code: status, body: text }.into());
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
        log::info!("Upload accepted: {}", json);

        Ok(UploadReceipt {
            status,
            response: json,
            device_path: format!("{}/{}", DEVICE_ANIMATION_DIR, filename),
        })
    }

    fn map_error(&self, url: &str, err: ureq::Error) -> SpriteError {
        let net = match err {
            ureq::Error::Status(code, response) => NetworkError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => {
                if is_timeout(&transport) {
                    NetworkError::Timeout {
                        url: url.to_string(),
                        secs: self.config.timeout_secs,
                    }
                } else {
                    match transport.kind() {
                        ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
                            NetworkError::ConnectionFailed {
                                url: url.to_string(),
                                message: transport.to_string(),
                            }
                        }
                        _ => NetworkError::Transport(transport.to_string()),
                    }
                }
            }
        };
        log::warn!("Upload to {} failed: {}", url, net);
        net.into()
    }
}

/// Reject names that would break the multipart header or escape the
/// device's animation directory.
fn check_filename(filename: &str) -> Result<()> {
    let bad = |c: char| c.is_control() || matches!(c, '"' | '\\' | '/');
    if filename.is_empty() || filename.chars().any(bad) {
        return Err(SpriteError::InvalidFileName(filename.to_string()));
    }
    Ok(())
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let io_timeout = transport
        .source()
        .and_then(|e| e.downcast_ref::<io::Error>())
        .is_some_and(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock));
    io_timeout || transport.to_string().contains("timed out")
}

/// Random multipart boundary that does not occur in `data`.
fn boundary_for(data: &[u8]) -> String {
    loop {
        let boundary = format!("doki-sprite-{:016x}", rand::random::<u64>());
        if !contains(data, boundary.as_bytes()) {
            return boundary;
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Encode a `multipart/form-data` body with a single `file` field.
///
/// `filename` is inserted verbatim; callers pass names that already passed
/// `check_filename`.
fn multipart_body(boundary: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let head = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");

    let mut body = Vec::with_capacity(head.len() + data.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(tail.as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::quantize::quantize;
    use crate::sprite::SpriteContainer;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use tempfile::tempdir;

    fn sample_sprite() -> Vec<u8> {
        let q = quantize(vec![Frame::solid(4, 4, [0, 0, 0]); 3]).unwrap();
        SpriteContainer::from_quantized(q, 10).unwrap().to_bytes()
    }

    fn short_timeout() -> UploadConfig {
        UploadConfig {
            timeout_secs: 1,
            ..Default::default()
        }
    }

    /// Read one HTTP request (headers plus Content-Length body).
    fn read_request(stream: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                return buf;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    return buf;
                }
            }
        }
    }

    /// Serve a single canned response and hand back the request bytes.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (addr, handle)
    }

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body("XYZ", "spin.spr", b"IKOD");
        let expected = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"spin.spr\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n\
            IKOD\r\n--XYZ--\r\n";
        assert_eq!(body, expected.as_bytes());
    }

    #[test]
    fn test_header_breaking_names_rejected() {
        let uploader = Uploader::new(short_timeout()).unwrap();
        let sprite = sample_sprite();
        for name in ["a\"b.spr", "a\r\nX-Injected: 1.spr", "dir/a.spr", "a\\b.spr", ""] {
            // Port 9 is discard; rejection happens before connecting.
            let result = uploader.upload_bytes("127.0.0.1:9", name, &sprite);
            assert!(
                matches!(result, Err(SpriteError::InvalidFileName(_))),
                "{:?} accepted",
                name
            );
        }
        assert!(check_filename("spinner-64 (1).spr").is_ok());
    }

    #[test]
    fn test_boundary_not_in_payload() {
        let data = sample_sprite();
        let boundary = boundary_for(&data);
        assert!(!contains(&data, boundary.as_bytes()));
    }

    #[test]
    fn test_endpoint() {
        let uploader = Uploader::new(UploadConfig::default()).unwrap();
        assert_eq!(
            uploader.endpoint("192.168.1.100"),
            "http://192.168.1.100/api/animations/upload"
        );
        assert_eq!(
            uploader.endpoint("https://device.local/"),
            "https://device.local/api/animations/upload"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Uploader::new(UploadConfig {
            timeout_secs: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(SpriteError::Config(_))));
    }

    #[test]
    fn test_success_receipt() {
        let (addr, handle) = serve_once("200 OK", r#"{"success":true}"#);
        let dir = tempdir().unwrap();
        let path = dir.path().join("black.spr");
        std::fs::write(&path, sample_sprite()).unwrap();

        let uploader = Uploader::new(short_timeout()).unwrap();
        let receipt = uploader.upload_file(&addr, &path).unwrap();
        assert_eq!(receipt.status, 200);
        assert_eq!(receipt.response["success"], true);
        assert_eq!(receipt.device_path, "/animations/black.spr");

        let request = String::from_utf8_lossy(&handle.join().unwrap()).into_owned();
        assert!(request.starts_with("POST /api/animations/upload "));
        assert!(request.contains("multipart/form-data; boundary="));
        assert!(request.contains("filename=\"black.spr\""));
        assert!(request.contains("IKOD"));
    }

    #[test]
    fn test_status_error() {
        let (addr, handle) = serve_once("500 Internal Server Error", r#"{"error":"disk full"}"#);
        let uploader = Uploader::new(short_timeout()).unwrap();
        let result = uploader.upload_bytes(&addr, "a.spr", &sample_sprite());
        handle.join().unwrap();
        match result {
            Err(SpriteError::Network(NetworkError::Status { code, body })) => {
                assert_eq!(code, 500);
                assert!(body.contains("disk full"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body() {
        let (addr, handle) = serve_once("200 OK", "stored");
        let uploader = Uploader::new(short_timeout()).unwrap();
        let result = uploader.upload_bytes(&addr, "a.spr", &sample_sprite());
        handle.join().unwrap();
        assert!(matches!(
            result,
            Err(SpriteError::Network(NetworkError::InvalidResponse(_)))
        ));
    }

    #[test]
    fn test_connection_refused() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let uploader = Uploader::new(short_timeout()).unwrap();
        let result = uploader.upload_bytes(&addr, "a.spr", &sample_sprite());
        assert!(matches!(
            result,
            Err(SpriteError::Network(NetworkError::ConnectionFailed { .. }))
        ));
    }

    #[test]
    fn test_silent_device_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            thread::sleep(Duration::from_secs(3));
        });

        let uploader = Uploader::new(short_timeout()).unwrap();
        let result = uploader.upload_bytes(&addr, "a.spr", &sample_sprite());
        assert!(matches!(
            result,
            Err(SpriteError::Network(NetworkError::Timeout { secs: 1, .. }))
        ));
        handle.join().unwrap();
    }

    #[test]
    fn test_invalid_file_never_sent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bogus.spr");
        std::fs::write(&path, b"NOPE and more").unwrap();

        // Port 9 is discard; validation must fail before any connection.
        let uploader = Uploader::new(short_timeout()).unwrap();
        let result = uploader.upload_file("127.0.0.1:9", &path);
        assert!(matches!(result, Err(SpriteError::InvalidFormat(_))));

        let big = {
            let mut bytes = sample_sprite();
            bytes.resize(64 * 1024, 0);
            bytes
        };
        let strict = Uploader::new(short_timeout())
            .unwrap()
            .with_validator(Validator::new(Some(1024)));
        assert!(matches!(
            strict.upload_bytes("127.0.0.1:9", "big.spr", &big),
            Err(SpriteError::SizeExceeded { .. })
        ));
    }
}
