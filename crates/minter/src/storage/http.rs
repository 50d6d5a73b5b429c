use async_trait::async_trait;

use super::{StorageFile, Uploader};
use crate::core::{MinterError, MinterResult};

/// Uploads files to an HTTP storage gateway
///
/// Each file is POSTed as the raw request body. The gateway answers with a
/// JSON object carrying the stored location in `uri` (or `url`).
pub struct HttpUploader {
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn upload_one(endpoint: &str, file: &StorageFile) -> MinterResult<String> {
        let response = ureq::post(endpoint)
            .set("Content-Type", &file.content_type)
            .set("X-File-Name", &file.file_name)
            .send_bytes(&file.bytes)
            .map_err(|e| MinterError::Upload(format!("{} upload failed: {}", file.file_name, e)))?;

        let json: serde_json::Value = response
            .into_json()
            .map_err(|e| MinterError::Upload(format!("invalid gateway response: {}", e)))?;

        extract_uri(&json)
    }
}

/// Pull the stored location out of a gateway response
fn extract_uri(json: &serde_json::Value) -> MinterResult<String> {
    if let Some(error) = json.get("error") {
        return Err(MinterError::Upload(format!("gateway error: {}", error)));
    }

    json.get("uri")
        .or_else(|| json.get("url"))
        .and_then(|value| value.as_str())
        .filter(|uri| !uri.is_empty())
        .map(str::to_string)
        .ok_or_else(|| MinterError::Upload(format!("gateway response has no uri: {}", json)))
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, files: Vec<StorageFile>) -> MinterResult<Vec<String>> {
        let endpoint = self.endpoint.clone();

        // ureq blocks, keep it off the runtime threads
        tokio::task::spawn_blocking(move || {
            files
                .iter()
                .map(|file| Self::upload_one(&endpoint, file))
                .collect::<MinterResult<Vec<String>>>()
        })
        .await
        .map_err(|e| MinterError::Upload(format!("upload task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::{self, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    struct ReceivedRequest {
        headers: HashMap<String, String>,
        body: Vec<u8>,
    }

    fn read_request(stream: &mut TcpStream) -> io::Result<ReceivedRequest> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed before headers"));
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let headers: HashMap<String, String> = head
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        let length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buf[header_end..].to_vec();
        while body.len() < length {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }

        Ok(ReceivedRequest { headers, body })
    }

    /// Local gateway answering one connection per scripted reply
    fn spawn_gateway(
        replies: Vec<(u16, &'static str)>,
    ) -> (String, thread::JoinHandle<Vec<ReceivedRequest>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/upload", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for (status, reply) in replies {
                let (mut stream, _) = listener.accept().unwrap();
                let request = read_request(&mut stream).unwrap();

                // Echo the file name back so callers can check ordering
                let file_name = request.headers.get("x-file-name").cloned().unwrap_or_default();
                let body = reply.replace("{name}", &file_name);
                let reason = if status == 200 { "OK" } else { "Internal Server Error" };
                write!(
                    stream,
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                )
                .unwrap();
                stream.flush().unwrap();
                received.push(request);
            }
            received
        });

        (endpoint, handle)
    }

    #[tokio::test]
    async fn test_upload_posts_raw_bytes_with_headers() {
        let (endpoint, gateway) = spawn_gateway(vec![
            (200, r#"{"uri":"https://gw.local/{name}"}"#),
            (200, r#"{"url":"https://gw.local/{name}"}"#),
        ]);
        let uploader = HttpUploader::new(&endpoint);

        let image = StorageFile::new("logo.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let metadata = StorageFile::json("metadata.json", r#"{"name":"Solana Gold"}"#.to_string());
        let uris = uploader.upload(vec![image, metadata]).await.unwrap();

        assert_eq!(
            uris,
            vec![
                "https://gw.local/logo.png".to_string(),
                "https://gw.local/metadata.json".to_string()
            ]
        );

        let received = gateway.join().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].headers["content-type"], "image/png");
        assert_eq!(received[0].headers["x-file-name"], "logo.png");
        assert_eq!(received[0].body, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(received[1].headers["content-type"], "application/json");
        assert_eq!(received[1].headers["x-file-name"], "metadata.json");
        assert_eq!(received[1].body, br#"{"name":"Solana Gold"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_gateway_error_status_is_upload_error() {
        let (endpoint, gateway) = spawn_gateway(vec![(500, r#"{"error":"disk full"}"#)]);
        let uploader = HttpUploader::new(&endpoint);

        let result = uploader
            .upload(vec![StorageFile::new("logo.png", "image/png", vec![1, 2, 3])])
            .await;

        assert!(matches!(result, Err(MinterError::Upload(_))));
        assert_eq!(gateway.join().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_error_field_is_upload_error() {
        let (endpoint, gateway) = spawn_gateway(vec![(200, r#"{"error":"quota exceeded"}"#)]);
        let uploader = HttpUploader::new(&endpoint);

        let result = uploader
            .upload(vec![StorageFile::new("logo.png", "image/png", vec![1, 2, 3])])
            .await;

        match result {
            Err(MinterError::Upload(message)) => assert!(message.contains("quota exceeded")),
            other => panic!("expected upload error, got {:?}", other),
        }
        gateway.join().unwrap();
    }

    #[test]
    fn test_extract_uri() {
        assert_eq!(
            extract_uri(&json!({ "uri": "https://gw.example/abc" })).unwrap(),
            "https://gw.example/abc"
        );
        assert_eq!(
            extract_uri(&json!({ "url": "https://gw.example/def" })).unwrap(),
            "https://gw.example/def"
        );
    }

    #[test]
    fn test_extract_uri_errors() {
        assert!(extract_uri(&json!({ "error": "quota exceeded" })).is_err());
        assert!(extract_uri(&json!({ "uri": "" })).is_err());
        assert!(extract_uri(&json!({ "id": 7 })).is_err());
    }
}
