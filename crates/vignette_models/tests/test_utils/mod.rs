//! Loopback HTTP server for exercising the real clients end to end.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One canned response, matched by substring on the request target.
#[derive(Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &'static str, body: &str) -> Self {
        Self {
            path,
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
        }
    }
}

/// Every request the server has seen, head and body together.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve the given routes on an ephemeral port.
///
/// Returns the base URL and a log of raw requests for header and body
/// assertions. Unmatched targets get a 404.
pub async fn spawn_server(routes: Vec<Route>) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let served = log.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            let log = served.clone();
            tokio::spawn(async move {
                let request = read_request(&mut stream).await;
                let target = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                log.lock().unwrap().push(request);

                let (status, body) = routes
                    .iter()
                    .find(|route| target.contains(route.path))
                    .map(|route| (route.status, route.body.clone()))
                    .unwrap_or((404, "{}".to_string()));

                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), log)
}

/// Read one request: headers, then as many body bytes as Content-Length
/// promises.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]);
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
