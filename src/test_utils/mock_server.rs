//! Minimal HTTP server capturing requests for end-to-end tests.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const REQUEST_WAIT: Duration = Duration::from_secs(5);

/// A request received by [`MockServer`].
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Value of the header `name` (lower-case), if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP server answering successive connections with scripted statuses.
///
/// Each scripted status serves exactly one connection. Responses carry
/// `Connection: close` so clients never reuse a socket the server has
/// already abandoned. Once the script is exhausted the server stops
/// accepting.
pub struct MockServer {
    addr: SocketAddr,
    rx: mpsc::Receiver<CapturedRequest>,
}

impl MockServer {
    /// Bind an ephemeral port on localhost and serve `statuses` in order.
    pub fn start(statuses: Vec<u16>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
        let addr = listener.local_addr().expect("listener has address");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for status in statuses {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };
                let captured = read_request(&stream);
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status,
                    status_text(status)
                );
                let _ = stream.write_all(response.as_bytes());
                // Unreadable requests are dropped; waiting tests then time out.
                if let Ok(captured) = captured {
                    let _ = tx.send(captured);
                }
            }
        });

        Self { addr, rx }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Absolute `http://` URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait for the next captured request.
    pub fn next_request(&self) -> Option<CapturedRequest> {
        self.rx.recv_timeout(REQUEST_WAIT).ok()
    }

    /// Wait at most `wait` for another request.
    pub fn request_within(&self, wait: Duration) -> Option<CapturedRequest> {
        self.rx.recv_timeout(wait).ok()
    }
}

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn read_line(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-request",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Read the request line, headers up to the blank line, and a body of
/// `content-length` bytes.
fn read_request(stream: &TcpStream) -> io::Result<CapturedRequest> {
    stream.set_read_timeout(Some(REQUEST_WAIT))?;
    let mut reader = BufReader::new(stream);

    let start = read_line(&mut reader)?;
    let mut parts = start.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed request line {start:?}"),
        ));
    };
    let (method, path) = (method.to_owned(), path.to_owned());

    let mut headers = Vec::new();
    loop {
        let line = read_line(&mut reader)?;
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .map_or(Ok(0), |(_, value)| {
            value
                .parse::<usize>()
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        })?;
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body)?;

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
