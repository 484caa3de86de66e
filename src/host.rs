//! Static file host
//!
//! Serves the built game (`trunk build` output) over plain HTTP/1.1. There are
//! no application routes: every GET maps to a file under the asset root.

use std::io::{BufRead, BufReader, Read, Take, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

/// Cap on the request line plus headers
pub const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// Host configuration (flags or environment)
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Serve the Candy Blaster web build", long_about = None)]
pub struct HostConfig {
    /// TCP port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// Directory holding index.html and the wasm bundle.
    #[arg(long, env = "ASSET_ROOT", value_name = "DIR", default_value = "dist")]
    pub root: PathBuf,
    /// Address to bind.
    #[arg(long, env = "BIND_ADDR", value_name = "IP", default_value = "0.0.0.0")]
    pub bind: std::net::IpAddr,
    /// Seconds a connection may stall on a read or write before it is dropped.
    #[arg(long, env = "IO_TIMEOUT_SECS", value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl HostConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Request methods the host answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

/// A parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
}

/// Why a request line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    Malformed,
    MethodNotAllowed,
}

/// Parse `METHOD /path HTTP/1.x`. The query string is dropped.
pub fn parse_request_line(line: &str) -> Result<Request, RequestError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(RequestError::Malformed);
    };
    if !version.starts_with("HTTP/") || !target.starts_with('/') {
        return Err(RequestError::Malformed);
    }
    let method = match method {
        "GET" => Method::Get,
        "HEAD" => Method::Head,
        _ => return Err(RequestError::MethodNotAllowed),
    };
    let path = target.split(['?', '#']).next().unwrap_or("/").to_string();
    Ok(Request { method, path })
}

/// Decode `%XX` escapes. Returns `None` on bad escapes or non-UTF-8 output.
pub fn percent_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = raw.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Map a URL path onto a file under `root`.
///
/// Returns `None` for paths that try to leave the root. Directories (and `/`)
/// resolve to their `index.html`.
pub fn resolve_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode(url_path)?;
    let mut resolved = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if decoded.ends_with('/') || resolved.is_dir() {
        resolved.push("index.html");
    }
    Some(resolved)
}

/// Content-Type for a file, by extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn write_response(
    out: &mut impl Write,
    status: &str,
    content_type: &str,
    body: &[u8],
    include_body: bool,
) -> std::io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    )?;
    if include_body {
        out.write_all(body)?;
    }
    out.flush()
}

/// Read the request line and drain the headers, nothing in them changes the
/// response. Returns `None` when the head does not end within the reader's limit.
fn read_head<R: BufRead>(reader: &mut Take<R>) -> std::io::Result<Option<String>> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    if !request_line.ends_with('\n') && reader.limit() == 0 {
        return Ok(None);
    }

    let mut header = String::new();
    loop {
        header.clear();
        reader.read_line(&mut header)?;
        if !header.ends_with('\n') {
            // End of input, or the limit cut the head short
            return Ok((reader.limit() > 0).then_some(request_line));
        }
        if header.trim_end().is_empty() {
            return Ok(Some(request_line));
        }
    }
}

/// Answer a single request read from `stream`
pub fn serve_connection<S: Read + Write>(stream: S, root: &Path) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream).take(MAX_HEAD_BYTES);
    let head = read_head(&mut reader)?;
    let mut stream = reader.into_inner().into_inner();
    let text = "text/plain; charset=utf-8";

    let Some(request_line) = head else {
        log::warn!("Request head over {} bytes", MAX_HEAD_BYTES);
        return write_response(
            &mut stream,
            "431 Request Header Fields Too Large",
            text,
            b"Request Header Fields Too Large",
            true,
        );
    };

    let request = match parse_request_line(request_line.trim_end()) {
        Ok(request) => request,
        Err(RequestError::MethodNotAllowed) => {
            return write_response(
                &mut stream,
                "405 Method Not Allowed",
                text,
                b"Method Not Allowed",
                true,
            );
        }
        Err(RequestError::Malformed) => {
            return write_response(&mut stream, "400 Bad Request", text, b"Bad Request", true);
        }
    };
    let include_body = request.method == Method::Get;

    let Some(path) = resolve_path(root, &request.path) else {
        log::warn!("Rejected path {}", request.path);
        return write_response(&mut stream, "404 Not Found", text, b"Not Found", include_body);
    };

    match std::fs::read(&path) {
        Ok(body) => {
            log::debug!("200 {} ({} bytes)", request.path, body.len());
            write_response(&mut stream, "200 OK", content_type(&path), &body, include_body)
        }
        Err(e) => {
            log::debug!("404 {} ({})", request.path, e);
            write_response(&mut stream, "404 Not Found", text, b"Not Found", include_body)
        }
    }
}

fn handle(stream: TcpStream, root: PathBuf, timeout: Duration) {
    let peer = stream.peer_addr().ok();
    let timeouts = stream
        .set_read_timeout(Some(timeout))
        .and_then(|()| stream.set_write_timeout(Some(timeout)));
    if let Err(e) = timeouts {
        log::warn!("Connection {:?} dropped, cannot set timeouts: {}", peer, e);
        return;
    }
    if let Err(e) = serve_connection(stream, &root) {
        log::warn!("Connection {:?} failed: {}", peer, e);
    }
}

/// Bind and serve forever, one thread per connection
pub fn run(config: &HostConfig) -> anyhow::Result<()> {
    if !config.root.is_dir() {
        log::warn!(
            "Asset root {} does not exist yet, every request will 404",
            config.root.display()
        );
    }

    let listener = TcpListener::bind(config.addr())
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    log::info!(
        "Serving {} on http://localhost:{}",
        config.root.display(),
        config.port
    );

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let root = config.root.clone();
                let timeout = config.io_timeout();
                std::thread::spawn(move || handle(stream, root, timeout));
            }
            Err(e) => log::warn!("Accept failed: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::ops::Deref;
    use std::time::Instant;

    use super::*;

    /// In-memory duplex stream: reads a canned request, records the response
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(request: &str) -> Self {
            Self {
                input: Cursor::new(request.as_bytes().to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Asset root under the temp dir, removed on drop
    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(name: &str) -> Self {
            let dir = format!("candy-blaster-{}-{}", name, std::process::id());
            let root = std::env::temp_dir().join(dir);
            let _ = std::fs::remove_dir_all(&root);
            std::fs::create_dir_all(root.join("assets")).unwrap();
            std::fs::write(root.join("index.html"), "<h1>candy</h1>").unwrap();
            std::fs::write(root.join("assets").join("index.html"), "nested").unwrap();
            std::fs::write(root.join("app.wasm"), [0u8, 97, 115, 109]).unwrap();
            Self(root)
        }
    }

    impl Deref for TempRoot {
        type Target = Path;

        fn deref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn request(root: &Path, raw: &str) -> String {
        let mut stream = MockStream::new(raw);
        serve_connection(&mut stream, root).unwrap();
        String::from_utf8_lossy(&stream.output).into_owned()
    }

    #[test]
    fn test_parse_request_line() {
        assert_eq!(
            parse_request_line("GET /index.html?v=2 HTTP/1.1"),
            Ok(Request {
                method: Method::Get,
                path: "/index.html".to_string()
            })
        );
        assert_eq!(
            parse_request_line("HEAD / HTTP/1.0").map(|r| r.method),
            Ok(Method::Head)
        );
        assert_eq!(
            parse_request_line("POST /score HTTP/1.1"),
            Err(RequestError::MethodNotAllowed)
        );
        assert_eq!(parse_request_line("GET"), Err(RequestError::Malformed));
        assert_eq!(
            parse_request_line("GET index.html HTTP/1.1"),
            Err(RequestError::Malformed)
        );
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/candy%20world.jpg").as_deref(), Some("/candy world.jpg"));
        assert_eq!(percent_decode("/plain").as_deref(), Some("/plain"));
        assert_eq!(percent_decode("/bad%2"), None);
        assert_eq!(percent_decode("/bad%zz"), None);
    }

    #[test]
    fn test_resolve_path() {
        let root = TempRoot::new("resolve");
        assert_eq!(resolve_path(&root, "/"), Some(root.join("index.html")));
        assert_eq!(
            resolve_path(&root, "/assets"),
            Some(root.join("assets").join("index.html"))
        );
        assert_eq!(resolve_path(&root, "/app.wasm"), Some(root.join("app.wasm")));
        assert_eq!(resolve_path(&root, "/./app.wasm"), Some(root.join("app.wasm")));
        assert_eq!(resolve_path(&root, "/../etc/passwd"), None);
        assert_eq!(resolve_path(&root, "/assets/%2e%2e/%2e%2e/secret"), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("game_bg.wasm")), "application/wasm");
        assert_eq!(content_type(Path::new("game.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Path::new("candy_world.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }

    #[test]
    fn test_serves_index() {
        let root = TempRoot::new("index");
        let response = request(&root, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(response.contains("Content-Length: 14\r\n"));
        assert!(response.ends_with("<h1>candy</h1>"));
    }

    #[test]
    fn test_head_has_no_body() {
        let root = TempRoot::new("head");
        let response = request(&root, "HEAD /index.html HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 14\r\n"));
        assert!(response.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_missing_and_forbidden() {
        let root = TempRoot::new("missing");
        assert!(request(&root, "GET /nope.js HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 404"));
        assert!(request(&root, "GET /../secret HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 404"));
        assert!(request(&root, "DELETE / HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 405"));
        assert!(request(&root, "garbage\r\n\r\n").starts_with("HTTP/1.1 400"));
    }

    #[test]
    fn test_config_defaults() {
        let config = HostConfig::try_parse_from(["candy-blaster"]).unwrap();
        assert_eq!(config.root, PathBuf::from("dist"));
        assert_eq!(config.addr().ip().to_string(), "0.0.0.0");
        assert_eq!(config.io_timeout(), Duration::from_secs(10));

        let args = ["candy-blaster", "--port", "8080", "--root", "web", "--timeout-secs", "0"];
        let config = HostConfig::try_parse_from(args).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.root, PathBuf::from("web"));
        assert_eq!(config.io_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_request_line_without_newline_is_capped() {
        let root = TempRoot::new("long-line");
        let raw = format!("GET /{}", "a".repeat(64 * 1024));
        let mut stream = MockStream::new(&raw);
        serve_connection(&mut stream, &root).unwrap();

        let response = String::from_utf8_lossy(&stream.output);
        assert!(response.starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
        // Only the capped head and one buffer fill were pulled off the stream
        assert!(stream.input.position() <= 2 * MAX_HEAD_BYTES);
    }

    #[test]
    fn test_oversized_headers_are_rejected() {
        let root = TempRoot::new("long-headers");
        let filler = "b".repeat(MAX_HEAD_BYTES as usize);
        let raw = format!("GET / HTTP/1.1\r\nX-Filler: {}\r\n\r\n", filler);
        assert!(request(&root, &raw).starts_with("HTTP/1.1 431"));

        // Many small headers count toward the same cap
        let many = "X-Candy: yes\r\n".repeat(1000);
        let raw = format!("GET / HTTP/1.1\r\n{}\r\n", many);
        assert!(request(&root, &raw).starts_with("HTTP/1.1 431"));

        let some = "X-Candy: yes\r\n".repeat(100);
        let raw = format!("GET / HTTP/1.1\r\n{}\r\n", some);
        assert!(request(&root, &raw).starts_with("HTTP/1.1 200 OK"));
    }

    #[test]
    fn test_stalled_connection_times_out() {
        let root = TempRoot::new("stalled");
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (stream, _) = listener.accept().unwrap();

        // The client never sends a byte
        let started = Instant::now();
        handle(stream, root.to_path_buf(), Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(5));

        let mut response = Vec::new();
        client.read_to_end(&mut response).unwrap();
        assert!(response.is_empty());
    }
}
