use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// One captured request: the head (request line plus headers) and the body.
#[derive(Debug, Clone, Default)]
pub(crate) struct Captured {
  pub head: String,
  pub body: String,
}

impl Captured {
  pub fn request_line(&self) -> &str {
    self.head.lines().next().unwrap_or_default()
  }

  pub fn header(&self, name: &str) -> Option<String> {
    let wanted = name.to_ascii_lowercase();
    self.head.lines().skip(1).find_map(|line| {
      let (k, v) = line.split_once(':')?;
      (k.trim().to_ascii_lowercase() == wanted).then(|| v.trim().to_string())
    })
  }
}

/// Serve exactly one HTTP response on an ephemeral port; the handle yields the captured request.
pub(crate) fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<Captured>) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  let handle = thread::spawn(move || {
    let (stream, _) = listener.accept().unwrap();
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut reader = BufReader::new(stream);

    let mut captured = Captured::default();
    let mut content_length = 0usize;
    loop {
      let mut line = String::new();
      if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
        break;
      }
      if let Some((k, v)) = line.split_once(':') {
        if k.trim().eq_ignore_ascii_case("content-length") {
          content_length = v.trim().parse().unwrap_or(0);
        }
      }
      captured.head.push_str(&line);
    }
    let mut buf = vec![0u8; content_length];
    let _ = reader.read_exact(&mut buf);
    captured.body = String::from_utf8_lossy(&buf).to_string();

    let resp = format!(
      "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
      body.len()
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(resp.as_bytes());
    let _ = stream.flush();
    captured
  });
  (format!("http://{addr}"), handle)
}
