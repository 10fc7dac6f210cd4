use anyhow::{Context, Result, bail};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("tests").join("fixtures").join(name);
    assert!(path.is_file(), "missing fixture {}", path.display());
    path
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command that is expected to fail and return its output.
pub fn run_failing(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}

/// Minimal HTTP/1.1 server answering one connection per scripted status
/// line, in order. Joining returns the raw requests it saw.
pub struct ScriptedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl ScriptedServer {
    pub fn start(status_lines: &[&'static str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind scripted server");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let script: Vec<&'static str> = status_lines.to_vec();
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for status_line in script {
                let (stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream);
                let mut request = Vec::new();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).expect("read header") == 0 {
                        break;
                    }
                    request.extend_from_slice(line.as_bytes());
                    if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                        content_length = value.trim().parse().expect("content length");
                    }
                    if line == "\r\n" {
                        break;
                    }
                }
                let mut body = vec![0u8; content_length];
                reader.read_exact(&mut body).expect("read body");
                request.extend_from_slice(&body);
                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                )
                .expect("write response");
                requests.push(String::from_utf8_lossy(&request).into_owned());
            }
            requests
        });
        Self { base_url, handle }
    }

    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("scripted server panicked")
    }
}
