//! Process lifecycle tests: the server binaries exit with status 0 on
//! SIGTERM or SIGINT while the client still holds stdin open.
#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const DEADLINE: Duration = Duration::from_secs(5);

const SIMPLE: &str = env!("CARGO_BIN_EXE_simple-mcp-server");
const WEATHER: &str = env!("CARGO_BIN_EXE_weather-mcp-server");

/// Start `bin` on stdio and wait until it has answered one request, which
/// also means its signal handlers are installed.
fn spawn_ready(bin: &str) -> Child {
    let mut child = Command::new(bin)
        .env("MCP_TRANSPORT_MODE", "stdio")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("server starts");

    let stdin = child.stdin.as_mut().expect("stdin is piped");
    writeln!(stdin, r#"{{"jsonrpc":"2.0","id":1,"method":"tools/list"}}"#).unwrap();
    stdin.flush().unwrap();

    let stdout = child.stdout.take().expect("stdout is piped");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = BufReader::new(stdout).read_line(&mut line);
        let _ = tx.send(line);
    });

    let line = rx.recv_timeout(DEADLINE).expect("server answers tools/list");
    assert!(line.contains(r#""id":1"#), "unexpected first response: {line}");
    child
}

fn send_signal(child: &Child, signal: &str) {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(child.id().to_string())
        .status()
        .expect("kill runs");
    assert!(status.success());
}

fn wait_with_deadline(child: &mut Child) -> Option<ExitStatus> {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    let _ = child.wait();
    None
}

#[test]
fn sigterm_exits_cleanly_with_stdin_open() {
    let mut child = spawn_ready(SIMPLE);

    send_signal(&child, "TERM");

    let status = wait_with_deadline(&mut child).expect("server exits after SIGTERM");
    assert!(status.success(), "exit status: {status}");
}

#[test]
fn sigint_exits_cleanly_with_stdin_open() {
    let mut child = spawn_ready(SIMPLE);

    send_signal(&child, "INT");

    let status = wait_with_deadline(&mut child).expect("server exits after SIGINT");
    assert!(status.success(), "exit status: {status}");
}

#[test]
fn weather_server_exits_cleanly_on_sigterm() {
    let mut child = spawn_ready(WEATHER);

    send_signal(&child, "TERM");

    let status = wait_with_deadline(&mut child).expect("server exits after SIGTERM");
    assert!(status.success(), "exit status: {status}");
}

#[test]
fn closing_stdin_exits_cleanly() {
    let mut child = spawn_ready(SIMPLE);

    drop(child.stdin.take());

    let status = wait_with_deadline(&mut child).expect("server exits at end of input");
    assert!(status.success(), "exit status: {status}");
}
