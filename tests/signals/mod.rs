use crate::common::CommandRamhogExt;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::{BufRead, BufReader, Read};
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

struct RunningHog {
    child: Child,
    stderr: BufReader<ChildStderr>,
    seen: String,
}

impl RunningHog {
    fn spawn(args: &[&str]) -> Self {
        let mut child = Command::ramhog()
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn ramhog");
        let stderr = BufReader::new(child.stderr.take().unwrap());
        RunningHog {
            child,
            stderr,
            seen: String::new(),
        }
    }

    /// Reads log lines until one of them contains `needle`.
    fn wait_for(&mut self, needle: &str) {
        loop {
            let mut line = String::new();
            let read = self.stderr.read_line(&mut line).unwrap();
            assert!(read > 0, "ramhog exited before logging {needle:?}:\n{}", self.seen);
            self.seen.push_str(&line);
            if line.contains(needle) {
                return;
            }
        }
    }

    fn signal(&self, signal: Signal) {
        kill(Pid::from_raw(self.child.id() as i32), signal).unwrap();
    }

    /// Gives the process `timeout` to exit on its own, killing it otherwise,
    /// then returns its status and the rest of its log output.
    fn finish_within(mut self, timeout: Duration) -> (ExitStatus, String) {
        let deadline = Instant::now() + timeout;
        while self.child.try_wait().unwrap().is_none() {
            if Instant::now() >= deadline {
                self.child.kill().unwrap();
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
        self.finish()
    }

    /// Waits for the process to exit, returning its status and the rest of
    /// its log output.
    fn finish(mut self) -> (ExitStatus, String) {
        let mut rest = String::new();
        self.stderr.read_to_string(&mut rest).unwrap();
        let status = self.child.wait().unwrap();
        (status, rest)
    }
}

impl Drop for RunningHog {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

#[test]
fn test_sigint_while_holding() {
    let mut hog = RunningHog::spawn(&["--chunk-size", "1", "--max-alloc", "3"]);
    hog.wait_for("reached maximum allocation limit of 3.00 MB");
    hog.wait_for("holding memory until interrupted");

    hog.signal(Signal::SIGINT);
    let (status, rest) = hog.finish();

    assert_eq!(status.code(), Some(0));
    assert!(rest.contains("Received SIGINT"));
    assert!(rest.contains("total memory allocated: 3.00 MB in 3 chunks"));
    assert!(rest.contains("cleanup complete"));
}

#[test]
fn test_sigterm_while_holding() {
    let mut hog = RunningHog::spawn(&["-c", "2", "-m", "5", "-s", "gentle"]);
    hog.wait_for("holding memory until interrupted");

    hog.signal(Signal::SIGTERM);
    let (status, rest) = hog.finish();

    assert_eq!(status.code(), Some(0));
    assert!(rest.contains("total memory allocated: 4.00 MB in 2 chunks"));
}

#[test]
fn test_signal_during_gentle_growth() {
    let mut hog = RunningHog::spawn(&["--chunk-size", "1", "--speed", "gentle"]);
    hog.wait_for("(chunk #2)");

    let signalled = Instant::now();
    hog.signal(Signal::SIGTERM);
    let (status, rest) = hog.finish();

    assert_eq!(status.code(), Some(0));
    assert!(signalled.elapsed() < Duration::from_secs(5));
    assert!(!rest.contains("holding memory"));
    assert!(rest.contains("total memory allocated"));
    assert!(rest.contains("cleanup complete"));
}

#[test]
fn test_sighup_is_not_a_graceful_stop() {
    let mut hog = RunningHog::spawn(&["-c", "1", "-m", "2"]);
    hog.wait_for("holding memory until interrupted");

    hog.signal(Signal::SIGHUP);
    let (status, rest) = hog.finish_within(Duration::from_secs(5));

    assert!(!status.success());
    assert_eq!(status.signal(), Some(Signal::SIGHUP as i32));
    assert!(!rest.contains("Received"));
    assert!(!rest.contains("total memory allocated"));
}
