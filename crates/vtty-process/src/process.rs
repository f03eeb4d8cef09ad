//! Spawn a child process and interact with it line-by-line, or through a
//! pty with an attached [`vtty_core::Vtty`] mirror (spec §4.9).

use std::io::{Read, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;
use vtty_core::{ByteSource, Vtty};

use crate::config::{ProcessConfig, SpawnMode};
use crate::errors::ProcessError;

enum Child {
    Piped(std::process::Child),
    Pty(Box<dyn portable_pty::Child + Send + Sync>),
}

impl Child {
    fn try_wait(&mut self) -> std::io::Result<Option<i32>> {
        match self {
            Child::Piped(child) => Ok(child.try_wait()?.map(|s| s.code().unwrap_or(-1))),
            Child::Pty(child) => Ok(child.try_wait()?.map(|s| s.exit_code() as i32)),
        }
    }

    fn kill(&mut self) -> std::io::Result<()> {
        match self {
            Child::Piped(child) => child.kill(),
            Child::Pty(child) => child.kill(),
        }
    }
}

/// A running child process plus buffered, line-oriented access to its
/// output (spec §4.9 "Process").
pub struct Process {
    child: Child,
    stdin: Box<dyn Write + Send>,
    output_rx: mpsc::Receiver<Vec<u8>>,
    buffer: String,
    pub vtty: Option<Vtty>,
    running: bool,
    returncode: Option<i32>,
    label: String,
}

impl Process {
    pub fn spawn(config: ProcessConfig) -> Result<Self, ProcessError> {
        match &config.spawn_mode {
            SpawnMode::Piped => Self::spawn_piped(config),
            SpawnMode::Pty { emulation } => Self::spawn_pty(config, emulation.clone()),
        }
    }

    fn spawn_piped(config: ProcessConfig) -> Result<Self, ProcessError> {
        use std::process::{Command, Stdio};

        let mut cmd = build_command(&config);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            command: config.command.clone(),
            source,
        })?;

        let label = format!("[ {}({}) ]", config.command[0], child.id());
        let stdin = child.stdin.take().expect("piped stdin");
        let mut stdout = child.stdout.take().expect("piped stdout");
        let mut stderr = child.stderr.take().expect("piped stderr");

        let (tx, rx) = mpsc::channel();
        let reader_label = label.clone();
        std::thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        debug!(event = "process.stdout", label = %reader_label, bytes = n);
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let stderr_label = label.clone();
        std::thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match stderr.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => debug!(event = "process.stderr", label = %stderr_label, bytes = n),
                }
            }
        });

        Ok(Self {
            child: Child::Piped(child),
            stdin: Box::new(stdin),
            output_rx: rx,
            buffer: String::new(),
            vtty: None,
            running: true,
            returncode: None,
            label,
        })
    }

    fn spawn_pty(config: ProcessConfig, emulation: String) -> Result<Self, ProcessError> {
        use portable_pty::{native_pty_system, CommandBuilder, PtySize};

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: config.pty_rows,
                cols: config.pty_cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ProcessError::Pty(e.to_string()))?;

        let mut builder = CommandBuilder::new(&config.command[0]);
        builder.args(&config.command[1..]);
        builder.env("TERM", &config.term);

        let child = pair
            .slave
            .spawn_command(builder)
            .map_err(|e| ProcessError::Pty(e.to_string()))?;
        drop(pair.slave);

        let label = format!("[ {} ]", config.command[0]);
        let stdin = pair
            .master
            .take_writer()
            .map_err(|e| ProcessError::Pty(e.to_string()))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ProcessError::Pty(e.to_string()))?;

        let vtty = if emulation.is_empty() {
            None
        } else {
            Some(Vtty::new(&emulation)?)
        };

        let (tx, rx) = mpsc::channel();
        let reader_label = label.clone();
        std::thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        debug!(event = "process.pty_output", label = %reader_label, bytes = n);
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(Self {
            child: Child::Pty(child),
            stdin,
            output_rx: rx,
            buffer: String::new(),
            vtty,
            running: true,
            returncode: None,
            label,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn send(&mut self, text: &str) -> Result<(), ProcessError> {
        debug!(event = "process.send", label = %self.label, text = %escape_ascii(text));
        self.stdin
            .write_all(text.as_bytes())
            .map_err(ProcessError::Write)
    }

    pub fn send_line(&mut self, line: &str) -> Result<(), ProcessError> {
        self.send(&format!("{line}\n"))
    }

    /// Drain everything currently available from the reader thread,
    /// mirroring it into `vtty` if attached, and return it decoded.
    pub fn read(&mut self) -> String {
        let mut out = String::new();
        while let Ok(chunk) = self.output_rx.try_recv() {
            if let Some(vtty) = &mut self.vtty {
                vtty.append(&chunk);
            }
            out.push_str(&String::from_utf8_lossy(&chunk));
        }
        out
    }

    /// Return the next full line of output, without its trailing
    /// newline, or `None` if no full line is available yet.
    pub fn read_line(&mut self, full_line_only: bool) -> Option<String> {
        self.buffer.push_str(&self.read());

        if let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].to_string();
            self.buffer = self.buffer[pos + 1..].to_string();
            return Some(line);
        }

        if !full_line_only && !self.buffer.is_empty() {
            return Some(std::mem::take(&mut self.buffer));
        }

        None
    }

    /// [`Self::read_line`] with carriage returns stripped.
    pub fn read_simple(&mut self, full_line_only: bool) -> String {
        match self.read_line(full_line_only) {
            Some(line) => line.replace('\r', ""),
            None => String::new(),
        }
    }

    /// Poll for output until one of `patterns` matches a full line, or
    /// `timeout` expires. Returns the index of the first matching pattern.
    pub fn expect(&mut self, patterns: &[Regex], timeout: Duration) -> Option<usize> {
        self.expect_inner(patterns, timeout, true)
    }

    /// Like [`Self::expect`], but matches against the trailing partial
    /// line too — useful for prompts that never emit a newline.
    pub fn expect_prompt(&mut self, patterns: &[Regex], timeout: Duration) -> Option<usize> {
        self.expect_inner(patterns, timeout, false)
    }

    fn expect_inner(&mut self, patterns: &[Regex], timeout: Duration, full_line_only: bool) -> Option<usize> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let line = self.read_simple(full_line_only);
            if line.is_empty() {
                continue;
            }
            if let Some(idx) = patterns.iter().position(|re| re.is_match(&line)) {
                return Some(idx);
            }
        }
        None
    }

    pub fn terminate(&mut self) -> std::io::Result<()> {
        if self.running {
            self.child.kill()?;
            self.wait_for_termination(Duration::from_secs(5));
        }
        Ok(())
    }

    /// Wait up to `timeout` for the child to exit on its own, draining
    /// output while we wait so a full pipe buffer can't deadlock it.
    pub fn wait_for_termination(&mut self, timeout: Duration) -> bool {
        if !self.running {
            return true;
        }

        let deadline = Instant::now() + timeout;
        loop {
            self.read();
            match self.child.try_wait() {
                Ok(Some(code)) => {
                    self.running = false;
                    self.returncode = Some(code);
                    return true;
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        return false;
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(_) => return false,
            }
        }
    }

    pub fn returncode(&self) -> Option<i32> {
        self.returncode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn build_command(config: &ProcessConfig) -> std::process::Command {
    if config.shell {
        let mut cmd = std::process::Command::new("sh");
        cmd.arg("-c").arg(config.command.join(" "));
        cmd
    } else {
        let mut cmd = std::process::Command::new(&config.command[0]);
        cmd.args(&config.command[1..]);
        cmd
    }
}

/// Render control characters visibly for log lines (spec §4.9
/// `_escapeAscii`).
fn escape_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            '\t' => "\\t".to_string(),
            c if c.is_control() => format!("\\x{:02x}", c as u32),
            c => c.to_string(),
        })
        .collect()
}
