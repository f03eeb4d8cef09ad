use std::time::Duration;

/// How a [`crate::Process`] should connect to its child's I/O (spec
/// §4.9, mirroring the original `pty` constructor argument: `False`,
/// `True`, or an emulation name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnMode {
    /// Three plain pipes for stdin/stdout/stderr.
    Piped,
    /// A pty, with output additionally mirrored into a [`vtty_core::Vtty`]
    /// constructed for the given emulation name.
    Pty { emulation: String },
}

/// Construction parameters for [`crate::Process::spawn`].
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub command: Vec<String>,
    pub shell: bool,
    pub spawn_mode: SpawnMode,
    pub expect_timeout: Duration,
    pub pty_rows: u16,
    pub pty_cols: u16,
    /// `TERM` set in the child's environment when spawned under a pty.
    /// Ignored for `SpawnMode::Piped`, since a plain pipe has no terminal
    /// to name.
    pub term: String,
}

impl ProcessConfig {
    pub fn new(command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            shell: false,
            spawn_mode: SpawnMode::Piped,
            expect_timeout: Duration::from_secs(5),
            pty_rows: 24,
            pty_cols: 80,
            term: "xterm".to_string(),
        }
    }

    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    pub fn pty(mut self, emulation: impl Into<String>) -> Self {
        self.spawn_mode = SpawnMode::Pty {
            emulation: emulation.into(),
        };
        self
    }

    pub fn expect_timeout(mut self, timeout: Duration) -> Self {
        self.expect_timeout = timeout;
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }
}
