//! Collaborators backed by external processes
//!
//! The optimizer and compiler usually live in another toolchain. An
//! [`ExternalCommand`] runs such a tool once per call: a JSON request goes to
//! its stdin and a JSON reply is read back from its stdout.
//!
//! ```text
//! compiler:  {"source": "<svg ...>", "options": {...}}  ->  {"js": {"code": "...", "map": {...}}}
//! optimizer: {"source": "<svg ...>", "options": {...}}  ->  {"data": "<svg ...>"}
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::compiler::{CompileOptions, CompileOutput, ComponentCompiler};
use crate::error::CollaboratorError;
use crate::optimizer::{Optimized, Optimizer, OptimizerOptions};

/// Errors that can occur while running an external command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no command configured")]
    Empty,

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to send request to `{program}`: {source}")]
    Write {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to encode request for `{program}`: {source}")]
    Request {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid reply from `{program}`: {source}")]
    Reply {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A program plus arguments, run once per request
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Create from a command array (e.g. `["node", "compile.mjs"]`)
    pub fn from_argv<S: Into<OsString>>(argv: impl IntoIterator<Item = S>) -> Result<Self, CommandError> {
        let mut iter = argv.into_iter().map(Into::into);
        let program = iter.next().ok_or(CommandError::Empty)?;
        Ok(Self {
            program,
            args: iter.collect(),
        })
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Send `request` as JSON on stdin and parse stdout as JSON
    pub fn call<Req, Resp>(&self, request: &Req) -> Result<Resp, CommandError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let program = self.program_name();
        let payload = serde_json::to_vec(request).map_err(|source| CommandError::Request {
            program: program.clone(),
            source,
        })?;

        debug!(%program, bytes = payload.len(), "running external command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Feed stdin from its own thread while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|s| {
            let writer = s.spawn(|| write_request(stdin, &payload));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = output.map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        written.map_err(|source| CommandError::Write {
            program: program.clone(),
            source,
        })?;

        serde_json::from_slice(&output.stdout).map_err(|source| CommandError::Reply { program, source })
    }
}

/// Write the whole request and close stdin
///
/// A child that exits without reading its input is not an error here; its
/// exit status and stderr say what went wrong.
fn write_request(stdin: Option<ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(payload) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

#[derive(Serialize)]
struct Request<'a, O: Serialize> {
    source: &'a str,
    options: &'a O,
}

/// Component compiler run as an external process
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    command: ExternalCommand,
}

impl CommandCompiler {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl ComponentCompiler for CommandCompiler {
    fn compile(
        &self,
        markup: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CollaboratorError> {
        let request = Request {
            source: markup,
            options,
        };
        Ok(self.command.call(&request)?)
    }
}

/// Optimizer run as an external process
#[derive(Debug, Clone)]
pub struct CommandOptimizer {
    command: ExternalCommand,
}

impl CommandOptimizer {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl Optimizer for CommandOptimizer {
    fn optimize(
        &self,
        source: &str,
        options: &OptimizerOptions,
    ) -> Result<Optimized, CollaboratorError> {
        let request = Request { source, options };
        Ok(self.command.call(&request)?)
    }
}
