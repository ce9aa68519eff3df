//! The external compiler process wrapper

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// A fully-constructed compiler invocation, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Relative include paths in the arguments resolve against this directory
    pub working_dir: PathBuf,
}

/// Captured output of a finished compiler process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProtocCommand {
    /// Render the invocation the way a shell would see it, for logs and dry runs
    pub fn to_shell_command(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(|arg| quote(arg)));
        parts.join(" ")
    }

    /// Run the compiler to completion, capturing both output streams.
    ///
    /// Each stream is drained on its own thread while the parent waits for
    /// exit. Reading the pipes sequentially can deadlock once the child fills
    /// one of the OS pipe buffers.
    pub fn run(&self) -> io::Result<ProcessOutput> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout_pipe));
        let stderr_reader = thread::spawn(move || drain(stderr_pipe));

        let status = child.wait()?;
        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        Ok(ProcessOutput {
            status,
            stdout,
            stderr,
        })
    }
}

fn drain<R: Read>(pipe: Option<R>) -> String {
    let mut bytes = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut bytes);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn quote(arg: &str) -> String {
    if arg.contains(' ') {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}
