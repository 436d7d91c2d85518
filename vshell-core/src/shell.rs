//! Command dispatcher and script runner.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::action_log::{ActionLog, NullActionLog};
use crate::archive::Backing;
use crate::command::{Command, Outcome};
use crate::error::VshResult;
use crate::session::Session;

/// Routes parsed commands to a session and records each one.
pub struct Shell<B: Backing> {
    session: Session<B>,
    log: Box<dyn ActionLog>,
}

impl<B: Backing> Shell<B> {
    pub fn new(session: Session<B>, log: Box<dyn ActionLog>) -> Self {
        Self { session, log }
    }

    /// Shell that records nothing.
    pub fn without_log(session: Session<B>) -> Self {
        Self::new(session, Box::new(NullActionLog))
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    /// Run one command line.
    ///
    /// User errors (missing file, bad directory, ...) come back as output.
    /// Archive and I/O failures are returned as `Err`.
    pub fn execute(&mut self, line: &str) -> VshResult<Outcome> {
        let Some(cmd) = Command::parse(line) else {
            return Ok(Outcome::Output(String::new()));
        };
        self.log.record(&cmd.describe())?;

        match self.dispatch(cmd) {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_user_error() => {
                tracing::debug!(line, error = %e, "command failed");
                Ok(Outcome::Output(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, cmd: Command) -> VshResult<Outcome> {
        let output = match cmd {
            Command::Ls => self.session.ls().to_string(),
            Command::Cd(path) => {
                self.session.cd(&path)?;
                String::new()
            }
            Command::Cp { src, dst } => self.session.cp(&src, &dst)?,
            Command::Cat(path) => self.session.cat(&path)?,
            Command::Echo(text) => text,
            Command::Exit => return Ok(Outcome::Exit),
            Command::Usage(usage) => usage.to_string(),
            Command::Unknown(name) => format!("Command not found: {}", name),
        };
        Ok(Outcome::Output(output))
    }

    /// Feed every line of `reader` to `execute`, in order.
    ///
    /// Blank lines and `#` comments (including a shebang) are skipped.
    /// Non-empty output is passed to `on_output`. Stops at `exit` and
    /// returns `Outcome::Exit`.
    pub fn run_script<R, F>(&mut self, reader: R, mut on_output: F) -> VshResult<Outcome>
    where
        R: BufRead,
        F: FnMut(&str),
    {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.execute(line)? {
                Outcome::Exit => return Ok(Outcome::Exit),
                Outcome::Output(text) if !text.is_empty() => on_output(&text),
                Outcome::Output(_) => {}
            }
        }
        Ok(Outcome::Output(String::new()))
    }

    /// Run a startup script from disk.
    pub fn run_script_file<F>(&mut self, path: impl AsRef<Path>, on_output: F) -> VshResult<Outcome>
    where
        F: FnMut(&str),
    {
        let path = path.as_ref();
        tracing::debug!(script = %path.display(), "running script");
        let file = File::open(path)?;
        self.run_script(BufReader::new(file), on_output)
    }

    /// Close the session and return the archive storage.
    pub fn close(self) -> B {
        self.session.close()
    }
}
