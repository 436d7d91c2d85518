//! Command line tokenizer.

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls,
    /// `cd` without an argument goes to the root.
    Cd(String),
    Cp { src: String, dst: String },
    Cat(String),
    Echo(String),
    Exit,
    /// Known command with the wrong arguments; carries the usage text.
    Usage(&'static str),
    Unknown(String),
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show; may be empty.
    Output(String),
    /// Leave the shell.
    Exit,
}

impl Command {
    /// Split `line` on whitespace and map it to a command.
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Command> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let args: Vec<&str> = parts.collect();

        let cmd = match (name, args.as_slice()) {
            ("ls", _) => Command::Ls,
            ("cd", []) => Command::Cd("/".to_string()),
            ("cd", [path, ..]) => Command::Cd(path.to_string()),
            ("cp", [src, dst, ..]) => Command::Cp {
                src: src.to_string(),
                dst: dst.to_string(),
            },
            ("cp", _) => Command::Usage("usage: cp <source> <destination>"),
            ("cat", [path, ..]) => Command::Cat(path.to_string()),
            ("cat", []) => Command::Usage("usage: cat <file>"),
            ("echo", words) => Command::Echo(words.join(" ")),
            ("exit", _) => Command::Exit,
            (other, _) => Command::Unknown(other.to_string()),
        };
        Some(cmd)
    }

    /// Human-readable description for the action log.
    pub fn describe(&self) -> String {
        match self {
            Command::Ls => "ls".to_string(),
            Command::Cd(path) => format!("cd {}", path),
            Command::Cp { src, dst } => format!("cp {} {}", src, dst),
            Command::Cat(path) => format!("cat {}", path),
            Command::Echo(text) => format!("echo {}", text),
            Command::Exit => "exit".to_string(),
            Command::Usage(usage) => format!("invalid: {}", usage),
            Command::Unknown(name) => format!("unknown command: {}", name),
        }
    }
}
