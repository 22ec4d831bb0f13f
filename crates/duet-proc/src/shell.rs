use crate::Invocation;

/// How command lines are handed to the system shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub program: String,
    /// Flag that makes `program` run the next argument as a script.
    pub flag: String,
}

impl ShellConfig {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// `{program, [flag, command]}`. Every call is a fresh, stateless shell.
    pub fn invocation(&self, command: &str) -> Invocation {
        Invocation::new(&self.program, [self.flag.as_str(), command])
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}
