use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{MongitError, Result};

/// A single external command line: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for a in &self.args {
            if a.is_empty() || a.contains(char::is_whitespace) {
                write!(f, " {:?}", a)?;
            } else {
                write!(f, " {}", a)?;
            }
        }
        Ok(())
    }
}

/// Runs external programs to completion, one at a time.
pub trait Runner {
    /// Run `inv` and return its captured stdout. A non-zero exit becomes
    /// `MongitError::CommandFailed` carrying stderr, or stdout when stderr is empty.
    fn run(&self, inv: &Invocation) -> Result<String>;

    /// Directory the commands run in.
    fn workdir(&self) -> &Path;
}

pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

impl Runner for SystemRunner {
    fn run(&self, inv: &Invocation) -> Result<String> {
        tracing::debug!(command = %inv, "running");
        let output = Command::new(&inv.program)
            .args(&inv.args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| MongitError::Spawn {
                program: inv.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        let status = match output.status.code() {
            Some(code) => format!("status {}", code),
            None => "a signal".to_string(),
        };
        tracing::debug!(command = %inv, %status, "command failed");
        Err(MongitError::CommandFailed {
            command: inv.to_string(),
            status,
            output: if stderr.is_empty() { stdout } else { stderr },
        })
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }
}

#[cfg(test)]
pub mod scripted {
    use super::*;
    use std::cell::RefCell;

    type Hook = Box<dyn Fn(&Path)>;

    struct Rule {
        prefix: Vec<String>,
        reply: std::result::Result<String, String>,
        hook: Option<Hook>,
    }

    /// Test runner: records every invocation and answers from canned rules.
    /// The first rule whose program + leading args match wins; unmatched
    /// commands succeed with empty output.
    pub struct ScriptedRunner {
        workdir: PathBuf,
        rules: Vec<Rule>,
        pub calls: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        pub fn new(workdir: &Path) -> Self {
            Self {
                workdir: workdir.to_path_buf(),
                rules: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn ok(self, prefix: &[&str], stdout: &str) -> Self {
            self.rule(prefix, Ok(stdout.to_string()), None)
        }

        pub fn fail(self, prefix: &[&str], stderr: &str) -> Self {
            self.rule(prefix, Err(stderr.to_string()), None)
        }

        /// Succeed and run `hook` against the workdir, e.g. to fake a dump.
        pub fn effect(self, prefix: &[&str], hook: impl Fn(&Path) + 'static) -> Self {
            self.rule(prefix, Ok(String::new()), Some(Box::new(hook)))
        }

        fn rule(
            mut self,
            prefix: &[&str],
            reply: std::result::Result<String, String>,
            hook: Option<Hook>,
        ) -> Self {
            self.rules.push(Rule {
                prefix: prefix.iter().map(|s| s.to_string()).collect(),
                reply,
                hook,
            });
            self
        }

        pub fn commands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.to_string()).collect()
        }

        pub fn ran(&self, program: &str) -> bool {
            self.calls.borrow().iter().any(|c| c.program == program)
        }

        /// Whether any call's arguments start with `args`.
        pub fn ran_args(&self, args: &[&str]) -> bool {
            self.calls.borrow().iter().any(|c| {
                c.args.len() >= args.len() && c.args.iter().zip(args).all(|(a, b)| a == b)
            })
        }
    }

    impl Runner for ScriptedRunner {
        fn run(&self, inv: &Invocation) -> Result<String> {
            self.calls.borrow_mut().push(inv.clone());
            let line: Vec<&String> = std::iter::once(&inv.program)
                .chain(inv.args.iter())
                .collect();
            let rule = self.rules.iter().find(|r| {
                r.prefix.len() <= line.len() && r.prefix.iter().zip(&line).all(|(a, b)| a == *b)
            });
            let Some(rule) = rule else {
                return Ok(String::new());
            };

            if let Some(hook) = &rule.hook {
                hook(&self.workdir);
            }
            match &rule.reply {
                Ok(out) => Ok(out.clone()),
                Err(err) => Err(MongitError::CommandFailed {
                    command: inv.to_string(),
                    status: "status 1".into(),
                    output: err.clone(),
                }),
            }
        }

        fn workdir(&self) -> &Path {
            &self.workdir
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(dir: &tempfile::TempDir) -> SystemRunner {
        SystemRunner::new(dir.path().to_path_buf())
    }

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").args(["-c", script])
    }

    #[test]
    fn display_quotes_args_with_spaces() {
        let inv = Invocation::new("git").args(["commit", "-m", "mongit-day 1"]);
        assert_eq!(inv.to_string(), "git commit -m \"mongit-day 1\"");
    }

    #[test]
    fn system_runner_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = runner(&dir).run(&sh("echo hello")).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn system_runner_prefers_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = runner(&dir)
            .run(&sh("echo out; echo boom >&2; exit 3"))
            .unwrap_err();
        match err {
            MongitError::CommandFailed { status, output, .. } => {
                assert_eq!(status, "status 3");
                assert_eq!(output, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn system_runner_falls_back_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let err = runner(&dir).run(&sh("echo only-out; exit 1")).unwrap_err();
        assert!(matches!(
            err,
            MongitError::CommandFailed { ref output, .. } if output == "only-out"
        ));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("mongit-definitely-not-installed");
        let err = runner(&dir).run(&inv).unwrap_err();
        assert!(matches!(err, MongitError::Spawn { .. }));
    }
}
