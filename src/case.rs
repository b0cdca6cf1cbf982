//! Test case definitions and boot command construction.

use crate::error::HarnessError;
use crate::session::Session;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Identity of one test: the suite class plus the raw case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestId {
    pub class: String,
    pub name: String,
}

impl TestId {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
        }
    }

    /// `Class.case`, with a leading `test_` dropped from the case name.
    pub fn display_name(&self) -> String {
        let case = self.name.strip_prefix("test_").unwrap_or(&self.name);
        format!("{}.{case}", self.class)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Which kernel to boot and with what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSpec {
    pub image: String,
    pub boot_args: Option<String>,
    pub aux_image: Option<String>,
}

impl KernelSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            boot_args: None,
            aux_image: None,
        }
    }

    pub fn append(mut self, boot_args: impl Into<String>) -> Self {
        self.boot_args = Some(boot_args.into());
        self
    }

    pub fn initrd(mut self, aux_image: impl Into<String>) -> Self {
        self.aux_image = Some(aux_image.into());
        self
    }

    /// Build `<make_cmd> KERNEL=<path> [APPEND=<args>] [INITRD=<path>]`.
    ///
    /// Image names are resolved against `search_dirs` in order; the first existing regular
    /// file wins. Values are shell-quoted.
    pub fn command(&self, make_cmd: &str, search_dirs: &[PathBuf]) -> Result<String, HarnessError> {
        let kernel = locate_image(&self.image, make_cmd, search_dirs)?;
        let mut command = format!("{make_cmd} KERNEL={}", quote_path(&kernel));
        if let Some(args) = &self.boot_args {
            command.push_str(" APPEND=");
            command.push_str(&shell_words::quote(args));
        }
        if let Some(aux) = &self.aux_image {
            let initrd = locate_image(aux, make_cmd, search_dirs)?;
            command.push_str(" INITRD=");
            command.push_str(&quote_path(&initrd));
        }
        Ok(command)
    }
}

pub(crate) fn find_image(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn locate_image(name: &str, make_cmd: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, HarnessError> {
    find_image(name, search_dirs).ok_or_else(|| {
        let searched: Vec<String> = search_dirs.iter().map(|d| d.display().to_string()).collect();
        HarnessError::launch(
            format!("{make_cmd} KERNEL={name}"),
            format!("image `{name}' not found in {}", searched.join(", ")),
        )
    })
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}

/// How a test starts its subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Kernel(KernelSpec),
    /// A raw shell command, run as is.
    Command(String),
}

impl Launch {
    pub fn command(&self, make_cmd: &str, search_dirs: &[PathBuf]) -> Result<String, HarnessError> {
        match self {
            Launch::Kernel(spec) => spec.command(make_cmd, search_dirs),
            Launch::Command(command) => Ok(command.clone()),
        }
    }
}

/// One declarative action against the subject.
#[derive(Debug, Clone)]
pub enum Step {
    Expect(Regex),
    Input(String),
}

pub type BodyFn = dyn Fn(&mut Session) -> anyhow::Result<()> + Send + Sync;

pub(crate) enum Body {
    Steps(Vec<Step>),
    Closure(Box<BodyFn>),
}

/// A single test: what to boot and what to check.
pub struct TestCase {
    pub id: TestId,
    pub launch: Launch,
    /// Per-read timeout override; the runner default applies when unset.
    pub timeout: Option<Duration>,
    pub(crate) body: Body,
}

impl TestCase {
    pub fn new(id: TestId, launch: Launch) -> Self {
        Self {
            id,
            launch,
            timeout: None,
            body: Body::Steps(Vec::new()),
        }
    }

    pub fn kernel(class: &str, name: &str, spec: KernelSpec) -> Self {
        Self::new(TestId::new(class, name), Launch::Kernel(spec))
    }

    pub fn command(class: &str, name: &str, command: impl Into<String>) -> Self {
        Self::new(TestId::new(class, name), Launch::Command(command.into()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a step. Has no effect on a closure-bodied test.
    pub fn step(mut self, step: Step) -> Self {
        if let Body::Steps(steps) = &mut self.body {
            steps.push(step);
        }
        self
    }

    /// Append an expectation, compiling `pattern` now.
    pub fn expect(self, pattern: &str) -> Result<Self, HarnessError> {
        let regex = compile_pattern(pattern)?;
        Ok(self.step(Step::Expect(regex)))
    }

    pub fn input(self, data: impl Into<String>) -> Self {
        self.step(Step::Input(data.into()))
    }

    /// Replace the body with Rust code run against the live session.
    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Session) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.body = Body::Closure(Box::new(body));
        self
    }

    pub fn steps(&self) -> Option<&[Step]> {
        match &self.body {
            Body::Steps(steps) => Some(steps),
            Body::Closure(_) => None,
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("TestCase");
        out.field("id", &self.id)
            .field("launch", &self.launch)
            .field("timeout", &self.timeout);
        match &self.body {
            Body::Steps(steps) => out.field("steps", steps),
            Body::Closure(_) => out.field("body", &"<closure>"),
        };
        out.finish()
    }
}

pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, HarnessError> {
    Regex::new(pattern).map_err(|err| HarnessError::Pattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}
