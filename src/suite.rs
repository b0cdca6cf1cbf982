//! Declarative YAML suite files.
//!
//! ```yaml
//! class: TestVMM
//! timeout_secs: 5
//! tests:
//!   - name: test_lv6
//!     kernel: lv6.bin
//!     steps:
//!       - expect: '^\[.{12}\] hey 481$'
//!       - expect: '^\[.{12}\] bye 451$'
//! ```

use crate::case::{compile_pattern, KernelSpec, Launch, Step, TestCase, TestId};
use crate::config::MAX_TIMEOUT_SECS;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    class: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    tests: Vec<TestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TestEntry {
    name: String,
    #[serde(default)]
    kernel: Option<String>,
    #[serde(default)]
    append: Option<String>,
    #[serde(default)]
    initrd: Option<String>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    steps: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepEntry {
    #[serde(default)]
    expect: Option<String>,
    #[serde(default)]
    input: Option<String>,
}

impl StepEntry {
    fn compile(self) -> Result<Step> {
        match (self.expect, self.input) {
            (Some(pattern), None) => Ok(Step::Expect(compile_pattern(&pattern)?)),
            (None, Some(data)) => Ok(Step::Input(data)),
            _ => bail!("each step needs exactly one of expect or input"),
        }
    }
}

/// Read and compile a suite file.
pub fn load(path: &Path) -> Result<Vec<TestCase>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read suite '{}'", path.display()))?;
    parse(&text).with_context(|| format!("invalid suite '{}'", path.display()))
}

/// Compile suite YAML into test cases, in file order.
pub fn parse(text: &str) -> Result<Vec<TestCase>> {
    let suite: SuiteFile = serde_yaml::from_str(text).context("malformed suite YAML")?;
    if suite.class.trim().is_empty() {
        bail!("suite class cannot be empty");
    }
    let suite_timeout = suite.timeout_secs.map(checked_timeout).transpose()?;

    let mut cases = Vec::with_capacity(suite.tests.len());
    for entry in suite.tests {
        let name = entry.name.clone();
        let case = build_case(&suite.class, entry, suite_timeout)
            .with_context(|| format!("test '{name}'"))?;
        if cases.iter().any(|c: &TestCase| c.id == case.id) {
            bail!("duplicate test '{name}'");
        }
        cases.push(case);
    }
    Ok(cases)
}

fn build_case(class: &str, entry: TestEntry, suite_timeout: Option<Duration>) -> Result<TestCase> {
    if entry.name.trim().is_empty() {
        bail!("test name cannot be empty");
    }
    let launch = match (entry.kernel, entry.command) {
        (Some(image), None) => {
            let mut spec = KernelSpec::new(image);
            spec.boot_args = entry.append;
            spec.aux_image = entry.initrd;
            Launch::Kernel(spec)
        }
        (None, Some(command)) => {
            if entry.append.is_some() || entry.initrd.is_some() {
                bail!("append/initrd only apply to kernel tests");
            }
            Launch::Command(command)
        }
        (Some(_), Some(_)) => bail!("set either kernel or command, not both"),
        (None, None) => bail!("one of kernel or command is required"),
    };

    let mut case = TestCase::new(TestId::new(class, entry.name), launch);
    let timeout = entry.timeout_secs.map(checked_timeout).transpose()?;
    case.timeout = timeout.or(suite_timeout);
    for (index, step) in entry.steps.into_iter().enumerate() {
        let step = step.compile().with_context(|| format!("step {}", index + 1))?;
        case = case.step(step);
    }
    Ok(case)
}

fn checked_timeout(secs: u64) -> Result<Duration> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        bail!("timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}
