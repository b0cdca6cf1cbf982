use anyhow::Result;
use kerneltest::config::HarnessConfig;
use kerneltest::{
    init_logging, init_tracing, log_debug, log_file_path, suite, ConsoleReporter, Palette,
    SuiteRunner, TestCase,
};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let config = HarnessConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    log_debug("=== kerneltest started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let mut cases = Vec::new();
    for path in &config.suites {
        let loaded = suite::load(path)?;
        log_debug(&format!("loaded {} tests from {}", loaded.len(), path.display()));
        cases.extend(loaded);
    }
    let cases = select(cases, config.filter.as_deref());

    if config.list {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for case in &cases {
            writeln!(out, "{}", case.id)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let runner = SuiteRunner::new(config.runner_config());
    let mut reporter = ConsoleReporter::new(io::stdout().lock(), Palette::new(config.use_color()));
    runner.run(&cases, &mut reporter);

    let result = reporter.result();
    log_debug(&format!(
        "=== kerneltest finished: {} passed, {} failed ===",
        result.passed,
        result.failed()
    ));
    Ok(if result.was_successful() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn select(cases: Vec<TestCase>, filter: Option<&str>) -> Vec<TestCase> {
    match filter {
        Some(needle) => cases
            .into_iter()
            .filter(|case| case.id.display_name().contains(needle))
            .collect(),
        None => cases,
    }
}
