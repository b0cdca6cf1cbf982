use super::*;
use regex::Regex;

fn id(name: &str) -> TestId {
    TestId::new("TestVMM", name)
}

fn render(palette: Palette, drive: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> (String, RunResult) {
    let mut reporter = ConsoleReporter::new(Vec::new(), palette);
    drive(&mut reporter);
    let (out, result) = reporter.into_inner();
    (String::from_utf8(out).expect("utf8 report"), result)
}

fn elapsed_re() -> Regex {
    Regex::new(r"\(\d+\.\d{3}s\)$").unwrap()
}

#[test]
fn passing_run_prints_plain_banners() {
    let (text, result) = render(Palette::PLAIN, |r| {
        r.start_run(2);
        r.start_test(&id("test_hello32"));
        r.add_success(&id("test_hello32"));
        r.start_test(&id("test_hello64"));
        r.add_success(&id("test_hello64"));
        r.stop_run();
    });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "[==========] Running 2 tests");
    assert_eq!(lines[1], "[ RUN      ] TestVMM.hello32");
    assert!(lines[2].starts_with("[       OK ] TestVMM.hello32 ("), "{}", lines[2]);
    assert!(elapsed_re().is_match(lines[2]), "{}", lines[2]);
    assert_eq!(lines[3], "[ RUN      ] TestVMM.hello64");
    assert!(lines[5].starts_with("[==========] 2 tests ran ("), "{}", lines[5]);
    assert_eq!(lines[6], "[  PASSED  ] 2 tests");
    assert_eq!(lines.len(), 7);
    assert!(result.was_successful());
    assert_eq!(result.tests_run, 2);
    assert_eq!(result.passed, 2);
}

#[test]
fn failure_detail_precedes_failed_banner_and_is_listed() {
    let detail = "`^bye$' not found in output:\n...\nhey";
    let (text, result) = render(Palette::PLAIN, |r| {
        r.start_run(2);
        r.start_test(&id("test_lv6"));
        r.add_failure(&id("test_lv6"), detail);
        r.start_test(&id("test_xv6"));
        r.add_success(&id("test_xv6"));
        r.stop_run();
    });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "[ RUN      ] TestVMM.lv6");
    assert_eq!(lines[2], "`^bye$' not found in output:");
    assert_eq!(lines[3], "...");
    assert_eq!(lines[4], "hey");
    assert!(lines[5].starts_with("[  FAILED  ] TestVMM.lv6 ("), "{}", lines[5]);
    assert_eq!(lines[9], "[  PASSED  ] 1 test");
    assert_eq!(lines[10], "[  FAILED  ] 1 test, listed below:");
    assert_eq!(lines[11], "[  FAILED  ] TestVMM.lv6 ");
    assert_eq!(lines.len(), 12);
    assert!(!result.was_successful());
    assert_eq!(result.failed(), 1);
    assert_eq!(result.failures[0], (id("test_lv6"), detail.to_string()));
}

#[test]
fn ansi_palette_wraps_each_tag() {
    let (text, _) = render(Palette::ANSI, |r| {
        r.start_run(1);
        r.start_test(&id("test_a"));
        r.add_failure(&id("test_a"), "boom");
        r.stop_run();
    });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "\x1b[32;1m[==========]\x1b[0m Running 1 test");
    assert_eq!(lines[1], "\x1b[32;1m[ RUN      ]\x1b[0m TestVMM.a");
    assert_eq!(lines[2], "boom");
    assert!(lines[3].starts_with("\x1b[31;1m[  FAILED  ]\x1b[0m TestVMM.a ("));
    assert_eq!(lines[5], "\x1b[32;1m[  PASSED  ]\x1b[0m 0 tests");
    assert_eq!(lines[6], "\x1b[31;1m[  FAILED  ]\x1b[0m 1 test, listed below:");
    assert_eq!(lines[7], "\x1b[31;1m[  FAILED  ]\x1b[0m TestVMM.a ");
}

#[test]
fn empty_run_reports_zero_tests_and_succeeds() {
    let (text, result) = render(Palette::PLAIN, |r| {
        r.start_run(0);
        r.stop_run();
    });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "[==========] Running 0 tests");
    assert!(lines[1].starts_with("[==========] 0 tests ran ("));
    assert_eq!(lines[2], "[  PASSED  ] 0 tests");
    assert!(result.was_successful());
}

#[test]
fn plural_only_singular_for_one() {
    assert_eq!(plural(0), "tests");
    assert_eq!(plural(1), "test");
    assert_eq!(plural(7), "tests");
}

#[test]
fn palette_new_follows_color_flag() {
    assert_eq!(Palette::new(true), Palette::ANSI);
    assert_eq!(Palette::new(false), Palette::PLAIN);
    assert_eq!(Palette::default(), Palette::ANSI);
}
