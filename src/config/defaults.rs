use std::path::PathBuf;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const MAX_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_MAKE_CMD: &str = "make qemu";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_SUITE: &str = "suites/vmm.yaml";

// Build output first, then prebuilt test kernels, then checked-in images.
const SEARCH_DIRS: &[&str] = &["o.x86_64/", "o.x86_64/tests/", "tests/"];

pub fn default_search_dirs() -> Vec<PathBuf> {
    SEARCH_DIRS.iter().map(PathBuf::from).collect()
}
