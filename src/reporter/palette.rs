/// Escape codes used to color banner tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub pass: &'static str,
    pub fail: &'static str,
    pub reset: &'static str,
}

impl Palette {
    /// Bold green / bold red, the colors log scrapers key on.
    pub const ANSI: Self = Self {
        pass: "\x1b[32;1m",
        fail: "\x1b[31;1m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Self = Self {
        pass: "",
        fail: "",
        reset: "",
    };

    pub fn new(use_color: bool) -> Self {
        if use_color {
            Self::ANSI
        } else {
            Self::PLAIN
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ANSI
    }
}

/// The fixed bracket tags of the console protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Banner {
    Divider,
    Run,
    Ok,
    Failed,
    Passed,
}

impl Banner {
    pub(super) fn tag(self) -> &'static str {
        match self {
            Banner::Divider => "[==========]",
            Banner::Run => "[ RUN      ]",
            Banner::Ok => "[       OK ]",
            Banner::Failed => "[  FAILED  ]",
            Banner::Passed => "[  PASSED  ]",
        }
    }

    pub(super) fn color(self, palette: &Palette) -> &'static str {
        match self {
            Banner::Failed => palette.fail,
            Banner::Divider | Banner::Run | Banner::Ok | Banner::Passed => palette.pass,
        }
    }
}
