//! Screensaver command line.
//!
//! The host launches a screensaver with one switch, `/` or `-` prefixed and
//! case-insensitive, optionally followed by a native window handle either
//! after a colon or as the next argument:
//!
//! | Arguments            | Mode                                   |
//! |----------------------|----------------------------------------|
//! | *(none)*, `/s`       | full screen on every monitor           |
//! | `/p 1234`, `/p:1234` | preview inside window `1234`           |
//! | `/c`, `/c:1234`      | settings editor (owner handle logged)  |
//!
//! A preview request without a handle falls back to full screen.

/// What the process was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full screen on every monitor.
    Fullscreen,
    /// Animated preview inside the given parent window.
    Preview { parent: u64 },
    /// Settings editor. `owner` is the window that asked for it, if any.
    Settings { owner: Option<u64> },
}

/// Parse the arguments after the program name.
pub fn parse<I, S>(args: I) -> Mode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<S> = args.into_iter().collect();
    let Some(first) = args.first().map(|a| a.as_ref().trim()) else {
        return Mode::Fullscreen;
    };

    let Some(switch) = first.strip_prefix('/').or_else(|| first.strip_prefix('-')) else {
        tracing::warn!(argument = first, "unrecognised argument, running full screen");
        return Mode::Fullscreen;
    };
    let mut chars = switch.chars();
    let Some(letter) = chars.next().map(|c| c.to_ascii_lowercase()) else {
        return Mode::Fullscreen;
    };
    let rest = chars.as_str();

    let handle = match rest.strip_prefix(':') {
        Some(inline) => parse_handle(inline),
        None => args.get(1).and_then(|a| parse_handle(a.as_ref())),
    };

    match letter {
        's' => Mode::Fullscreen,
        'p' => match handle {
            Some(parent) => Mode::Preview { parent },
            None => {
                tracing::warn!("preview requested without a window handle, running full screen");
                Mode::Fullscreen
            }
        },
        'c' => Mode::Settings { owner: handle },
        other => {
            tracing::warn!(switch = %other, "unknown switch, running full screen");
            Mode::Fullscreen
        }
    }
}

/// Parse a window handle: decimal digits, or hex with a `0x` prefix.
fn parse_handle(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().filter(|&h| h != 0);
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|&h| h != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_fullscreen() {
        assert_eq!(parse(Vec::<String>::new()), Mode::Fullscreen);
        assert_eq!(parse(["/s"]), Mode::Fullscreen);
        assert_eq!(parse(["-S"]), Mode::Fullscreen);
    }

    #[test]
    fn test_preview_handle_forms() {
        assert_eq!(parse(["/p", "1234"]), Mode::Preview { parent: 1234 });
        assert_eq!(parse(["/P:5678"]), Mode::Preview { parent: 5678 });
        assert_eq!(parse(["-p:0x1F"]), Mode::Preview { parent: 31 });
    }

    #[test]
    fn test_preview_without_handle_falls_back() {
        assert_eq!(parse(["/p"]), Mode::Fullscreen);
        assert_eq!(parse(["/p", "abc"]), Mode::Fullscreen);
        assert_eq!(parse(["/p:0"]), Mode::Fullscreen);
    }

    #[test]
    fn test_settings_forms() {
        assert_eq!(parse(["/c"]), Mode::Settings { owner: None });
        assert_eq!(parse(["/c:42"]), Mode::Settings { owner: Some(42) });
        assert_eq!(parse(["/C", "42"]), Mode::Settings { owner: Some(42) });
    }

    #[test]
    fn test_unknown_arguments_fall_back() {
        assert_eq!(parse(["/x"]), Mode::Fullscreen);
        assert_eq!(parse(["hello"]), Mode::Fullscreen);
        assert_eq!(parse(["/"]), Mode::Fullscreen);
    }
}
