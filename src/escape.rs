//! Shell escaping for option arguments.
//!
//! Every option argument is quoted so the shell hands it to the tool as one
//! token with its bytes unchanged. Positional parameters are not passed
//! through here.

/// Quotes `value` for the platform shell used by the live runner.
#[must_use]
pub fn quote(value: &str) -> String {
    #[cfg(windows)]
    {
        quote_cmd(value)
    }
    #[cfg(not(windows))]
    {
        quote_posix(value)
    }
}

/// Wraps `value` in single quotes for `sh`; embedded quotes become `'\''`.
#[must_use]
pub fn quote_posix(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Wraps `value` in double quotes for `cmd /C` and the MSVC argument parser.
///
/// - An embedded `"` becomes `""`, which keeps `cmd.exe` inside the quoted
///   region and reads back as one literal quote.
/// - `%` is emitted outside the quotes as `^%`, so `cmd.exe` never expands
///   it as a variable reference.
/// - Backslashes that end up in front of a `"` are doubled.
///
/// `!` needs nothing: the live runner does not enable delayed expansion.
#[must_use]
pub fn quote_cmd(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    let mut backslashes = 0;
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => {
                backslashes += 1;
                quoted.push(ch);
                continue;
            }
            '"' => {
                push_backslashes(&mut quoted, backslashes);
                quoted.push_str("\"\"");
            }
            '%' => {
                push_backslashes(&mut quoted, backslashes);
                quoted.push_str("\"^%\"");
            }
            other => quoted.push(other),
        }
        backslashes = 0;
    }
    push_backslashes(&mut quoted, backslashes);
    quoted.push('"');
    quoted
}

fn push_backslashes(quoted: &mut String, count: usize) {
    quoted.push_str(&"\\".repeat(count));
}
