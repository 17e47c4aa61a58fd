//! Joining and splitting of command lines under POSIX `sh` quoting rules.
//!
//! Only the argument-splitting subset of the shell grammar is implemented:
//! whitespace delimiting, single/double quoting, and backslash escapes. No
//! globbing, variable expansion, or pipeline syntax.
//!
//! The two directions are inverses for every argument vector: splitting a
//! command line produced by [`join_arguments`] or [`join_command_line`]
//! always recovers the original vector.

use itertools::Itertools;

use crate::error::{Error, Result};

/// Argument separators recognized by the splitter.
const WHITESPACES: [char; 5] = [' ', '\t', '\r', '\n', '\x0B'];

fn is_whitespace(ch: char) -> bool {
    WHITESPACES.contains(&ch)
}

/// Characters that never need quoting, so arguments made only of them are
/// emitted verbatim. Non-ASCII characters are passed through untouched.
fn is_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | ':' | '-' | '=' | '.') || !ch.is_ascii()
}

/// Escapes a single argument for an `sh` command line.
///
/// Arguments made entirely of safe characters are returned unchanged;
/// everything else is wrapped in single quotes, with each literal `'`
/// expanded to `'\''` (close the quotes, emit an escaped quote, reopen).
fn escape_argument(argument: &str) -> String {
    if !argument.is_empty() && argument.chars().all(is_safe) {
        return argument.to_string();
    }

    let mut escaped = String::with_capacity(argument.len() + 2);
    escaped.push('\'');
    for ch in argument.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');

    escaped
}

/// Joins command-line arguments (the ones following the program name) into a
/// single string. An empty slice yields an empty string.
pub fn join_arguments(arguments: &[String]) -> String {
    arguments
        .iter()
        .map(|argument| escape_argument(argument))
        .join(" ")
}

/// Joins a program name and its arguments into a full command line.
///
/// The program name gets special treatment: it is wrapped in double quotes
/// when it contains whitespace. That matches the Windows joiner rather than
/// anything `sh` requires, and is kept for compatibility with command lines
/// produced by the Windows counterpart.
///
/// # Errors
///
/// Returns [`Error::InvalidCommand`] if the vector is empty, the program
/// name is blank or contains a double quote, or the joined result
/// degenerates to an ambiguous string.
pub fn join_command_line(arguments: &[String]) -> Result<String> {
    let Some((program, rest)) = arguments.split_first() else {
        return Err(Error::invalid_command(arguments, "no arguments given"));
    };
    if program.trim().is_empty() {
        return Err(Error::invalid_command(arguments, "the command is blank"));
    }
    if program.contains('"') {
        return Err(Error::invalid_command(
            arguments,
            "the command can't contain double quotes",
        ));
    }

    let mut result = if program.contains(is_whitespace) {
        format!("\"{program}\"")
    } else {
        escape_argument(program)
    };
    let joined_rest = join_arguments(rest);
    if !joined_rest.is_empty() {
        result.push(' ');
        result.push_str(&joined_rest);
    }

    if result.is_empty() || result == "''" || result.starts_with("'' ") {
        return Err(Error::invalid_command(
            arguments,
            "the joined command line is ambiguous",
        ));
    }

    Ok(result)
}

/// Splits a full command line (program name included) into its arguments.
///
/// # Errors
///
/// Returns [`Error::InvalidCommandLine`] if the input is blank or yields no
/// arguments, and [`Error::QuotesMismatch`] if a quote is left open.
pub fn split_command_line(command_line: &str) -> Result<Vec<String>> {
    if command_line.trim().is_empty() {
        return Err(Error::InvalidCommandLine(command_line.to_string()));
    }

    let arguments = split_arguments(command_line)?;
    if arguments.is_empty() {
        return Err(Error::InvalidCommandLine(command_line.to_string()));
    }

    Ok(arguments)
}

/// Splits command-line arguments into a list. Blank input yields an empty
/// list; use [`split_command_line`] when at least a program name is
/// expected.
///
/// # Errors
///
/// Returns [`Error::QuotesMismatch`] if a quote is left open.
pub fn split_arguments(arguments: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = remove_line_continuations(arguments).chars().collect();
    let length = chars.len();
    let mut result = Vec::new();
    let mut position = 0;

    'tokens: while position < length {
        while is_whitespace(chars[position]) {
            position += 1;
            if position == length {
                break 'tokens;
            }
        }

        // `argument` holds resolved text; `chunk` buffers raw text whose
        // unescaping depends on the quote context it ends in.
        let mut quoter: Option<char> = None;
        let mut argument = String::new();
        let mut chunk = String::new();
        while position < length {
            let ch = chars[position];
            if quoter.is_none() && is_whitespace(ch) {
                break;
            }
            let next = chars.get(position + 1).copied();

            // Two-character escapes inside double quotes.
            if quoter == Some('"') && ch == '\\' && matches!(next, Some('"') | Some('\\')) {
                chunk.push(next.unwrap_or_default());
                position += 2;
                continue;
            }
            if quoter == Some(ch) {
                if quoter == Some('"') {
                    argument.push_str(&strip_c_slashes(&chunk));
                } else {
                    argument.push_str(&chunk);
                }
                quoter = None;
                chunk.clear();
                position += 1;
                continue;
            }
            if quoter != Some('\'') && ch == '\\' && next.is_some() {
                chunk.push(ch);
                chunk.push(next.unwrap_or_default());
                position += 2;
                continue;
            }
            if quoter.is_none() && (ch == '"' || ch == '\'') {
                quoter = Some(ch);
                argument.push_str(&strip_slashes(&chunk));
                chunk.clear();
                position += 1;
                continue;
            }
            chunk.push(ch);
            position += 1;
        }

        if quoter.is_some() {
            return Err(Error::QuotesMismatch(arguments.to_string()));
        }
        if !chunk.is_empty() {
            argument.push_str(&strip_c_slashes(&chunk));
        }
        result.push(argument);
    }

    Ok(result)
}

/// Removes backslash-newline continuation sequences: a backslash followed by
/// one or more CR/LF characters disappears entirely, joining the lines.
fn remove_line_continuations(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && matches!(chars.peek(), Some('\r') | Some('\n')) {
            while matches!(chars.peek(), Some('\r') | Some('\n')) {
                chars.next();
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// Removes simple backslash escapes: `\x` becomes `x` for any `x`. Applied
/// to unquoted text that runs into an opening quote.
fn strip_slashes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => output.push(next),
                None => output.push(ch),
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// Resolves C-style backslash escapes: the usual control-character escapes,
/// `\xHH` hex and `\NNN` octal sequences; a backslash before any other
/// character just disappears.
fn strip_c_slashes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::with_capacity(input.len());
    let mut position = 0;
    while position < chars.len() {
        let ch = chars[position];
        if ch != '\\' || position + 1 == chars.len() {
            output.push(ch);
            position += 1;
            continue;
        }
        position += 1;
        let escape = chars[position];
        position += 1;
        match escape {
            'n' => output.push('\n'),
            't' => output.push('\t'),
            'r' => output.push('\r'),
            'a' => output.push('\x07'),
            'v' => output.push('\x0B'),
            'b' => output.push('\x08'),
            'f' => output.push('\x0C'),
            'x' => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match chars.get(position).and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            position += 1;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    output.push('x');
                } else if let Some(decoded) = char::from_u32(value) {
                    output.push(decoded);
                }
            }
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or_default();
                let mut digits = 1;
                while digits < 3 {
                    match chars.get(position).and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            position += 1;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if let Some(decoded) = char::from_u32(value) {
                    output.push(decoded);
                }
            }
            other => output.push(other),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_join_arguments_safe_fast_path() {
        assert_eq!(join_arguments(&args(&["a", "b"])), "a b");
        assert_eq!(join_arguments(&args(&["test1", "test2"])), "test1 test2");
        assert_eq!(join_arguments(&args(&["/usr/bin/env", "-i"])), "/usr/bin/env -i");
        assert_eq!(join_arguments(&args(&["KEY=value.1"])), "KEY=value.1");
    }

    #[test]
    fn test_join_arguments_empty_vector() {
        assert_eq!(join_arguments(&[]), "");
    }

    #[test]
    fn test_join_arguments_quoting() {
        assert_eq!(join_arguments(&args(&["a b"])), "'a b'");
        assert_eq!(join_arguments(&args(&["test1'"])), "'test1'\\'''");
        assert_eq!(join_arguments(&args(&[""])), "''");
        assert_eq!(join_arguments(&args(&["test1\\", "test2"])), "'test1\\' test2");
    }

    #[test]
    fn test_join_arguments_non_ascii_passes_through() {
        assert_eq!(join_arguments(&args(&["caffè"])), "caffè");
    }

    #[test]
    fn test_join_command_line() {
        assert_eq!(join_command_line(&args(&["program"])).unwrap(), "program");
        assert_eq!(join_command_line(&args(&["program", "a"])).unwrap(), "program a");
        assert_eq!(
            join_command_line(&args(&["program", "test1", "test2"])).unwrap(),
            "program test1 test2"
        );
        assert_eq!(
            join_command_line(&args(&["test1'"])).unwrap(),
            "'test1'\\'''"
        );
        assert_eq!(
            join_command_line(&args(&["test1'", "test2"])).unwrap(),
            "'test1'\\''' test2"
        );
        assert_eq!(
            join_command_line(&args(&["test1\\", "test2"])).unwrap(),
            "'test1\\' test2"
        );
    }

    #[test]
    fn test_join_command_line_quotes_program_with_whitespace() {
        assert_eq!(
            join_command_line(&args(&["/opt/my tool/run", "x"])).unwrap(),
            "\"/opt/my tool/run\" x"
        );
    }

    #[test]
    fn test_join_command_line_rejects_bad_programs() {
        assert!(matches!(
            join_command_line(&[]),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            join_command_line(&args(&[""])),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            join_command_line(&args(&["   "])),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            join_command_line(&args(&["", "a"])),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            join_command_line(&args(&["pro\"gram", "a"])),
            Err(Error::InvalidCommand { .. })
        ));
    }

    #[test]
    fn test_split_command_line_basics() {
        let cases: &[(&str, &[&str])] = &[
            ("program", &["program"]),
            ("program    ", &["program"]),
            ("    program", &["program"]),
            ("    program    ", &["program"]),
            ("program a", &["program", "a"]),
            ("program    a   ", &["program", "a"]),
            ("program test1    test2", &["program", "test1", "test2"]),
            ("program \"test\"", &["program", "test"]),
            ("program \"test 1\" test2", &["program", "test 1", "test2"]),
            ("program \"test 1 \" test2", &["program", "test 1 ", "test2"]),
        ];
        for (command_line, expected) in cases {
            assert_eq!(
                split_command_line(command_line).unwrap(),
                args(expected),
                "splitting >{command_line}<"
            );
        }
    }

    #[test]
    fn test_split_command_line_quoting() {
        let cases: &[(&str, &[&str])] = &[
            ("\"a\"b", &["ab"]),
            ("\"test1\"test2", &["test1test2"]),
            ("\"a\" b", &["a", "b"]),
            ("'a'b", &["ab"]),
            ("'test1' test2", &["test1", "test2"]),
            ("a\\ b", &["a b"]),
            ("test1\\ test2", &["test1 test2"]),
            ("'test1'\\'''", &["test1'"]),
            ("'test1'\\''' test2", &["test1'", "test2"]),
            ("test1\\\\ test2", &["test1\\", "test2"]),
            ("'test1\\' test2", &["test1\\", "test2"]),
        ];
        for (command_line, expected) in cases {
            assert_eq!(
                split_command_line(command_line).unwrap(),
                args(expected),
                "splitting >{command_line}<"
            );
        }
    }

    #[test]
    fn test_split_command_line_continuations() {
        assert_eq!(
            split_command_line("program a\\\nb").unwrap(),
            args(&["program", "ab"])
        );
        assert_eq!(
            split_command_line("program \\\r\n   a").unwrap(),
            args(&["program", "a"])
        );
    }

    #[test]
    fn test_split_command_line_rejects_blank_input() {
        assert_eq!(
            split_command_line(""),
            Err(Error::InvalidCommandLine(String::new()))
        );
        assert_eq!(
            split_command_line("   "),
            Err(Error::InvalidCommandLine("   ".to_string()))
        );
    }

    #[test]
    fn test_split_command_line_mismatched_quotes() {
        for command_line in [
            "\"a", "\"test", "a\"", "test\"", "'a", "'test", "a'", "test'", "\"a b",
            "\"test1 test2", "a\" b", "'a b", "a' b", "test1' test2",
        ] {
            assert_eq!(
                split_command_line(command_line),
                Err(Error::QuotesMismatch(command_line.to_string())),
                "splitting >{command_line}<"
            );
        }
    }

    #[test]
    fn test_split_arguments_accepts_blank_input() {
        assert_eq!(split_arguments("").unwrap(), Vec::<String>::new());
        assert_eq!(split_arguments("   \t ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_split_inside_double_quotes() {
        assert_eq!(
            split_arguments("\"a \\\" b\"").unwrap(),
            args(&["a \" b"])
        );
        assert_eq!(split_arguments("\"ab\\\\\"").unwrap(), args(&["ab\\"]));
    }

    #[test]
    fn test_single_quotes_are_verbatim() {
        assert_eq!(split_arguments("'a\"b'").unwrap(), args(&["a\"b"]));
        assert_eq!(split_arguments("'a\\nb'").unwrap(), args(&["a\\nb"]));
    }

    #[test]
    fn test_round_trip() {
        let vectors: &[&[&str]] = &[
            &["program"],
            &["program", "a", "b"],
            &["program", "a b", "c"],
            &["program", "test1'"],
            &["program", "don't", "panic"],
            &["program", "back\\slash", "tab\there"],
            &["program", "", "empty-before"],
            &["program", "caffè", "münchen"],
            &["program", "'quoted'", "\"double\""],
        ];
        for vector in vectors {
            let expected = args(vector);
            let command_line = join_command_line(&expected).unwrap();
            assert_eq!(
                split_command_line(&command_line).unwrap(),
                expected,
                "round-tripping {vector:?} through >{command_line}<"
            );
        }
    }

    #[test]
    fn test_join_is_deterministic() {
        let vector = args(&["program", "a b", "c'd"]);
        assert_eq!(
            join_command_line(&vector).unwrap(),
            join_command_line(&vector).unwrap()
        );
    }
}
