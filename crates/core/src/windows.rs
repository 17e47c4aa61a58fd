//! Joining and splitting of command lines under the Windows C runtime
//! argument grammar.
//!
//! The splitter implements the documented `argv` construction rules:
//! backslash runs are meaningful only directly before a double quote (2N
//! backslashes plus quote → N backslashes and a quote toggle, 2N+1 → N
//! backslashes and a literal quote), and a run of consecutive quotes
//! collapses every third one into a literal quote. The joiner emits the
//! matching inverse, and additionally caret-escapes `cmd.exe` metacharacters
//! in unquoted arguments so the produced line survives an interpreter layer
//! on top of the C runtime parser.
//!
//! Windows consoles may run with a non-UTF-8 codepage; the `_encoded`
//! variants convert the finished command line through [`crate::codepage`]
//! exactly once.

use itertools::Itertools;

use crate::codepage;
use crate::error::{Error, Result};

/// Argument separators. Unlike POSIX, only space and tab delimit arguments.
const WHITESPACES: [char; 2] = [' ', '\t'];

/// Which revision of the C runtime grammar the splitter follows.
///
/// The two differ only in the quote-counter value after a run of three
/// consecutive quotes collapses into a literal quote: the 2008 rules count
/// the collapsed quote as a toggle, the older rules do not. Everything
/// published since 2008 parses with [`SplitRules::Crt2008`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitRules {
    Pre2008,
    #[default]
    Crt2008,
}

/// Escapes a single argument.
///
/// Arguments without whitespace or double quotes are emitted unquoted, with
/// the `^ > < | &` shell metacharacters caret-escaped. Everything else is
/// wrapped in double quotes using backslash doubling.
fn escape_argument(argument: &str) -> String {
    if !argument.is_empty() && !argument.contains([' ', '\t', '\n', '\x0B', '"']) {
        let mut escaped = String::with_capacity(argument.len());
        for ch in argument.chars() {
            if matches!(ch, '^' | '>' | '<' | '|' | '&') {
                escaped.push('^');
            }
            escaped.push(ch);
        }
        return escaped;
    }

    let chars: Vec<char> = argument.chars().collect();
    let length = chars.len();
    let mut escaped = String::with_capacity(argument.len() + 2);
    escaped.push('"');
    let mut position = 0;
    loop {
        let mut backslashes = 0;
        while position < length && chars[position] == '\\' {
            position += 1;
            backslashes += 1;
        }
        if position == length {
            push_backslashes(&mut escaped, backslashes * 2);
            break;
        }
        let ch = chars[position];
        if ch == '"' {
            push_backslashes(&mut escaped, backslashes * 2 + 1);
        } else {
            push_backslashes(&mut escaped, backslashes);
        }
        escaped.push(ch);
        position += 1;
    }
    escaped.push('"');

    escaped
}

fn push_backslashes(target: &mut String, count: usize) {
    for _ in 0..count {
        target.push('\\');
    }
}

/// Joins command-line arguments (the ones following the program name) into a
/// single string. An empty slice yields an empty string.
pub fn join_arguments(arguments: &[String]) -> String {
    arguments
        .iter()
        .map(|argument| escape_argument(argument))
        .join(" ")
}

/// Like [`join_arguments`], then encoded into the given codepage.
///
/// # Errors
///
/// Returns [`Error::CodepageConversion`] if the result can't be represented
/// in the codepage.
pub fn join_arguments_encoded(arguments: &[String], codepage: u16) -> Result<Vec<u8>> {
    codepage::encode(&join_arguments(arguments), codepage)
}

/// Joins a program path and its arguments into a full command line.
///
/// The program token follows its own rule: it is wrapped in double quotes
/// verbatim when it contains a space or tab, with no backslash doubling.
/// The C runtime parses the program name by simple quote matching, not by
/// the argument grammar.
///
/// # Errors
///
/// Returns [`Error::InvalidCommand`] if the vector is empty, or the program
/// path is blank or contains a double quote (which can't be escaped in a
/// program name).
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

    let mut result = if program.contains(WHITESPACES) {
        format!("\"{program}\"")
    } else {
        program.clone()
    };
    let joined_rest = join_arguments(rest);
    if !joined_rest.is_empty() {
        result.push(' ');
        result.push_str(&joined_rest);
    }

    Ok(result)
}

/// Like [`join_command_line`], then encoded into the given codepage. The
/// conversion is applied once, to the whole command line.
///
/// # Errors
///
/// Returns [`Error::InvalidCommand`] for unusable arguments and
/// [`Error::CodepageConversion`] if the result can't be represented in the
/// codepage.
pub fn join_command_line_encoded(arguments: &[String], codepage: u16) -> Result<Vec<u8>> {
    codepage::encode(&join_command_line(arguments)?, codepage)
}

/// Splits a full command line (program name included) into its arguments,
/// following the current (2008) rules.
///
/// # Errors
///
/// Returns [`Error::InvalidCommandLine`] if the input is blank.
pub fn split_command_line(command_line: &str) -> Result<Vec<String>> {
    split_command_line_with_rules(command_line, SplitRules::default())
}

/// Splits a full command line with an explicit grammar revision.
///
/// # Errors
///
/// Returns [`Error::InvalidCommandLine`] if the input is blank.
pub fn split_command_line_with_rules(
    command_line: &str,
    rules: SplitRules,
) -> Result<Vec<String>> {
    if command_line.trim().is_empty() {
        return Err(Error::InvalidCommandLine(command_line.to_string()));
    }
    let single_line = remove_line_continuations(command_line);
    if single_line.trim().is_empty() {
        return Err(Error::InvalidCommandLine(command_line.to_string()));
    }

    let chars: Vec<char> = single_line.chars().collect();
    let length = chars.len();
    let mut position = 0;
    while position < length && WHITESPACES.contains(&chars[position]) {
        position += 1;
    }

    // The program name follows its own grammar: a leading quote captures
    // everything up to the next quote (or end of input); otherwise the name
    // runs to the first whitespace with any quote characters deleted.
    let program;
    if chars[position] == '"' {
        let start = position + 1;
        let end = chars[start..]
            .iter()
            .position(|&ch| ch == '"')
            .map_or(length, |offset| start + offset);
        program = chars[start..end].iter().collect::<String>();
        position = end + 1;
    } else {
        let start = position;
        let whitespace_position = chars[start + 1..]
            .iter()
            .position(|ch| WHITESPACES.contains(ch))
            .map(|offset| start + 1 + offset);
        let end = match whitespace_position {
            Some(end) => end,
            None => length,
        };
        program = chars[start..end]
            .iter()
            .filter(|&&ch| ch != '"')
            .collect::<String>();
        position = match whitespace_position {
            Some(end) => end + 1,
            None => length,
        };
    }

    let mut result = vec![program];
    if position < length {
        result.extend(split_arguments_chars(&chars[position..], rules));
    }

    Ok(result)
}

/// Splits command-line arguments (the ones following the program name),
/// following the current (2008) rules. Blank input yields an empty list.
pub fn split_arguments(arguments: &str) -> Vec<String> {
    split_arguments_with_rules(arguments, SplitRules::default())
}

/// Splits command-line arguments with an explicit grammar revision.
pub fn split_arguments_with_rules(arguments: &str, rules: SplitRules) -> Vec<String> {
    let chars: Vec<char> = arguments.chars().collect();
    split_arguments_chars(&chars, rules)
}

/// Like [`split_command_line`], but decoding console-codepage bytes first.
///
/// # Errors
///
/// Returns [`Error::CodepageConversion`] if the bytes are not valid for the
/// codepage and [`Error::InvalidCommandLine`] if the decoded line is blank.
pub fn split_command_line_encoded(command_line: &[u8], codepage: u16) -> Result<Vec<String>> {
    split_command_line(&codepage::decode(command_line, codepage)?)
}

/// Removes caret-newline continuation sequences: a `^` followed by one or
/// more CR/LF characters disappears entirely, joining the lines.
fn remove_line_continuations(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '^' && matches!(chars.peek(), Some('\r') | Some('\n')) {
            while matches!(chars.peek(), Some('\r') | Some('\n')) {
                chars.next();
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// The argument state machine. `backslashes` counts the run of backslashes
/// tentatively copied into the current argument; `quotes` counts quote
/// toggles, with zero meaning "outside quotes".
fn split_arguments_chars(chars: &[char], rules: SplitRules) -> Vec<String> {
    let length = chars.len();
    let mut quotes = 0usize;
    let mut backslashes = 0usize;
    let mut result = Vec::new();
    let mut position = 0;
    let mut argument: Option<String> = None;

    'scan: while position < length {
        let mut ch = chars[position];
        if quotes == 0 && WHITESPACES.contains(&ch) {
            if let Some(finished) = argument.take() {
                result.push(finished);
            }
            loop {
                position += 1;
                if position == length {
                    break 'scan;
                }
                ch = chars[position];
                if !WHITESPACES.contains(&ch) {
                    break;
                }
            }
            backslashes = 0;
            argument = Some(String::new());
        }

        let current = argument.get_or_insert_with(String::new);
        if ch == '\\' {
            backslashes += 1;
            current.push('\\');
            position += 1;
        } else if ch == '"' {
            if backslashes % 2 == 0 {
                // 2N backslashes + quote: N backslashes, toggle quoting.
                if backslashes >= 2 {
                    current.truncate(current.len() - backslashes / 2);
                }
                quotes += 1;
            } else {
                // 2N+1 backslashes + quote: N backslashes, literal quote.
                current.truncate(current.len() - 1 - backslashes / 2);
                current.push('"');
            }
            position += 1;
            backslashes = 0;
            while position < length && chars[position] == '"' {
                quotes += 1;
                if quotes == 3 {
                    current.push('"');
                    quotes = match rules {
                        SplitRules::Pre2008 => 0,
                        SplitRules::Crt2008 => 1,
                    };
                }
                position += 1;
            }
            if quotes == 2 {
                quotes = 0;
            }
        } else {
            current.push(ch);
            backslashes = 0;
            position += 1;
        }
    }

    if let Some(finished) = argument {
        result.push(finished);
    }

    result
}
