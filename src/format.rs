use crate::record::{LogRecord, Value};
use std::fmt::Write as _;

#[cfg(windows)]
pub(crate) const LINE_SEP: &str = "\r\n";
#[cfg(not(windows))]
pub(crate) const LINE_SEP: &str = "\n";

/// Renders log records into text lines from a log4j-style pattern.
///
/// Supported placeholders: `%d{dateFormat}` (bare `%d` is ISO-8601 with
/// milliseconds), `%p` (level), `%t` (thread), `%c{N}` (last N segments of
/// the logger name, bare `%c` is the full name), `%L` (call-site line,
/// `unknown` when absent), `%m` (message), `%n` (platform line separator)
/// and `%%`. A justification flag such as `%-5p` pads the rendered field to
/// a minimum width. Unknown placeholders pass through literally.
#[derive(Debug)]
pub(crate) struct Formatter {
    chunks: Vec<Chunk>,
}

#[derive(Debug)]
enum Chunk {
    Literal(String),
    Field { field: Field, pad: Option<Pad> },
}

#[derive(Debug)]
enum Field {
    Date(String),
    Level,
    Thread,
    LoggerName(Option<usize>),
    Line,
    Message,
    Newline,
}

#[derive(Clone, Copy, Debug)]
struct Pad {
    width: usize,
    left_justify: bool,
}

impl Formatter {
    /// Parses `pattern` once; parsing never fails because anything
    /// unrecognized stays literal.
    pub(crate) fn new(pattern: &str) -> Formatter {
        let mut chunks = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(percent) = rest.find('%') {
            literal.push_str(&rest[..percent]);
            rest = &rest[percent..];
            match parse_placeholder(rest) {
                Some((field, pad, consumed)) => {
                    if !literal.is_empty() {
                        chunks.push(Chunk::Literal(std::mem::take(&mut literal)));
                    }
                    if let Some(field) = field {
                        chunks.push(Chunk::Field { field, pad });
                    } else {
                        // "%%"
                        literal.push('%');
                    }
                    rest = &rest[consumed..];
                }
                None => {
                    // Unknown placeholder, keep the '%' and move on.
                    literal.push('%');
                    rest = &rest[1..];
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            chunks.push(Chunk::Literal(literal));
        }
        Formatter { chunks }
    }

    pub(crate) fn render(&self, record: &LogRecord) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            match chunk {
                Chunk::Literal(text) => out.push_str(text),
                Chunk::Field { field, pad } => {
                    let piece = match field {
                        Field::Date(format) => {
                            record.timestamp.format(format).to_string()
                        }
                        Field::Level => record.level.as_str().to_owned(),
                        Field::Thread => record.thread.clone(),
                        Field::LoggerName(segments) => {
                            logger_name(&record.logger_name, *segments).to_owned()
                        }
                        Field::Line => match record.line {
                            Some(line) => line.to_string(),
                            None => "unknown".to_owned(),
                        },
                        Field::Message => {
                            render_message(&record.message_template, &record.args)
                        }
                        Field::Newline => LINE_SEP.to_owned(),
                    };
                    match pad {
                        Some(pad) if pad.left_justify => {
                            let _ = write!(out, "{piece:<width$}", width = pad.width);
                        }
                        Some(pad) => {
                            let _ = write!(out, "{piece:>width$}", width = pad.width);
                        }
                        None => out.push_str(&piece),
                    }
                }
            }
        }
        out
    }
}

/// Parses one placeholder starting at the leading '%'. Returns the field
/// (`None` for `%%`), an optional pad and the byte length consumed, or
/// `None` when the conversion character is unknown.
fn parse_placeholder(input: &str) -> Option<(Option<Field>, Option<Pad>, usize)> {
    debug_assert!(input.starts_with('%'));
    let mut chars = input.char_indices().skip(1).peekable();

    let mut left_justify = false;
    if let Some((_, '-')) = chars.peek() {
        left_justify = true;
        chars.next();
    }
    let mut width = 0usize;
    let mut saw_width = false;
    while let Some((_, c)) = chars.peek().copied() {
        match c.to_digit(10) {
            Some(d) => {
                saw_width = true;
                width = width.saturating_mul(10).saturating_add(d as usize);
                chars.next();
            }
            None => break,
        }
    }
    let pad = saw_width.then_some(Pad {
        width,
        left_justify,
    });
    if left_justify && !saw_width {
        return None;
    }

    let (index, conversion) = chars.next()?;
    let mut end = index + conversion.len_utf8();
    let field = match conversion {
        '%' if pad.is_none() => None,
        'd' => {
            let date_format = match braced_argument(&input[end..]) {
                Some((tokens, brace_len)) => {
                    end += brace_len;
                    translate_date_format(tokens)
                }
                None => DEFAULT_DATE_FORMAT.to_owned(),
            };
            Some(Field::Date(date_format))
        }
        'p' => Some(Field::Level),
        't' => Some(Field::Thread),
        'c' => {
            let segments = match braced_argument(&input[end..]) {
                Some((digits, brace_len)) => match digits.parse::<usize>() {
                    Ok(n) => {
                        end += brace_len;
                        Some(n)
                    }
                    Err(_) => None,
                },
                None => None,
            };
            Some(Field::LoggerName(segments))
        }
        'L' => Some(Field::Line),
        'm' => Some(Field::Message),
        'n' => Some(Field::Newline),
        _ => return None,
    };
    Some((field, pad, end))
}

/// Returns the content of a leading `{...}` group and its total byte length.
fn braced_argument(input: &str) -> Option<(&str, usize)> {
    let rest = input.strip_prefix('{')?;
    let close = rest.find('}')?;
    Some((&rest[..close], close + 2))
}

/// Last `N` dot-separated segments of a logger name.
fn logger_name(name: &str, segments: Option<usize>) -> &str {
    match segments {
        None | Some(0) => name,
        Some(n) => {
            let mut boundaries = name.rmatch_indices('.');
            match boundaries.nth(n - 1) {
                Some((index, _)) => &name[index + 1..],
                None => name,
            }
        }
    }
}

/// log4j's default `%d` rendering (`yyyy-MM-dd HH:mm:ss,SSS`).
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Translates the SimpleDateFormat tokens the original configuration used
/// (`yyyy`, `MM`, `dd`, `HH`, `mm`, `ss`, `SSS`) into a chrono strftime
/// string. Unrecognized letters and all punctuation stay literal.
fn translate_date_format(tokens: &str) -> String {
    let mut out = String::with_capacity(tokens.len());
    let mut chars = tokens.chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_ascii_alphabetic() {
            if c == '%' {
                out.push('%');
            }
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        match (c, run) {
            ('y', n) if n >= 4 => out.push_str("%Y"),
            ('y', _) => out.push_str("%y"),
            ('M', _) => out.push_str("%m"),
            ('d', _) => out.push_str("%d"),
            ('H', _) => out.push_str("%H"),
            ('m', _) => out.push_str("%M"),
            ('s', _) => out.push_str("%S"),
            ('S', _) => out.push_str("%3f"),
            _ => {
                for _ in 0..run {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Substitutes `args` into the message template at `%s`/`%d`/`%b` markers.
///
/// A marker/argument mismatch or a missing argument degrades to the raw
/// template followed by the stringified arguments; rendering never fails.
/// An empty argument list skips substitution so pre-rendered messages pass
/// through untouched.
pub(crate) fn render_message(template: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return template.to_owned();
    }
    substitute(template, args).unwrap_or_else(|| degraded(template, args))
}

fn substitute(template: &str, args: &[Value]) -> Option<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => {
                let _ = write!(out, "{}", args.next()?);
            }
            Some('d') => match args.next()? {
                Value::Int(i) => {
                    let _ = write!(out, "{i}");
                }
                _ => return None,
            },
            Some('b') => match args.next()? {
                Value::Bool(b) => {
                    let _ = write!(out, "{b}");
                }
                _ => return None,
            },
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    Some(out)
}

fn degraded(template: &str, args: &[Value]) -> String {
    let mut out = template.to_owned();
    for arg in args {
        let _ = write!(out, " {arg}");
    }
    out
}
