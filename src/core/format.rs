//! Runtime printf-style formatting
//!
//! Format strings are resolved at run time against a slice of [`Arg`] so that
//! the emitter can retry a format with one argument fewer (see
//! [`resolve_message`]). The syntax is the familiar
//! `%[index$][flags][width][.precision]conversion`:
//!
//! | conversion | accepts |
//! |---|---|
//! | `s` `S` | anything (`null` for [`Arg::Null`]) |
//! | `d` | signed/unsigned integers |
//! | `x` `X` `o` | integers; negatives as two's complement at the source width |
//! | `f` `e` `E` | floats |
//! | `b` `B` | anything; `false` only for `false` and null |
//! | `c` `C` | chars, integer code points |
//! | `n` `%` | no argument |
//!
//! Flags: `-` (left justify), `0` (zero pad), `+` (always sign), ` ` (space for positive).
//! Surplus arguments are ignored; a missing one is [`FormatError::MissingArgument`].

use super::failure::Failure;
use std::fmt;

/// A single positional format argument.
#[derive(Debug, Clone)]
pub enum Arg {
    Null,
    Bool(bool),
    Char(char),
    /// Signed integer and the bit width of the type it came from
    Int { value: i64, bits: u32 },
    UInt(u64),
    Float(f64),
    Str(String),
    Failure(Failure),
}

impl Arg {
    /// Human-readable kind, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Int { .. } => "signed integer",
            Arg::UInt(_) => "unsigned integer",
            Arg::Float(_) => "float",
            Arg::Str(_) => "string",
            Arg::Failure(_) => "failure",
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Arg::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("null"),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Int { value, .. } => write!(f, "{}", value),
            Arg::UInt(u) => write!(f, "{}", u),
            Arg::Float(x) => write!(f, "{}", x),
            Arg::Str(s) => f.write_str(s),
            Arg::Failure(failure) => write!(f, "{}", failure),
        }
    }
}

macro_rules! impl_arg_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Arg {
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )+
    };
}

impl_arg_from!(UInt as u64: u8, u16, u32, u64, usize);
impl_arg_from!(Float as f64: f32, f64);

macro_rules! impl_signed_arg_from {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Arg {
                fn from(value: $source) -> Self {
                    Arg::Int {
                        value: value as i64,
                        bits: <$source>::BITS,
                    }
                }
            }
        )+
    };
}

impl_signed_arg_from!(i8, i16, i32, i64, isize);

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl From<Failure> for Arg {
    fn from(value: Failure) -> Self {
        Arg::Failure(value)
    }
}

impl From<&Failure> for Arg {
    fn from(value: &Failure) -> Self {
        Arg::Failure(value.clone())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// Formatting failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The format string consumes more arguments than were supplied
    #[error("Format specifier '{specifier}' requires argument #{index}, which was not supplied")]
    MissingArgument { specifier: String, index: usize },

    #[error("Unknown format conversion '{conversion}'")]
    UnknownConversion { conversion: String },

    #[error("Conversion '%{conversion}' cannot format a {argument} argument")]
    IllegalConversion { conversion: char, argument: &'static str },

    #[error("Format string ends with a dangling '%'")]
    DanglingPercent,
}

#[derive(Debug, Default)]
struct Spec<'a> {
    text: &'a str,
    index: Option<usize>,
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Format `fmt` against `args`.
pub fn format(fmt: &str, args: &[Arg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(fmt.len() + 16);
    let mut ordinary = 0usize;
    let mut rest = fmt;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let (spec, tail) = parse_spec(&rest[pos..])?;
        rest = tail;

        match spec.conversion {
            '%' => {
                pad_into(&mut out, "%".to_string(), &spec, false);
                continue;
            }
            'n' => {
                out.push('\n');
                continue;
            }
            _ => {}
        }

        let index = spec.index.unwrap_or_else(|| {
            ordinary += 1;
            ordinary - 1
        });
        let arg = args.get(index).ok_or_else(|| FormatError::MissingArgument {
            specifier: spec.text.to_string(),
            index: index + 1,
        })?;

        let (rendered, numeric) = render(&spec, arg)?;
        pad_into(&mut out, rendered, &spec, numeric);
    }
    out.push_str(rest);

    Ok(out)
}

/// Resolve a message, attaching a trailing [`Arg::Failure`] when the format
/// string does not consume it.
///
/// With a trailing failure the format is first tried without it. If that only
/// fails for lack of arguments, the failure is formatted as a plain value and
/// nothing is attached. Every other error is returned as-is.
pub fn resolve_message(fmt: &str, args: &[Arg]) -> Result<(String, Option<Failure>), FormatError> {
    if let Some((failure, head)) = args
        .split_last()
        .and_then(|(last, head)| last.as_failure().map(|f| (f, head)))
    {
        match format(fmt, head) {
            Ok(message) => return Ok((message, Some(failure.clone()))),
            Err(FormatError::MissingArgument { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    Ok((format(fmt, args)?, None))
}

/// Parse one specifier starting at the leading `%`.
fn parse_spec(input: &str) -> Result<(Spec<'_>, &str), FormatError> {
    let bytes = input.as_bytes();
    let mut spec = Spec::default();
    let mut i = 1;

    let digits_end = |from: usize| {
        let mut j = from;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    // explicit argument index: `%2$s`
    let end = digits_end(i);
    if end > i && bytes.get(end) == Some(&b'$') {
        let position: usize = input[i..end].parse().unwrap_or(0);
        if position == 0 {
            return Err(FormatError::UnknownConversion {
                conversion: input[..=end].to_string(),
            });
        }
        spec.index = Some(position - 1);
        i = end + 1;
    }

    while let Some(&flag) = bytes.get(i) {
        match flag {
            b'-' => spec.left = true,
            b'0' => spec.zero = true,
            b'+' => spec.plus = true,
            b' ' => spec.space = true,
            _ => break,
        }
        i += 1;
    }

    let end = digits_end(i);
    if end > i {
        spec.width = input[i..end].parse().ok();
        i = end;
    }

    if bytes.get(i) == Some(&b'.') {
        let end = digits_end(i + 1);
        spec.precision = Some(input[i + 1..end].parse().unwrap_or(0));
        i = end;
    }

    let conversion = input[i..].chars().next().ok_or(FormatError::DanglingPercent)?;
    let end = i + conversion.len_utf8();

    if !"sSdxXofeEbBcCn%".contains(conversion) {
        return Err(FormatError::UnknownConversion {
            conversion: conversion.to_string(),
        });
    }

    spec.conversion = conversion;
    spec.text = &input[..end];
    Ok((spec, &input[end..]))
}

/// Render one argument; the flag says whether numeric padding rules apply.
fn render(spec: &Spec<'_>, arg: &Arg) -> Result<(String, bool), FormatError> {
    let illegal = || FormatError::IllegalConversion {
        conversion: spec.conversion,
        argument: arg.kind(),
    };

    if matches!(arg, Arg::Null) && !matches!(spec.conversion, 'b' | 'B') {
        let text = if spec.conversion.is_uppercase() { "NULL" } else { "null" };
        return Ok((text.to_string(), false));
    }

    let rendered = match spec.conversion {
        's' | 'S' => {
            let mut text = arg.to_string();
            if let Some(precision) = spec.precision {
                text = text.chars().take(precision).collect();
            }
            if spec.conversion == 'S' {
                text = text.to_uppercase();
            }
            return Ok((text, false));
        }
        'b' | 'B' => {
            let truth = match arg {
                Arg::Null => false,
                Arg::Bool(b) => *b,
                _ => true,
            };
            let text = truth.to_string();
            let text = if spec.conversion == 'B' { text.to_uppercase() } else { text };
            return Ok((text, false));
        }
        'c' | 'C' => {
            let c = match arg {
                Arg::Char(c) => *c,
                Arg::Int { value, .. } => u32::try_from(*value).ok().and_then(char::from_u32).ok_or_else(illegal)?,
                Arg::UInt(u) => u32::try_from(*u).ok().and_then(char::from_u32).ok_or_else(illegal)?,
                _ => return Err(illegal()),
            };
            let text = if spec.conversion == 'C' { c.to_uppercase().collect() } else { c.to_string() };
            return Ok((text, false));
        }
        'd' => match arg {
            Arg::Int { value, .. } => signed(*value < 0, value.to_string(), spec),
            Arg::UInt(u) => signed(false, u.to_string(), spec),
            _ => return Err(illegal()),
        },
        'x' => match arg {
            Arg::Int { value, bits } => format!("{:x}", twos_complement(*value, *bits)),
            Arg::UInt(u) => format!("{:x}", u),
            _ => return Err(illegal()),
        },
        'X' => match arg {
            Arg::Int { value, bits } => format!("{:X}", twos_complement(*value, *bits)),
            Arg::UInt(u) => format!("{:X}", u),
            _ => return Err(illegal()),
        },
        'o' => match arg {
            Arg::Int { value, bits } => format!("{:o}", twos_complement(*value, *bits)),
            Arg::UInt(u) => format!("{:o}", u),
            _ => return Err(illegal()),
        },
        'f' => match arg {
            Arg::Float(x) => {
                let text = format!("{:.*}", spec.precision.unwrap_or(6), x);
                signed(x.is_sign_negative(), text, spec)
            }
            _ => return Err(illegal()),
        },
        'e' | 'E' => match arg {
            Arg::Float(x) => {
                let text = scientific(*x, spec.precision.unwrap_or(6));
                let text = if spec.conversion == 'E' { text.to_uppercase() } else { text };
                signed(x.is_sign_negative(), text, spec)
            }
            _ => return Err(illegal()),
        },
        _ => return Err(illegal()),
    };

    Ok((rendered, true))
}

/// Bit pattern of `value` truncated to its source width: `-1i8` is `0xff`.
fn twos_complement(value: i64, bits: u32) -> u64 {
    let pattern = value as u64;
    if bits >= u64::BITS {
        pattern
    } else {
        pattern & ((1u64 << bits) - 1)
    }
}

fn signed(negative: bool, text: String, spec: &Spec<'_>) -> String {
    if negative {
        text
    } else if spec.plus {
        format!("+{}", text)
    } else if spec.space {
        format!(" {}", text)
    } else {
        text
    }
}

/// `1.500000e2` -> `1.500000e+02`
fn scientific(x: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, x);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

fn pad_into(out: &mut String, text: String, spec: &Spec<'_>, numeric: bool) {
    let len = text.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        out.push_str(&text);
        return;
    }

    let fill = width - len;
    if spec.left {
        out.push_str(&text);
        out.extend(std::iter::repeat_n(' ', fill));
    } else if spec.zero && numeric {
        let sign_len = text
            .chars()
            .next()
            .filter(|c| matches!(c, '-' | '+' | ' '))
            .map_or(0, char::len_utf8);
        out.push_str(&text[..sign_len]);
        out.extend(std::iter::repeat_n('0', fill));
        out.push_str(&text[sign_len..]);
    } else {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, args: &[Arg]) -> String {
        format(template, args).unwrap()
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(fmt("no specifiers here", &[]), "no specifiers here");
        assert_eq!(fmt("ünïcode ✓", &[]), "ünïcode ✓");
    }

    #[test]
    fn test_basic_conversions() {
        assert_eq!(fmt("count=%d", &[5.into()]), "count=5");
        assert_eq!(fmt("%s and %s", &["a".into(), "b".into()]), "a and b");
        assert_eq!(fmt("%x/%X/%o", &[255.into(), 255.into(), 8.into()]), "ff/FF/10");
        assert_eq!(fmt("%b %b %b", &[true.into(), Arg::Null, "x".into()]), "true false true");
        assert_eq!(fmt("%c%C", &['a'.into(), 'b'.into()]), "aB");
        assert_eq!(fmt("100%% done%n", &[]), "100% done\n");
    }

    #[test]
    fn test_negative_hex_keeps_source_width() {
        assert_eq!(fmt("%x", &[(-1i32).into()]), "ffffffff");
        assert_eq!(fmt("%X", &[(-2i8).into()]), "FE");
        assert_eq!(fmt("%o", &[(-1i16).into()]), "177777");
        assert_eq!(fmt("%x", &[(-1i64).into()]), "ffffffffffffffff");
        assert_eq!(fmt("%d", &[(-1i32).into()]), "-1");
    }

    #[test]
    fn test_width_flags_and_precision() {
        assert_eq!(fmt("[%5d]", &[42.into()]), "[   42]");
        assert_eq!(fmt("[%-5d]", &[42.into()]), "[42   ]");
        assert_eq!(fmt("[%05d]", &[(-42).into()]), "[-0042]");
        assert_eq!(fmt("[%+d]", &[7.into()]), "[+7]");
        assert_eq!(fmt("%.2f", &[3.14159.into()]), "3.14");
        assert_eq!(fmt("%f", &[1.5.into()]), "1.500000");
        assert_eq!(fmt("%.3s", &["abcdef".into()]), "abc");
        assert_eq!(fmt("%.2e", &[1234.5.into()]), "1.23e+03");
    }

    #[test]
    fn test_explicit_index() {
        assert_eq!(fmt("%2$s %1$s %s", &["a".into(), "b".into()]), "b a a");
    }

    #[test]
    fn test_null_and_option() {
        let none: Option<i32> = None;
        assert_eq!(fmt("%s/%d", &[Arg::Null, none.into()]), "null/null");
        assert_eq!(fmt("%d", &[Some(3).into()]), "3");
    }

    #[test]
    fn test_missing_argument() {
        let err = format("%d and %s", &[1.into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingArgument {
                specifier: "%s".to_string(),
                index: 2
            }
        );
    }

    #[test]
    fn test_other_errors() {
        assert!(matches!(format("%q", &[1.into()]), Err(FormatError::UnknownConversion { .. })));
        assert!(matches!(format("tail %", &[]), Err(FormatError::DanglingPercent)));
        assert!(matches!(
            format("%d", &["five".into()]),
            Err(FormatError::IllegalConversion { conversion: 'd', .. })
        ));
        assert!(matches!(format("%f", &[1.into()]), Err(FormatError::IllegalConversion { .. })));
    }

    #[test]
    fn test_surplus_arguments_ignored() {
        assert_eq!(fmt("only %s", &["one".into(), "two".into()]), "only one");
    }

    #[test]
    fn test_trailing_failure_attached() {
        let failure = Failure::msg("boom");
        let (message, attached) =
            resolve_message("count=%d", &[5.into(), failure.clone().into()]).unwrap();

        assert_eq!(message, "count=5");
        assert!(attached.is_some_and(|f| f.ptr_eq(&failure)));
    }

    #[test]
    fn test_trailing_failure_consumed_by_format() {
        let (message, attached) =
            resolve_message("count=%d and %s", &[5.into(), Failure::msg("boom").into()]).unwrap();

        assert_eq!(message, "count=5 and boom");
        assert!(attached.is_none());
    }

    #[test]
    fn test_trailing_failure_other_error_propagates() {
        let result = resolve_message("count=%f", &[5.into(), Failure::msg("boom").into()]);
        assert!(matches!(result, Err(FormatError::IllegalConversion { .. })));
    }

    #[test]
    fn test_fallback_still_short_propagates() {
        let result = resolve_message("%s %s %s", &["a".into(), Failure::msg("boom").into()]);
        assert!(matches!(result, Err(FormatError::MissingArgument { index: 3, .. })));
    }

    #[test]
    fn test_non_trailing_failure_is_plain_value() {
        let (message, attached) =
            resolve_message("%s then %d", &[Failure::msg("boom").into(), 1.into()]).unwrap();
        assert_eq!(message, "boom then 1");
        assert!(attached.is_none());
    }
}
