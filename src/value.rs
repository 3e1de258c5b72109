//! Scalar values accepted by the cache and their history rendering.

use std::fmt::Write as _;

/// A scalar value that can be stored under a generated key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Encode the value the way it is written to the backing store.
    ///
    /// Integers are decimal. Integral floats keep a trailing `.0` so a stored
    /// `1.0` reads back as a float and not an integer.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Str(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
            Value::Int(i) => i.to_string().into_bytes(),
            Value::Float(f) => format_float(*f).into_bytes(),
        }
    }

    /// Render the value as a literal inside an argument tuple.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => repr_str(s),
            Value::Bytes(b) => repr_bytes(b),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Arguments of an instrumented call, rendered for the history input list.
pub trait CallArgs {
    /// Literal rendering of each argument, in call order.
    fn items(&self) -> Vec<String>;

    /// Render the arguments as a tuple literal, e.g. `('foo',)`.
    fn render_args(&self) -> String {
        let items = self.items();
        match items.len() {
            1 => format!("({},)", items[0]),
            _ => format!("({})", items.join(", ")),
        }
    }
}

impl CallArgs for Value {
    fn items(&self) -> Vec<String> {
        vec![self.repr()]
    }
}

impl CallArgs for String {
    fn items(&self) -> Vec<String> {
        vec![repr_str(self)]
    }
}

impl CallArgs for () {
    fn items(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<A: CallArgs, B: CallArgs> CallArgs for (A, B) {
    fn items(&self) -> Vec<String> {
        let mut items = self.0.items();
        items.extend(self.1.items());
        items
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // Shortest round-trip digits; exponent form outside 1e-4 <= |f| < 1e16
    let sci = format!("{:e}", f);
    if let Some((mantissa, exp)) = sci.split_once('e')
        && let Ok(exp) = exp.parse::<i32>()
        && (exp < -4 || exp >= 16)
    {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs());
    }

    let s = f.to_string();
    if s.contains('.') { s } else { format!("{}.0", s) }
}

/// Whether `c` is shown as-is inside a quoted string literal.
///
/// Control, format, private-use and separator characters (other than the
/// ASCII space) are escaped. Unassigned code points are not recognised.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c as u32,
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x0890..=0x0891
            | 0x08E2
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xE000..=0xF8FF
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0xFFFE..=0xFFFF
            | 0x110BD
            | 0x110CD
            | 0x13430..=0x1343F
            | 0x1BCA0..=0x1BCA3
            | 0x1D173..=0x1D17A
            | 0xE0001
            | 0xE0020..=0xE007F
            | 0xF0000..=0x10FFFF
    )
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn repr_str(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                let _ = match code {
                    0..=0xff => write!(out, "\\x{:02x}", code),
                    0x100..=0xffff => write!(out, "\\u{:04x}", code),
                    _ => write!(out, "\\U{:08x}", code),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn repr_bytes(b: &[u8]) -> String {
    let quote = pick_quote(b.contains(&b'\''), b.contains(&b'"'));
    let mut out = String::with_capacity(b.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in b {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            byte if byte as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(byte as char),
            byte => {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes() {
        assert_eq!(Value::from("foo").to_bytes(), b"foo");
        assert_eq!(Value::from(b"\x00\xff".as_slice()).to_bytes(), vec![0, 255]);
        assert_eq!(Value::from(-42).to_bytes(), b"-42");
        assert_eq!(Value::from(3.5).to_bytes(), b"3.5");
        assert_eq!(Value::from(1.0).to_bytes(), b"1.0");
    }

    #[test]
    fn test_render_single_args() {
        assert_eq!(Value::from("foo").render_args(), "('foo',)");
        assert_eq!(Value::from(b"bar".to_vec()).render_args(), "(b'bar',)");
        assert_eq!(Value::from(42).render_args(), "(42,)");
        assert_eq!(Value::from(3.5).render_args(), "(3.5,)");
    }

    #[test]
    fn test_repr_quoting() {
        assert_eq!(Value::from("it's").repr(), "\"it's\"");
        assert_eq!(Value::from("a'b\"c").repr(), "'a\\'b\"c'");
        assert_eq!(Value::from("line\nbreak").repr(), "'line\\nbreak'");
        assert_eq!(Value::from("back\\slash").repr(), "'back\\\\slash'");
        assert_eq!(Value::from("\u{1}").repr(), "'\\x01'");
    }

    #[test]
    fn test_repr_bytes_escapes_non_ascii() {
        assert_eq!(Value::from(vec![b'a', 0x00, 0xff]).repr(), "b'a\\x00\\xff'");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(Value::from(1e16).to_bytes(), b"1e+16");
        assert_eq!(Value::from(1e16).render_args(), "(1e+16,)");
        assert_eq!(Value::from(1e22).repr(), "1e+22");
        assert_eq!(Value::from(1e-5).to_bytes(), b"1e-05");
        assert_eq!(Value::from(-2.5e-7).repr(), "-2.5e-07");
        assert_eq!(Value::from(1.5e300).repr(), "1.5e+300");
        // Plain decimal just inside the boundaries
        assert_eq!(Value::from(1e15).repr(), "1000000000000000.0");
        assert_eq!(Value::from(0.0001).repr(), "0.0001");
        assert_eq!(Value::from(0.0).repr(), "0.0");
    }

    #[test]
    fn test_repr_escapes_non_printable() {
        assert_eq!(Value::from("a\u{a0}b").repr(), "'a\\xa0b'");
        assert_eq!(Value::from("\u{200b}").repr(), "'\\u200b'");
        assert_eq!(Value::from("\u{2028}").repr(), "'\\u2028'");
        assert_eq!(Value::from("\u{e0001}").repr(), "'\\U000e0001'");
        assert_eq!(Value::from("caf\u{e9} \u{263a}").repr(), "'caf\u{e9} \u{263a}'");
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(Value::from(f64::NAN).repr(), "nan");
        assert_eq!(Value::from(f64::NEG_INFINITY).repr(), "-inf");
    }

    #[test]
    fn test_render_pair_and_unit() {
        let args = (Value::from("a"), Value::from(1));
        assert_eq!(args.render_args(), "('a', 1)");
        assert_eq!(().render_args(), "()");
    }
}
