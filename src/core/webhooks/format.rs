//! `printf`-style placeholder rendering for notification content
//!
//! Templates use the verb syntax operators already write in notification
//! text (`%s`, `%d`, `%v`, `%.2f`, ...). Rendering follows the Go `fmt`
//! conventions, including the inline error markers for missing, extra and
//! mismatched arguments, so a template renders the same text here as it did
//! when it was authored.

use serde_json::Value;
use std::fmt::Write;

/// Widths and precisions above this are rejected like a malformed number
const MAX_WIDTH: usize = 1_000_000;

/// Fill `template` from `values`, one value per pass.
///
/// Every pass renders the *current* content with a single argument, so only
/// the first unconsumed directive is filled each time and text produced by an
/// earlier pass can itself be read as a directive by a later one. With no
/// values the template is returned untouched.
pub fn substitute_values(template: &str, values: &[Value]) -> String {
    values
        .iter()
        .fold(template.to_string(), |content, value| sprintf_one(&content, value))
}

/// Render `format` with exactly one argument
pub fn sprintf_one(format: &str, arg: &Value) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() + 16);
    let mut pending = Some(arg);
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        i += 1;

        let mut d = Directive::default();
        while let Some(&c) = chars.get(i) {
            match c {
                '#' => d.sharp = true,
                '0' => d.zero = !d.minus,
                '+' => d.plus = true,
                '-' => {
                    d.minus = true;
                    d.zero = false;
                }
                ' ' => d.space = true,
                _ => break,
            }
            i += 1;
        }

        if chars.get(i) == Some(&'*') {
            i += 1;
            match int_from_arg(&mut pending) {
                Some(w) => {
                    if w < 0 {
                        d.minus = true;
                        d.zero = false;
                    }
                    d.width = Some(w.unsigned_abs() as usize);
                }
                None => out.push_str("%!(BADWIDTH)"),
            }
        } else {
            d.width = parse_num(&chars, &mut i);
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            if chars.get(i) == Some(&'*') {
                i += 1;
                match int_from_arg(&mut pending) {
                    Some(p) if p >= 0 => d.precision = Some(p as usize),
                    _ => out.push_str("%!(BADPREC)"),
                }
            } else {
                d.precision = Some(parse_num(&chars, &mut i).unwrap_or(0));
            }
        }

        let Some(&verb) = chars.get(i) else {
            out.push_str("%!(NOVERB)");
            break;
        };
        i += 1;

        if verb == '%' {
            out.push('%');
            continue;
        }
        match pending {
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
            // %w only wraps errors; no operand has been printed yet
            Some(_) if verb == 'w' => out.push_str("%!w(<nil>)"),
            Some(value) => {
                pending = None;
                if verb == 'v' {
                    d.sharp_v = d.sharp;
                    d.sharp = false;
                    d.plus = false;
                }
                print_arg(&mut out, value, verb, &d);
            }
        }
    }

    if let Some(value) = pending {
        out.push_str("%!(EXTRA ");
        match go_type(value) {
            Some(ty) => {
                out.push_str(ty);
                out.push('=');
                print_arg(&mut out, value, 'v', &Directive::default());
            }
            None => out.push_str("<nil>"),
        }
        out.push(')');
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    plus: bool,
    minus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    sharp_v: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

fn parse_num(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    let mut n: usize = 0;
    while let Some(digit) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        n = n.saturating_mul(10).saturating_add(digit as usize);
        *i += 1;
    }
    if *i == start || n > MAX_WIDTH {
        return None;
    }
    Some(n)
}

/// Consume the pending argument as a `*` width or precision
fn int_from_arg(pending: &mut Option<&Value>) -> Option<i64> {
    let value = pending.take()?;
    value
        .as_i64()
        .filter(|n| n.unsigned_abs() <= MAX_WIDTH as u64)
}

/// Type name of an argument as it appears in error markers
fn go_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some("bool"),
        Value::Number(n) if n.is_i64() => Some("int"),
        Value::Number(n) if n.is_u64() => Some("uint64"),
        Value::Number(_) => Some("float64"),
        Value::String(_) => Some("string"),
        Value::Array(_) => Some("[]interface {}"),
        Value::Object(_) => Some("map[string]interface {}"),
    }
}

fn print_arg(out: &mut String, value: &Value, verb: char, d: &Directive) {
    if verb == 'T' {
        fmt_s(out, go_type(value).unwrap_or("<nil>"), d);
        return;
    }
    match value {
        Value::Null if verb == 'v' => pad(out, "<nil>", d),
        Value::Null => bad_verb(out, verb, None, d),
        other => print_value(out, other, verb, d),
    }
}

fn print_value(out: &mut String, value: &Value, verb: char, d: &Directive) {
    match value {
        Value::Null if d.sharp_v => out.push_str("interface {}(nil)"),
        Value::Null => out.push_str("<nil>"),
        Value::Bool(b) => match verb {
            't' | 'v' => pad(out, if *b { "true" } else { "false" }, d),
            _ => bad_verb(out, verb, Some(value), d),
        },
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                fmt_integer_verb(out, value, i.unsigned_abs(), i < 0, true, verb, d);
            } else if let Some(u) = n.as_u64() {
                fmt_integer_verb(out, value, u, false, false, verb, d);
            } else {
                fmt_float_verb(out, value, n.as_f64().unwrap_or_default(), verb, d);
            }
        }
        Value::String(s) => match verb {
            'v' if d.sharp_v => fmt_q(out, s, d),
            'v' | 's' => fmt_s(out, s, d),
            'x' => fmt_sx(out, s, false, d),
            'X' => fmt_sx(out, s, true, d),
            'q' => fmt_q(out, s, d),
            _ => bad_verb(out, verb, Some(value), d),
        },
        Value::Array(items) => {
            if d.sharp_v {
                out.push_str("[]interface {}{");
            } else {
                out.push('[');
            }
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(if d.sharp_v { ", " } else { " " });
                }
                print_value(out, item, verb, d);
            }
            out.push(if d.sharp_v { '}' } else { ']' });
        }
        Value::Object(map) => {
            out.push_str(if d.sharp_v {
                "map[string]interface {}{"
            } else {
                "map["
            });
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for (idx, key) in keys.into_iter().enumerate() {
                if idx > 0 {
                    out.push_str(if d.sharp_v { ", " } else { " " });
                }
                print_value(out, &Value::String(key.clone()), verb, d);
                out.push(':');
                if let Some(item) = map.get(key) {
                    print_value(out, item, verb, d);
                }
            }
            out.push(if d.sharp_v { '}' } else { ']' });
        }
    }
}

fn bad_verb(out: &mut String, verb: char, value: Option<&Value>, d: &Directive) {
    out.push_str("%!");
    out.push(verb);
    out.push('(');
    match value.and_then(|v| go_type(v).map(|ty| (v, ty))) {
        Some((v, ty)) => {
            out.push_str(ty);
            out.push('=');
            print_arg(out, v, 'v', d);
        }
        None => out.push_str("<nil>"),
    }
    out.push(')');
}

// ==================== Padding ====================

fn pad(out: &mut String, s: &str, d: &Directive) {
    let width = d.width.unwrap_or(0);
    let len = s.chars().count();
    if len >= width {
        out.push_str(s);
        return;
    }
    let fill = width - len;
    if d.minus {
        out.push_str(s);
        out.extend(std::iter::repeat_n(' ', fill));
    } else {
        let c = if d.zero { '0' } else { ' ' };
        out.extend(std::iter::repeat_n(c, fill));
        out.push_str(s);
    }
}

fn pad_spaces(out: &mut String, s: &str, d: &Directive) {
    let d = Directive { zero: false, ..*d };
    pad(out, s, &d);
}

// ==================== Strings ====================

fn truncate(s: &str, d: &Directive) -> String {
    match d.precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

fn fmt_s(out: &mut String, s: &str, d: &Directive) {
    pad(out, &truncate(s, d), d);
}

fn fmt_sx(out: &mut String, s: &str, upper: bool, d: &Directive) {
    let bytes = s.as_bytes();
    let bytes = match d.precision {
        Some(p) if p < bytes.len() => &bytes[..p],
        _ => bytes,
    };
    let mut hex = String::with_capacity(bytes.len() * 2);
    for (idx, b) in bytes.iter().enumerate() {
        if d.space && idx > 0 {
            hex.push(' ');
        }
        if d.sharp && (d.space || idx == 0) {
            hex.push_str(if upper { "0X" } else { "0x" });
        }
        if upper {
            let _ = write!(hex, "{:02X}", b);
        } else {
            let _ = write!(hex, "{:02x}", b);
        }
    }
    pad(out, &hex, d);
}

fn fmt_q(out: &mut String, s: &str, d: &Directive) {
    let s = truncate(s, d);
    if d.sharp && !s.contains('`') && !s.chars().any(|c| c.is_control() && c != '\t') {
        pad(out, &format!("`{}`", s), d);
    } else {
        pad(out, &quote(&s, '"', d.plus), d);
    }
}

fn quote(s: &str, delim: char, ascii_only: bool) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push(delim);
    for c in s.chars() {
        match c {
            '\\' => q.push_str("\\\\"),
            '\x07' => q.push_str("\\a"),
            '\x08' => q.push_str("\\b"),
            '\x0c' => q.push_str("\\f"),
            '\n' => q.push_str("\\n"),
            '\r' => q.push_str("\\r"),
            '\t' => q.push_str("\\t"),
            '\x0b' => q.push_str("\\v"),
            c if c == delim => {
                q.push('\\');
                q.push(c);
            }
            c if (c as u32) < 0x20 || c == '\x7f' => {
                let _ = write!(q, "\\x{:02x}", c as u32);
            }
            c if ascii_only && !c.is_ascii() => {
                if (c as u32) <= 0xFFFF {
                    let _ = write!(q, "\\u{:04x}", c as u32);
                } else {
                    let _ = write!(q, "\\U{:08x}", c as u32);
                }
            }
            c => q.push(c),
        }
    }
    q.push(delim);
    q
}

// ==================== Integers ====================

fn fmt_integer_verb(
    out: &mut String,
    value: &Value,
    magnitude: u64,
    negative: bool,
    signed: bool,
    verb: char,
    d: &Directive,
) {
    match verb {
        'v' if d.sharp_v && !signed => {
            let d = Directive { sharp: true, ..*d };
            fmt_integer(out, magnitude, negative, 16, false, verb, &d);
        }
        'v' | 'd' => fmt_integer(out, magnitude, negative, 10, false, verb, d),
        'b' => fmt_integer(out, magnitude, negative, 2, false, verb, d),
        'o' | 'O' => fmt_integer(out, magnitude, negative, 8, false, verb, d),
        'x' => fmt_integer(out, magnitude, negative, 16, false, verb, d),
        'X' => fmt_integer(out, magnitude, negative, 16, true, verb, d),
        'c' => pad(out, &to_rune(magnitude, negative).to_string(), d),
        'q' => pad(out, &quote(&to_rune(magnitude, negative).to_string(), '\'', d.plus), d),
        'U' => fmt_unicode(out, magnitude, negative, d),
        _ => bad_verb(out, verb, Some(value), d),
    }
}

fn to_rune(magnitude: u64, negative: bool) -> char {
    if negative {
        return char::REPLACEMENT_CHARACTER;
    }
    u32::try_from(magnitude)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn fmt_integer(
    out: &mut String,
    magnitude: u64,
    negative: bool,
    base: u32,
    upper: bool,
    verb: char,
    d: &Directive,
) {
    let width = d.width.unwrap_or(0);
    let mut prec = 0;
    if let Some(p) = d.precision {
        prec = p;
        if p == 0 && magnitude == 0 {
            pad_spaces(out, "", d);
            return;
        }
    } else if d.zero && d.width.is_some() {
        prec = width;
        if negative || d.plus || d.space {
            prec = prec.saturating_sub(1);
        }
    }

    let mut digits = match (base, upper) {
        (2, _) => format!("{:b}", magnitude),
        (8, _) => format!("{:o}", magnitude),
        (16, false) => format!("{:x}", magnitude),
        (16, true) => format!("{:X}", magnitude),
        _ => magnitude.to_string(),
    };
    if digits.len() < prec {
        digits.insert_str(0, &"0".repeat(prec - digits.len()));
    }

    let mut prefix = String::new();
    if negative {
        prefix.push('-');
    } else if d.plus {
        prefix.push('+');
    } else if d.space {
        prefix.push(' ');
    }
    if verb == 'O' {
        prefix.push_str("0o");
    }
    if d.sharp {
        match base {
            2 => prefix.push_str("0b"),
            8 if !digits.starts_with('0') => prefix.push('0'),
            16 => prefix.push_str(if upper { "0X" } else { "0x" }),
            _ => {}
        }
    }
    prefix.push_str(&digits);
    pad_spaces(out, &prefix, d);
}

fn fmt_unicode(out: &mut String, magnitude: u64, negative: bool, d: &Directive) {
    let code = if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    let digits = d.precision.unwrap_or(4).max(4);
    let mut s = format!("U+{:0width$X}", code, width = digits);
    if d.sharp {
        if let Some(c) = u32::try_from(code).ok().and_then(char::from_u32) {
            if !c.is_control() {
                let _ = write!(s, " '{}'", c);
            }
        }
    }
    pad_spaces(out, &s, d);
}

// ==================== Floats ====================

fn fmt_float_verb(out: &mut String, value: &Value, v: f64, verb: char, d: &Directive) {
    let num = match verb {
        'v' | 'g' => format_g(v, d.precision),
        'G' => format_g(v, d.precision).to_uppercase(),
        'e' => format_e(v, d.precision.unwrap_or(6)),
        'E' => format_e(v, d.precision.unwrap_or(6)).to_uppercase(),
        'f' | 'F' => format!("{:.*}", d.precision.unwrap_or(6), v),
        _ => return bad_verb(out, verb, Some(value), d),
    };

    let (sign, body) = match num.strip_prefix('-') {
        Some(rest) => ('-', rest),
        None if d.plus => ('+', num.as_str()),
        None if d.space => (' ', num.as_str()),
        None => {
            pad(out, &num, d);
            return;
        }
    };
    let width = d.width.unwrap_or(0);
    let len = body.chars().count() + 1;
    if d.zero && d.width.is_some() && width > len {
        out.push(sign);
        out.extend(std::iter::repeat_n('0', width - len));
        out.push_str(body);
    } else {
        pad(out, &format!("{}{}", sign, body), d);
    }
}

/// Split Rust's `1.5e-7` notation into mantissa and exponent
fn split_exp(sci: &str) -> (&str, i32) {
    match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

/// Exponent with explicit sign and at least two digits
fn exp_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exp.unsigned_abs())
}

fn format_e(v: f64, prec: usize) -> String {
    let sci = format!("{:.*e}", prec, v);
    let (mantissa, exp) = split_exp(&sci);
    format!("{}{}", mantissa, exp_suffix(exp))
}

/// `%g`: exponent form for very small or large exponents, plain otherwise.
///
/// Without a precision the shortest round-trip digits are used and the
/// exponent form kicks in at `exp < -4 || exp >= 6`.
fn format_g(v: f64, precision: Option<usize>) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let Some(p) = precision else {
        let sci = format!("{:e}", v);
        let (mantissa, exp) = split_exp(&sci);
        if !(-4..6).contains(&exp) {
            return format!("{}{}", mantissa, exp_suffix(exp));
        }
        return format!("{}", v);
    };

    let p = p.max(1);
    let sci = format!("{:.*e}", p - 1, v);
    let (mantissa, exp) = split_exp(&sci);
    let negative = mantissa.starts_with('-');
    let all_digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = all_digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let nd = digits.len() as i64;
    let dp = exp as i64 + 1;
    let p = p as i64;

    let mut eprec = p;
    if eprec > nd && nd >= dp {
        eprec = nd;
    }
    if (exp as i64) < -4 || exp as i64 >= eprec {
        let keep = p.min(nd) as usize;
        let mut s = String::new();
        if negative {
            s.push('-');
        }
        s.push_str(&digits[..1]);
        if keep > 1 {
            s.push('.');
            s.push_str(&digits[1..keep]);
        }
        s.push_str(&exp_suffix(exp));
        return s;
    }
    let prec = if p > dp { nd } else { p };
    let decimals = (prec - dp).max(0) as usize;
    format!("{:.*}", decimals, v)
}
