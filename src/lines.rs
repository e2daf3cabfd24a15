use serde_json::{Number, Value};

/// Line terminator of the host platform.
#[cfg(windows)]
pub const PLATFORM_EOL: &str = "\r\n";
#[cfg(not(windows))]
pub const PLATFORM_EOL: &str = "\n";

/// Split a logging call's arguments into trimmed output lines.
///
/// The primary message is spliced in when it is an array; `splat` elements
/// are taken as they are. Every argument is rendered to text, the texts are
/// concatenated without separator and the result is split on `eol`. The
/// output always holds at least one (possibly empty) line.
///
/// Leading indentation is lost to the trim.
pub fn split_lines(message: Option<&Value>, splat: &[Value], eol: &str) -> Vec<String> {
    let mut joined = String::new();

    match message {
        Some(Value::Array(items)) => items.iter().for_each(|item| render_into(&mut joined, item)),
        Some(value) => render_into(&mut joined, value),
        None => {}
    }
    for arg in splat {
        render_into(&mut joined, arg);
    }

    if eol.is_empty() {
        return vec![joined.trim().to_string()];
    }

    joined.split(eol).map(|line| line.trim().to_string()).collect()
}

/// Append the text form of `value`: strings verbatim, `null` as nothing,
/// arrays as comma-joined elements, objects as compact JSON.
fn render_into(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => render_number(out, n),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_into(out, item);
            }
        }
        Value::Object(_) => out.push_str(&value.to_string()),
    }
}

/// Integral floats drop their fraction (`1.0` renders as `1`), as they do
/// when log arguments are joined as text upstream.
fn render_number(out: &mut String, n: &Number) {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                out.push('0');
            } else {
                out.push_str(&format!("{:.0}", f));
            }
        }
        _ => out.push_str(&n.to_string()),
    }
}
