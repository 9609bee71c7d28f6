//! `{name}` placeholder substitution for double-quoted config values.
use crate::environ::Environ;

/// Why a template could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    /// `{name}` where `name` is not in the context.
    Undefined(String),
    /// A `{` with no matching `}`, or a lone `}`.
    Unbalanced,
}

/// Replace every `{name}` in `template` with its value from `context`.
///
/// `{{` and `}}` stand for literal braces.
///
/// ```
/// use vex::config::interpolate::expand;
/// use vex::environ::Environ;
///
/// let mut ctx = Environ::new();
/// ctx.insert("FOO".into(), "bar".into());
/// assert_eq!(expand("{FOO}/x", &ctx).unwrap(), "bar/x");
/// assert_eq!(expand("{{FOO}}", &ctx).unwrap(), "{FOO}");
/// ```
///
/// # Errors
///
/// Returns [`InterpolateError`] for an unknown name or unbalanced braces.
pub fn expand(template: &str, context: &Environ) -> Result<String, InterpolateError> {
    // Fast path
    if !template.contains(['{', '}']) {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(InterpolateError::Unbalanced),
                    }
                }
                let value = context
                    .get(&name)
                    .ok_or(InterpolateError::Undefined(name))?;
                out.push_str(value);
            }
            '}' => return Err(InterpolateError::Unbalanced),
            other => out.push(other),
        }
    }

    Ok(out)
}
