//! The `.vexrc` format: `heading:` lines followed by indented
//! `key=value` lines, with single and double quoting rules.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::interpolate::{self, InterpolateError};
use crate::environ::{self, Environ};
use crate::error::{Result, VexError, quoted};

/// Heading that holds keys appearing before any `heading:` line.
pub const DEFAULT_HEADING: &str = "root";

/// Heading whose keys are overlaid onto the child environment.
pub const ENV_HEADING: &str = "env";

/// Ordered key/value pairs under one heading.
///
/// Keys keep the position where they were first seen; redeclaring a key
/// replaces its value in place.
///
/// # Examples
///
/// ```
/// use vex::config::vexrc::Heading;
///
/// let mut heading = Heading::default();
/// heading.insert("a".into(), "1".into());
/// heading.insert("b".into(), "2".into());
/// heading.insert("a".into(), "3".into());
/// let pairs: Vec<_> = heading.iter().collect();
/// assert_eq!(pairs, [("a", "3"), ("b", "2")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heading {
    entries: Vec<(String, String)>,
}

impl Heading {
    /// Value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, treating an empty value as absent.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Set `key` to `value`, overwriting an earlier value in place.
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Iterate over `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heading holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed representation of a `.vexrc` file.
///
/// The default heading and the `env` heading always exist, so "heading
/// present but empty" never has to be told apart from "heading absent" for
/// the two headings vex interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vexrc {
    headings: Vec<(String, Heading)>,
}

impl Default for Vexrc {
    fn default() -> Self {
        Self {
            headings: vec![
                (DEFAULT_HEADING.to_string(), Heading::default()),
                (ENV_HEADING.to_string(), Heading::default()),
            ],
        }
    }
}

impl Vexrc {
    /// Look up a heading by name.
    #[must_use]
    pub fn heading(&self, name: &str) -> Option<&Heading> {
        self.headings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
    }

    /// Keys that appeared before any heading line.
    #[must_use]
    pub fn root(&self) -> &Heading {
        self.heading(DEFAULT_HEADING).unwrap_or(&EMPTY_HEADING)
    }

    /// Variables to overlay onto the child environment.
    #[must_use]
    pub fn env(&self) -> &Heading {
        self.heading(ENV_HEADING).unwrap_or(&EMPTY_HEADING)
    }

    /// Iterate over `(name, heading)` pairs in first-seen order.
    pub fn headings(&self) -> impl Iterator<Item = (&str, &Heading)> {
        self.headings.iter().map(|(n, h)| (n.as_str(), h))
    }

    /// Mutable access to a heading, creating it at the end if absent.
    #[allow(clippy::indexing_slicing)] // index was just found or pushed
    pub fn heading_mut(&mut self, name: &str) -> &mut Heading {
        let index = match self.headings.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.headings.push((name.to_string(), Heading::default()));
                self.headings.len() - 1
            }
        };
        &mut self.headings[index].1
    }

    /// Interpreter requested for `--make` when none is given on the command line.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.root().get_non_empty("python")
    }

    /// Command to run when none is given: the `shell` key, else `$SHELL`.
    ///
    /// The value is split into words with POSIX shell quoting rules.
    ///
    /// # Errors
    ///
    /// Returns [`VexError::InvalidVexrc`] if the value has an unbalanced
    /// quote or a dangling escape.
    pub fn get_shell(&self, environ: &Environ) -> Result<Option<Vec<String>>> {
        let Some(command) = self
            .root()
            .get_non_empty("shell")
            .or_else(|| environ::non_empty(environ, environ::SHELL))
        else {
            return Ok(None);
        };
        let words = shlex::split(command).ok_or_else(|| {
            VexError::InvalidVexrc(format!("can't split shell command {command:?} into words"))
        })?;
        Ok((!words.is_empty()).then_some(words))
    }
}

static EMPTY_HEADING: Heading = Heading {
    entries: Vec::new(),
};

/// Outcome of looking for a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The file existed and parsed.
    Found(Vexrc),
    /// There is no file at that path; defaults apply.
    NotFound,
}

impl ConfigSource {
    /// Collapse into a [`Vexrc`], using an empty one when nothing was found.
    #[must_use]
    pub fn into_vexrc(self) -> Vexrc {
        match self {
            Self::Found(vexrc) => vexrc,
            Self::NotFound => Vexrc::default(),
        }
    }
}

/// Read and parse the config file at `path`.
///
/// A missing file is [`ConfigSource::NotFound`], not an error. Any other
/// failure to open or read the file is.
///
/// # Errors
///
/// Returns [`VexError::Io`] if the file exists but cannot be read, and the
/// errors of [`parse`] otherwise.
pub fn read(path: &Path, environ: &Environ) -> Result<ConfigSource> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigSource::NotFound),
        Err(e) => return Err(VexError::io("opening config", path, e)),
    };
    let name = path.display().to_string();
    parse(BufReader::new(file), &name, environ).map(ConfigSource::Found)
}

/// Parse config text from `reader`.
///
/// Format:
/// ```text
/// key=value
/// key='literal value'
/// key="interpolated {VAR}"
///
/// heading_name:
///     key=value
/// ```
///
/// `name` identifies the source in error messages. `context` supplies the
/// values for `{VAR}` placeholders in double-quoted values.
///
/// # Errors
///
/// - [`VexError::ConfigSyntax`] listing every line that is neither blank, a
///   heading, nor `key=value`.
/// - [`VexError::InvalidVexrc`] for a line that is not UTF-8 or a
///   placeholder that cannot be expanded.
/// - [`VexError::Io`] if reading fails.
pub fn parse<R: BufRead>(reader: R, name: &str, context: &Environ) -> Result<Vexrc> {
    let mut vexrc = Vexrc::default();
    let mut heading = DEFAULT_HEADING.to_string();
    let mut errors = Vec::new();

    for (line_num, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.map_err(|e| VexError::io("reading config", Path::new(name), e))?;
        let line = String::from_utf8(raw).map_err(|_| {
            VexError::InvalidVexrc(format!(
                "line {line_num} of {} is not valid UTF-8",
                quoted(Path::new(name))
            ))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        if let Some(h) = parse_heading(&line) {
            heading = h.to_string();
            continue;
        }

        match parse_kv_line(&line) {
            Some((key, value)) => {
                let value = process_value(value, context).map_err(|e| {
                    let detail = match e {
                        InterpolateError::Undefined(var) => format!("undefined variable {{{var}}}"),
                        InterpolateError::Unbalanced => "unbalanced braces".to_string(),
                    };
                    VexError::InvalidVexrc(format!(
                        "{detail} at line {line_num} of {}",
                        quoted(Path::new(name))
                    ))
                })?;
                vexrc.heading_mut(&heading).insert(key.to_string(), value);
            }
            None => errors.push(line_num),
        }
    }

    if errors.is_empty() {
        Ok(vexrc)
    } else {
        Err(VexError::ConfigSyntax {
            file: name.to_string(),
            lines: errors,
        })
    }
}

/// Parse a `name:` line, allowing only trailing whitespace after the colon.
fn parse_heading(line: &str) -> Option<&str> {
    let (name, rest) = line.split_once(':')?;
    (is_identifier(name) && rest.trim().is_empty()).then_some(name)
}

/// An ASCII letter followed by letters, digits, or underscores.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a `key = value` line. The key must be non-empty after trimming.
fn parse_kv_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value.trim()))
}

/// Apply the quoting rules to a trimmed value.
fn process_value(value: &str, context: &Environ) -> Result<String, InterpolateError> {
    if let Some(inner) = unwrap_quotes(value, '\'') {
        Ok(inner.to_string())
    } else if let Some(inner) = unwrap_quotes(value, '"') {
        interpolate::expand(inner, context)
    } else {
        Ok(value.to_string())
    }
}

/// Strip `quote` from both ends when it wraps the whole value and does not
/// occur inside it.
fn unwrap_quotes(value: &str, quote: char) -> Option<&str> {
    let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;
    (!inner.contains(quote)).then_some(inner)
}
