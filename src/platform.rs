//! Platform conventions: scripts directory, `PATH` separator and path
//! normalization.
use std::fmt;

/// Filesystem and environment conventions vex has to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// `bin/`, `:`-separated `PATH`, `HOME`.
    Posix,
    /// `Scripts\`, `;`-separated `PATH`, `HOMEDRIVE` + `HOMEPATH`.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current system.
///
/// Code that depends on the platform takes a `Platform` argument instead of
/// checking `cfg!` itself, so tests can exercise the Windows conventions on
/// any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Which convention applies.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit convention.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether the Windows conventions apply.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Name of the directory inside a virtualenv that holds its executables.
    #[must_use]
    pub const fn scripts_dir(&self) -> &'static str {
        match self.os {
            Os::Posix => "bin",
            Os::Windows => "Scripts",
        }
    }

    /// Separator between entries of a `PATH` value.
    #[must_use]
    pub const fn path_list_separator(&self) -> char {
        match self.os {
            Os::Posix => ':',
            Os::Windows => ';',
        }
    }

    /// Separator between components of a single path.
    #[must_use]
    pub const fn path_separator(&self) -> char {
        match self.os {
            Os::Posix => '/',
            Os::Windows => '\\',
        }
    }

    /// Lexically normalize a path string.
    ///
    /// Collapses repeated separators and `.` components, folds `..` into the
    /// preceding component, and drops trailing separators. On Windows, `/` is
    /// treated as `\`. Never touches the filesystem, so symlinks are not
    /// resolved.
    ///
    /// ```
    /// use vex::platform::{Os, Platform};
    ///
    /// let posix = Platform::new(Os::Posix);
    /// assert_eq!(posix.normalize("a//b/./c/../d/"), "a/b/d");
    /// assert_eq!(posix.normalize(""), ".");
    ///
    /// let windows = Platform::new(Os::Windows);
    /// assert_eq!(windows.normalize("C:/ve/Scripts"), "C:\\ve\\Scripts");
    /// ```
    #[must_use]
    pub fn normalize(&self, path: &str) -> String {
        let sep = self.path_separator();
        let unified: String = if self.is_windows() {
            path.replace('/', "\\")
        } else {
            path.to_string()
        };

        // Keep a drive prefix such as `C:` out of the component logic.
        let (prefix, rest) = match self.os {
            Os::Windows if unified.len() >= 2 && unified.as_bytes().get(1) == Some(&b':') => {
                unified.split_at(2)
            }
            _ => ("", unified.as_str()),
        };
        let absolute = rest.starts_with(sep);

        let mut parts: Vec<&str> = Vec::new();
        for component in rest.split(sep) {
            match component {
                "" | "." => {}
                ".." => {
                    if parts.last().is_some_and(|last| *last != "..") {
                        parts.pop();
                    } else if !absolute {
                        parts.push("..");
                    }
                }
                other => parts.push(other),
            }
        }

        let mut out = String::from(prefix);
        if absolute {
            out.push(sep);
        }
        out.push_str(&parts.join(&sep.to_string()));
        if out.is_empty() {
            out.push('.');
        }
        out
    }

    const fn detect_os() -> Os {
        if cfg!(windows) { Os::Windows } else { Os::Posix }
    }
}
