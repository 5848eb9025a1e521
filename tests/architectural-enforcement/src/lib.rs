//! Architectural Enforcement
//!
//! Source scanners backing the integration tests in `tests/`. They enforce
//! rules the compiler cannot:
//! - no blocking sleeps in the controller (timers are tokio timers)
//! - no `unwrap()`/`expect()` in production code
//!
//! Only production code is scanned: a file is cut at its first
//! `#[cfg(test)]` and comment lines are ignored.

use std::fs;
use std::path::{Path, PathBuf};

/// A rule violation at a source line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File containing the violation
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Root of the workspace
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Production source directories of the controller
pub fn production_dirs() -> Vec<PathBuf> {
    vec![workspace_root().join("controller").join("core").join("src")]
}

/// Lines of `source` that belong to production code, with 1-based numbers
pub fn production_lines(source: &str) -> Vec<(usize, &str)> {
    source
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| (idx + 1, line))
        .collect()
}

/// Lines of `source` whose code part contains any of `patterns`
pub fn find_in_source(source: &str, patterns: &[&str]) -> Vec<(usize, String)> {
    production_lines(source)
        .into_iter()
        .filter(|(_, line)| {
            let code = line.split("//").next().unwrap_or(line);
            patterns.iter().any(|p| code.contains(p))
        })
        .map(|(number, line)| (number, line.trim().to_string()))
        .collect()
}

/// Scan every `.rs` file under `dirs`
pub fn scan(dirs: &[PathBuf], patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for dir in dirs.iter().filter(|d| d.exists()) {
        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            let Ok(content) = fs::read_to_string(path) else {
                continue;
            };
            violations.extend(find_in_source(&content, patterns).into_iter().map(
                |(line, text)| Violation {
                    path: path.to_path_buf(),
                    line,
                    text,
                },
            ));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_module_is_skipped() {
        let source = [
            "fn run() {",
            "    std::thread::sleep(d);",
            "}",
            "#[cfg(test)]",
            "mod tests {",
            "    fn helper() { std::thread::sleep(d); }",
            "}",
        ]
        .join("\n");
        let found = find_in_source(&source, &["thread::sleep("]);
        assert_eq!(found, vec![(2, "std::thread::sleep(d);".to_string())]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "/// Never call `x.unwrap()` here\nlet a = b; // c.unwrap()\n";
        assert!(find_in_source(source, &[".unwrap()"]).is_empty());
    }
}
