use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Source roots owned by this crate. Nothing outside them is scanned.
const SOURCE_DIRS: [&str; 4] = ["infer", "cli", "tests", "benches"];

// Collects every matching line of one file so the error lists them all at once.
struct ViolationCollector {
    violations: Vec<String>,
    file_path: PathBuf,
    skip_comments_and_strings: bool,
}

impl ViolationCollector {
    fn new(file_path: &Path, skip_comments_and_strings: bool) -> Self {
        Self {
            violations: Vec::new(),
            file_path: file_path.to_path_buf(),
            skip_comments_and_strings,
        }
    }

    fn check_and_get_error_message(&self, rule: &str, advice: &str) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }

        let file_name = self.file_path.to_str().unwrap_or("?");
        let mut error_msg = format!(
            "\n❌ ERROR: Found {} {} in {}:\n",
            self.violations.len(),
            rule,
            file_name
        );
        for violation in &self.violations {
            error_msg.push_str(&format!("   {violation}\n"));
        }
        error_msg.push_str(&format!("\n⚠️ {advice}\n"));
        Some(error_msg)
    }
}

impl Sink for ViolationCollector {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let line_number = mat.line_number().unwrap_or(0);
        let line_text = std::str::from_utf8(mat.bytes()).unwrap_or("").trim_end();

        if self.skip_comments_and_strings {
            let is_pure_comment = line_text.trim_start().starts_with("//");
            let is_in_string = line_text
                .split('"')
                .enumerate()
                .any(|(i, part)| i % 2 == 1 && part.contains('_'));
            if is_pure_comment || is_in_string {
                return Ok(true);
            }
        }

        self.violations.push(format!("{line_number}:{line_text}"));
        Ok(true)
    }
}

fn rust_sources(manifest_dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    SOURCE_DIRS.iter().flat_map(move |dir| {
        WalkDir::new(manifest_dir.join(dir))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
            .map(|e| e.into_path())
    })
}

fn scan(
    manifest_dir: &Path,
    pattern: &str,
    skip_comments_and_strings: bool,
    rule: &str,
    advice: &str,
) -> Result<(), Box<dyn Error>> {
    let matcher = RegexMatcher::new_line_matcher(pattern)?;
    let mut searcher = Searcher::new();

    for path in rust_sources(manifest_dir) {
        let mut collector = ViolationCollector::new(&path, skip_comments_and_strings);
        searcher.search_path(&matcher, &path, &mut collector)?;
        if let Some(error_message) = collector.check_and_get_error_message(rule, advice) {
            return Err(error_message.into());
        }
    }
    Ok(())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|e| {
        eprintln!("CARGO_MANIFEST_DIR is not set: {e}");
        std::process::exit(1);
    }));
    for dir in SOURCE_DIRS {
        println!("cargo:rerun-if-changed={}", manifest_dir.join(dir).display());
    }

    let checks = [
        (
            r"\b(_[a-zA-Z0-9_]+)\b",
            true,
            "underscore-prefixed variables",
            "Underscore-prefixed variable names are not allowed in this project. Use the variable or remove it.",
        ),
        (
            r"(//|/\*).*(?:FIXED|CORRECTED|FIX|FIXES|CHANGED|MODIFIED|UPDATED)",
            false,
            "forbidden comment markers",
            "Comments describing edits ('FIXED', 'CHANGED', ...) are not allowed. Describe the code, not its history.",
        ),
        (
            r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]",
            false,
            "#[allow(dead_code)] attributes",
            "#[allow(dead_code)] is not allowed in this project. Use the code or remove it.",
        ),
    ];

    for (pattern, skip, rule, advice) in checks {
        if let Err(e) = scan(&manifest_dir, pattern, skip, rule, advice) {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
