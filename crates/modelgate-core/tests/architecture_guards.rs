//! Architecture guard tests for the modelgate workspace.
//!
//! These tests scan source files to enforce design-level consistency:
//! - Error handling style (thiserror vs hand-written Display)
//! - No `Result<_, String>` outside validation helpers
//! - Adapter pattern completeness
//! - Transport errors stay inside the adapters
//!
//! Run: `cargo test --package modelgate-core --test architecture_guards -- --nocapture`

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk `dir` recursively, collecting .rs files that pass `filter`.
fn collect_rs_files(dir: &Path, filter: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
    walkdir(dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|e| e == "rs") && filter(p))
        .collect()
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(walkdir(&path));
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Return the workspace root (two levels up from modelgate-core/).
fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("cannot determine workspace root")
        .to_path_buf()
}

fn is_test_file(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.contains("/tests/") || s.ends_with("tests.rs") || s.ends_with("_test.rs")
}

fn rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn report(code: &str, headline: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("\n[{code}] {headline}\n\n");
    for v in violations {
        msg.push_str(&format!("  {v}\n"));
    }
    panic!("{msg}");
}

// ---------------------------------------------------------------------------
// MG-ERR-01: Error types must use thiserror, no hand-written Display
// ---------------------------------------------------------------------------

#[test]
fn test_error_types_use_thiserror() {
    let root = workspace_root();
    let files = collect_rs_files(&root.join("crates"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("impl")
                && trimmed.contains("Display for")
                && trimmed.contains("Error")
            {
                violations.push(format!("{}:{} -> {}", rel(file, &root), i + 1, trimmed));
            }
        }
    }

    report(
        "MG-ERR-01",
        "Hand-written Display for Error types detected. Use #[derive(thiserror::Error)].",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// MG-ERR-02: No Result<_, String> in modelgate-core
// ---------------------------------------------------------------------------

#[test]
fn test_no_result_string_in_core() {
    let root = workspace_root();

    // Validation helpers return a message that the caller wraps in
    // GateError::ConfigMalformed together with the config path.
    let allowlist: HashSet<&str> = [
        "crates/modelgate-core/src/config/timeouts.rs",
        "crates/modelgate-core/src/config/platform_config.rs",
    ]
    .into_iter()
    .collect();

    let files = collect_rs_files(&root.join("crates/modelgate-core/src"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let relative = rel(file, &root);
        if allowlist.contains(relative.as_str()) {
            continue;
        }
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            // Inline test modules sit at the bottom of a file.
            if trimmed == "#[cfg(test)]" {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            if returns_string_error(trimmed) {
                violations.push(format!("{relative}:{} -> {trimmed}", i + 1));
            }
        }
    }

    report(
        "MG-ERR-02",
        "Result<_, String> found in modelgate-core. Use GateResult instead.",
        &violations,
    );
}

fn returns_string_error(line: &str) -> bool {
    line.find("Result<")
        .is_some_and(|pos| line[pos..].contains(", String>"))
}

#[test]
fn test_string_error_matcher() {
    assert!(returns_string_error("pub fn validate(&self) -> Result<(), String> {"));
    assert!(returns_string_error("fn parse(s: &str) -> std::result::Result<u32, String>"));
    assert!(!returns_string_error("pub fn load(&self) -> GateResult<String> {"));
    assert!(!returns_string_error("let map: BTreeMap<String, String> = BTreeMap::new();"));
}

// ---------------------------------------------------------------------------
// MG-LLM-01: Adapter pattern consistency
// ---------------------------------------------------------------------------

#[test]
fn test_adapter_pattern_consistency() {
    let root = workspace_root();
    let providers_dir = root.join("crates/modelgate-core/src/llm/providers");

    let skip_files: HashSet<&str> = ["mod.rs", "provider_trait.rs", "error_utils.rs", "request_builder.rs"]
        .into_iter()
        .collect();

    let files = collect_rs_files(&providers_dir, &|p| {
        let name = p.file_name().unwrap_or_default().to_string_lossy();
        !skip_files.contains(name.as_ref()) && !name.ends_with("_stream.rs") && !name.ends_with("_tests.rs")
    });
    assert!(!files.is_empty(), "no adapter files found in {}", providers_dir.display());

    let trait_content = fs::read_to_string(providers_dir.join("provider_trait.rs")).unwrap_or_default();
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let name = file.file_stem().unwrap_or_default().to_string_lossy().to_string();

        let struct_name = content.lines().find_map(|line| {
            line.trim()
                .strip_prefix("pub struct ")
                .and_then(|rest| rest.split_whitespace().next())
                .filter(|s| s.ends_with("Adapter"))
                .map(str::to_string)
        });

        let Some(struct_name) = struct_name else {
            violations.push(format!("{name}.rs: missing `pub struct XxxAdapter`"));
            continue;
        };

        let is_text = content.contains("pub async fn complete(")
            && content.contains("pub async fn complete_stream(");
        let is_image = content.contains("pub async fn generate_image(");
        if !is_text && !is_image {
            violations.push(format!(
                "{name}.rs: needs `complete` + `complete_stream`, or `generate_image`"
            ));
        }
        if !content.contains("pub fn rotator(") {
            violations.push(format!("{name}.rs: missing `pub fn rotator(`"));
        }
        if !trait_content.contains(&format!("({struct_name})")) {
            violations.push(format!(
                "{name}.rs: `{struct_name}` not found in AdapterInstance enum"
            ));
        }
    }

    report("MG-LLM-01", "Adapter pattern violations:", &violations);
}

// ---------------------------------------------------------------------------
// MG-ERR-03: reqwest errors never reach the public error type
// ---------------------------------------------------------------------------

#[test]
fn test_error_module_is_transport_free() {
    let root = workspace_root();
    let files = collect_rs_files(&root.join("crates/modelgate-core/src/error"), &|_| true);
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        for (i, line) in content.lines().enumerate() {
            if line.contains("reqwest") {
                violations.push(format!("{}:{} -> {}", rel(file, &root), i + 1, line.trim()));
            }
        }
    }

    report(
        "MG-ERR-03",
        "reqwest types referenced from the error module. Map them in providers/error_utils.rs.",
        &violations,
    );
}
