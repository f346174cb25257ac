//! Catalog linting - static analysis of model catalog files.
//!
//! Reports the conditions that resolution silently degrades on:
//! - Syntax errors and unknown keys
//! - Pointer fields that will be dropped (unknown or empty targets)
//! - Duplicate fields and overwritten model identifiers

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::loader::{load_catalog, Catalog};
use crate::resolver::resolve_chained_fields_from;
use crate::types::ModelClass;

/// File extensions treated as catalogs.
const CATALOG_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// Path to the issue within the catalog (e.g., "/models/0/fields/2")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all catalog files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_catalog_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        total_errors += count(&file_result.diagnostics, Severity::Error);
        total_warnings += count(&file_result.diagnostics, Severity::Warning);
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single catalog file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let display = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();
    let display = if display.as_os_str().is_empty() {
        file.to_path_buf()
    } else {
        display
    };

    let diagnostics = match load_catalog(file) {
        Ok(catalog) => lint_catalog(&catalog, file),
        Err(e) => vec![Diagnostic {
            severity: Severity::Error,
            code: "E001".to_string(),
            file: file.to_path_buf(),
            path: "/".to_string(),
            message: format!("syntax error: {}", e),
        }],
    };

    FileResult {
        file: display,
        status: status_of(&diagnostics),
        diagnostics,
    }
}

/// Check a parsed catalog.
pub fn lint_catalog(catalog: &Catalog, file: &Path) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut warn = |path: String, code: &str, message: String| {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: code.to_string(),
            file: file.to_path_buf(),
            path,
            message,
        });
    };

    let declared: HashSet<&str> = catalog.models.iter().map(|m| m.name.as_str()).collect();
    let registry = catalog.to_registry();
    let mut identifiers: HashMap<&str, &str> = HashMap::new();

    for (mi, model) in catalog.models.iter().enumerate() {
        let model_path = format!("/models/{}", mi);
        let identifier = model.identifier();
        match identifiers.insert(identifier, model.name.as_str()) {
            Some(previous) if previous == model.name => warn(
                model_path.clone(),
                "W007",
                format!(
                    "model {} is declared more than once; its fields are appended",
                    model.name
                ),
            ),
            Some(previous) => warn(
                model_path.clone(),
                "W004",
                format!(
                    "identifier \"{}\" of {} overwrites the one registered by {}",
                    identifier, model.name, previous
                ),
            ),
            None => {}
        }

        let owner = model.class();
        let mut seen = HashSet::new();
        for (fi, field) in model.fields.iter().enumerate() {
            let field_path = format!("{}/fields/{}", model_path, fi);

            if !seen.insert(field.name.as_str()) {
                warn(
                    field_path.clone(),
                    "W003",
                    format!("duplicate field \"{}\" on {}", field.name, model.name),
                );
            }

            let is_pointer = field
                .field_type
                .as_ref()
                .map(|t| t.is_pointer())
                .unwrap_or(false);

            match (&field.link, is_pointer) {
                (None, true) => warn(
                    field_path,
                    "W001",
                    format!("pointer field \"{}\" has no link", field.name),
                ),
                (Some(link), false) => warn(
                    field_path,
                    "W005",
                    format!(
                        "field \"{}\" links to {} but is not a pointer; link is ignored",
                        field.name, link
                    ),
                ),
                (Some(link), true) if !declared.contains(link.as_str()) => warn(
                    field_path,
                    "W002",
                    format!(
                        "pointer field \"{}\" links to undeclared model {}; it will be dropped",
                        field.name, link
                    ),
                ),
                (Some(link), true) => {
                    let target = ModelClass::named(link);
                    let nested =
                        resolve_chained_fields_from(&registry, &target, &[owner.clone()]);
                    if nested.is_empty() {
                        warn(
                            field_path,
                            "W006",
                            format!(
                                "pointer field \"{}\" resolves to no fields of {}; it will be dropped",
                                field.name, link
                            ),
                        );
                    }
                }
                (None, false) => {}
            }
        }
    }

    diagnostics
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn status_of(diagnostics: &[Diagnostic]) -> FileStatus {
    if count(diagnostics, Severity::Error) > 0 {
        FileStatus::Error
    } else if count(diagnostics, Severity::Warning) > 0 {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    }
}

fn is_catalog_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CATALOG_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Collect all catalog files in a path (file or directory).
fn collect_catalog_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if is_catalog_file(path) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if is_catalog_file(&path) {
            files.push(path);
        }
    }
}
