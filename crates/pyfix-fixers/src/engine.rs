//! Refactoring engine
//!
//! Parses a file, walks the tree bottom-up and offers every node to every
//! selected fixer. A node is rebuilt from its (possibly rewritten) children
//! before fixers see it, so nested matches compose: in
//! `apply(f, apply(g, a))` the inner call is rewritten first and the outer
//! fixer binds the rewritten expression.

use pyfix_core::cst::{GreenElement, GreenNode, NodeOrToken, PySyntaxNodeExt};
use pyfix_core::{PyfixError, PySyntaxNode, Result, parse_python};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::fixer::Fixer;

/// Engine options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefactorOptions {
    /// Keep `<file>.bak` when writing a changed file
    pub backups: bool,
    /// Re-parse rewritten source and reject output that no longer parses
    pub validate_output: bool,
}

impl Default for RefactorOptions {
    fn default() -> Self {
        Self {
            backups: true,
            validate_output: true,
        }
    }
}

/// One substitution made by a fixer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    pub fixer: String,
    /// 1-based line of the first token of the replaced node
    pub line: usize,
    /// 1-based column (in characters)
    pub column: usize,
    pub before: String,
    pub after: String,
}

/// Outcome of refactoring one source
#[derive(Debug, Clone)]
pub struct RefactorResult {
    pub path: PathBuf,
    pub original: String,
    pub output: String,
    /// Tree of `output`
    pub tree: GreenNode,
    pub fixes: Vec<AppliedFix>,
}

impl RefactorResult {
    pub fn changed(&self) -> bool {
        self.original != self.output
    }
}

/// Runs fixers over sources and files
pub struct RefactoringEngine {
    fixers: Vec<Arc<dyn Fixer>>,
    options: RefactorOptions,
}

impl RefactoringEngine {
    pub fn new(fixers: Vec<Arc<dyn Fixer>>, options: RefactorOptions) -> Self {
        Self { fixers, options }
    }

    pub fn fixers(&self) -> &[Arc<dyn Fixer>] {
        &self.fixers
    }

    /// Refactor source text
    ///
    /// `path` is only used for error messages and the result.
    pub fn refactor_source(&self, source: &str, path: &Path) -> Result<RefactorResult> {
        let parse = parse_python(source);
        if let Some(error) = parse.errors().first() {
            let (line, column) = line_col(source, error.span.start);
            return Err(PyfixError::parse_error(path, &error.message, line, column));
        }

        let root = parse.syntax();
        let mut fixes = Vec::new();
        let (tree, _) = self.rewrite_node(&root, source, &mut fixes);
        let output = tree.to_string();

        if self.options.validate_output && !fixes.is_empty() {
            let reparsed = parse_python(&output);
            if let Some(error) = reparsed.errors().first() {
                let (line, column) = line_col(&output, error.span.start);
                return Err(PyfixError::fixer_error(
                    applied_fixer_names(&fixes),
                    format!(
                        "rewrite of '{}' produced invalid source at line {line}, column {column}: {}",
                        path.display(),
                        error.message
                    ),
                ));
            }
        }

        Ok(RefactorResult {
            path: path.to_path_buf(),
            original: source.to_string(),
            output,
            tree,
            fixes,
        })
    }

    /// Read and refactor a file
    pub fn refactor_file(&self, path: &Path) -> Result<RefactorResult> {
        let source = fs::read_to_string(path).map_err(|e| PyfixError::io_error(path, e))?;
        let result = self.refactor_source(&source, path)?;

        if result.changed() {
            info!(
                "{}: {} fix(es) applied",
                path.display(),
                result.fixes.len()
            );
        } else {
            debug!("{}: no changes", path.display());
        }
        Ok(result)
    }

    /// Refactor many files in parallel
    ///
    /// Each file is parsed and rewritten on its own worker; results come back
    /// in input order.
    pub fn refactor_files(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<RefactorResult>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.refactor_file(path)))
            .collect()
    }

    /// Write a changed result back to its file
    ///
    /// Returns whether the file was written. With backups enabled the old
    /// contents are kept next to it as `<file>.bak`.
    pub fn write_result(&self, result: &RefactorResult) -> Result<bool> {
        if !result.changed() {
            return Ok(false);
        }

        let path = &result.path;
        if self.options.backups {
            let backup = backup_path(path);
            if backup.exists() {
                fs::remove_file(&backup).map_err(|e| PyfixError::io_error(&backup, e))?;
            }
            fs::copy(path, &backup).map_err(|e| PyfixError::io_error(&backup, e))?;
            debug!("Backup written to {}", backup.display());
        }

        fs::write(path, &result.output).map_err(|e| PyfixError::io_error(path, e))?;
        info!("Wrote {}", path.display());
        Ok(true)
    }

    /// Rebuild `node` bottom-up, applying fixers at every node
    ///
    /// Returns the new green node and whether anything changed.
    fn rewrite_node(
        &self,
        node: &PySyntaxNode,
        source: &str,
        fixes: &mut Vec<AppliedFix>,
    ) -> (GreenNode, bool) {
        let mut changed = false;
        let children: Vec<GreenElement> = node
            .children_with_tokens()
            .map(|child| match child {
                NodeOrToken::Node(child) => {
                    let (green, child_changed) = self.rewrite_node(&child, source, fixes);
                    changed |= child_changed;
                    NodeOrToken::Node(green)
                }
                NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
            })
            .collect();

        let mut green = if changed {
            GreenNode::new(node.green().kind(), children)
        } else {
            node.green().into_owned()
        };

        for fixer in &self.fixers {
            let candidate = PySyntaxNode::new_root(green.clone());
            let Some(bindings) = fixer.match_node(&candidate) else {
                continue;
            };
            let Some(replacement) = fixer.transform(&candidate, &bindings) else {
                debug!("{}: matched but left unchanged", fixer.name());
                continue;
            };

            let offset = node
                .first_significant_token()
                .map_or(node.text_range().start(), |token| token.text_range().start());
            let (line, column) = line_col(source, usize::from(offset));
            let fix = AppliedFix {
                fixer: fixer.name().to_string(),
                line,
                column,
                before: candidate.trimmed_text(),
                after: replacement.trimmed_text(),
            };
            debug!(
                "{} at {}:{}: {} -> {}",
                fix.fixer, line, column, fix.before, fix.after
            );
            fixes.push(fix);

            green = replacement.green().into_owned();
            changed = true;
        }

        (green, changed)
    }
}

/// `<file>.bak` next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// 1-based line and column of a byte offset
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn applied_fixer_names(fixes: &[AppliedFix]) -> String {
    let mut names: Vec<&str> = fixes.iter().map(|f| f.fixer.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names.join(",")
}
