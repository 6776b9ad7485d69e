//! Unified diff rendering for rewritten files

use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Context lines around each hunk
const CONTEXT_LINES: usize = 3;

/// Generate a unified diff with ANSI colors (for terminal output)
pub fn generate_unified_diff(original: &str, modified: &str, file_path: &Path) -> String {
    generate_unified_diff_impl(original, modified, file_path, true)
}

/// Generate a unified diff without colors (for file output)
pub fn generate_unified_diff_plain(original: &str, modified: &str, file_path: &Path) -> String {
    generate_unified_diff_impl(original, modified, file_path, false)
}

fn generate_unified_diff_impl(
    original: &str,
    modified: &str,
    file_path: &Path,
    colorize: bool,
) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    if original == modified {
        return output;
    }

    let header = |line: String| {
        if colorize {
            format!("\x1b[1m{line}\x1b[0m\n")
        } else {
            format!("{line}\n")
        }
    };
    output.push_str(&header(format!("--- {} (original)", file_path.display())));
    output.push_str(&header(format!("+++ {} (refactored)", file_path.display())));

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len = last.old_range().end - old_start;
        let new_len = last.new_range().end - new_start;

        let hunk = format!(
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            old_len,
            new_start + 1,
            new_len
        );
        if colorize {
            output.push_str(&format!("\x1b[36m{hunk}\x1b[0m\n"));
        } else {
            output.push_str(&hunk);
            output.push('\n');
        }

        for op in &group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ('-', "\x1b[31m"),
                    ChangeTag::Insert => ('+', "\x1b[32m"),
                    ChangeTag::Equal => (' ', ""),
                };
                let line_text = change.value().trim_end_matches(['\n', '\r']);

                if colorize && !color.is_empty() {
                    output.push_str(&format!("{color}{sign}{line_text}\x1b[0m\n"));
                } else {
                    output.push_str(&format!("{sign}{line_text}\n"));
                }

                if change.missing_newline() {
                    output.push_str("\\ No newline at end of file\n");
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_diff_single_line() {
        let diff = generate_unified_diff_plain(
            "x = apply(f, a)\n",
            "x = f(*a)\n",
            Path::new("a.py"),
        );
        insta::assert_snapshot!(diff, @r"
        --- a.py (original)
        +++ a.py (refactored)
        @@ -1,1 +1,1 @@
        -x = apply(f, a)
        +x = f(*a)
        ");
    }

    #[test]
    fn test_plain_diff_keeps_context() {
        let original = "import os\nimport sys\ny = apply(f, g, h)\nprint(y)\n";
        let modified = "import os\nimport sys\ny = f(*g, **h)\nprint(y)\n";
        let diff = generate_unified_diff_plain(original, modified, Path::new("pkg/mod.py"));
        insta::assert_snapshot!(diff, @r"
        --- pkg/mod.py (original)
        +++ pkg/mod.py (refactored)
        @@ -1,4 +1,4 @@
         import os
         import sys
        -y = apply(f, g, h)
        +y = f(*g, **h)
         print(y)
        ");
    }

    #[test]
    fn test_identical_inputs_produce_empty_diff() {
        let diff = generate_unified_diff("same\n", "same\n", Path::new("a.py"));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_colored_diff_marks_changes() {
        let diff = generate_unified_diff("apply(f, a)\n", "f(*a)\n", Path::new("a.py"));
        assert!(diff.contains("\x1b[31m-apply(f, a)\x1b[0m"));
        assert!(diff.contains("\x1b[32m+f(*a)\x1b[0m"));
        assert!(diff.contains("\x1b[36m@@ -1,1 +1,1 @@\x1b[0m"));
    }

    #[test]
    fn test_missing_trailing_newline_is_marked() {
        let diff = generate_unified_diff_plain("apply(f, a)", "f(*a)", Path::new("a.py"));
        assert!(diff.contains("-apply(f, a)\n\\ No newline at end of file\n"));
    }
}
