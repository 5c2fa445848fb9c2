//! Declaration visitor, documentation gate, and stub inserter.
//!
//! Walks the top-level items of a parsed file and, for every exported bound
//! name whose decoration list contains no comment referencing it, prepends
//! the placeholder line `// <name> missing godoc.`. Existing decorations are
//! never removed or reordered. The gate recognizes previously inserted stubs
//! by their name prefix, which makes repeated runs no-ops.

use crate::tree::{DeclKind, Item, SourceFile};

/// Exported per Go's convention: the name starts with an uppercase letter.
fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// True if any decoration line, after stripping the comment marker and
/// leading whitespace, begins with `name` followed by a word boundary.
///
/// The check is a deliberately coarse exact-prefix rule: a comment that
/// merely happens to start with the name (e.g. "Do not use this" for a
/// declaration named `Do`) counts as documentation.
fn is_documented(decorations: &[String], name: &str) -> bool {
    decorations.iter().any(|dec| {
        let t = dec.trim_start();
        let Some(t) = t.strip_prefix("//").or_else(|| t.strip_prefix("/*")) else {
            return false;
        };
        match t.trim_start().strip_prefix(name) {
            Some(rest) => !rest
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_'),
            None => false,
        }
    })
}

fn stub(name: &str, indent: &str) -> String {
    format!("{indent}// {name} missing godoc.")
}

fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Insert missing godoc stubs into `file`, mutating decoration lists in
/// place. Structure is never changed — no items are added or removed.
/// Returns the number of stubs inserted.
pub fn annotate(file: &mut SourceFile) -> usize {
    let mut inserted = 0;
    for item in &mut file.items {
        let Item::Decl(decl) = item else { continue };
        match &mut decl.kind {
            DeclKind::Function { name, .. } | DeclKind::SingleSpec { name, .. } => {
                if is_exported(name) && !is_documented(&decl.decorations, name) {
                    decl.decorations.insert(0, stub(name, ""));
                    inserted += 1;
                }
            }
            DeclKind::MultiSpec { specs, .. } => {
                for spec in specs {
                    if is_exported(&spec.name) && !is_documented(&spec.decorations, &spec.name) {
                        let indent = indent_of(&spec.lines[0]).to_string();
                        spec.decorations.insert(0, stub(&spec.name, &indent));
                        inserted += 1;
                    }
                }
            }
        }
    }
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> (String, usize) {
        let mut tree = crate::parse::parse(src).unwrap();
        let n = annotate(&mut tree);
        (tree.render(), n)
    }

    #[test]
    fn inserts_stub_above_undocumented_func() {
        let (out, n) = run("package p\n\nfunc Foo() {}\n");
        assert_eq!(n, 1);
        assert_eq!(out, "package p\n\n// Foo missing godoc.\nfunc Foo() {}\n");
    }

    #[test]
    fn documented_func_unchanged() {
        let src = "// Foo does something.\nfunc Foo() {}\n";
        let (out, n) = run(src);
        assert_eq!(n, 0);
        assert_eq!(out, src);
    }

    #[test]
    fn unexported_untouched() {
        let src = "func foo() {}\n\nvar bar = 1\n";
        let (out, n) = run(src);
        assert_eq!(n, 0);
        assert_eq!(out, src);
    }

    #[test]
    fn method_uses_method_name() {
        let (out, _) = run("func (s *Server) Run() {}\n");
        assert_eq!(out, "// Run missing godoc.\nfunc (s *Server) Run() {}\n");
    }

    #[test]
    fn multi_spec_group_per_spec() {
        let (out, n) = run("type (\n\tA int\n\tB string\n)\n");
        assert_eq!(n, 2);
        assert_eq!(
            out,
            "type (\n\t// A missing godoc.\n\tA int\n\t// B missing godoc.\n\tB string\n)\n"
        );
    }

    #[test]
    fn single_name_group_stub_above_group() {
        let (out, n) = run("type (\n\tA int\n)\n");
        assert_eq!(n, 1);
        assert_eq!(out, "// A missing godoc.\ntype (\n\tA int\n)\n");
    }

    #[test]
    fn value_group_mixed_export() {
        let (out, n) = run("var (\n\tX = 1\n\ty = 2\n)\n");
        assert_eq!(n, 1);
        assert_eq!(out, "var (\n\t// X missing godoc.\n\tX = 1\n\ty = 2\n)\n");
    }

    #[test]
    fn value_spec_first_name_decides() {
        // Matches the reference behavior: only the first bound name counts.
        let src = "var a, B = 1, 2\n";
        let (out, n) = run(src);
        assert_eq!(n, 0);
        assert_eq!(out, src);
    }

    #[test]
    fn idempotent() {
        let (once, n1) = run("func Foo() {}\n\ntype (\n\tA int\n\tB string\n)\n");
        assert!(n1 > 0);
        let (twice, n2) = run(&once);
        assert_eq!(n2, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn prefix_is_word_bounded() {
        // "FooBar ..." must not count as documentation for Foo.
        let (out, n) = run("// FooBar does X.\nfunc Foo() {}\n");
        assert_eq!(n, 1);
        assert_eq!(
            out,
            "// Foo missing godoc.\n// FooBar does X.\nfunc Foo() {}\n"
        );
    }

    #[test]
    fn coarse_prefix_heuristic_preserved() {
        // An unrelated comment starting with the name suppresses insertion.
        let src = "// Do not use this.\nfunc Do() {}\n";
        let (out, n) = run(src);
        assert_eq!(n, 0);
        assert_eq!(out, src);
    }

    #[test]
    fn stub_prepends_above_existing_comments() {
        let (out, _) = run("// some note\nfunc Foo() {}\n");
        assert_eq!(out, "// Foo missing godoc.\n// some note\nfunc Foo() {}\n");
    }

    #[test]
    fn floating_comment_survives_insertion_elsewhere() {
        let src = "func Foo() {}\n\n// floating note\n\nfunc bar() {}\n";
        let (out, n) = run(src);
        assert_eq!(n, 1);
        assert_eq!(
            out,
            "// Foo missing godoc.\nfunc Foo() {}\n\n// floating note\n\nfunc bar() {}\n"
        );
    }

    #[test]
    fn block_comment_counts_as_documentation() {
        let src = "/* Foo is documented. */\nfunc Foo() {}\n";
        let (_, n) = run(src);
        assert_eq!(n, 0);
    }

    #[test]
    fn detached_comment_does_not_suppress() {
        // A comment separated by a blank line is not a leading decoration.
        let (out, n) = run("// Foo used to be documented here.\n\nfunc Foo() {}\n");
        assert_eq!(n, 1);
        assert!(out.contains("// Foo missing godoc.\nfunc Foo() {}"));
    }

    #[test]
    fn const_group_with_iota() {
        let (out, n) = run("const (\n\tRed = iota\n\tgreen\n\tBlue\n)\n");
        assert_eq!(n, 2);
        assert_eq!(
            out,
            "const (\n\t// Red missing godoc.\n\tRed = iota\n\tgreen\n\t// Blue missing godoc.\n\tBlue\n)\n"
        );
    }

    #[test]
    fn untouched_file_renders_byte_identical() {
        let src = "// Package p.\npackage p\n\n// Foo is fine.\nfunc Foo() {}\n\n// helper\nfunc helper() {}\n";
        let (out, n) = run(src);
        assert_eq!(n, 0);
        assert_eq!(out, src);
    }
}
