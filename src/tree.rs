//! Comment-preserving representation of a Go source file.
//!
//! A plain syntax tree drops comments that aren't syntactically bound to a
//! declaration, so a naive parse → mutate → print pipeline silently deletes
//! them. This model keeps every line of the original file instead: either
//! verbatim, or as a decoration list owned by the declaration it sits above.
//! Rendering a tree that was never mutated reproduces the input byte for
//! byte; mutation is limited to prepending new decoration lines.

/// A parsed source file: ordered top-level items plus the trailing-newline
/// flag needed for an exact round trip.
pub struct SourceFile {
    pub items: Vec<Item>,
    /// Whether the input ended with a newline.
    pub trailing_newline: bool,
}

/// One top-level item, in source order.
pub enum Item {
    /// Lines the annotator never touches: the package clause, imports,
    /// blank lines, and floating comments (comment runs separated from the
    /// next declaration by a blank line, or at end of file).
    Verbatim(Vec<String>),
    Decl(Decl),
}

/// A top-level declaration together with its leading comment run.
pub struct Decl {
    /// Comment lines immediately above the declaration (no blank line in
    /// between), in reading order. Only prepends are ever performed.
    pub decorations: Vec<String>,
    pub kind: DeclKind,
}

/// Closed set of declaration shapes the annotator distinguishes. The
/// single-spec vs multi-spec split matters because the two need stub
/// comments attached at different depths: above the whole declaration for
/// the former, above each individual spec for the latter.
pub enum DeclKind {
    /// `func` declaration. For methods, `name` is the method name, not the
    /// receiver.
    Function { name: String, lines: Vec<String> },
    /// An ungrouped `type`/`var`/`const` declaration, or a parenthesized
    /// group containing exactly one spec.
    SingleSpec { name: String, lines: Vec<String> },
    /// A parenthesized group with two or more specs.
    MultiSpec {
        open: String,
        specs: Vec<Spec>,
        /// Interior lines after the last spec (blank lines, stray comments).
        trailing: Vec<String>,
        close: String,
    },
}

/// One spec inside a multi-spec group, carrying its own decoration list.
pub struct Spec {
    /// Verbatim interior lines before the decoration run: blank lines and
    /// comments detached from this spec by a blank line.
    pub prefix: Vec<String>,
    pub decorations: Vec<String>,
    /// First declared name. For a value spec binding several names only the
    /// first is considered.
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Render the tree back to source text. Untouched nodes reproduce their
    /// original bytes exactly; inserted decorations appear as extra lines.
    pub fn render(&self) -> String {
        let mut out: Vec<&str> = Vec::new();
        for item in &self.items {
            match item {
                Item::Verbatim(lines) => out.extend(lines.iter().map(String::as_str)),
                Item::Decl(decl) => {
                    out.extend(decl.decorations.iter().map(String::as_str));
                    match &decl.kind {
                        DeclKind::Function { lines, .. } | DeclKind::SingleSpec { lines, .. } => {
                            out.extend(lines.iter().map(String::as_str));
                        }
                        DeclKind::MultiSpec {
                            open,
                            specs,
                            trailing,
                            close,
                        } => {
                            out.push(open.as_str());
                            for spec in specs {
                                out.extend(spec.prefix.iter().map(String::as_str));
                                out.extend(spec.decorations.iter().map(String::as_str));
                                out.extend(spec.lines.iter().map(String::as_str));
                            }
                            out.extend(trailing.iter().map(String::as_str));
                            out.push(close.as_str());
                        }
                    }
                }
            }
        }
        let mut rendered = out.join("\n");
        if self.trailing_newline {
            rendered.push('\n');
        }
        rendered
    }
}
