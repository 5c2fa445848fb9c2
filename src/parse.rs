//! Go source → comment-preserving tree.
//!
//! Line-oriented scan that recognizes top-level `func`, `type`, `var` and
//! `const` declarations at column zero and consumes each one by delimiter
//! depth. A small character scanner skips string literals, rune literals
//! and comments so delimiters inside them never count, and carries
//! block-comment and raw-string state across lines. A comment run directly
//! above a declaration becomes its decoration list; a run followed by a
//! blank line (or end of file) stays floating and is kept verbatim.

use crate::tree::{Decl, DeclKind, Item, SourceFile, Spec};
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(func|type|var|const)\b").unwrap());
static RE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:type|var|const)\s*\(").unwrap());
/// Function name, skipping an optional method receiver.
static RE_FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^func\s+(?:\([^)]*\)\s*)?([\p{L}_][\p{L}\p{N}_]*)").unwrap());
static RE_DECL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:type|var|const)\s+([\p{L}_][\p{L}\p{N}_]*)").unwrap());
/// Name of the single spec in a one-line group like `var (A = 1)`.
static RE_GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:type|var|const)\s*\(\s*([\p{L}_][\p{L}\p{N}_]*)").unwrap());
static RE_SPEC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\p{L}_][\p{L}\p{N}_]*)").unwrap());

/// Lexical state carried across lines by [`depth_delta`].
#[derive(Default)]
struct ScanState {
    in_block_comment: bool,
    in_raw_string: bool,
}

/// Net `{`/`(`/`[` vs `}`/`)`/`]` depth change for one line, ignoring
/// delimiters inside string literals, rune literals and comments.
fn depth_delta(line: &str, state: &mut ScanState) -> i32 {
    let bytes = line.as_bytes();
    let mut delta = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        if state.in_block_comment {
            if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                state.in_block_comment = false;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        if state.in_raw_string {
            if bytes[i] == b'`' {
                state.in_raw_string = false;
            }
            i += 1;
            continue;
        }
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => break,
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                state.in_block_comment = true;
                i += 2;
            }
            b'`' => {
                state.in_raw_string = true;
                i += 1;
            }
            b'"' => {
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'\'' => {
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'\'' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'{' | b'(' | b'[' => {
                delta += 1;
                i += 1;
            }
            b'}' | b')' | b']' => {
                delta -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    delta
}

fn is_comment_start(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("//") || t.starts_with("/*")
}

/// Collect a run of consecutive full-line comments starting at `i`.
/// Multi-line block comments are consumed through their closing `*/`.
/// Returns the run and the index of the first line after it.
fn collect_comment_run(lines: &[String], mut i: usize) -> (Vec<String>, usize) {
    let mut run = Vec::new();
    while i < lines.len() && is_comment_start(&lines[i]) {
        let mut state = ScanState::default();
        let _ = depth_delta(&lines[i], &mut state);
        run.push(lines[i].clone());
        i += 1;
        while state.in_block_comment && i < lines.len() {
            let _ = depth_delta(&lines[i], &mut state);
            run.push(lines[i].clone());
            i += 1;
        }
    }
    (run, i)
}

fn flush(items: &mut Vec<Item>, verbatim: &mut Vec<String>) {
    if !verbatim.is_empty() {
        items.push(Item::Verbatim(std::mem::take(verbatim)));
    }
}

/// Parse Go source text into a comment-preserving tree. Pure transform;
/// fails on unbalanced delimiters or a declaration whose bound name cannot
/// be determined.
pub fn parse(source: &str) -> Result<SourceFile> {
    let trailing_newline = source.ends_with('\n');
    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    if trailing_newline {
        // split leaves an empty piece after the final newline
        lines.pop();
    }

    let mut items = Vec::new();
    let mut verbatim: Vec<String> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if is_comment_start(&lines[i]) {
            let (run, next) = collect_comment_run(&lines, i);
            if next < lines.len() && RE_DECL.is_match(&lines[next]) {
                flush(&mut items, &mut verbatim);
                let (item, after) = parse_decl(&lines, next, run)?;
                items.push(item);
                i = after;
            } else {
                // floating comment — no declaration directly below it
                verbatim.extend(run);
                i = next;
            }
            continue;
        }
        if RE_DECL.is_match(&lines[i]) {
            flush(&mut items, &mut verbatim);
            let (item, after) = parse_decl(&lines, i, Vec::new())?;
            items.push(item);
            i = after;
            continue;
        }
        verbatim.push(lines[i].clone());
        i += 1;
    }
    flush(&mut items, &mut verbatim);
    Ok(SourceFile {
        items,
        trailing_newline,
    })
}

/// Consume one whole declaration starting at `i` and classify it.
/// Returns the finished item and the index of the first line after it.
fn parse_decl(lines: &[String], i: usize, decorations: Vec<String>) -> Result<(Item, usize)> {
    let mut state = ScanState::default();
    let mut depth = depth_delta(&lines[i], &mut state);
    let mut body = vec![lines[i].clone()];
    let mut j = i + 1;
    while (depth > 0 || state.in_block_comment || state.in_raw_string) && j < lines.len() {
        depth += depth_delta(&lines[j], &mut state);
        body.push(lines[j].clone());
        j += 1;
    }
    if depth != 0 || state.in_block_comment || state.in_raw_string {
        bail!("unbalanced declaration starting at line {}", i + 1);
    }

    let keyword = RE_DECL.captures(&body[0]).unwrap()[1].to_string();
    if keyword == "func" {
        let Some(caps) = RE_FUNC_NAME.captures(&body[0]) else {
            bail!("cannot determine function name at line {}", i + 1);
        };
        let name = caps[1].to_string();
        return Ok((
            Item::Decl(Decl {
                decorations,
                kind: DeclKind::Function { name, lines: body },
            }),
            j,
        ));
    }
    if RE_GROUP.is_match(&body[0]) {
        return Ok((group_decl(decorations, body, i)?, j));
    }
    let Some(caps) = RE_DECL_NAME.captures(&body[0]) else {
        bail!("cannot determine declared name at line {}", i + 1);
    };
    let name = caps[1].to_string();
    Ok((
        Item::Decl(Decl {
            decorations,
            kind: DeclKind::SingleSpec { name, lines: body },
        }),
        j,
    ))
}

/// Classify a parenthesized `type`/`var`/`const` group. A group with one
/// spec is anchored at the group itself; a group with several specs gets a
/// per-spec breakdown so each can carry its own decorations.
fn group_decl(decorations: Vec<String>, body: Vec<String>, start: usize) -> Result<Item> {
    if body.len() == 1 {
        if let Some(caps) = RE_GROUP_NAME.captures(&body[0]) {
            let name = caps[1].to_string();
            return Ok(Item::Decl(Decl {
                decorations,
                kind: DeclKind::SingleSpec { name, lines: body },
            }));
        }
        // empty group like `var ()` — nothing to annotate
        let mut all = decorations;
        all.extend(body);
        return Ok(Item::Verbatim(all));
    }

    let open = body[0].clone();
    let close = body[body.len() - 1].clone();
    let (specs, trailing) = split_specs(&body[1..body.len() - 1], start)?;
    match specs.len() {
        0 => {
            let mut all = decorations;
            all.extend(body);
            Ok(Item::Verbatim(all))
        }
        1 => Ok(Item::Decl(Decl {
            decorations,
            kind: DeclKind::SingleSpec {
                name: specs.into_iter().next().unwrap().name,
                lines: body,
            },
        })),
        _ => Ok(Item::Decl(Decl {
            decorations,
            kind: DeclKind::MultiSpec {
                open,
                specs,
                trailing,
                close,
            },
        })),
    }
}

/// Split group interior lines into specs. Comment runs adjacent to a spec
/// become its decorations; runs detached by a blank line land in the next
/// spec's verbatim prefix (or in the group's trailing lines).
fn split_specs(interior: &[String], start: usize) -> Result<(Vec<Spec>, Vec<String>)> {
    let mut specs = Vec::new();
    let mut prefix: Vec<String> = Vec::new();
    let mut decorations: Vec<String> = Vec::new();
    let mut i = 0;
    while i < interior.len() {
        if interior[i].trim().is_empty() {
            prefix.append(&mut decorations);
            prefix.push(interior[i].clone());
            i += 1;
            continue;
        }
        if is_comment_start(&interior[i]) {
            let (run, next) = collect_comment_run(interior, i);
            decorations.extend(run);
            i = next;
            continue;
        }
        let Some(caps) = RE_SPEC_NAME.captures(&interior[i]) else {
            bail!(
                "cannot determine spec name in group starting at line {}",
                start + 1
            );
        };
        let name = caps[1].to_string();
        let mut state = ScanState::default();
        let mut depth = depth_delta(&interior[i], &mut state);
        let mut body = vec![interior[i].clone()];
        i += 1;
        while (depth > 0 || state.in_block_comment || state.in_raw_string) && i < interior.len() {
            depth += depth_delta(&interior[i], &mut state);
            body.push(interior[i].clone());
            i += 1;
        }
        specs.push(Spec {
            prefix: std::mem::take(&mut prefix),
            decorations: std::mem::take(&mut decorations),
            name,
            lines: body,
        });
    }
    let mut trailing = prefix;
    trailing.append(&mut decorations);
    Ok((specs, trailing))
}
