//! Scans a C header with clang and reduces its AST to a [ScanResult].


use clang_ast::Node;
use fakegen_core::{Declaration, Definition, Parameter, ScanResult, VOID};
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Represents a (possibly) qualified type in the Clang AST, such as `int`, `const int`, or `const volatile int`.
/// Clang Docs on QualType: https://clang.llvm.org/doxygen/classclang_1_1QualType.html
#[derive(Deserialize, Debug)]
pub struct QualType {
    /// String representation of the type as written in the source code, i.e., it may include `typedefs` and `typeofs`.
    #[serde(rename = "qualType")]
    pub qual_type: String,
}

/// Represents a node in the Clang AST.
/// Only the nodes needed to describe functions are decoded; everything else is [Clang::Other].
#[derive(Deserialize, Debug)]
pub enum Clang {
    TranslationUnitDecl,
    /// Represents a function declaration in the Clang AST.
    /// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1FunctionDecl.html
    FunctionDecl {
        loc: Option<clang_ast::SourceLocation>,
        name: String,
        #[serde(rename = "type")]
        qtype: QualType,
        #[serde(rename = "storageClass")]
        storage_class: Option<String>,
        #[serde(default)]
        inline: bool,
        #[serde(default, rename = "isImplicit")]
        is_implicit: bool,
        #[serde(default)]
        variadic: bool,
    },
    /// Represents a parameter variable declaration in the Clang AST.
    /// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1ParmVarDecl.html
    ParmVarDecl {
        name: Option<String>,
        #[serde(rename = "type")]
        qtype: QualType,
    },
    /// Represents a compound statement in the Clang AST. A function has one of these as a child
    /// exactly when it is a definition.
    /// Clang Docs: https://clang.llvm.org/doxygen/classclang_1_1CompoundStmt.html
    CompoundStmt {
        range: Option<clang_ast::SourceRange>,
    },
    /// Every other node (not relevant to fake generation)
    Other { kind: Option<String> },
}

/// An error returned from [ScanHeader::scan].
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to run {clang}: {source}")]
    Spawn { clang: String, source: io::Error },
    #[error("clang exited with {status}:\n{stderr}")]
    Clang { status: ExitStatus, stderr: String },
    #[error("failed to decode clang's AST dump: {0}")]
    Ast(#[from] serde_json::Error),
}

/// Runs clang over one header and collects the functions it declares and defines.
pub struct ScanHeader {
    header: PathBuf,
    clang: String,
    args: Vec<String>,
}

impl ScanHeader {
    pub fn new(header: &Path) -> ScanHeader {
        ScanHeader {
            header: header.into(),
            clang: "clang".into(),
            args: vec![],
        }
    }

    /// Sets the clang executable (default: `clang` from `PATH`).
    pub fn clang<S: Into<String>>(mut self, clang: S) -> ScanHeader {
        self.clang = clang.into();
        self
    }

    /// Adds arguments passed to clang before the header, e.g. `-I` and `-D` flags.
    pub fn args<I: IntoIterator<Item = S>, S: Into<String>>(mut self, args: I) -> ScanHeader {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let source = std::fs::read_to_string(&self.header).map_err(|source| ScanError::Read {
            path: self.header.clone(),
            source,
        })?;

        let output = Command::new(&self.clang)
            .args(["-x", "c", "-Xclang", "-ast-dump=json", "-fsyntax-only"])
            .args(&self.args)
            .arg(&self.header)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ScanError::Spawn {
                clang: self.clang.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ScanError::Clang {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let ast: Node<Clang> = serde_json::from_slice(&output.stdout)?;
        let result = scan_result_from_ast(&ast, &self.header.to_string_lossy(), &source);
        info!(
            "Scanned {}: {} declarations, {} definitions",
            self.header.display(),
            result.declarations.len(),
            result.definitions.len()
        );
        Ok(result)
    }
}

/// Collects the functions of `header_file` from the AST of a translation unit.
///
/// Only top-level functions whose location is in `header_file` count, so prototypes pulled in
/// through `#include` are ignored. `source` is the text of `header_file`, used to copy out
/// function bodies. A function that is both declared and defined is reported only as a
/// definition, and repeated prototypes are reported once.
pub fn scan_result_from_ast(ast: &Node<Clang>, header_file: &str, source: &str) -> ScanResult {
    let mut result = ScanResult::default();
    let mut defined = HashSet::new();
    let mut declared = HashSet::new();

    for node in &ast.inner {
        let Clang::FunctionDecl {
            loc,
            name,
            qtype,
            storage_class,
            inline,
            is_implicit,
            variadic,
        } = &node.kind
        else {
            continue;
        };
        if *is_implicit || !is_in_file(loc.as_ref(), header_file) {
            continue;
        }
        if *variadic {
            warn!("Skipping variadic function {name}");
            continue;
        }
        let Some(signature) = split_function_type(&qtype.qual_type) else {
            warn!(
                "Skipping {name}: unsupported function type {:?}",
                qtype.qual_type
            );
            continue;
        };

        let mut params: Vec<Parameter> = node
            .inner
            .iter()
            .filter_map(|child| match &child.kind {
                Clang::ParmVarDecl { name, qtype } => Some(Parameter {
                    type_name: qtype.qual_type.clone(),
                    name: name.clone(),
                }),
                _ => None,
            })
            .collect();
        if params.is_empty() && signature.params == VOID {
            params.push(Parameter::new(VOID));
        }
        let decl = Declaration::new(name.as_str(), signature.return_type, params);

        let body = node.inner.iter().find_map(|child| match &child.kind {
            Clang::CompoundStmt { range } => Some(range),
            _ => None,
        });
        match body {
            Some(range) => {
                debug!(
                    "Found definition of {name} (storage class {:?}, inline: {inline})",
                    storage_class
                );
                if !defined.insert(name.clone()) {
                    warn!("Skipping second definition of {name}");
                    continue;
                }
                if declared.remove(name) {
                    result.declarations.retain(|d| d.name != *name);
                }
                let body = range
                    .as_ref()
                    .and_then(|range| source_at_range(range, source))
                    .unwrap_or_default();
                result.definitions.push(Definition::new(decl, body));
            }
            None => {
                debug!("Found declaration of {name}");
                if defined.contains(name) || !declared.insert(name.clone()) {
                    continue;
                }
                result.declarations.push(decl);
            }
        }
    }
    result
}

/// A function type spelling such as `const char *(int, int)`, split at its parameter list.
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionType<'a> {
    pub return_type: &'a str,
    /// The text between the parentheses, e.g. `int, int`.
    pub params: &'a str,
}

/// Splits a function's `qualType` into return type and parameter list.
///
/// Returns `None` for spellings this crate cannot fake, such as functions returning function
/// pointers (`int (*(int))(char)`).
pub fn split_function_type(qual_type: &str) -> Option<FunctionType<'_>> {
    let open = qual_type.find('(')?;
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in qual_type[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let params = qual_type[open + 1..close?].trim();
    let return_type = qual_type[..open].trim();
    if return_type.is_empty() || params.starts_with(['*', '^']) {
        return None;
    }
    Some(FunctionType {
        return_type,
        params,
    })
}

/// Whether `loc` lies in `file`. Declarations produced by macros count where the macro was
/// expanded.
fn is_in_file(loc: Option<&clang_ast::SourceLocation>, file: &str) -> bool {
    loc.and_then(|loc| loc.expansion_loc.as_ref().or(loc.spelling_loc.as_ref()))
        .is_some_and(|loc| *loc.file == *file)
}

/// Copies the text covered by `range` out of `source`.
fn source_at_range(range: &clang_ast::SourceRange, source: &str) -> Option<String> {
    let begin = range.begin.spelling_loc.as_ref()?;
    let end = range.end.spelling_loc.as_ref()?;
    if begin.file != end.file {
        return None;
    }
    source
        .get(begin.offset..end.offset + end.tok_len)
        .map(str::to_owned)
}
