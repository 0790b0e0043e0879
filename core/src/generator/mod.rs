//! The two ways of laying out a generated fake file.
//!
//! Both strategies share one body: a fake per declaration, then a bypass block and a fake per
//! definition. [Strategy::Guarded] additionally wraps the body in an include guard and includes
//! `fff.h` and the original header.

#[cfg(all(not(miri), test))]
mod tests;

use crate::emit::{BYPASS_SUFFIX, bypass_name, emit_bypass, emit_fake};
use crate::guard::guard_name;
use crate::{GenerateError, ScanResult};
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Header that defines the `FAKE_*_FUNC` macros.
pub const FRAMEWORK_HEADER: &str = "fff.h";

/// How the generated text is laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Just the fakes, for pasting into a file that already includes `fff.h` and the header.
    Bare,
    /// A self-contained header.
    Guarded(GuardedOptions),
}

/// Settings for [Strategy::Guarded].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardedOptions {
    /// Name of the file being generated. Only used to derive the include guard.
    pub fake_name: String,
    /// The header being faked. Included by base name only, so the generated file must be
    /// compiled with that header's directory on the include path.
    pub original_header: PathBuf,
    /// Whether to emit the `#ifndef`/`#define`/`#endif` lines. The includes are written either
    /// way.
    pub include_guard: bool,
}

impl GuardedOptions {
    /// Creates options with the include guard enabled.
    pub fn new<N: Into<String>, H: Into<PathBuf>>(fake_name: N, original_header: H) -> Self {
        GuardedOptions {
            fake_name: fake_name.into(),
            original_header: original_header.into(),
            include_guard: true,
        }
    }

    /// Sets [GuardedOptions::include_guard].
    pub fn include_guard(mut self, include_guard: bool) -> Self {
        self.include_guard = include_guard;
        self
    }

    /// The guard macro derived from [GuardedOptions::fake_name].
    pub fn guard_name(&self) -> String {
        guard_name(&self.fake_name)
    }

    /// The file name used in the `#include` of the original header.
    pub fn header_file_name(&self) -> Cow<'_, str> {
        match self.original_header.file_name() {
            Some(name) => name.to_string_lossy(),
            None => self.original_header.to_string_lossy(),
        }
    }
}

/// Checks that are off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Reject scans whose function names would collide once definitions are bypassed.
    pub strict_names: bool,
}

/// Writes the fakes for `scan` into `sink`, laid out according to `strategy`.
///
/// Writes go straight to `sink`; if one fails, generation stops and whatever was already written
/// stays there.
pub fn generate<W: Write + ?Sized>(
    scan: &ScanResult,
    sink: &mut W,
    strategy: &Strategy,
) -> Result<(), GenerateError> {
    generate_with(scan, sink, strategy, &GenerateOptions::default())
}

/// Like [generate], with extra checks enabled through `options`.
pub fn generate_with<W: Write + ?Sized>(
    scan: &ScanResult,
    sink: &mut W,
    strategy: &Strategy,
    options: &GenerateOptions,
) -> Result<(), GenerateError> {
    if options.strict_names {
        check_names(scan)?;
    }
    match strategy {
        Strategy::Bare => write_body(scan, sink),
        Strategy::Guarded(guarded) => {
            let guard = guard_name(&guarded.fake_name);
            debug!("Generated include guard macro: '{guard}'.");
            if guarded.include_guard {
                sink.write_all(guard_preamble(&guard).as_bytes())?;
            }
            sink.write_all(include_block(&guarded.header_file_name()).as_bytes())?;
            write_body(scan, sink)?;
            if guarded.include_guard {
                sink.write_all(guard_postamble(&guard).as_bytes())?;
            }
            Ok(())
        }
    }
}

/// The part shared by both strategies.
fn write_body<W: Write + ?Sized>(scan: &ScanResult, sink: &mut W) -> Result<(), GenerateError> {
    for decl in &scan.declarations {
        sink.write_all(emit_fake(decl)?.as_bytes())?;
    }
    for def in &scan.definitions {
        sink.write_all(emit_bypass(def)?.as_bytes())?;
        sink.write_all(emit_fake(&def.decl)?.as_bytes())?;
    }
    Ok(())
}

/// `#ifndef`/`#define` followed by a blank line.
pub fn guard_preamble(guard: &str) -> String {
    format!("#ifndef {guard}\n#define {guard}\n\n")
}

/// The two includes every guarded fake needs, followed by a blank line.
pub fn include_block(header_file_name: &str) -> String {
    format!("#include \"{FRAMEWORK_HEADER}\"\n#include \"{header_file_name}\"\n\n")
}

/// A blank line, then the `#endif` closing [guard_preamble].
pub fn guard_postamble(guard: &str) -> String {
    format!("\n#endif /* {guard} */\n")
}

fn check_names(scan: &ScanResult) -> Result<(), GenerateError> {
    let mut seen = HashSet::new();
    for decl in scan.functions() {
        if !seen.insert(decl.name.as_str()) {
            return Err(GenerateError::NameCollision {
                name: decl.name.clone(),
                reason: "function is faked more than once".into(),
            });
        }
    }
    for def in &scan.definitions {
        let name = def.name();
        if name.ends_with(BYPASS_SUFFIX) {
            return Err(GenerateError::NameCollision {
                name: name.to_owned(),
                reason: format!("definition already ends with `{BYPASS_SUFFIX}`"),
            });
        }
        let renamed = bypass_name(name);
        if seen.contains(renamed.as_str()) {
            return Err(GenerateError::NameCollision {
                name: renamed,
                reason: format!("clashes with the bypass of `{name}`"),
            });
        }
    }
    Ok(())
}
