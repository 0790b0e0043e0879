//! Include guard naming for generated fake headers.

use std::path::Path;

/// Appended to every derived guard name.
pub const GUARD_SUFFIX: &str = "_H_";

/// Derives the include guard macro for a generated header called `fake_name`.
///
/// The base name is stripped of its extension and uppercased. A leading digit gets a `_` in
/// front of it, then everything that is not `A-Z`, `0-9` or `_` is dropped and [GUARD_SUFFIX] is
/// appended. The digit check happens before the strip, so `-3x.h` becomes `3X_H_`.
///
/// Distinct names can normalize to the same guard (`my-file.h` and `myfile.h`); this is not
/// detected.
pub fn guard_name(fake_name: &str) -> String {
    let upper = fake_name.to_uppercase();
    let stem = Path::new(&upper)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut guard = String::with_capacity(stem.len() + GUARD_SUFFIX.len() + 1);
    if stem.starts_with(|c: char| c.is_ascii_digit()) {
        guard.push('_');
    }
    guard.push_str(&stem);
    guard.retain(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    guard.push_str(GUARD_SUFFIX);
    guard
}
