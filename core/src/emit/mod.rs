//! Text for the individual constructs of a generated fake header.
//!
//! Every function here returns owned text and has no side effects other than debug logging.
//! The macro names and punctuation must match what `fff.h` expects, so they are kept as
//! constants shared by both generation strategies.


use crate::{Declaration, Definition, GenerateError};
use tracing::debug;

/// `fff.h` macro for a function that returns nothing.
pub const FAKE_VOID_FUNC: &str = "FAKE_VOID_FUNC";
/// `fff.h` macro for a function that returns a value.
pub const FAKE_VALUE_FUNC: &str = "FAKE_VALUE_FUNC";

/// Suffix given to the original symbol of a defined function.
pub const BYPASS_SUFFIX: &str = "_fff";
/// Suffix of the call-tracking struct `fff.h` generates for a fake.
pub const FAKE_SUFFIX: &str = "_fake";
/// Suffix of the reset function `fff.h` generates for a fake.
pub const RESET_SUFFIX: &str = "_reset";

const ARG_SEPARATOR: &str = ", ";
const FAKE_TERMINATOR: &str = ");\n";

/// Returns the `FAKE_VOID_FUNC`/`FAKE_VALUE_FUNC` invocation for `decl`, terminated by `;\n`.
///
/// A `(void)` placeholder parameter is left out of the argument list. Fails if the name, the
/// return type or a parameter type is empty.
pub fn emit_fake(decl: &Declaration) -> Result<String, GenerateError> {
    check_signature(decl)?;
    let mut fake = if decl.returns_value() {
        format!("{FAKE_VALUE_FUNC}({}, {}", decl.return_type, decl.name)
    } else {
        format!("{FAKE_VOID_FUNC}({}", decl.name)
    };
    for param in decl.fake_params() {
        fake.push_str(ARG_SEPARATOR);
        fake.push_str(&param.type_name);
    }
    debug!("Creating fake {fake});");
    fake.push_str(FAKE_TERMINATOR);
    Ok(fake)
}

/// Returns the three `#define` lines that move a defined function, and the fake accessors
/// `fff.h` would generate for it, onto the [BYPASS_SUFFIX] names.
///
/// Nothing checks whether the renamed symbols clash with other names; see
/// [crate::GenerateOptions::strict_names].
pub fn emit_bypass(def: &Definition) -> Result<String, GenerateError> {
    let name = def.name();
    if name.trim().is_empty() {
        return Err(GenerateError::malformed(name, "function name is empty"));
    }
    let renamed = bypass_name(name);
    Ok(format!(
        "#define {name} {renamed}\n\
         #define {name}{FAKE_SUFFIX} {renamed}{FAKE_SUFFIX}\n\
         #define {name}{RESET_SUFFIX} {renamed}{RESET_SUFFIX}\n"
    ))
}

/// The name the original definition of `name` is compiled under.
pub fn bypass_name(name: &str) -> String {
    format!("{name}{BYPASS_SUFFIX}")
}

fn check_signature(decl: &Declaration) -> Result<(), GenerateError> {
    if decl.name.trim().is_empty() {
        return Err(GenerateError::malformed(&decl.name, "function name is empty"));
    }
    if decl.return_type.trim().is_empty() {
        return Err(GenerateError::malformed(&decl.name, "return type is empty"));
    }
    if let Some(index) = decl
        .params
        .iter()
        .position(|param| param.type_name.trim().is_empty())
    {
        return Err(GenerateError::malformed(
            &decl.name,
            format!("type of parameter {index} is empty"),
        ));
    }
    Ok(())
}
