//! The scanned view of a C header: function prototypes and function definitions.
//!
//! Type names are stored exactly as they should be spelled in the generated C. Nothing here
//! interprets them beyond comparing against [VOID].

use serde::{Deserialize, Serialize};

/// Spelling of the `void` type. As a return type it selects a void fake; as the type of a
/// parameter it is the `(void)` placeholder for an empty parameter list.
pub const VOID: &str = "void";

/// A single function parameter.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Parameter {
    /// Type as written in C, e.g. `const char *`.
    pub type_name: String,
    /// Parameter identifier, if the prototype names it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Parameter {
    pub fn new<T: Into<String>>(type_name: T) -> Parameter {
        Parameter {
            type_name: type_name.into(),
            name: None,
        }
    }

    pub fn named<T: Into<String>, N: Into<String>>(type_name: T, name: N) -> Parameter {
        Parameter {
            type_name: type_name.into(),
            name: Some(name.into()),
        }
    }

    /// True for the pseudo-parameter that represents `(void)`. C has no real `void`-typed
    /// parameters, so this never hides an actual argument.
    pub fn is_void_placeholder(&self) -> bool {
        self.type_name == VOID
    }
}

/// A function prototype.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl Declaration {
    pub fn new<N: Into<String>, R: Into<String>>(
        name: N,
        return_type: R,
        params: Vec<Parameter>,
    ) -> Declaration {
        Declaration {
            name: name.into(),
            return_type: return_type.into(),
            params,
        }
    }

    /// Whether a fake for this function has to return something.
    pub fn returns_value(&self) -> bool {
        self.return_type != VOID
    }

    /// Iterates over the parameters that appear in the fake's argument list, i.e. all of them
    /// except a `(void)` placeholder.
    pub fn fake_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|param| !param.is_void_placeholder())
    }
}

/// A function that has a body in the scanned header (typically `static inline`).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Definition {
    pub decl: Declaration,
    /// Source text of the body. Carried along for diagnostics; generation never reads it.
    #[serde(default)]
    pub body: String,
}

impl Definition {
    pub fn new<B: Into<String>>(decl: Declaration, body: B) -> Definition {
        Definition {
            decl,
            body: body.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }
}

/// Everything a scan of one header found, in source order.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScanResult {
    /// Prototypes without a body.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Functions with a body.
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

impl ScanResult {
    /// Iterates over every function that will be faked, in output order.
    pub fn functions(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .chain(self.definitions.iter().map(|def| &def.decl))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_placeholder_is_filtered() {
        let decl = Declaration::new("init", VOID, vec![Parameter::new(VOID)]);
        assert!(!decl.returns_value());
        assert_eq!(decl.fake_params().count(), 0);

        let decl = Declaration::new(
            "puts",
            "int",
            vec![Parameter::named("const char *", "s")],
        );
        assert!(decl.returns_value());
        assert_eq!(decl.fake_params().count(), 1);
    }

    #[test]
    fn void_pointer_is_a_value() {
        let decl = Declaration::new("alloc", "void *", vec![Parameter::new("size_t")]);
        assert!(decl.returns_value());
        assert!(!Parameter::new("void *").is_void_placeholder());
    }

    /// Optional JSON fields fall back to empty values.
    #[test]
    fn deserialize_minimal_json() {
        let scan: ScanResult = serde_json::from_str(
            r#"{
                "declarations": [{ "name": "tick", "return_type": "void" }],
                "definitions": [{ "decl": {
                    "name": "add", "return_type": "int",
                    "params": [{ "type_name": "int", "name": "a" }, { "type_name": "int" }]
                } }]
            }"#,
        )
        .unwrap();
        assert_eq!(scan.declarations, [Declaration::new("tick", "void", vec![])]);
        assert_eq!(scan.definitions[0].body, "");
        assert_eq!(
            scan.definitions[0].decl.params,
            [Parameter::named("int", "a"), Parameter::new("int")]
        );
        let names: Vec<&str> = scan.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["tick", "add"]);

        let empty: ScanResult = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
