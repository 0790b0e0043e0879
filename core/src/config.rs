//! Configuration for a single `fakegen` run.
//!
//! Deserialized by the `fakegen` binary from layered TOML sources and command-line overrides.
//! Library users can build one directly and call [Config::strategy] and
//! [Config::generate_options].

use crate::{GenerateOptions, GuardedOptions, Strategy};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    /// The header to fake, or a JSON scan result if `scan_json` is set.
    pub input: PathBuf,

    /// Where to write the generated C. Standard output if absent.
    pub output: Option<PathBuf>,

    /// The header to `#include` from the generated file. Defaults to `input`; needs to be set
    /// when `input` is a JSON scan result.
    pub header: Option<PathBuf>,

    /// File name the include guard is derived from. See [Config::fake_name].
    pub fake_name: Option<String>,

    /// Write only the fakes, without includes or include guard.
    pub bare: bool,

    /// Wrap the generated header in an include guard. Ignored if `bare` is set.
    pub include_guard: bool,

    /// Fail on function names that would collide after bypassing definitions.
    pub strict_names: bool,

    /// Read `input` as a JSON scan result instead of scanning it with clang.
    pub scan_json: bool,

    /// Also write the scan result, as JSON, to this path.
    pub dump_scan: Option<PathBuf>,

    /// The clang executable used to scan headers.
    pub clang: String,

    /// Extra arguments passed to clang (include paths, defines).
    pub clang_args: Vec<String>,

    /// Fields that were not recognized.
    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

impl Config {
    /// A config for `input` with every option at its default.
    pub fn new<P: Into<PathBuf>>(input: P) -> Config {
        Config {
            input: input.into(),
            output: None,
            header: None,
            fake_name: None,
            bare: false,
            include_guard: true,
            strict_names: false,
            scan_json: false,
            dump_scan: None,
            clang: "clang".into(),
            clang_args: vec![],
            unknown: HashMap::new(),
        }
    }

    /// The header the generated file stands in for.
    pub fn header(&self) -> &Path {
        self.header.as_deref().unwrap_or(&self.input)
    }

    /// The file name the include guard is derived from: `fake_name` if set, else the output
    /// file's name, else `<header stem>_fake.h`.
    pub fn fake_name(&self) -> String {
        if let Some(name) = &self.fake_name {
            return name.clone();
        }
        if let Some(name) = self.output.as_deref().and_then(Path::file_name) {
            return name.to_string_lossy().into_owned();
        }
        let stem = self
            .header()
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        format!("{stem}_fake.h")
    }

    pub fn strategy(&self) -> Strategy {
        if self.bare {
            return Strategy::Bare;
        }
        Strategy::Guarded(
            GuardedOptions::new(self.fake_name(), self.header()).include_guard(self.include_guard),
        )
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            strict_names: self.strict_names,
        }
    }
}
