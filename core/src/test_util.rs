//! Place to put utilities that are only used by tests.

use crate::{Declaration, Definition, Parameter, ScanResult};
use std::io::{self, Write};

/// Returns a new temporary directory. Unlike the defaults in the `tempdir` and `tempfile` crates,
/// this directory is not world-accessible by default.
#[cfg(not(miri))]
pub fn tempdir() -> io::Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o700));
    }
    builder.tempdir()
}

/// Shorthand for a declaration with unnamed parameters.
pub fn decl(return_type: &str, name: &str, params: &[&str]) -> Declaration {
    Declaration::new(
        name,
        return_type,
        params.iter().copied().map(Parameter::new).collect(),
    )
}

/// Shorthand for a definition with a placeholder body.
pub fn def(return_type: &str, name: &str, params: &[&str]) -> Definition {
    Definition::new(decl(return_type, name, params), "{ }")
}

/// A scan covering both kinds of function, used by tests that only care about layout.
pub fn sample_scan() -> ScanResult {
    ScanResult {
        declarations: vec![
            decl("int", "add", &["int", "int"]),
            decl("void", "reset_all", &["void"]),
            decl("const char *", "name_of", &["unsigned"]),
        ],
        definitions: vec![
            def("void", "init", &["void"]),
            def("int", "clamp", &["int", "int", "int"]),
        ],
    }
}

/// A sink that accepts a limited number of bytes and then fails every write, for testing how
/// write errors propagate.
pub struct FailingSink {
    written: Vec<u8>,
    capacity: usize,
}

/// Builder-style API for configuring the failure point.
///
/// # Example
/// ```
/// use fakegen_core::test_util::FailingSink;
/// use std::io::Write;
/// let mut sink = FailingSink::new().capacity(2);
/// assert!(sink.write_all(b"abc").is_err());
/// assert_eq!(sink.written(), b"ab");
/// ```
impl FailingSink {
    /// Creates a sink that rejects the first write.
    pub fn new() -> FailingSink {
        FailingSink {
            written: Vec::new(),
            capacity: 0,
        }
    }

    /// Sets how many bytes are accepted before writes start failing.
    pub fn capacity(mut self, capacity: usize) -> FailingSink {
        self.capacity = capacity;
        self
    }

    /// Everything accepted so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Default for FailingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.written.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "sink is full"));
        }
        let len = buf.len().min(room);
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
