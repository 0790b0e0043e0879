use super::*;
use crate::test_util::{FailingSink, decl, def, sample_scan};
use std::io::ErrorKind;

fn render(scan: &ScanResult, strategy: &Strategy) -> String {
    let mut out: Vec<u8> = Vec::new();
    generate(scan, &mut out, strategy).unwrap();
    String::from_utf8(out).unwrap()
}

fn guarded(fake_name: &str, header: &str) -> Strategy {
    Strategy::Guarded(GuardedOptions::new(fake_name, header))
}

#[test]
fn bare_layout() {
    assert_eq!(
        render(&sample_scan(), &Strategy::Bare),
        "FAKE_VALUE_FUNC(int, add, int, int);\n\
         FAKE_VOID_FUNC(reset_all);\n\
         FAKE_VALUE_FUNC(const char *, name_of, unsigned);\n\
         #define init init_fff\n\
         #define init_fake init_fff_fake\n\
         #define init_reset init_fff_reset\n\
         FAKE_VOID_FUNC(init);\n\
         #define clamp clamp_fff\n\
         #define clamp_fake clamp_fff_fake\n\
         #define clamp_reset clamp_fff_reset\n\
         FAKE_VALUE_FUNC(int, clamp, int, int, int);\n"
    );
}

#[test]
fn guarded_layout() {
    let scan = ScanResult {
        declarations: vec![decl("int", "add", &["int", "int"])],
        definitions: vec![def("void", "init", &["void"])],
    };
    assert_eq!(
        render(&scan, &guarded("math_fake.h", "include/math.h")),
        "#ifndef MATH_FAKE_H_\n\
         #define MATH_FAKE_H_\n\
         \n\
         #include \"fff.h\"\n\
         #include \"math.h\"\n\
         \n\
         FAKE_VALUE_FUNC(int, add, int, int);\n\
         #define init init_fff\n\
         #define init_fake init_fff_fake\n\
         #define init_reset init_fff_reset\n\
         FAKE_VOID_FUNC(init);\n\
         \n\
         #endif /* MATH_FAKE_H_ */\n"
    );
}

#[test]
fn single_declaration() {
    let scan = ScanResult {
        declarations: vec![decl("int", "add", &["int", "int"])],
        definitions: vec![],
    };
    let out = render(&scan, &guarded("add_fake.h", "add.h"));
    let fakes: Vec<&str> = out.lines().filter(|l| l.starts_with("FAKE_")).collect();
    assert_eq!(fakes, ["FAKE_VALUE_FUNC(int, add, int, int);"]);
}

#[test]
fn single_definition() {
    let scan = ScanResult {
        declarations: vec![],
        definitions: vec![def("void", "init", &["void"])],
    };
    assert_eq!(
        render(&scan, &Strategy::Bare),
        "#define init init_fff\n\
         #define init_fake init_fff_fake\n\
         #define init_reset init_fff_reset\n\
         FAKE_VOID_FUNC(init);\n"
    );
}

/// Bare output is the guarded output minus its wrapper lines.
#[test]
fn bare_is_guarded_without_wrapper() {
    let scan = sample_scan();
    let strategy = guarded("sample_fake.h", "sample.h");
    let Strategy::Guarded(options) = &strategy else {
        unreachable!()
    };
    let guard = options.guard_name();
    let wrapper = [
        format!("#ifndef {guard}"),
        format!("#define {guard}"),
        "#include \"fff.h\"".to_owned(),
        "#include \"sample.h\"".to_owned(),
        format!("#endif /* {guard} */"),
        String::new(),
    ];
    let unwrapped: String = render(&scan, &strategy)
        .lines()
        .filter(|line| !wrapper.iter().any(|w| w == line))
        .map(|line| format!("{line}\n"))
        .collect();
    assert_eq!(unwrapped, render(&scan, &Strategy::Bare));
}

#[test]
fn include_guard_disabled() {
    let scan = sample_scan();
    let options = GuardedOptions::new("sample_fake.h", "src/sample.h").include_guard(false);
    let out = render(&scan, &Strategy::Guarded(options));
    assert!(!out.contains("#ifndef"));
    assert!(!out.contains("#endif"));
    assert!(!out.contains("SAMPLE_FAKE_H_"));
    assert_eq!(
        out,
        format!(
            "#include \"fff.h\"\n#include \"sample.h\"\n\n{}",
            render(&scan, &Strategy::Bare)
        )
    );
}

#[test]
fn include_guard_enabled_by_default() {
    let options = GuardedOptions::new("sample_fake.h", "sample.h");
    assert!(options.include_guard);
    let out = render(&sample_scan(), &Strategy::Guarded(options));
    assert!(out.starts_with("#ifndef SAMPLE_FAKE_H_\n#define SAMPLE_FAKE_H_\n\n"));
    assert!(out.ends_with("\n\n#endif /* SAMPLE_FAKE_H_ */\n"));
}

#[test]
fn empty_scan() {
    assert_eq!(render(&ScanResult::default(), &Strategy::Bare), "");
    assert_eq!(
        render(&ScanResult::default(), &guarded("3d-model.h", "model.h")),
        "#ifndef _3DMODEL_H_\n#define _3DMODEL_H_\n\n\
         #include \"fff.h\"\n#include \"model.h\"\n\n\
         \n#endif /* _3DMODEL_H_ */\n"
    );
}

#[test]
fn generation_is_deterministic() {
    let scan = sample_scan();
    let strategy = guarded("sample_fake.h", "sample.h");
    assert_eq!(render(&scan, &strategy), render(&scan, &strategy));
}

#[test]
fn sink_failure_propagates() {
    let mut sink = FailingSink::new().capacity(40);
    let result = generate(&sample_scan(), &mut sink, &Strategy::Bare);
    match result {
        Err(GenerateError::Io(e)) => assert_eq!(e.kind(), ErrorKind::StorageFull),
        other => panic!("unexpected result {other:?}"),
    }
    // No rollback: the accepted prefix stays in the sink.
    assert_eq!(sink.written(), &render(&sample_scan(), &Strategy::Bare).as_bytes()[..40]);
}

/// A malformed function aborts generation after everything before it has been written.
#[test]
fn malformed_signature_aborts() {
    let scan = ScanResult {
        declarations: vec![decl("int", "ok", &[]), decl("", "broken", &[])],
        definitions: vec![def("void", "init", &[])],
    };
    let mut out: Vec<u8> = Vec::new();
    let result = generate(&scan, &mut out, &Strategy::Bare);
    assert!(matches!(
        result,
        Err(GenerateError::MalformedSignature { ref function, .. }) if function == "broken"
    ));
    assert_eq!(out, b"FAKE_VALUE_FUNC(int, ok);\n");
}

#[test]
fn header_include_uses_base_name() {
    let options = GuardedOptions::new("x_fake.h", "/abs/path/to/x.h");
    assert_eq!(options.header_file_name(), "x.h");
    let options = GuardedOptions::new("x_fake.h", "x.h");
    assert_eq!(options.header_file_name(), "x.h");
}

#[test]
fn duplicate_names_allowed_by_default() {
    let scan = ScanResult {
        declarations: vec![decl("void", "tick", &[]), decl("int", "init_fff", &[])],
        definitions: vec![def("void", "tick", &[]), def("void", "init", &[])],
    };
    let mut out: Vec<u8> = Vec::new();
    generate(&scan, &mut out, &Strategy::Bare).unwrap();
}

#[test]
fn strict_names() {
    let strict = GenerateOptions { strict_names: true };
    let check =
        |scan: ScanResult| generate_with(&scan, &mut Vec::<u8>::new(), &Strategy::Bare, &strict);

    assert!(check(sample_scan()).is_ok());

    let duplicate = ScanResult {
        declarations: vec![decl("void", "tick", &[])],
        definitions: vec![def("void", "tick", &[])],
    };
    assert!(matches!(
        check(duplicate),
        Err(GenerateError::NameCollision { ref name, .. }) if name == "tick"
    ));

    let suffixed = ScanResult {
        declarations: vec![],
        definitions: vec![def("void", "init_fff", &[])],
    };
    assert!(matches!(
        check(suffixed),
        Err(GenerateError::NameCollision { ref name, .. }) if name == "init_fff"
    ));

    let renamed_clash = ScanResult {
        declarations: vec![decl("int", "init_fff", &[])],
        definitions: vec![def("void", "init", &[])],
    };
    assert!(matches!(
        check(renamed_clash),
        Err(GenerateError::NameCollision { ref name, .. }) if name == "init_fff"
    ));
}

/// Strict checking runs before anything is written.
#[test]
fn strict_names_write_nothing_on_collision() {
    let scan = ScanResult {
        declarations: vec![decl("void", "tick", &[]), decl("void", "tick", &[])],
        definitions: vec![],
    };
    let mut out: Vec<u8> = Vec::new();
    let strategy = guarded("tick_fake.h", "tick.h");
    let result = generate_with(
        &scan,
        &mut out,
        &strategy,
        &GenerateOptions { strict_names: true },
    );
    assert!(result.is_err());
    assert!(out.is_empty());
}
