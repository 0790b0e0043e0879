//! Generates `fff.h` fakes for a C header. This is normally used through the `fakegen` binary,
//! but is exposed as a library crate as well.

pub mod cli;

use c_ast::ScanHeader;
use fakegen_core::config::Config;
use fakegen_core::{ScanResult, generate_with};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::info;

/// Scans the configured input and writes its fakes to the configured output.
pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    if config.input.as_os_str().is_empty() {
        return Err("no input given; pass the header to fake".into());
    }
    let scan = load_scan(config)?;
    if scan.is_empty() {
        info!("No functions found in {}", config.input.display());
    }

    if let Some(ref path) = config.dump_scan {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, &scan)?;
        out.flush()?;
        info!("Wrote scan result to {}", path.display());
    }

    let strategy = config.strategy();
    let options = config.generate_options();
    match config.output {
        Some(ref path) => {
            let mut out = BufWriter::new(File::create(path)?);
            generate_with(&scan, &mut out, &strategy, &options)?;
            out.flush()?;
            info!(
                "Wrote {} fakes ({} bypassed definitions) to {}",
                scan.functions().count(),
                scan.definitions.len(),
                path.display()
            );
        }
        None => {
            let mut out = io::stdout().lock();
            generate_with(&scan, &mut out, &strategy, &options)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Produces the scan result for `config.input`: parsed from JSON if `scan_json` is set,
/// otherwise by running clang over the header.
pub fn load_scan(config: &Config) -> Result<ScanResult, Box<dyn Error>> {
    if config.scan_json {
        let file = File::open(&config.input)?;
        let scan = serde_json::from_reader(BufReader::new(file))?;
        info!("Loaded scan result from {}", config.input.display());
        return Ok(scan);
    }
    let scan = ScanHeader::new(&config.input)
        .clang(config.clang.as_str())
        .args(config.clang_args.iter().cloned())
        .scan()?;
    Ok(scan)
}

#[cfg(all(not(miri), test))]
mod tests {
    use super::*;
    use fakegen_core::test_util::{sample_scan, tempdir};
    use fakegen_core::{GenerateError, Strategy, generate};
    use std::fs;
    use std::path::Path;

    fn write_scan(dir: &Path, scan: &ScanResult) -> std::path::PathBuf {
        let path = dir.join("sample_scan.json");
        fs::write(&path, serde_json::to_string(scan).unwrap()).unwrap();
        path
    }

    fn json_config(dir: &Path) -> Config {
        let mut config = Config::new(write_scan(dir, &sample_scan()));
        config.scan_json = true;
        config.header = Some("include/sample.h".into());
        config.output = Some(dir.join("sample_fake.h"));
        config
    }

    #[test]
    fn run_from_json() {
        let dir = tempdir().unwrap();
        let config = json_config(dir.path());
        run(&config).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        generate(&sample_scan(), &mut expected, &config.strategy()).unwrap();
        let written = fs::read(dir.path().join("sample_fake.h")).unwrap();
        assert_eq!(written, expected);
        let written = String::from_utf8(written).unwrap();
        assert!(written.starts_with("#ifndef SAMPLE_FAKE_H_\n"));
        assert!(written.contains("#include \"sample.h\"\n"));
    }

    #[test]
    fn run_bare() {
        let dir = tempdir().unwrap();
        let mut config = json_config(dir.path());
        config.bare = true;
        run(&config).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        generate(&sample_scan(), &mut expected, &Strategy::Bare).unwrap();
        assert_eq!(fs::read(dir.path().join("sample_fake.h")).unwrap(), expected);
    }

    #[test]
    fn dump_scan_round_trips() {
        let dir = tempdir().unwrap();
        let mut config = json_config(dir.path());
        config.dump_scan = Some(dir.path().join("dump.json"));
        run(&config).unwrap();

        let dumped: ScanResult =
            serde_json::from_slice(&fs::read(dir.path().join("dump.json")).unwrap()).unwrap();
        assert_eq!(dumped, sample_scan());
    }

    #[test]
    fn strict_names_fail_the_run() {
        let dir = tempdir().unwrap();
        let mut scan = sample_scan();
        scan.declarations.push(scan.declarations[0].clone());
        let mut config = json_config(dir.path());
        config.input = write_scan(dir.path(), &scan);

        run(&config).unwrap();

        config.strict_names = true;
        let error = run(&config).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<GenerateError>(),
            Some(GenerateError::NameCollision { .. })
        ));
    }

    #[test]
    fn missing_input() {
        let dir = tempdir().unwrap();
        assert!(run(&Config::new("")).is_err());

        let mut config = Config::new(dir.path().join("missing.json"));
        config.scan_json = true;
        assert!(run(&config).is_err());

        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        config.input = dir.path().join("broken.json");
        assert!(load_scan(&config).is_err());
    }
}
