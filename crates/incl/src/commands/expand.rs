//! `incl` expand command implementation.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use incl_config::{CliSettings, Config};
use incl_engine::{ExpandReport, Expander, ExpanderConfig};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for expanding a file.
#[derive(Args)]
pub(crate) struct ExpandArgs {
    /// File to expand (default: stdin, also `-`).
    input: Option<PathBuf>,

    /// Write the expanded text to this file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory include names are resolved against (overrides config).
    #[arg(short = 'C', long, env = "INCL_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover incl.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail if a well-formed include names a file that cannot be opened.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output (info logs and an inclusion summary).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ExpandArgs {
    /// Execute the expand command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a stream cannot be opened or
    /// fails mid-way, or `--strict` is set and an include was left unresolved.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_dir: self.base_dir,
            strict: self.strict.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let settings = &config.expand_resolved;

        if !settings.base_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Base directory not found: {}",
                settings.base_dir.display()
            )));
        }

        tracing::info!(
            base_dir = %settings.base_dir.display(),
            config = ?config.config_path,
            "Expanding includes"
        );

        let expander =
            Expander::with_config(ExpanderConfig::new().with_base_dir(&settings.base_dir));
        let source = open_input(self.input.as_deref())?;
        let mut destination = open_output(self.output.as_deref())?;
        let report = expander.expand(source, &mut destination)?;
        destination.flush()?;

        if self.verbose || settings.strict {
            print_report(&output, &report, self.verbose);
        }

        if settings.strict && !report.is_complete() {
            return Err(CliError::Validation(format!(
                "{} include(s) could not be opened",
                report.unresolved.len()
            )));
        }

        Ok(())
    }
}

fn print_report(output: &Output, report: &ExpandReport, verbose: bool) {
    if verbose {
        output.info(&format!("Included {} file(s)", report.included.len()));
    }
    for path in &report.unresolved {
        output.warning(&format!("Unresolved include: {}", path.display()));
    }
}

/// Open the input file, or stdin when absent or `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).map_err(|source| CliError::File {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Create the output file, or use stdout when absent.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::File {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Project {
        dir: tempfile::TempDir,
    }

    impl Project {
        fn new(config: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("parts")).unwrap();
            std::fs::write(dir.path().join("incl.toml"), config).unwrap();
            Self { dir }
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        fn args(&self, input: &Path) -> ExpandArgs {
            ExpandArgs {
                input: Some(input.to_path_buf()),
                output: Some(self.dir.path().join("out.txt")),
                base_dir: None,
                config: Some(self.dir.path().join("incl.toml")),
                strict: false,
                verbose: false,
            }
        }

        fn output(&self) -> String {
            std::fs::read_to_string(self.dir.path().join("out.txt")).unwrap()
        }
    }

    #[test]
    fn test_expands_file_using_config_base_dir() {
        let project = Project::new("[expand]\nbase_dir = \"parts\"\n");
        project.write("parts/header.txt", "HEADER");
        let input = project.write("page.txt", "@include \"header.txt\"\nbody @@ text\n");

        project.args(&input).execute().unwrap();

        assert_eq!(project.output(), "HEADER\nbody @@ text\n");
    }

    #[test]
    fn test_base_dir_flag_overrides_config() {
        let project = Project::new("[expand]\nbase_dir = \"parts\"\n");
        project.write("top.txt", "TOP");
        let input = project.write("page.txt", "[@include <top.txt>]");

        let mut args = project.args(&input);
        args.base_dir = Some(project.dir.path().to_path_buf());
        args.execute().unwrap();

        assert_eq!(project.output(), "[TOP]");
    }

    #[test]
    fn test_unresolved_include_is_written_through() {
        let project = Project::new("");
        let input = project.write("page.txt", "a @include \"missing.txt\" b");

        project.args(&input).execute().unwrap();

        assert_eq!(project.output(), "a @include \"missing.txt\" b");
    }

    #[test]
    fn test_strict_fails_after_writing_output() {
        let project = Project::new("[expand]\nstrict = true\n");
        let input = project.write("page.txt", "a @include \"missing.txt\" b");

        let err = project.args(&input).execute().unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("1 include(s)"));
        assert_eq!(project.output(), "a @include \"missing.txt\" b");
    }

    #[test]
    fn test_strict_flag_enables_strict_mode() {
        let project = Project::new("");
        let input = project.write("page.txt", "@include \"missing.txt\"");

        let mut args = project.args(&input);
        args.strict = true;

        assert!(matches!(args.execute(), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_missing_base_dir_is_rejected() {
        let project = Project::new("[expand]\nbase_dir = \"nowhere\"\n");
        let input = project.write("page.txt", "text");

        let err = project.args(&input).execute().unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_missing_input_names_the_file() {
        let project = Project::new("");
        let input = project.dir.path().join("absent.txt");

        let err = project.args(&input).execute().unwrap_err();

        assert!(matches!(err, CliError::File { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }
}
