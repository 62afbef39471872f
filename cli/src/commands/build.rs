use std::process::ExitCode;
use std::time::{Duration, Instant};

use colored::*;
use isoseed_common::config::Config;
use isoseed_core::pipeline::toolchain::{SystemToolchain, Toolchain};
use isoseed_core::pipeline::{BuildReport, IsoBuilder, preflight};
use isoseed_core::prompt::{HostPrompt, Operator, PromptOutcome};
use isoseed_core::render::TemplateSet;
use tracing::info;

use crate::commands::BuildArgs;
use crate::terminal::format::{self, Detail};
use crate::terminal::{colors, operator::TerminalOperator, print, spinner};

pub fn build(args: BuildArgs) -> anyhow::Result<ExitCode> {
    let config: Config = args.into_config();
    run(&config, SystemToolchain, TerminalOperator::stdio())
}

/// Quitting at the prompt is not an error, but it still exits non-zero.
fn run(
    config: &Config,
    toolchain: impl Toolchain,
    operator: impl Operator,
) -> anyhow::Result<ExitCode> {
    preflight::run(config, &toolchain)?;
    let templates = TemplateSet::load(config.templates_dir.as_deref())?;
    info!("All prerequisites met");

    print::header("server settings");
    let hosts = match HostPrompt::new(operator, &config.defaults).run()? {
        PromptOutcome::Confirmed(hosts) => hosts,
        PromptOutcome::Cancelled => return Ok(ExitCode::FAILURE),
    };

    print::header("building iso");
    let start_time = Instant::now();
    let builder = IsoBuilder::new(config, &templates, &toolchain);
    let report = spinner::with_spinner("Preparing build", |span| {
        builder.build(&hosts, |stage| spinner::set_message(span, &stage.to_string()))
    })?;

    print_summary(config, &report, start_time.elapsed());
    Ok(ExitCode::SUCCESS)
}

fn print_summary(config: &Config, report: &BuildReport, total_time: Duration) {
    print::header("build summary");

    let details: Vec<Detail> = vec![
        (
            String::from("Output ISO"),
            report.output_iso.display().to_string().color(colors::FILE_PATH),
        ),
        (
            String::from("Preseeds"),
            report.preseeds.len().to_string().color(colors::ACCENT),
        ),
        (
            String::from("Checksummed"),
            report.checksummed_files.to_string().color(colors::ACCENT),
        ),
        (
            String::from("Logs"),
            config.log_dir.display().to_string().color(colors::FILE_PATH),
        ),
    ];
    print::aligned_block(&details);

    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let summary: ColoredString = format!(
        "Build Complete: {} baked in {}",
        format::host_count(report.preseeds.len()),
        total_time
    )
    .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&summary.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    use isoseed_core::pipeline::toolchain::RepackJob;
    use tempfile::TempDir;

    const ANSWERS: &str = "web\n10.0.0.10\n\n\n\n\n2\n";

    struct StubToolchain;

    impl Toolchain for StubToolchain {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            Some(Path::new("/usr/bin").join(program))
        }

        fn extract(&self, _iso: &Path, dest: &Path, _log: &Path) -> anyhow::Result<()> {
            fs::create_dir_all(dest.join("boot/grub"))?;
            fs::write(dest.join("boot/grub/grub.cfg"), "stock menu")?;
            Ok(())
        }

        fn repack(&self, job: &RepackJob<'_>) -> anyhow::Result<()> {
            fs::write(job.output_iso, "iso")?;
            Ok(())
        }
    }

    fn scratch() -> (TempDir, Config) {
        let root = tempfile::tempdir().unwrap();
        let iso = root.path().join("debian.iso");
        fs::write(&iso, "stock").unwrap();

        let mut config = Config::new(iso);
        config.work_dir = root.path().join("tmp");
        config.output_iso = root.path().join("custom.iso");
        config.log_dir = root.path().join("log");
        fs::create_dir(&config.work_dir).unwrap();
        (root, config)
    }

    #[test]
    fn test_quit_exits_non_zero_and_builds_nothing() {
        let (_root, config) = scratch();
        let input = format!("{ANSWERS}q\n");
        let operator = TerminalOperator::new(input.as_bytes(), Vec::new());

        let code = run(&config, StubToolchain, operator).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(fs::read_dir(&config.work_dir).unwrap().count(), 0);
        assert!(!config.output_iso.exists());
    }

    #[test]
    fn test_confirm_builds_the_image() {
        let (_root, config) = scratch();
        let input = format!("{ANSWERS}y\n");
        let operator = TerminalOperator::new(input.as_bytes(), Vec::new());

        let code = run(&config, StubToolchain, operator).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(config.output_iso.is_file());
        assert!(config.work_dir.join("preseed/preseed-web02.cfg").is_file());
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let (_root, config) = scratch();
        let operator = TerminalOperator::new(ANSWERS.as_bytes(), Vec::new());

        assert!(run(&config, StubToolchain, operator).is_err());
        assert!(!config.output_iso.exists());
    }
}
