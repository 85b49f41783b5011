use anyhow::{Context, Result};
use clap::{Command, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

use ratings::{Groups, Registry};

/// Computes a product report from one or more CSV files.
#[derive(Debug, Parser)]
#[command(name = "ratings", version, about)]
struct Args {
    /// CSV files to read; all must have the same columns
    #[arg(long, required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Report to compute
    #[arg(long)]
    report: String,

    /// Brand group configuration file (lines of `NAME | REGEX`)
    #[arg(long)]
    groups: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Returns the command line definition, listing `reports` in the help for
/// `--report`.
fn command(reports: &[&str]) -> Command {
    Args::command().mut_arg("report", |arg| {
        arg.help(format!("Report to compute ({})", reports.join(", ")))
    })
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Report names don't depend on the groups configuration.
    let names: Vec<String> = Registry::builtin(Groups::default())?
        .names()
        .map(String::from)
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let matches = command(&names).get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(&args.log_level);

    let groups = match &args.groups {
        Some(path) => Groups::from_file(path)
            .with_context(|| format!("reading groups from {}", path.display()))?,
        None => Groups::default(),
    };
    let registry = Registry::builtin(groups)?;
    let records = ratings::load(&args.files)?;
    let output = registry.dispatch(&args.report, &records)?;
    print!("{}", output.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(reports: &[&str], argv: &[&str]) -> Result<Args, clap::Error> {
        let matches = command(reports).try_get_matches_from(argv)?;
        Args::from_arg_matches(&matches)
    }

    #[test]
    fn help_lists_every_registered_report() {
        let mut registry = Registry::builtin(Groups::default()).unwrap();
        registry
            .register("median-price", |_: &[ratings::Record]| -> Result<ratings::Output> {
                Ok(ratings::Output::new("Report", "Value"))
            })
            .unwrap();
        let names: Vec<&str> = registry.names().collect();
        let help = command(&names).render_help().to_string();
        assert!(help.contains("Report to compute"), "{help}");
        for name in names {
            assert!(help.contains(name), "{name} missing from help:\n{help}");
        }
    }

    #[test]
    fn args_accept_several_files() {
        let args = parse(
            &["row-count"],
            &["ratings", "--files", "a.csv", "b.csv", "--report", "row-count"],
        )
        .unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(args.report, "row-count");
        assert_eq!(args.groups, None);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn args_require_files_and_report() {
        assert!(parse(&["row-count"], &["ratings", "--report", "row-count"]).is_err());
        assert!(parse(&["row-count"], &["ratings", "--files", "a.csv"]).is_err());
    }
}
