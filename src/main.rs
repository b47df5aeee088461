use anyhow::Context;
use stylepad::logging::{LogLevel, Logger};
use stylepad::{error, EditorConfig, TuiApplication};
use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliOptions {
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    debug_log: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    if options.show_help {
        print_usage();
        return Ok(());
    }
    if options.show_version {
        println!("stylepad {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = EditorConfig::load(options.config.as_deref()).context("failed to load config")?;

    // 端末を占有するので stderr には出さない
    if let Some(path) = options.debug_log.clone().or_else(|| config.debug_log.clone()) {
        Logger::new(LogLevel::Debug)
            .without_stderr()
            .with_file_output(path)
            .install()
            .context("failed to install logger")?;
    }

    error::setup_panic_handler();

    let mut app = TuiApplication::new(&config)?;
    if let Some(path) = options.file.as_deref() {
        app.open_initial(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }
    app.run()?;
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.show_help = true,
            "-V" | "--version" => options.show_version = true,
            "--config" => {
                let value = iter.next().context("--config requires a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--debug-log" => {
                let value = iter.next().context("--debug-log requires a path")?;
                options.debug_log = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') => anyhow::bail!("unknown option: {}", other),
            other => {
                if options.file.is_some() {
                    anyhow::bail!("only one file can be opened");
                }
                options.file = Some(PathBuf::from(other));
            }
        }
    }

    Ok(options)
}

fn print_usage() {
    println!("stylepad {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE: stylepad [OPTIONS] [FILE]");
    println!();
    println!("OPTIONS:");
    println!("    --config <PATH>     read settings from PATH instead of ~/.stylepad/config.json");
    println!("    --debug-log <PATH>  write debug log to PATH");
    println!("    -h, --help          show this help");
    println!("    -V, --version       show version");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_file_and_options() {
        let options = parse_args(&args(&["--config", "c.json", "notes.txt", "--debug-log", "d.log"])).unwrap();
        assert_eq!(options.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(options.config, Some(PathBuf::from("c.json")));
        assert_eq!(options.debug_log, Some(PathBuf::from("d.log")));
    }

    #[test]
    fn rejects_unknown_option_and_missing_value() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
    }
}
