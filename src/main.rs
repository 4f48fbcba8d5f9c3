//! Quill - line-mode front end
//!
//! Drives the command shell from stdin, or prints highlight spans for a file
//! with `--highlight`.

use std::env;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use quill::{Config, Dispatch, HighlightCoordinator, OutputKind, RuleTable, Shell, Verb};

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Print highlight spans for this file and exit
    highlight: Option<PathBuf>,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> quill::Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let path = args.get(i + 1).ok_or("Missing config file path")?;
                    app_args.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--highlight" | "-H" => {
                    let path = args.get(i + 1).ok_or("Missing file to highlight")?;
                    app_args.highlight = Some(PathBuf::from(path));
                    i += 1;
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{}", quill::NAME, quill::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("Unknown option: {}", arg).into());
                }
                arg => {
                    warn!("Ignoring positional argument: {}", arg);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("Quill - editor core with an embedded command shell");
    println!();
    println!("USAGE:");
    println!("    quill [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>      Path to configuration file");
    println!("    -H, --highlight <FILE>   Print highlight spans for FILE and exit");
    println!("    -d, --debug              Enable debug logging");
    println!("    -h, --help               Print this help message");
    println!("    -v, --version            Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    Quill looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $QUILL_CONFIG");
    println!("    3. <platform config dir>/quill/config.toml (or .json)");
    println!("    4. ~/.quill/config.toml");
    println!("    5. ./.quill/config.toml");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    QUILL_CONFIG    Path to configuration file");
    println!("    QUILL_DEBUG     Enable debug logging (1 or true)");
    println!("    RUST_LOG        Set logging level (error, warn, info, debug, trace)");
}

fn main() -> Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("Failed to parse arguments: {}", e);
        print_help();
        process::exit(1);
    });

    init_logging(args.debug);
    debug!("Debug mode enabled");

    let config = load_configuration(&args)?;

    if let Some(path) = &args.highlight {
        return highlight_file(path, &config);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run_shell(config))
}

fn init_logging(debug: bool) {
    let debug_env = env::var("QUILL_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let log_level = if debug || debug_env { "debug" } else { "info" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_configuration(args: &AppArgs) -> Result<Config> {
    match &args.config_path {
        Some(path) => quill::init_with_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(quill::init()?),
    }
}

/// Print one span per line: `line:start..end style "text"`
fn highlight_file(path: &Path, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = Arc::new(RuleTable::new(&config.highlight)?);

    let mut buffer = HighlightCoordinator::new(table);
    buffer.set_text(&text);
    let tokenized = buffer.refresh_all();
    info!("Tokenized {} lines of {}", tokenized, path.display());

    let mut stdout = std::io::stdout().lock();
    for index in 0..buffer.line_count() {
        let line = buffer
            .line(index)
            .map(|l| l.text().to_string())
            .unwrap_or_default();
        for span in buffer.spans(index).unwrap_or(&[]) {
            writeln!(
                stdout,
                "{}:{}..{} {} {:?}",
                index + 1,
                span.start,
                span.end(),
                span.style,
                span.text(&line)
            )?;
        }
    }
    Ok(())
}

async fn run_shell(config: Config) -> Result<()> {
    let mut shell = Shell::new(config.shell).context("Failed to start shell")?;
    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt(&shell, interactive);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    shell.wait_idle().await;
                    flush_output(&mut shell, interactive);
                    break;
                };
                if matches!(line.trim(), "exit" | "quit") {
                    break;
                }
                if shell.submit(&line) == Dispatch::Builtin(Verb::Clear) && interactive {
                    print!("\x1b[2J\x1b[H");
                }
                flush_output(&mut shell, interactive);
                print_prompt(&shell, interactive);
            }
            Some(job) = shell.next_completion() => {
                debug!("Job {} reported", job);
                flush_output(&mut shell, interactive);
                print_prompt(&shell, interactive);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                if shell.running_jobs() == 0 {
                    break;
                }
                shell.stop();
                flush_output(&mut shell, interactive);
            }
        }
    }

    info!("Shell closed");
    Ok(())
}

fn print_prompt(shell: &Shell, interactive: bool) {
    if interactive {
        if let Err(e) = write_prompt(&mut std::io::stdout(), &shell.prompt()) {
            debug!("Failed to flush prompt: {}", e);
        }
    }
}

/// The prompt has no trailing newline, so it only shows after a flush
fn write_prompt(out: &mut impl Write, prompt: &str) -> std::io::Result<()> {
    write!(out, "{} ", prompt)?;
    out.flush()
}

/// Print and forget everything buffered so far
fn flush_output(shell: &mut Shell, interactive: bool) {
    for line in shell.output_mut().drain() {
        match line.kind {
            // A terminal already shows what was typed
            OutputKind::Echo if interactive => {}
            _ if line.is_error() => eprintln!("{}", line.text),
            _ => println!("{}", line.text),
        }
    }
}
