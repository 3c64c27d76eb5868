use std::{io, path::PathBuf, time::Instant};

use clap::Parser;
use log::{error, info};
use watchlog_cli::{run, DumpConfig, DumpSummary, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "watchlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dump a Watcher binary log as text or JSON lines",
    long_about = None,
)]
struct Cli {
    /// Путь к файлу лога (.bin)
    input: PathBuf,
    /// Формат вывода: text, json
    #[arg(short, long, default_value = "text")]
    format: String,
    /// Не печатать значения элементов и меток
    #[arg(long)]
    no_elements: bool,
    /// Не больше N элементов на сообщение
    #[arg(long)]
    max_elements: Option<usize>,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
    /// Отладочный лог декодера
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let format: OutputFormat = match cli.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("--format: {e}");
            std::process::exit(1);
        }
    };

    let config = DumpConfig {
        input: cli.input,
        format,
        show_elements: !cli.no_elements,
        max_elements: cli.max_elements,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    // Лог уходит в stderr, stdout занят дампом
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let started = Instant::now();

    match run(&config, io::stdout().lock()) {
        Ok(stats) => {
            info!("\n{}", DumpSummary::new(&stats, &started));
        }
        Err(e) => {
            error!("Dump of {:?} failed: {e}", config.input);
            std::process::exit(1);
        }
    }
}
