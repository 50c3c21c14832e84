use anyhow::Result;

use vidsage_tui::RunOptions;

fn main() -> Result<()> {
    init_logging();

    let mut options = RunOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => options.server_url = args.next(),
            "--help" | "-h" => {
                println!("vidsage — analyze a video and chat with its content");
                println!();
                println!("Usage: vidsage [--server <url>]");
                println!();
                println!("Set VIDSAGE_LOG=<file> to write tracing output to a file.");
                return Ok(());
            }
            other => eprintln!("Warning: unknown argument: {other}"),
        }
    }

    vidsage_tui::run(options)
}

/// The TUI owns the terminal, so tracing goes to a file and only when asked.
fn init_logging() {
    let Ok(path) = std::env::var("VIDSAGE_LOG") else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
