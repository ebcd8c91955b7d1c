use std::{io::stdout, panic};

use clap::Parser;
use crossterm::{terminal, ExecutableCommand};
use grove::{cli::Args, config::Config, fs::LocalFs, log, logger, terminal::Terminal, Editor};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid config file: {err}");
            std::process::exit(1);
        }
    };

    let log_file = config.log_path();
    if let Err(err) = logger::init(&log_file) {
        eprintln!("Cannot open log file {}: {err}", log_file.display());
    }
    log!("starting with {:?}", args.file);

    let root = std::env::current_dir()?;
    let (width, height) = Terminal::size()?;
    let mut editor = Editor::with_size(Box::new(LocalFs), config, root, width, height);
    editor.start(args.file);

    panic::set_hook(Box::new(|info| {
        _ = stdout().execute(terminal::LeaveAlternateScreen);
        _ = terminal::disable_raw_mode();

        eprintln!("{}", info);
    }));

    let mut term = Terminal::new();
    term.enter()?;
    let result = term.run(&mut editor);
    term.cleanup()?;
    result
}
