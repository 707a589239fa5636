//! glossa main entry point
//!
//! The main loop waits on two sources:
//! 1. stdin lines (read on a helper thread and forwarded over a channel)
//! 2. speech synthesizer events (drained between input lines)

use glossa::glossary::Glossary;
use glossa::input::{parse_command, Command, HELP};
use glossa::speech::backends::memory::MemorySynth;
use glossa::speech::{create_synth, Status, Synth, SynthEvent};
use glossa::state::config::Config;
use glossa::state::State;
use glossa::view::render_page;
use glossa::Result;
use log::{debug, error, info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// How long to wait for input before draining speech events
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Render width for the page table
const PAGE_WIDTH: usize = 78;

/// Parsed command line options
#[derive(Debug, Default)]
struct Options {
    debug: bool,
    list_voices: bool,
    glossary: Option<PathBuf>,
}

/// Line of input from the reader thread
enum Input {
    Line(String),
    Eof,
}

fn parse_args() -> std::result::Result<Options, String> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" | "-d" => options.debug = true,
            "--list-voices" => options.list_voices = true,
            "--glossary" | "-g" => {
                let path = args
                    .next()
                    .ok_or_else(|| format!("{} requires a path", arg))?;
                options.glossary = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: glossa [--debug] [--glossary PATH] [--list-voices]\n\n{}",
                    HELP
                );
                process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        // Debug mode: write to glossa.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("glossa.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open glossa.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "glossa version {} starting (debug mode, logging to glossa.log)",
            glossa::VERSION
        );
    } else {
        // Normal mode: errors only, RUST_LOG still honored
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn main() {
    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: glossa [--debug] [--glossary PATH] [--list-voices]");
            process::exit(2);
        }
    };

    init_logging(options.debug);

    if let Err(e) = run(options) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    debug!("Initializing glossa");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default configuration: {}", e);
            Config::in_memory()
        }
    };
    info!("Configuration from {:?}", config.path());

    let glossary_path = options.glossary.unwrap_or_else(|| config.glossary_path());
    let glossary = Glossary::load_or_empty(&glossary_path);

    let (events_tx, events_rx) = mpsc::channel::<SynthEvent>();
    let synth: Box<dyn Synth> = match create_synth(events_tx.clone()) {
        Ok(synth) => synth,
        Err(e) => {
            warn!("{}", e);
            eprintln!("Speech unavailable, continuing silently: {}", e);
            Box::new(MemorySynth::silent(events_tx))
        }
    };

    let mut state = State::new(config, glossary, synth, events_rx);

    if options.list_voices {
        print_voices(&mut state);
        return Ok(());
    }

    println!("glossa {} - {} terms", glossa::VERSION, state.glossary().len());
    println!("Type 'help' for commands.");
    print_page(&state);

    let input = spawn_stdin_reader();
    event_loop(&mut state, &input)?;

    state.stop();
    info!("glossa exiting");
    Ok(())
}

/// Forward stdin lines over a channel so the main loop never blocks on input
fn spawn_stdin_reader() -> Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    error!("stdin error: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Eof);
    });
    rx
}

fn event_loop(state: &mut State, input: &Receiver<Input>) -> Result<()> {
    let mut last_status = state.status();
    prompt()?;

    loop {
        match input.recv_timeout(POLL_INTERVAL) {
            Ok(Input::Line(line)) => {
                if !apply(state, parse_command(&line)) {
                    return Ok(());
                }
                last_status = report_status(state, &last_status, true);
                prompt()?;
            }
            Ok(Input::Eof) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Input closed");
                return Ok(());
            }
            Err(RecvTimeoutError::Timeout) => {
                if state.pump_speech() > 0 {
                    let before = last_status.clone();
                    last_status = report_status(state, &last_status, false);
                    if before != last_status {
                        prompt()?;
                    }
                }
            }
        }
    }
}

/// Apply one command; returns false when the user asked to quit
fn apply(state: &mut State, command: Command) -> bool {
    debug!("Command: {:?}", command);
    match command {
        Command::Search(query) => {
            state.set_query(&query);
            print_page(state);
        }
        Command::NextPage => {
            if state.next_page() {
                print_page(state);
            } else {
                println!("Already on the last page.");
            }
        }
        Command::PrevPage => {
            if state.prev_page() {
                print_page(state);
            } else {
                println!("Already on the first page.");
            }
        }
        Command::Play(row) => {
            if state.term_on_page(row).is_none() {
                println!("No term in row {}.", row);
            } else {
                state.play(row);
            }
        }
        Command::Say(text) => {
            state.say(&text);
        }
        Command::Stop => state.stop(),
        Command::Voices => print_voices(state),
        Command::Show => print_page(state),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Unknown(text) => println!("Unknown command: {} (type 'help')", text),
    }
    true
}

/// Print the status line if it changed (or always, after a command)
fn report_status(state: &State, last: &Status, after_command: bool) -> Status {
    let status = state.status();
    if status != *last || (after_command && status.is_error()) {
        if after_command {
            println!("[{}]", status.message());
        } else {
            println!("\n[{}]", status.message());
        }
    }
    status
}

fn print_page(state: &State) {
    print!("{}", render_page(&state.page(), state.query(), PAGE_WIDTH));
}

fn print_voices(state: &mut State) {
    let backend = state.speech().backend_name().to_string();
    let (voices, selected) = state.voices();
    println!("Backend: {}", backend);
    if voices.is_empty() {
        println!("No voices reported; the platform default will be used.");
    }
    for voice in &voices {
        let marker = if Some(voice) == selected.as_ref() { "*" } else { " " };
        println!(" {} {}", marker, voice);
    }
    match selected {
        Some(voice) => println!("Selected: {}", voice),
        None => println!("Selected: platform default ({})", state.speech().settings().language),
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
