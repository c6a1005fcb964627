//! Main application entry point.

use clap::Parser;
use signdesk_app::{
    ScriptError, ShortcutRegistry, load_script, new_session, read_file, run_script, write_file,
};
use signdesk_core::{EditorConfig, EditorError};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay edit scripts against a sign template and print the result
#[derive(Parser, Debug)]
#[command(name = "signdesk", version)]
#[command(about = "Headless SignDesk template editor")]
struct Args {
    /// Template JSON file to open
    #[arg(required_unless_present = "shortcuts")]
    template: Option<PathBuf>,

    /// JSON edit script to replay
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Editor config file (default: the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the edited template here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List keyboard shortcuts and exit
    #[arg(long)]
    shortcuts: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.shortcuts {
        ShortcutRegistry::print_all();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("signdesk: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ScriptError> {
    let Some(template_path) = &args.template else {
        return Ok(());
    };
    let config = EditorConfig::load_or_default(args.config.as_deref())?;
    log::info!("Starting SignDesk on {}", template_path.display());

    let mut session = new_session(config);
    session.load_template_json(&read_file(template_path)?)?;

    let steps = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };
    let report = run_script(&mut session, &steps)?;
    if report.skipped > 0 {
        log::warn!("{} script steps had no effect", report.skipped);
    }

    let exported = session
        .export_template()
        .to_json()
        .map_err(EditorError::from)?;
    match &args.output {
        Some(path) => write_file(path, &exported)?,
        None => println!("{}", exported),
    }

    let surface = session.dispose();
    log::debug!("Final scene has {} objects", surface.len());
    Ok(())
}
