use clap::Parser;
use log::warn;
use pagescope::config::{RcConfig, RcLoader};
use pagescope::controller::EditorSession;
use pagescope::view::write_frame;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Page registry editor driven by a command script.
#[derive(Parser, Debug)]
#[command(name = "pagescope", version)]
struct Cli {
    /// Settings file to use instead of .pagescoperc
    #[arg(long, value_name = "FILE")]
    rc: Option<PathBuf>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Print a sample rc file and exit
    #[arg(long)]
    sample_rc: bool,

    /// Command script, read from stdin when omitted
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.sample_rc {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }

    // Load RC configuration
    let mut config: RcConfig = match &cli.rc {
        Some(path) => RcLoader::load_from_path(path),
        None => RcLoader::load_config(),
    };
    if cli.no_color {
        config.color = false;
    }

    let lines: Vec<String> = match &cli.script {
        Some(path) => fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    let mut session = EditorSession::new(config);
    let mut out = io::stdout();
    for (number, line) in lines.iter().enumerate() {
        let quit = match session.execute_line(line) {
            Ok(quit) => quit,
            Err(e) => {
                warn!("line {}: {e}", number + 1);
                write_frame(&mut out, &[format!("error (line {}): {e}", number + 1)])?;
                continue;
            }
        };
        if let Some(frame) = session.take_frames() {
            write_frame(&mut out, &frame)?;
        }
        if !session.status_message.is_empty() {
            write_frame(&mut out, &[session.status_message.clone()])?;
        }
        if quit {
            break;
        }
    }

    Ok(())
}
