//! Replays a desktop session script and prints every published frame.
//!
//! ```text
//! desktop_cli [--frames] [--chunk-chars N] <session.toml>
//! ```
//!
//! Content comes from the offline preview generator. Logs go to stderr and honor `RUST_LOG`;
//! with `--frames`, each changed frame is written to stdout as one JSON line.

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    rc::Rc,
};

use desktop_cli::{CliError, CliResult, ConfigLoader, ScriptRunner, SessionConfig};
use platform_host::PreviewContentGenerator;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: desktop_cli [--frames] [--chunk-chars N] <session.toml>";

#[derive(Debug)]
struct Args {
    session: PathBuf,
    print_frames: bool,
    chunk_chars: Option<usize>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliResult<Args> {
    let mut session = None;
    let mut print_frames = false;
    let mut chunk_chars = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => print_frames = true,
            "--chunk-chars" => {
                let value = args.next().ok_or_else(|| {
                    CliError::Usage(format!("--chunk-chars needs a value\n{USAGE}"))
                })?;
                let parsed = value.parse::<usize>().map_err(|err| {
                    CliError::Usage(format!("invalid --chunk-chars `{value}`: {err}"))
                })?;
                chunk_chars = Some(parsed);
            }
            "-h" | "--help" => return Err(CliError::Usage(USAGE.to_string())),
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown flag `{flag}`\n{USAGE}")))
            }
            path => {
                if session.replace(PathBuf::from(path)).is_some() {
                    return Err(CliError::Usage(format!("expected one session file\n{USAGE}")));
                }
            }
        }
    }
    let session = session.ok_or_else(|| CliError::Usage(USAGE.to_string()))?;
    Ok(Args {
        session,
        print_frames,
        chunk_chars,
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn run(args: Args) -> CliResult<()> {
    let loader = ConfigLoader::<SessionConfig>::new(&args.session);
    let config = loader.load()?;
    config.validate()?;
    tracing::info!(
        path = %loader.path().display(),
        steps = config.steps.len(),
        "loaded session script"
    );

    let generator = match args.chunk_chars {
        Some(chars) => PreviewContentGenerator::new(chars),
        None => PreviewContentGenerator::default(),
    };
    let mut runner = ScriptRunner::new(Rc::new(generator), config.preferences, config.realtime);

    if args.print_frames {
        runner.runtime().subscribe(|frame| match serde_json::to_string(frame) {
            Ok(line) => {
                let mut stdout = io::stdout().lock();
                if let Err(err) = writeln!(stdout, "{line}") {
                    tracing::warn!("failed to write frame: {err}");
                }
            }
            Err(err) => tracing::warn!("failed to encode frame: {err}"),
        });
    } else {
        runner.runtime().subscribe(|frame| {
            tracing::info!(
                session = ?frame.session,
                title = %frame.title,
                busy = frame.busy,
                bytes = frame.content.len(),
                "frame"
            );
        });
    }

    let summary = runner.run(&config.steps)?;
    let frame = runner.runtime().frame();
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        session = ?frame.session,
        "replay finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let result = parse_args(env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(message)) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
