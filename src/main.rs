use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hookd::session::Session;
use hookd::worker::WorkerHandle;
use hookd::Error;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Executes PEP 517 build-backend hooks on behalf of a parent package
/// manager, reusing one Python interpreter across many invocations.
#[derive(Parser)]
#[command(name = "hookd")]
struct Args {
    /// Root of the source tree to change into before the first `READY`.
    tree_root: Option<PathBuf>,

    /// Python interpreter used to run the hook worker.
    #[arg(long)]
    python: Option<PathBuf>,

    /// Write diagnostics here instead of discarding them. The daemon's own
    /// stderr always stays empty; diagnostics otherwise travel as `DEBUG`
    /// lines on stdout.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase trace verbosity; repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(args: &Args) -> anyhow::Result<()> {
    let filter = match args.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let registry = tracing_subscriber::registry().with(filter);

    match &args.log_file {
        Some(path) => {
            let file = fs_err::File::create(path)?.into_file();
            registry
                .with(fmt::layer().with_span_events(FmtSpan::CLOSE).with_writer(file).with_ansi(false))
                .init();
        }
        None => {
            // No sink: the daemon's only output channel in normal operation
            // is the sentinel protocol on stdout, not its own stderr.
            registry.with(fmt::layer().with_writer(std::io::sink)).init();
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<i32, Error> {
    let tree_root = match args.tree_root {
        Some(path) => {
            std::env::set_current_dir(&path)?;
            std::env::current_dir()?
        }
        None => std::env::current_dir()?,
    };

    let python = match args.python {
        Some(path) => path,
        None => which::which("python3").map_err(Error::PythonNotFound)?,
    };

    let worker = WorkerHandle::new(python, tree_root.clone()).await?;
    let session = Session::new(tokio::io::stdin(), tokio::io::stdout(), tree_root, worker);

    session.run().await?;
    Ok(0)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_tracing(&args) {
        eprintln!("hookd: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Startup/control-pipe failures are the only things printed to
            // stderr: they happen before a client can be attached, or mean
            // the protocol itself is unusable.
            eprintln!("hookd: {err}");
            ExitCode::FAILURE
        }
    }
}
