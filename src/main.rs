use std::io::{self, Write};
use std::process::ExitCode;
use clap::Parser;
use env_logger::Env;
use log::{error, warn, Level};
use encexp::sink::OsDestinations;
use encexp::{readback, CompatibilityMatrix, Dispatcher, Method, Mode, Options};

/// Writes a fixed text sample through an output API in a text mode, to see what comes out.
#[derive(Parser, Debug, Clone)]
#[command(name = "encexp", version)]
pub struct Cli {
    /// Output method: winapi, posix, unformatted, formatted, unformatted++, formatted++
    pub method: Option<String>,

    /// Text mode: binary, text, wide, unicode, wideunicode
    pub mode: Option<String>,

    /// Further options: cp#### (console output code page), l#### (locale), file (write to "output")
    pub options: Vec<String>,

    /// env_logger-style filter string (e.g. "debug"); overrides RUST_LOG/defaults.  Accepted anywhere on the line
    #[arg(long)]
    pub log_filter: Option<String>,
}

pub const DEFAULT_LOG_FILTER: &str = "info";

fn init_logging(cli_filter: Option<&str>) {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filter) = cli_filter {
        builder.parse_filters(filter);
    }
    builder.format(|buf, record| {
        let level = match record.level() {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        writeln!(buf, "{}: {}", level, record.args())
    });
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_filter.as_deref());

    let method = Method::parse(cli.method.as_deref().unwrap_or(""));
    if method == Method::None {
        error!("first argument must be one of: {}", Method::tokens().join(", "));
        return ExitCode::FAILURE;
    }

    let mode = Mode::parse(cli.mode.as_deref().unwrap_or(""));
    if mode == Mode::None {
        error!("second argument must be one of: {}", Mode::tokens().join(", "));
        return ExitCode::FAILURE;
    }

    let options = Options::parse(cli.options.as_slice());
    for warning in &options.warnings {
        warn!("{}", warning);
    }
    let config = options.configure(method, mode);

    let matrix = CompatibilityMatrix::new();
    let outcome = Dispatcher::new(&matrix).run(&config, &mut OsDestinations);
    outcome.log();
    if outcome.failed {
        return outcome.exit_code();
    }

    if let Some(path) = config.destination.path() {
        // Read back as raw bytes; nothing may translate on the way in.
        let stdout = io::stdout();
        if let Err(err) = readback::print_file(path, &mut stdout.lock()) {
            error!("can't open output file for reading: {}", err);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
