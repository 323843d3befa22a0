use hhabigen::Hhabigen;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Logs go to stderr, stdout belongs to the generator
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hhabigen=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Hhabigen::parse_args();

    let path = match cli.path() {
        Some(path) => path,
        None => {
            eprintln!("file was not provided");
            eprint!("{}", Hhabigen::usage());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::metadata(path) {
        eprintln!("cannot read {}: {}", path.display(), e);
        eprint!("{}", Hhabigen::usage());
        return ExitCode::FAILURE;
    }

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hhabigen: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hhabigen: {:#}", e);
            e.exit_code()
        }
    }
}
