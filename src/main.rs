use rmx_tsv::{cli, constants::DEFAULT_LOG_FILTER};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // stdout carries the converted table; logs go to stderr
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(cli::run(std::env::args_os()));
}
