mod args;
mod error;
mod orchestrator;
mod reader;
mod types;

use clap::Parser;

use args::Args;
use error::Error;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn run() -> error::Result<()> {
    // clap's default `Parser::parse()` exits 0 on `-h`/`--help`; this CLI
    // treats help output the same as an argument error, so parse manually
    // and control the exit code ourselves.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            std::process::exit(2);
        }
    };

    init_logging(args.verbose);

    if !args.input.is_file() {
        return Err(Error::Argument(format!(
            "{}: not a file",
            args.input.display()
        )));
    }

    let results = orchestrator::run(&args.input, args.workers, args.rows, args.yield_on_stall)?;
    for pair in results {
        println!("({},{}) {}", pair.col_a, pair.col_b, pair.value);
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("pcc: {e}");
        std::process::exit(e.exit_code());
    }
}
