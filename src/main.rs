use std::{fs, io, path::PathBuf, process};

use dmcache_rs::{config::Config, sim, Error, MemoryError, Result};
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => {}
        Err(Error::Memory(MemoryError::InvalidAddress(addr))) => {
            eprintln!("Invalid address: {addr}");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    }
}

fn run() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    let config_str: Option<String> = args.opt_value_from_str("--config")?;
    let config_path: Option<PathBuf> = args.opt_value_from_str("-p")?;
    let mut config = Config::load(config_str.as_deref(), config_path.as_deref())?;
    if args.contains("-q") {
        config.report_misses = false;
    }
    let stats_path: Option<PathBuf> = args.opt_value_from_str("--json")?;

    let stdout = io::stdout();
    let outcome = sim::simulate(&config, &mut stdout.lock())?;

    if let Some(stats_path) = stats_path {
        let stats_file = fs::File::create(stats_path)?;
        serde_json::to_writer_pretty(stats_file, &outcome.stats)?;
    }
    Ok(())
}
