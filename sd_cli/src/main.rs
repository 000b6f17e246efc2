//! Swiss draft operator tool.
//!
//! Each invocation runs one command against the JSON tournament store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use sd_cli::app::App;
use sd_cli::commands::parse_command;
use sd_cli::config::CliConfig;
use swiss_draft::SwissError;
use swiss_draft::store::JsonFileRepository;
use swiss_draft::tournament::TournamentManager;

const HELP: &str = "\
Run Swiss draft tournaments: pairing, results and standings

USAGE:
  sd_cli [OPTIONS] COMMAND [ARGS]

OPTIONS:
  --store      DIR         Tournament store directory  [default: env SD_STORE_DIR or ./swiss_data]
  --seed       N           Seed for seating, pairing and simulation  [default: env SD_SEED or random]

FLAGS:
  -h, --help               Print help information

COMMANDS:
  new NAME [CAPACITY]                      Create a tournament (capacity 0 = unlimited)
  list                                     List tournaments
  enroll T NAME...                         Enroll players
  stage T NAME ROUNDS [--phase N] [--table N] [--no-event] [--players ID,ID,...]
                                           Add a stage (pod)
  seat T STAGE                             Seat a stage at random
  pair T STAGE                             Pair the current round
  start T ROUND                            Start a paired round
  report T MATCH W1 W2 [REPORTER]          Report games won by each player
  confirm T MATCH                          Confirm a reported result
  finish T ROUND                           Finish a round
  standings T [STAGE]                      Stage standings, or event standings
  drop T ENROLLMENT                        Drop a player
  reset T STAGE                            Wipe a stage's results for re-seating
  event-round T                            Close the current event round
  show T [STAGE]                           Show a tournament or a stage
  export T                                 Print the full tournament as JSON
  simulate T STAGE                         Play out a stage with random results

ENVIRONMENT:
  SD_STORE_DIR             Tournament store directory
  SD_SEED                  Random seed
  SWISS_*                  Engine settings for new tournaments (e.g. SWISS_FIRST_TABLE)
  RUST_LOG                 Log level (e.g. info, debug)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let store: Option<PathBuf> = pargs.opt_value_from_str("--store")?;
    let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;
    let words: Vec<String> = pargs
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    env_logger::builder().format_target(false).init();

    let command = parse_command(&words)?;
    let config = CliConfig::from_env(store, seed)?;
    info!("Using tournament store {}", config.store_dir.display());

    let repository = JsonFileRepository::open(&config.store_dir)?;
    let manager = match config.seed {
        Some(seed) => TournamentManager::with_seed(Arc::new(repository), seed),
        None => TournamentManager::new(Arc::new(repository)),
    };

    let mut app = App::new(manager, config.swiss, config.seed);
    match app.execute(command) {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(err) => {
            // Engine errors are shown without storage internals
            if let Some(swiss) = err.downcast_ref::<SwissError>() {
                eprintln!("Error: {}", swiss.client_message());
                log::debug!("{:#}", err);
                std::process::exit(1);
            }
            Err(err)
        }
    }
}
