//! Egyptian Ratscrew - Main Binary
//!
//! Runs a two-player simulation to the round cap and prints the final stacks.

use clap::{Parser, Subcommand, ValueEnum};
use ratscrew::{
    batch::{run_batch, BatchConfig},
    game::{
        compute_state_hash, report::OutputFormat, state::parse_deal, state_hash::format_hash,
        FinalReport, GameLoop, GameState, OutputMode, VerbosityLevel, DEFAULT_MAX_ROUNDS,
    },
    Result,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Report format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "ers")]
#[command(about = "Egyptian Ratscrew - two-player challenge card game simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print the final stacks
    Play {
        /// Random seed for the shuffle (drawn from the OS if omitted)
        #[arg(long, conflicts_with = "deal")]
        seed: Option<u64>,

        /// Fixed deal: all 52 card ids, comma or space separated.
        /// The first 26 go to player 1, the last card of each half is played first.
        #[arg(long, value_name = "CARDS")]
        deal: Option<String>,

        /// Number of rounds to play
        #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
        rounds: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Format of the final report
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Print cards as "Face of Suit" instead of ids
        #[arg(long)]
        names: bool,

        /// Also write the full event log (every level) to this file
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },

    /// Run many seeded games in parallel and print summary statistics
    Batch {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Base seed; each game's seed is derived from it
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of rounds per game
        #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
        rounds: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Play {
            seed,
            deal,
            rounds,
            verbosity,
            format,
            names,
            log_file,
        } => run_play(PlayOptions {
            seed,
            deal,
            rounds,
            verbosity: verbosity.into(),
            format: format.into(),
            names,
            log_file,
        }),
        Commands::Batch {
            games,
            seed,
            rounds,
        } => {
            let stats = run_batch(&BatchConfig {
                games,
                seed,
                max_rounds: rounds,
            });
            println!("{stats}");
            Ok(stats.aborted == 0)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

struct PlayOptions {
    seed: Option<u64>,
    deal: Option<String>,
    rounds: u32,
    verbosity: VerbosityLevel,
    format: OutputFormat,
    names: bool,
    log_file: Option<PathBuf>,
}

/// Run one game; returns `Ok(false)` if it terminated abnormally
fn run_play(opts: PlayOptions) -> Result<bool> {
    let mut game = match opts.deal {
        Some(deal) => GameState::from_deal(&parse_deal(&deal)?)?,
        None => GameState::new_shuffled(opts.seed.unwrap_or_else(rand::random))?,
    };

    // JSON output must be the only thing on stdout
    let verbosity = match opts.format {
        OutputFormat::Json => VerbosityLevel::Silent,
        OutputFormat::Text => opts.verbosity,
    };
    if opts.log_file.is_some() {
        game.logger.set_output_mode(OutputMode::Both);
    }

    let outcome = GameLoop::new(&mut game)
        .with_verbosity(verbosity)
        .with_max_rounds(opts.rounds)
        .run_game();

    game.logger.verbose(&format!(
        "Final state hash: {}",
        format_hash(compute_state_hash(&game))
    ));

    if let Some(path) = &opts.log_file {
        let mut writer = BufWriter::new(File::create(path)?);
        game.logger.write_logs(&mut writer)?;
        writer.flush()?;
    }

    let report = FinalReport::from_outcome(&game, &outcome);
    print!("{}", report.render(opts.format, opts.names)?);
    Ok(!report.is_abnormal())
}
