use std::fs;
use std::process;

use babygc::config::{DEFAULT_INITIAL_THRESHOLD, DEFAULT_STACK_CAPACITY};
use babygc::{BabyGcError, Context, GcConfig, Program};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

mod repl;
mod scenarios;
mod stress;

#[derive(Parser)]
#[command(
    name = "babygc",
    about = "A mark-and-sweep garbage collector driven by a toy stack machine"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Raise log verbosity (-v for collections, -vv for every allocation)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Live-object count that triggers the first collection
    #[arg(long, global = true, default_value_t = DEFAULT_INITIAL_THRESHOLD)]
    threshold: usize,
    /// Maximum number of roots on the operand stack
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_STACK_CAPACITY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    stack_capacity: usize,
    /// Print version and exit
    #[arg(long)]
    version: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the fixed reachability scenarios
    Scenarios,
    /// Run randomized push/pair/pop rounds
    Stress(stress::StressArgs),
    /// Execute an instruction script
    Run {
        /// Path to the script
        file: Option<String>,
        /// Execute inline instructions; `;` separates them
        #[arg(long)]
        eval: Option<String>,
        /// Print the parsed instruction listing
        #[arg(long)]
        listing: bool,
    },
    /// Start the interactive prompt
    Repl,
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!(
            "{} {}",
            "babygc".bright_cyan().bold(),
            env!("CARGO_PKG_VERSION").bright_black()
        );
        return;
    }

    init_logging(cli.verbose);
    let config = GcConfig::new()
        .with_initial_threshold(cli.threshold)
        .with_stack_capacity(cli.stack_capacity);

    let status = match cli.command.unwrap_or(Command::Repl) {
        Command::Scenarios => {
            if scenarios::run_all(config) {
                0
            } else {
                1
            }
        }
        Command::Stress(args) => match stress::run(&args, config) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{} {err}", "stress failure:".red().bold());
                1
            }
        },
        Command::Run {
            file,
            eval,
            listing,
        } => run_script(file, eval, listing, config),
        Command::Repl => match repl::run(config) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{} {err}", "error:".red().bold());
                1
            }
        },
    };

    process::exit(status);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run_script(file: Option<String>, eval: Option<String>, listing: bool, config: GcConfig) -> i32 {
    let (source, origin) = match (eval, file) {
        (Some(code), _) => (code.replace(';', "\n"), "<eval>".to_string()),
        (None, Some(file)) => match fs::read_to_string(&file) {
            Ok(source) => (source, file),
            Err(e) => {
                eprintln!(
                    "{} could not read '{}': {e}",
                    "error:".red().bold(),
                    file.yellow()
                );
                return 1;
            }
        },
        (None, None) => {
            eprintln!("{} pass a script path or --eval", "error:".red().bold());
            return 1;
        }
    };

    let program = match Program::parse(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{}", format_error(&origin, &BabyGcError::from(err)));
            return 1;
        }
    };

    if listing {
        println!("{}", "Instructions".bright_blue().bold());
        print!("{}", program.disassemble());
    }

    let mut ctx = Context::with_config(config);
    let result = ctx.run_program(&program);
    let stats = ctx.stats();
    let final_collection = ctx.destroy();

    match result {
        Ok(_) => {
            println!(
                "{} live {}, {} collection(s), {} freed, {} reclaimed at exit",
                "done:".green().bold(),
                stats.live,
                stats.total_collections,
                stats.total_freed,
                final_collection.collected
            );
            0
        }
        Err(err) => {
            eprintln!("{}", format_error(&origin, &err));
            1
        }
    }
}

fn format_error(origin: &str, err: &BabyGcError) -> String {
    match err {
        BabyGcError::Parse(parse) => format!(
            "{} at {}:{}:{}: {}",
            "parse error".red().bold(),
            origin.cyan(),
            parse.line,
            parse.column,
            parse.message.bright_white()
        ),
        BabyGcError::Execution { line, source } => format!(
            "{} at {}:{}: {}",
            "runtime error".red().bold(),
            origin.cyan(),
            line,
            source.bright_white()
        ),
        BabyGcError::Gc(err) => format!("{} {err}", "runtime error:".red().bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stack_capacity_is_rejected_at_parse_time() {
        let parsed = Cli::try_parse_from(["babygc", "--stack-capacity", "0", "scenarios"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn stack_capacity_flag_reaches_the_subcommand() {
        let cli = Cli::try_parse_from(["babygc", "stress", "--stack-capacity", "16"])
            .expect("valid arguments");
        assert_eq!(cli.stack_capacity, 16);
        assert!(matches!(cli.command, Some(Command::Stress(_))));
    }
}
