mod completer;
mod helper;
mod highlighter;
mod hinter;

use std::fs;

use babygc::runtime::gc::Payload;
use babygc::{Context, GcConfig, Outcome, Program};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::{Config, EditMode, Editor};

use self::helper::ReplHelper;

pub fn run(config: GcConfig) -> Result<(), ReadlineError> {
    let rl_config = Config::builder()
        .history_ignore_dups(true)?
        .completion_type(rustyline::CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut rl: Editor<ReplHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(ReplHelper));

    let mut ctx = Context::with_config(config);

    println!(
        "{} {}",
        "babygc".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "Type .help for REPL commands".bright_black());

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);
                match handle_command(trimmed, &mut ctx, config) {
                    Command::Handled => continue,
                    Command::Exit => break,
                    Command::NotACommand => run_snippet(&mut ctx, trimmed),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "bye".bright_black());
                break;
            }
            Err(err) => {
                eprintln!("{} {err}", "repl error:".red().bold());
                break;
            }
        }
    }

    let stats = ctx.destroy();
    log::debug!("reclaimed {} object(s) on exit", stats.collected);
    Ok(())
}

enum Command {
    Handled,
    Exit,
    NotACommand,
}

fn handle_command(trimmed: &str, ctx: &mut Context, config: GcConfig) -> Command {
    match trimmed {
        ".exit" | "exit" => return Command::Exit,
        ".help" => {
            for line in HELP {
                println!("{}", line.bright_blue());
            }
            return Command::Handled;
        }
        ".clear" => {
            let old = std::mem::replace(ctx, Context::with_config(config));
            let stats = old.destroy();
            println!(
                "{} ({} object(s) reclaimed)",
                "heap cleared".green(),
                stats.collected
            );
            return Command::Handled;
        }
        ".stack" => {
            print_stack(ctx);
            return Command::Handled;
        }
        ".heap" => {
            print_heap(ctx);
            return Command::Handled;
        }
        ".verify" => {
            match ctx.verify() {
                Ok(()) => println!("{}", "heap is consistent".green()),
                Err(err) => eprintln!("{} {err}", "invariant violated:".red().bold()),
            }
            return Command::Handled;
        }
        _ => {}
    }

    if let Some(path) = trimmed.strip_prefix(".load ") {
        match fs::read_to_string(path.trim()) {
            Ok(source) => run_snippet(ctx, &source),
            Err(err) => eprintln!("{} {err}", "load error:".red().bold()),
        }
        return Command::Handled;
    }
    Command::NotACommand
}

const HELP: [&str; 15] = [
    "push <int>           allocate a leaf and push it",
    "pair                 pop tail and head, push (head . tail)",
    "pop                  drop the top of the stack",
    "gc                   collect now",
    "count                print the live object count",
    "sethead <i> <j>      stack[i].head = stack[j]",
    "settail <i> <j>      stack[i].tail = stack[j]",
    "                     (end a line with \\ to continue it)",
    ".stack               show the root stack",
    ".heap                show heap statistics",
    ".verify              check heap invariants",
    ".clear               reset the heap",
    ".load <file>         run an instruction script",
    ".help                show commands",
    ".exit                exit REPL",
];

fn run_snippet(ctx: &mut Context, source: &str) {
    let source = source.replace("\\\n", "\n");
    let program = match Program::parse(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{} {err}", "parse error:".red().bold());
            return;
        }
    };

    for instruction in &program.instructions {
        match ctx.execute(*instruction) {
            Ok(outcome) => print_outcome(ctx, outcome),
            Err(err) => {
                eprintln!("{} {instruction}: {err}", "error:".red().bold());
                return;
            }
        }
    }
}

fn print_outcome(ctx: &Context, outcome: Outcome) {
    match outcome {
        Outcome::Pushed(object) | Outcome::Popped(object) => {
            println!("{} = {}", object.to_string().cyan(), describe(ctx, object));
        }
        Outcome::Collected(stats) => println!(
            "{} {} - {} = {} {}",
            "gc".bright_magenta().bold(),
            stats.before,
            stats.collected,
            stats.after,
            format!("(next at {})", stats.threshold).bright_black()
        ),
        Outcome::Count(count) => println!("{}", count.yellow()),
        Outcome::Rewired => println!("{}", "ok".bright_black()),
    }
}

/// One-level rendering; pairs show their children's handles so cycles
/// print finitely.
fn describe(ctx: &Context, object: babygc::ObjectRef) -> String {
    match ctx.get(object).map(|entry| *entry.payload()) {
        Some(Payload::Leaf(value)) => value.to_string(),
        Some(Payload::Pair { head, tail }) => format!("({head} . {tail})"),
        None => "<freed>".bright_black().to_string(),
    }
}

fn print_stack(ctx: &Context) {
    let stack = ctx.stack();
    if stack.is_empty() {
        println!("{}", "stack is empty".bright_black());
        return;
    }
    for (idx, object) in stack.roots().iter().enumerate().rev() {
        println!(
            "{:>4}  {}  {}",
            idx.bright_black(),
            object.to_string().cyan(),
            describe(ctx, *object)
        );
    }
}

fn print_heap(ctx: &Context) {
    let stats = ctx.stats();
    println!(
        "live {} ({} leaves, {} pairs), next collection at {}",
        stats.live.bold(),
        stats.leaves,
        stats.pairs,
        stats.threshold
    );
    println!(
        "{}",
        format!(
            "{} slot(s), {} free, {} allocation(s), {} collection(s), {} freed",
            stats.slots,
            stats.free_slots,
            stats.total_allocations,
            stats.total_collections,
            stats.total_freed
        )
        .bright_black()
    );
}

pub fn needs_more_input(source: &str) -> bool {
    source.trim_end().ends_with('\\')
}
