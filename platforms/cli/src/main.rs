use clap::{Parser, Subcommand};
use std::path::Path;
use std::process;
use std::sync::Arc;
use turcell::loader::TableLoader;
use turcell::simulation::SimulationDriver;
use turcell::types::{DefaultPolicy, SimulatorError, DEFAULT_MAX_STEPS};
use turcell::{parse_cells, parse_window, CaConfiguration, CaRunOptions, ProgramManager};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a cellular automaton from a rule table file
    Ca {
        /// The rule table file
        #[clap(short, long)]
        rules: String,

        /// The initial configuration, as comma-separated cell tokens
        #[clap(short, long)]
        word: String,

        /// Value for cells no rule covers; cells keep their value if omitted
        #[clap(long)]
        default: Option<String>,

        /// Maximum number of steps
        #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
        steps: usize,

        /// Stop when this window (three comma-separated cells) is used
        #[clap(long)]
        stop_on: Option<String>,

        /// Stop when a step changes nothing
        #[clap(long)]
        stable: bool,
    },

    /// Run a Turing machine from a machine description file
    Tm {
        /// The machine description file
        #[clap(short, long)]
        machine: String,

        /// The input word, one symbol per character
        #[clap(short, long)]
        word: String,

        /// Maximum number of steps
        #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
        steps: usize,
    },

    /// Compile a machine into a rule table and run both on the same word
    Compile {
        /// The machine description file
        #[clap(short, long)]
        machine: String,

        /// The input word, one symbol per character
        #[clap(short, long)]
        word: String,

        /// Maximum number of automaton steps
        #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
        steps: usize,
    },

    /// List the embedded demo programs
    Demos,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SimulatorError> {
    match cli.command {
        Command::Ca {
            rules,
            word,
            default,
            steps,
            stop_on,
            stable,
        } => {
            let policy = match default {
                Some(token) => DefaultPolicy::Fixed(token.parse()?),
                None => DefaultPolicy::Identity,
            };
            let table = TableLoader::load_rule_table(Path::new(&rules), policy)?;

            let stop_on_transition = match stop_on {
                Some(text) => Some(parse_window(&text)?),
                None => None,
            };
            let options = CaRunOptions {
                max_steps: steps,
                stop_on_transition,
                stop_on_stable: stable,
            };

            let mut config = CaConfiguration::new(parse_cells(&word)?, Arc::new(table));
            let report = SimulationDriver::run_automaton(&mut config, &options)?;

            for line in &report.trace {
                println!("{}", line);
            }
        }

        Command::Tm {
            machine,
            word,
            steps,
        } => {
            let machine = Arc::new(TableLoader::load_machine(Path::new(&machine))?);
            let mut config = turcell::TmConfiguration::from_text(&word, machine);
            let report = SimulationDriver::run_machine(&mut config, steps);

            for line in &report.trace {
                println!("{}\n", line);
            }
        }

        Command::Compile {
            machine,
            word,
            steps,
        } => {
            let machine = Arc::new(TableLoader::load_machine(Path::new(&machine))?);
            let word: Vec<String> = word.chars().map(|c| c.to_string()).collect();
            let options = CaRunOptions {
                max_steps: steps,
                stop_on_stable: true,
                ..Default::default()
            };

            let (tm_report, ca_report) =
                SimulationDriver::run_compiled(machine, &word, &options)?;

            println!("=== Machine ===");
            for line in &tm_report.trace {
                println!("{}\n", line);
            }

            println!("=== Automaton ===");
            for line in &ca_report.trace {
                println!("{}", line);
            }

            let decoded = turcell::decode_cells(&ca_report.cells);
            println!("\nDecoded tape: {}", decoded.join(""));
        }

        Command::Demos => {
            for name in ProgramManager::names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
