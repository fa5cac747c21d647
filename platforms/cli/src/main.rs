use anyhow::{bail, Context, Result};
use clap::Parser;
use mtsim::{
    lint, Definition, ProgramLoader, ProgramManager, RunReport, Step, Transition,
    TuringMachine, TuringMachineError, DEFAULT_MAX_STEPS,
};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runs a deterministic multi-tape Turing machine over a list of inputs.
#[derive(Parser)]
#[clap(version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  mtsim-cli --program programs/binary-increment.tm --input 1011
  mtsim-cli --builtin even-ones --inputs inputs.txt --json
  mtsim-cli --builtin unary-copy --dump
  printf '11\\n111\\n' | mtsim-cli --builtin unary-copy --trace")]
struct Cli {
    /// The machine definition file to execute
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// The name of an embedded program to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// A file with one input string per line
    #[clap(short = 'f', long)]
    inputs: Option<PathBuf>,

    /// An input string for the machine (can be repeated)
    #[clap(short, long)]
    input: Vec<String>,

    /// Maximum number of steps per input
    #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print each configuration of the execution
    #[clap(short, long)]
    trace: bool,

    /// Print one JSON report per input
    #[clap(long)]
    json: bool,

    /// Print the parsed definition as JSON and exit
    #[clap(short, long)]
    dump: bool,

    /// List the embedded programs and exit
    #[clap(short, long)]
    list: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.list {
        list_programs()?;
        return Ok(());
    }

    let definition = load_definition(&cli)?;
    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&definition)?);
        return Ok(());
    }

    for finding in lint(&definition) {
        tracing::warn!("{}", TuringMachineError::from(finding));
    }

    let mut machine = TuringMachine::new(definition).context("invalid machine definition")?;
    let inputs = collect_inputs(&cli)?;

    for input in &inputs {
        let report = if cli.trace {
            trace_run(&mut machine, input, cli.max_steps)?
        } else {
            let halted = machine
                .run(input, cli.max_steps)
                .with_context(|| format!("failed to run input '{input}'"))?;
            machine.report(input, halted)
        };

        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn list_programs() -> Result<()> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:<20} {} tape(s), {} states, {} transitions",
            info.name, info.tapes, info.state_count, info.transition_count
        );
    }
    Ok(())
}

fn load_definition(cli: &Cli) -> Result<Definition> {
    match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_definition(path)
            .with_context(|| format!("failed to load definition from {}", path.display())),
        (None, Some(name)) => ProgramManager::get_program_by_name(name)
            .with_context(|| format!("failed to load embedded program '{name}'")),
        (None, None) => bail!("either --program or --builtin is required"),
    }
}

/// Gathers inputs from `--inputs`, then `--input`. Falls back to stdin lines when neither
/// is given and stdin is piped.
fn collect_inputs(cli: &Cli) -> Result<Vec<String>> {
    let mut inputs = match &cli.inputs {
        Some(path) => ProgramLoader::load_inputs(path)
            .with_context(|| format!("failed to load inputs from {}", path.display()))?,
        None => Vec::new(),
    };
    inputs.extend(cli.input.iter().cloned());

    if inputs.is_empty() && atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read inputs from stdin")?;
        inputs = ProgramLoader::inputs_from_string(&buffer);
    }

    if inputs.is_empty() {
        bail!("no inputs given; use --input, --inputs or pipe them through stdin");
    }

    Ok(inputs)
}

/// Same loop as `TuringMachine::run`, printing every configuration along the way.
fn trace_run(machine: &mut TuringMachine, input: &str, max_steps: usize) -> Result<RunReport> {
    machine
        .load(input)
        .with_context(|| format!("failed to run input '{input}'"))?;
    print_configuration(machine, None);

    let halted = loop {
        if machine.step_count() >= max_steps {
            break false;
        }

        let transition = machine.transition().cloned();
        match machine.step() {
            Step::Continue => print_configuration(machine, transition.as_ref()),
            Step::Halt => break true,
        }
    };

    Ok(machine.report(input, halted))
}

fn print_configuration(machine: &TuringMachine, transition: Option<&Transition>) {
    println!("----------------------------------------------------");
    println!("Step: {}", machine.step_count());
    println!("State: {}", machine.state());
    for (i, tape) in machine.tapes_content_with_head().iter().enumerate() {
        println!("Tape {}: {}", i + 1, tape);
    }
    match transition {
        Some(transition) => println!("Applied: {transition}"),
        None => println!("Initial configuration"),
    }
}

fn print_report(report: &RunReport) {
    let outcome = match (report.halted, report.accepted) {
        (false, _) => "STEP LIMIT REACHED",
        (true, true) => "ACCEPTED",
        (true, false) => "REJECTED",
    };

    println!("\n--- Processing input: {} ---", report.input);
    println!(
        "Result: {} (state {}, {} steps)",
        outcome, report.state, report.steps
    );
    for (i, tape) in report.tapes.iter().enumerate() {
        println!("Tape {}: {}", i + 1, tape);
    }
    println!("Output: {}", report.result);
}
