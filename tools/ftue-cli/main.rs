use clap::{Args, Parser, Subcommand, ValueEnum};
use ftue::prelude::*;
use ftue::preview::FinishReason;
use ftue::storage::export_flow_json;
use std::io::{self, Write};
use std::time::Instant;

/// Tutorial flow authoring tools: inspect, validate, preview and publish flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow library JSON file
    #[arg(short, long, default_value = "data/flows.json")]
    library: String,

    /// Log verbosity (-v info, -vv debug); RUST_LOG overrides it
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List flows, highest priority first
    List {
        #[arg(short, long, value_enum, default_value_t = StatusCli::All)]
        status: StatusCli,
        /// Case-insensitive search on name and id
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print a flow as JSON
    Show {
        flow_id: String,
        /// Print the compiled condition trees of every step instead
        #[arg(long)]
        compiled: bool,
    },
    /// Validate a flow and list its issues
    Validate { flow_id: String },
    /// Walk a flow against a simulated player
    Preview(PreviewArgs),
    /// Compile a flow into a bincode bundle and mark it active
    Publish {
        flow_id: String,
        /// Where to write the bundle
        #[arg(short, long)]
        out: String,
        /// Write the status change back to the library file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
struct PreviewArgs {
    flow_id: String,
    /// Player state JSON; a fresh player when omitted
    #[arg(short, long)]
    player: Option<String>,
    /// Preview config JSON; flags below override it
    #[arg(short, long)]
    config: Option<String>,
    #[arg(long)]
    auto_advance_ms: Option<u64>,
    #[arg(long)]
    max_visits: Option<usize>,
    /// Run steps even when their entry conditions do not hold
    #[arg(long)]
    ignore_entry: bool,
    /// User actions to perform in order, as `action` or `action:Target`
    #[arg(short = 'a', long = "act")]
    actions: Vec<String>,
    /// Milliseconds to advance after each user action
    #[arg(long, default_value_t = 0)]
    step_ms: u64,
    /// Milliseconds to advance once all user actions ran
    #[arg(long, default_value_t = 0)]
    run_ms: u64,
    /// Run in interactive mode to be prompted for user actions
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusCli {
    All,
    Active,
    Inactive,
    Draft,
}

impl From<StatusCli> for StatusFilter {
    fn from(status: StatusCli) -> Self {
        match status {
            StatusCli::All => StatusFilter::All,
            StatusCli::Active => StatusFilter::Only(FlowStatus::Active),
            StatusCli::Inactive => StatusFilter::Only(FlowStatus::Inactive),
            StatusCli::Draft => StatusFilter::Only(FlowStatus::Draft),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut library = FlowLibrary::load(&cli.library).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load library '{}': {}", cli.library, e))
    });

    match cli.command {
        Command::List { status, query } => run_list(&library, status.into(), &query),
        Command::Show { flow_id, compiled } => run_show(&library, &flow_id, compiled),
        Command::Validate { flow_id } => run_validate(&library, &flow_id),
        Command::Preview(args) => run_preview(&library, args),
        Command::Publish { flow_id, out, save } => {
            run_publish(&mut library, &flow_id, &out);
            if save {
                library.save(&cli.library).unwrap_or_else(|e| {
                    exit_with_error(&format!("Failed to save library: {}", e))
                });
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn find_flow<'a>(library: &'a FlowLibrary, flow_id: &str) -> &'a Flow {
    library
        .get(flow_id)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn run_list(library: &FlowLibrary, filter: StatusFilter, query: &str) {
    let flows = library.list(filter, query);
    if flows.is_empty() {
        println!("No flows match.");
        return;
    }

    println!(
        "{:<28} {:<32} {:>6} {:>5} {:>8}  {:<9} Modified",
        "Id", "Name", "Legacy", "Steps", "Priority", "Status"
    );
    for flow in flows {
        println!(
            "{:<28} {:<32} {:>6} {:>5} {:>8}  {:<9} {}",
            flow.id,
            flow.name,
            flow.legacy,
            flow.step_count(),
            flow.priority,
            flow.status,
            flow.modified
        );
    }
}

fn run_show(library: &FlowLibrary, flow_id: &str, compiled: bool) {
    let flow = find_flow(library, flow_id);
    if compiled {
        print_compiled(flow);
        return;
    }
    let json = export_flow_json(flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render flow: {}", e)));
    println!("{}", json);
}

fn print_compiled(flow: &Flow) {
    let bundle = PublishedFlow::compile(flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    for step in &bundle.steps {
        let next = step
            .next
            .and_then(|i| bundle.steps.get(i as usize))
            .map_or("end".to_string(), |s| format!("'{}'", s.id));
        println!("\nStep '{}' (#{}) -> {}", step.id, step.legacy, next);
        for (label, expression) in [("entry", &step.entry), ("completion", &step.completion)] {
            if expression.is_always_true() {
                println!("  {}: always", label);
                continue;
            }
            let mut inputs = Vec::new();
            expression.inputs(&mut inputs);
            let reads: Vec<String> = inputs.iter().map(|i| i.to_string()).collect();
            println!("  {} (reads {}):", label, reads.join(", "));
            for line in expression.to_string().lines() {
                println!("    {}", line);
            }
        }
    }
}

fn run_validate(library: &FlowLibrary, flow_id: &str) {
    let flow = find_flow(library, flow_id);
    let report = validate(flow);

    for issue in &report.issues {
        println!("  {}", issue);
    }
    println!(
        "\n'{}': {} error(s), {} warning(s)",
        flow.id,
        report.error_count(),
        report.warning_count()
    );
    if !report.is_valid() {
        std::process::exit(1);
    }
}

fn run_publish(library: &mut FlowLibrary, flow_id: &str, out: &str) {
    let start = Instant::now();
    let bundle = match library.publish(flow_id) {
        Ok(bundle) => bundle,
        Err(EditError::ValidationFailed { report, .. }) => {
            for issue in report.errors() {
                eprintln!("  {}", issue);
            }
            exit_with_error(&format!("'{}' has validation errors", flow_id));
        }
        Err(e) => exit_with_error(&e.to_string()),
    };
    bundle
        .save(out)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write bundle: {}", e)));

    println!(
        "Published '{}' ({} steps) to '{}' in {:?}",
        bundle.id,
        bundle.steps.len(),
        out,
        start.elapsed()
    );
}

fn load_config(args: &PreviewArgs) -> PreviewConfig {
    let mut config = match &args.config {
        Some(path) => PreviewConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load preview config '{}': {}", path, e))
        }),
        None => PreviewConfig::default(),
    };
    if let Some(ms) = args.auto_advance_ms {
        config.auto_advance_ms = ms;
    }
    if let Some(visits) = args.max_visits {
        config.max_visits = visits;
    }
    if args.ignore_entry {
        config.skip_unmet_entry = false;
    }
    config
}

fn run_preview(library: &FlowLibrary, args: PreviewArgs) {
    let flow = find_flow(library, &args.flow_id);
    let config = load_config(&args);
    let player = match &args.player {
        Some(path) => PlayerState::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load player '{}': {}", path, e))
        }),
        None => {
            println!("No player file provided. Using a fresh player.");
            PlayerState::default()
        }
    };

    let mut preview = Preview::new(flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to prepare preview: {}", e)))
        .with_player(player)
        .with_config(config);
    preview
        .start()
        .unwrap_or_else(|e| exit_with_error(&format!("Preview failed: {}", e)));

    if args.human {
        run_interactive(&mut preview);
    } else {
        for entry in &args.actions {
            if !preview.is_running() {
                break;
            }
            let (action, target) = parse_user_action(entry);
            perform(&mut preview, &action, target);
            if args.step_ms > 0 && preview.is_running() {
                advance(&mut preview, args.step_ms);
            }
        }
        if args.run_ms > 0 && preview.is_running() {
            advance(&mut preview, args.run_ms);
        }
    }

    print_events(preview.events());
    print_summary(&preview);
}

/// Splits `action:Target`; a bare action targets the screen.
fn parse_user_action(input: &str) -> (String, Target) {
    match input.split_once(':') {
        Some((action, target)) => (action.trim().to_string(), Target::parse(target.trim())),
        None => (input.trim().to_string(), Target::Screen),
    }
}

fn perform(preview: &mut Preview, action: &str, target: Target) {
    match preview.perform(action, target) {
        Ok(true) => {}
        Ok(false) => println!("  ! '{}' was rejected", action),
        Err(e) => exit_with_error(&format!("Preview failed: {}", e)),
    }
}

fn advance(preview: &mut Preview, ms: u64) {
    preview
        .advance_time(ms)
        .unwrap_or_else(|e| exit_with_error(&format!("Preview failed: {}", e)));
}

fn print_events(events: &[PreviewEvent]) {
    println!("\n--- Preview Events ---");
    for event in events {
        println!("{}", event);
    }
}

fn print_summary(preview: &Preview) {
    println!("\n--- Preview Summary ---");
    println!("Clock:        {} ms", preview.clock_ms());
    match preview.status() {
        PreviewStatus::Finished(FinishReason::EndOfFlow) => println!("Status:       finished"),
        PreviewStatus::Finished(reason) => println!("Status:       finished ({})", reason),
        PreviewStatus::Running => {
            let step = preview.current_step().map_or("-", |s| s.id.as_str());
            println!("Status:       waiting on step '{}'", step);
        }
        PreviewStatus::NotStarted => println!("Status:       not started"),
    }

    let ui = preview.handler();
    if let Some(dialog) = &ui.dialog {
        println!("Dialog:       {} ({})", dialog.dialog_id, dialog.character);
    }
    if !ui.highlights.is_empty() {
        let names: Vec<String> = ui.highlights.iter().map(|t| t.to_string()).collect();
        println!("Highlighted:  {}", names.join(", "));
    }
    if ui.lock_all || !ui.locked.is_empty() {
        println!("Input locks:  all={} targets={}", ui.lock_all, ui.locked.len());
    }
    println!("Analytics:    {} event(s)", ui.analytics.len());
    println!();
}

/// Runs the preview in an interactive, human-friendly mode with prompts.
fn run_interactive(preview: &mut Preview) {
    println!("--- Preview Interactive Mode ---");
    println!("Commands: <action>[:Target], wait <ms>, skip, jump <step>, restart, events, quit");

    while preview.is_running() {
        let step = preview.current_step().map_or("-", |s| s.id.as_str()).to_string();
        let Some(input) = prompt_for_input(&format!("[{} ms] {}", preview.clock_ms(), step)) else {
            break;
        };
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));

        let result = match command {
            "" => continue,
            "quit" | "q" => break,
            "events" => {
                print_events(preview.events());
                Ok(())
            }
            "wait" => match rest.trim().parse::<u64>() {
                Ok(ms) => preview.advance_time(ms),
                Err(_) => {
                    println!("Expected milliseconds, e.g. 'wait 500'");
                    continue;
                }
            },
            "skip" => preview.skip_step(),
            "jump" => preview.jump_to(rest.trim()),
            "restart" => preview.restart(),
            _ => {
                let (action, target) = parse_user_action(&input);
                preview.perform(&action, target).map(|accepted| {
                    if !accepted {
                        println!("  ! rejected; see 'events'");
                    }
                })
            }
        };

        if let Err(e) = result {
            println!("  ! {}", e);
        }
    }
}

/// Prompts the user and reads a line of input. `None` once stdin is closed.
fn prompt_for_input(prompt_text: &str) -> Option<String> {
    let mut line = String::new();

    print!("> {}: ", prompt_text);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }

    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => exit_with_error(&format!("Failed to read line: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
