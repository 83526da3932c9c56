use jobgraph_core::{JobFilter, JobId, JobSnapshot, JobStatus, StatusCounts, format_range};
use jobgraph_layout::{
    DependencyGraph, GraphLayout, GroupId, JobGroup, LayoutConfig, Point, ViewState,
    to_text_listing,
};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Engine(jobgraph_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Engine(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<jobgraph_core::Error> for CliError {
    fn from(value: jobgraph_core::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Layout,
    Chain,
    Range,
    Summary,
    Mermaid,
    List,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    expand: Vec<String>,
    pins: Vec<(String, Point)>,
    job: Option<JobId>,
    range_ids: Vec<JobId>,
    filter: JobFilter,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    groups: &'a [JobGroup],
    layout: &'a GraphLayout,
    cycles: &'a [Vec<GroupId>],
}

fn usage() -> &'static str {
    "jobgraph-cli\n\
\n\
USAGE:\n\
  jobgraph-cli [layout] [--pretty] [--config <path>] [--expand <group-id>]... [--pin <node-id>=<x>,<y>]... [FILTERS] [<path>|-]\n\
  jobgraph-cli chain --job <id> [--pretty] [FILTERS] [<path>|-]\n\
  jobgraph-cli range <id>...\n\
  jobgraph-cli summary [--pretty] [FILTERS] [<path>|-]\n\
  jobgraph-cli mermaid [FILTERS] [<path>|-]\n\
  jobgraph-cli list [FILTERS] [<path>|-]\n\
\n\
FILTERS:\n\
  --status <STATUS>   keep jobs with this status\n\
  --group <name>      keep jobs with this group name\n\
  --search <text>     keep jobs whose command or id contains <text>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the scheduler JSON is read from stdin.\n\
  - Input is a `{ \"jobs\": [...] }` listing, a bare job array, or a web server envelope.\n\
  - --config points at a JSON file with levelSpacing/nodeSpacing/levelOffsetX/levelOffsetY.\n\
  - Set JOBGRAPH_LOG (e.g. `debug`) to see engine diagnostics on stderr.\n\
"
}

fn parse_pin(raw: &str) -> Option<(String, Point)> {
    let (id, coords) = raw.rsplit_once('=')?;
    let (x, y) = coords.split_once(',')?;
    let x = x.trim().parse::<f64>().ok()?;
    let y = y.trim().parse::<f64>().ok()?;
    if id.is_empty() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((id.to_string(), Point::new(x, y)))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut positional: Vec<String> = Vec::new();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" if positional.is_empty() => args.command = Command::Layout,
            "chain" if positional.is_empty() => args.command = Command::Chain,
            "range" if positional.is_empty() => args.command = Command::Range,
            "summary" if positional.is_empty() => args.command = Command::Summary,
            "mermaid" if positional.is_empty() => args.command = Command::Mermaid,
            "list" if positional.is_empty() => args.command = Command::List,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--expand" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.expand.push(id.clone());
            }
            "--pin" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let pin = parse_pin(raw).ok_or(CliError::Usage(usage()))?;
                args.pins.push(pin);
            }
            "--job" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.job = Some(
                    id.trim()
                        .parse::<JobId>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--status" => {
                let Some(status) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.filter.status = Some(JobStatus::parse(status));
            }
            "--group" => {
                let Some(group) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.filter.group = Some(group.clone());
            }
            "--search" => {
                let Some(query) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.filter.search = Some(query.clone());
            }
            "--" => positional.extend(it.by_ref().cloned()),
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            value => positional.push(value.to_string()),
        }
    }

    match args.command {
        Command::Range => {
            if positional.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            args.range_ids = positional
                .iter()
                .map(|id| id.trim().parse::<JobId>())
                .collect::<Result<_, _>>()
                .map_err(|_| CliError::Usage(usage()))?;
        }
        Command::Chain if args.job.is_none() => return Err(CliError::Usage(usage())),
        _ => {
            if positional.len() > 1 {
                return Err(CliError::Usage(usage()));
            }
            args.input = positional.pop();
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<LayoutConfig, CliError> {
    match path {
        None => Ok(LayoutConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(LayoutConfig::from_json_str(&text)?)
        }
    }
}

fn view_state(args: &Args, graph: &DependencyGraph) -> ViewState {
    let mut view = ViewState::new();
    for id in &args.expand {
        let id = GroupId::from(id.as_str());
        if graph.grouping().group(&id).is_none() {
            tracing::warn!(group = %id, "--expand names no group; ignored");
            continue;
        }
        view.set_expanded(&id, true);
    }
    for (node, point) in &args.pins {
        view.move_node(node.clone(), *point);
    }
    view
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("JOBGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    if args.command == Command::Range {
        println!("{}", format_range(&args.range_ids));
        return Ok(());
    }

    let text = read_input(args.input.as_deref())?;
    let snapshot = JobSnapshot::from_json_str(&text)?;
    tracing::debug!(jobs = snapshot.jobs.len(), "read scheduler snapshot");

    match args.command {
        Command::Range => Ok(()),
        Command::Summary => {
            let counts = if args.filter.is_empty() {
                snapshot.stats
            } else {
                StatusCounts::from_jobs(&args.filter.apply(&snapshot.jobs))
            };
            write_json(&counts, args.pretty)
        }
        Command::Mermaid => {
            print!("{}", jobgraph_layout::to_mermaid(&args.filter.apply(&snapshot.jobs)));
            Ok(())
        }
        Command::List => {
            print!("{}", to_text_listing(&args.filter.apply(&snapshot.jobs)));
            Ok(())
        }
        Command::Chain => {
            let graph = DependencyGraph::from_snapshot(&snapshot, &args.filter);
            let Some(job) = args.job else {
                return Err(CliError::Usage(usage()));
            };
            if graph.jobs().iter().all(|j| j.id != job) {
                tracing::warn!(job, "focus job is not in the job list");
            }
            let chain: Vec<JobId> = graph.chain(job).into_iter().collect();
            write_json(&chain, args.pretty)
        }
        Command::Layout => {
            let config = load_config(args.config.as_deref())?;
            let graph = DependencyGraph::from_snapshot(&snapshot, &args.filter);
            for (job, missing) in graph.inactive_dependencies() {
                tracing::debug!(job, ?missing, "inactive dependencies");
            }
            let view = view_state(&args, &graph);
            let layout = graph.layout(&view, &config);
            let cycles = graph.cycles();
            let out = LayoutOut {
                groups: graph.groups(),
                layout: &layout,
                cycles: &cycles,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
