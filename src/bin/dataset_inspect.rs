use std::path::PathBuf;

use serde::Serialize;
use smarthome_trace::DatasetSession;
use smarthome_trace::core::{Hop, date_label, parse_date_label};
use smarthome_trace::extensions::Progress;

const USAGE: &str = "usage: dataset_inspect <summary|day|hops> --dataset <dir> [--date <YYYY-MM-DD>] [--index <n>] [--window <n>]";
const DEFAULT_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Summary,
    Day,
    Hops,
}

#[derive(Debug)]
struct CliArgs {
    command: CommandKind,
    dataset: PathBuf,
    date: Option<String>,
    index: Option<usize>,
    window: usize,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    name: String,
    site: String,
    start: Option<String>,
    end: Option<String>,
    retained_events: usize,
    days: Vec<DayEntry>,
    residents: Vec<String>,
    activities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DayEntry {
    date: String,
    start: usize,
    length: usize,
}

#[derive(Debug, Serialize)]
struct DayReport {
    date: String,
    events: Vec<EventRow>,
}

#[derive(Debug, Serialize)]
struct EventRow {
    index: usize,
    time: String,
    sensor_id: String,
    sensor_message: String,
    residents: Vec<String>,
    activities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HopsReport {
    date: String,
    index: usize,
    window: usize,
    hops: Vec<ResidentHops>,
}

#[derive(Debug, Serialize)]
struct ResidentHops {
    resident: String,
    hops: Vec<Hop>,
}

fn main() {
    let _ = smarthome_trace::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let mut observer = |progress: &Progress| {
        if let Some(percentage) = progress.percentage() {
            eprintln!("[{percentage:>3}%] {}", progress.message);
        } else {
            eprintln!("{}", progress.message);
        }
    };
    let mut session =
        DatasetSession::open(&args.dataset, &mut observer).map_err(|err| err.to_string())?;

    if let Some(date) = &args.date {
        let date = parse_date_label(date).map_err(|err| err.to_string())?;
        session
            .select_date(date, &mut observer)
            .map_err(|err| err.to_string())?;
    }

    match args.command {
        CommandKind::Summary => print_json(&summary(&session)),
        CommandKind::Day => print_json(&day(&session)),
        CommandKind::Hops => {
            let index = args
                .index
                .ok_or_else(|| "hops requires --index".to_owned())?;
            let hops = session
                .hops(index, args.window)
                .map_err(|err| err.to_string())?;
            print_json(&HopsReport {
                date: date_label(session.current_date()),
                index,
                window: args.window,
                hops: hops
                    .into_iter()
                    .map(|(resident, hops)| ResidentHops { resident, hops })
                    .collect(),
            })
        }
    }
}

fn summary(session: &DatasetSession) -> SummaryReport {
    let log = session.log();
    SummaryReport {
        name: session.name().to_owned(),
        site: session.site().name.clone(),
        start: session.start_timestamp().map(|t| t.to_string()),
        end: session.end_timestamp().map(|t| t.to_string()),
        retained_events: log.lines().len(),
        days: log
            .index()
            .iter()
            .map(|(date, entry)| DayEntry {
                date: date_label(date),
                start: entry.start,
                length: entry.length,
            })
            .collect(),
        residents: session.residents().names().map(str::to_owned).collect(),
        activities: session.activities().names().map(str::to_owned).collect(),
    }
}

fn day(session: &DatasetSession) -> DayReport {
    let current = session.current_day();
    DayReport {
        date: date_label(current.date),
        events: current
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| EventRow {
                index,
                time: event.time_tag.to_string(),
                sensor_id: event.sensor_id.clone(),
                sensor_message: event.sensor_message.clone(),
                residents: event
                    .residents
                    .iter()
                    .filter_map(|id| session.residents().get(*id))
                    .map(|resident| resident.name.clone())
                    .collect(),
                activities: event
                    .activities
                    .iter()
                    .filter_map(|id| session.activities().get(*id))
                    .map(|activity| activity.name.clone())
                    .collect(),
            })
            .collect(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("summary") => CommandKind::Summary,
        Some("day") => CommandKind::Day,
        Some("hops") => CommandKind::Hops,
        _ => return Err(USAGE.to_owned()),
    };

    let mut dataset = None::<PathBuf>;
    let mut date = None::<String>;
    let mut index = None::<usize>;
    let mut window = DEFAULT_WINDOW;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--dataset" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --dataset".to_owned())?;
                dataset = Some(PathBuf::from(value));
            }
            "--date" => {
                date = Some(
                    args.next()
                        .ok_or_else(|| "missing value for --date".to_owned())?,
                );
            }
            "--index" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --index".to_owned())?;
                index = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --index value `{value}`"))?,
                );
            }
            "--window" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --window".to_owned())?;
                window = value
                    .parse()
                    .map_err(|_| format!("invalid --window value `{value}`"))?;
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        command,
        dataset: dataset.ok_or_else(|| "missing --dataset".to_owned())?,
        date,
        index,
        window,
    })
}
