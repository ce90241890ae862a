use std::fmt;

use tracing_subscriber::EnvFilter;

use review_core::Clock;
use review_core::listing::{Category, ListQuery};
use review_core::model::{QuestionId, QuestionRecord, ReviewStatus};
use services::{
    LocalizationService, NavigationService, NoopNavigator, NoteSaveOutcome, PRACTICE_ROUTE,
    ReviewFlowService, StaticCatalog, StatusUpdateOutcome, section_name_key,
};
use storage::Storage;
use storage::sample::sample_error_log;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingId,
    InvalidId { raw: String },
    InvalidPage { raw: String },
    InvalidPageSize { raw: String },
    InvalidStatus { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingId => write!(f, "review requires --id <record-id>"),
            ArgsError::InvalidId { raw } => write!(f, "invalid --id value: {raw}"),
            ArgsError::InvalidPage { raw } => write!(f, "invalid --page value: {raw}"),
            ArgsError::InvalidPageSize { raw } => write!(f, "invalid --page-size value: {raw}"),
            ArgsError::InvalidStatus { raw } => write!(f, "invalid --status value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list   [--category <all|language|math>] [--page <n>] [--page-size <n>]");
    eprintln!("  cargo run -p app -- review --id <record-id> [--status <needs_review|reviewed>] [--note <text>]");
    eprintln!();
    eprintln!("Defaults for list:");
    eprintln!("  --category all");
    eprintln!("  --page 1");
    eprintln!("  --page-size 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REVIEW_PAGE_SIZE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Review,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "review" => Some(Self::Review),
            _ => None,
        }
    }
}

struct ListArgs {
    category: Category,
    page: usize,
    page_size: usize,
}

impl ListArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut category = Category::All;
        let mut page = 1usize;
        let mut page_size = std::env::var("REVIEW_PAGE_SIZE")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(review_core::listing::DEFAULT_PAGE_SIZE);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--category" => {
                    let value = require_value(args, "--category")?;
                    category = Category::from_tag(&value);
                }
                "--page" => {
                    let value = require_value(args, "--page")?;
                    page = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPage { raw: value.clone() })?;
                }
                "--page-size" => {
                    let value = require_value(args, "--page-size")?;
                    page_size = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPageSize { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            category,
            page,
            page_size,
        })
    }

    fn query(&self) -> ListQuery {
        ListQuery::new()
            .with_category(self.category)
            .with_page_size(self.page_size)
            .with_page(self.page)
    }
}

struct ReviewArgs {
    id: QuestionId,
    status: Option<ReviewStatus>,
    note: Option<String>,
}

impl ReviewArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut id = None;
        let mut status = None;
        let mut note = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--id" => {
                    let value = require_value(args, "--id")?;
                    id = Some(
                        value
                            .parse::<QuestionId>()
                            .map_err(|_| ArgsError::InvalidId { raw: value.clone() })?,
                    );
                }
                "--status" => {
                    let value = require_value(args, "--status")?;
                    status = Some(
                        value
                            .parse::<ReviewStatus>()
                            .map_err(|_| ArgsError::InvalidStatus { raw: value.clone() })?,
                    );
                }
                "--note" => {
                    note = Some(require_value(args, "--note")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            id: id.ok_or(ArgsError::MissingId)?,
            status,
            note,
        })
    }
}

fn note_preview(note: &str, max_chars: usize) -> String {
    let mut preview: String = note.chars().take(max_chars).collect();
    if note.chars().count() > max_chars {
        preview.push('\u{2026}');
    }
    preview
}

fn section_display(catalog: &StaticCatalog, record: &QuestionRecord) -> String {
    match record.section_tag().section() {
        Some(section) => catalog.resolve(section_name_key(section)),
        None => record.section_tag().as_str().to_string(),
    }
}

fn print_list(flow: &ReviewFlowService, catalog: &StaticCatalog, query: &ListQuery) {
    let view = flow.page(query);

    println!(
        "{} \u{2014} {} {}",
        catalog.resolve("practice.error_analysis"),
        flow.log().len(),
        catalog.resolve("error_logs.question"),
    );
    println!();

    if view.is_empty() {
        println!("(no records on this page)");
    }
    for record in &view.items {
        let status = flow.log().status_of(record.id());
        println!(
            "  #{:<3} [{}] answered {} / correct {}  {:<12}  {}",
            record.id().value(),
            section_display(catalog, record),
            record.selected_answer(),
            record.question().correct_answer,
            status.as_str(),
            note_preview(record.note(), 40),
        );
    }

    println!();
    println!(
        "page {} of {} ({} matching, {} per page)",
        view.page,
        view.page_count().max(1),
        view.total,
        view.page_size,
    );
}

fn print_record(catalog: &StaticCatalog, record: &QuestionRecord) {
    println!("{}", catalog.resolve("practice.review_question"));
    println!();
    println!("[{}]", section_display(catalog, record));
    println!("{}: {}", catalog.resolve("score_details.question"), record.question().text);
    println!();
    println!("{}:", catalog.resolve("score_details.answer_options"));
    for (letter, text) in &record.question().answers {
        let mut marks = String::new();
        if record.question().is_correct_option(*letter) {
            marks.push_str(" (correct)");
        }
        if *letter == record.selected_answer() {
            marks.push_str(" (your answer)");
        }
        println!("  {}. {text}{marks}", letter.as_char().to_ascii_uppercase());
    }
    println!();
    let note = record.note();
    if note.is_empty() {
        println!(
            "{}: {}",
            catalog.resolve("practice.notes"),
            catalog.resolve("practice.no_notes_yet"),
        );
    } else {
        println!("{}: {note}", catalog.resolve("practice.notes"));
    }
}

async fn run_review(
    flow: &mut ReviewFlowService,
    catalog: &StaticCatalog,
    args: ReviewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    flow.open_review(args.id)?;

    if let Some(record) = flow.active_record() {
        print_record(catalog, record);
    }

    if let Some(status) = args.status {
        println!();
        match flow.set_status(status).await {
            StatusUpdateOutcome::Applied { status, .. } => {
                println!("{}: {status}", catalog.resolve("error_logs.status_updated"));
            }
            StatusUpdateOutcome::RolledBack => {
                println!("{}", catalog.resolve("error_logs.status_update_failed"));
            }
            StatusUpdateOutcome::Ignored | StatusUpdateOutcome::Stale => {}
        }
    }

    if let Some(note) = args.note {
        println!();
        flow.toggle_edit();
        flow.edit_draft(note);
        match flow.save_note().await {
            NoteSaveOutcome::Committed { .. } => {
                println!("{}", catalog.resolve("error_logs.note_updated"));
            }
            NoteSaveOutcome::Rejected => {
                println!("{}", catalog.resolve("error_logs.note_required"));
            }
            NoteSaveOutcome::Failed => {
                println!("{}", catalog.resolve("error_logs.note_update_failed"));
            }
            NoteSaveOutcome::Stale => {}
        }
    }

    flow.close_review();
    NoopNavigator.go_back(PRACTICE_ROUTE);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: list the mistake log when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::List,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::List,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if matches!(cmd, Command::List | Command::Review)
        && !argv.is_empty()
        && !argv[0].starts_with("--")
    {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();

    let storage = Storage::seeded(sample_error_log()?);
    let catalog = StaticCatalog::english();
    let mut flow = ReviewFlowService::new(Clock::default(), &storage);

    // A failed load is not fatal: the screen just shows zero records.
    if flow.load().await.is_err() {
        eprintln!("could not load the mistake log; showing an empty list");
    }

    match cmd {
        Command::List => {
            let args = ListArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            print_list(&flow, &catalog, &args.query());
            Ok(())
        }
        Command::Review => {
            let args = ReviewArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            run_review(&mut flow, &catalog, args).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
