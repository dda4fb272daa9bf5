use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reader_core::location::DocumentLocation;
use reader_core::model::PageIndex;
use reader_core::path::PathRoots;
use services::{
    BookmarkService, NavOutcome, PageViewer, ProgressSync, SharedViewer, SiblingNavigatorService,
    SyncLoopService,
};
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingDocument,
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingDocument => {
                write!(f, "--document (or READER_DOCUMENT) is required")
            }
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
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

struct Args {
    server_url: String,
    document: String,
    pages: u32,
    poll: Duration,
    static_prefix: String,
    document_root: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --document <url-or-path> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --server <url>         Progress server base URL (default: http://127.0.0.1:1506)");
    eprintln!("  --document <href>      Document being read (URL or absolute path)");
    eprintln!("  --pages <n>            Viewer page count (default: 0)");
    eprintln!("  --poll-ms <n>          Polling period in milliseconds (default: 300)");
    eprintln!("  --static-prefix <seg>  Static mount segment (default: static)");
    eprintln!("  --document-root <seg>  Document root segment (default: manga)");
    eprintln!("  -h, --help             Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  READER_SERVER_URL, READER_DOCUMENT");
    eprintln!();
    eprintln!("Commands on stdin:");
    eprintln!("  <n>        flip the viewer to page n");
    eprintln!("  n / p      go to the next / previous document");
    eprintln!("  marks      list bookmarks for this document");
    eprintln!("  mark <t>   bookmark the current page as <t>");
    eprintln!("  unmark <t> remove the bookmark <t>");
    eprintln!("  lib / esc  return to the library");
    eprintln!("  q          quit");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut server_url = std::env::var("READER_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:1506".into());
        let mut document = std::env::var("READER_DOCUMENT").ok();
        let mut pages: u32 = 0;
        let mut poll = services::DEFAULT_POLL_INTERVAL;
        let mut static_prefix = "static".to_string();
        let mut document_root = "manga".to_string();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" => server_url = require_value(args, "--server")?,
                "--document" => document = Some(require_value(args, "--document")?),
                "--pages" => {
                    let value = require_value(args, "--pages")?;
                    pages = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--pages",
                        raw: value.clone(),
                    })?;
                }
                "--poll-ms" => {
                    let value = require_value(args, "--poll-ms")?;
                    let millis: u64 = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--poll-ms",
                        raw: value.clone(),
                    })?;
                    poll = Duration::from_millis(millis);
                }
                "--static-prefix" => static_prefix = require_value(args, "--static-prefix")?,
                "--document-root" => document_root = require_value(args, "--document-root")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            server_url,
            document: document.ok_or(ArgsError::MissingDocument)?,
            pages,
            poll,
            static_prefix,
            document_root,
        })
    }
}

fn report(outcome: &NavOutcome) {
    match outcome {
        NavOutcome::Navigate(route) => println!("-> {route}"),
        NavOutcome::NoPrevious => println!("no previous document"),
        NavOutcome::NoNext => println!("no next document"),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let roots = PathRoots::new(parsed.static_prefix, parsed.document_root);
    let storage = Storage::http(&parsed.server_url);
    let viewer = SharedViewer::new(parsed.pages);
    let location = DocumentLocation::parse(&parsed.document)?;

    let sync = ProgressSync::new(roots.clone(), &location, &viewer);
    let sync_loop = SyncLoopService::new(
        Arc::clone(&storage.progress),
        Arc::new(viewer.clone()),
        sync,
    )
    .with_poll_interval(parsed.poll);

    // The loop runs for the lifetime of the view; dropped with the process.
    tokio::spawn(sync_loop.run());

    let navigator =
        SiblingNavigatorService::new(Arc::clone(&storage.progress)).with_roots(roots.clone());
    let bookmarks = BookmarkService::new(Arc::clone(&storage.bookmarks)).with_roots(roots);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Ok(page) = input.parse::<u32>() {
            viewer.set_page_number(page);
            continue;
        }
        match input.split_once(' ').map_or((input, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("n", _) | ("next", _) => match navigator.next(&location).await {
                Ok(outcome) => report(&outcome),
                Err(err) => log::warn!("next-document lookup failed: {err}"),
            },
            ("p", _) | ("prev", _) => match navigator.previous(&location).await {
                Ok(outcome) => report(&outcome),
                Err(err) => log::warn!("previous-document lookup failed: {err}"),
            },
            ("marks", _) => match bookmarks.list(&location).await {
                Ok(list) if list.is_empty() => println!("no bookmarks"),
                Ok(list) => {
                    for bookmark in list {
                        println!(
                            "{} @ page {}",
                            bookmark.title,
                            bookmark.page_idx.display_number()
                        );
                    }
                }
                Err(err) => log::warn!("bookmark list failed: {err}"),
            },
            ("mark", title) => {
                let Some(page) = viewer
                    .page_number()
                    .and_then(PageIndex::from_display_number)
                else {
                    println!("viewer page is unreadable");
                    continue;
                };
                match bookmarks.save(&location, title, page).await {
                    Ok(_) => println!("bookmarked page {}", page.display_number()),
                    Err(err) => log::warn!("bookmark save failed: {err}"),
                }
            }
            ("unmark", title) => {
                if let Err(err) = bookmarks.remove(&location, title).await {
                    log::warn!("bookmark delete failed: {err}");
                }
            }
            ("lib", _) | ("esc", _) => println!("-> {}", navigator.library_route()),
            ("q", _) | ("quit", _) => break,
            _ => println!("unknown command: {input}"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
