//! # CLI Module
//!
//! Terminal front end for the photo review client.
//!
//! ## Usage
//! ```bash
//! # Scan a folder and review with the server's recommendations
//! photo-review scan ~/Photos
//!
//! # Keep only edited photos in every group, no prompt
//! photo-review scan ~/Photos --lrcat ~/Lightroom/Main.lrcat --policy edited --yes
//!
//! # Show what would be deleted
//! photo-review scan ~/Photos --dry-run --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_review_client::core::backend::{HttpBackend, WebSocketConnector};
use photo_review_client::core::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_THRESHOLD};
use photo_review_client::core::decisions::{BulkPolicy, Verdict};
use photo_review_client::core::delete::{DeleteOutcome, DeletePlan};
use photo_review_client::core::model::format_file_size;
use photo_review_client::core::progress::Transport;
use photo_review_client::core::session::AutoPlan;
use photo_review_client::core::workflow::{FolderChoice, ScanOutcome, Workflow};
use photo_review_client::error::{DeleteError, Result, ReviewError, ScanError};
use photo_review_client::events::{DeleteEvent, Event, EventChannel, ScanEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Photo Review - clean up similar photos without surprises
#[derive(Parser, Debug)]
#[command(name = "photo-review")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scanning server address
    #[arg(long, global = true, env = "PHOTO_REVIEW_SERVER", default_value = DEFAULT_BASE_URL)]
    server: String,

    /// Status polling interval in milliseconds when live progress is unavailable
    #[arg(long, global = true, default_value = "1000")]
    poll_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a folder and review similar photos
    Scan {
        /// Folder to scan (opens the server's folder dialog when omitted)
        directory: Option<String>,

        /// Similarity threshold (lower = stricter)
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// Include plain image files, not only RAW
        #[arg(long)]
        include_images: bool,

        /// Lightroom catalog to read edit and rating data from
        #[arg(long)]
        lrcat: Option<PathBuf>,

        /// How verdicts are chosen for each group
        #[arg(short, long, default_value = "recommended")]
        policy: Policy,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Show the delete set but do not delete
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask the server to open its native folder dialog
    PickFolder,

    /// Clear the server's scan state
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Use the server's keep/delete recommendations (default)
    Recommended,
    /// Apply every recommendation at once and show the cleanup plan
    Auto,
    /// Keep every photo
    All,
    /// Keep the first photo of each group
    First,
    /// Keep edited photos; groups without edits keep the recommendation
    Edited,
}

impl Policy {
    fn bulk(self) -> Option<BulkPolicy> {
        match self {
            Policy::Recommended | Policy::Auto => None,
            Policy::All => Some(BulkPolicy::All),
            Policy::First => Some(BulkPolicy::First),
            Policy::Edited => Some(BulkPolicy::Edited),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

type HttpWorkflow = Workflow<HttpBackend>;

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            directory,
            threshold,
            include_images,
            lrcat,
            policy,
            output,
            dry_run,
            yes,
        } => {
            let config = ClientConfig::builder()
                .base_url(cli.server)
                .poll_interval(Duration::from_millis(cli.poll_ms))
                .default_threshold(threshold)
                .include_images(include_images)
                .build()?;
            let options = ScanOptions {
                directory,
                lrcat,
                policy,
                output,
                dry_run,
                yes,
            };
            run_scan(config, options).await
        }
        Commands::PickFolder => {
            let config = ClientConfig::builder().base_url(cli.server).build()?;
            let (workflow, _events) = connect(config, false)?;
            match workflow.pick_folder().await {
                FolderChoice::Picked(path) => println!("{}", path),
                FolderChoice::ManualEntry => {
                    eprintln!("No folder dialog available; pass the folder path instead")
                }
            }
            Ok(())
        }
        Commands::Reset => {
            let config = ClientConfig::builder().base_url(cli.server).build()?;
            let (mut workflow, _events) = connect(config, false)?;
            workflow.reset().await;
            eprintln!("{} Server state cleared", style("✓").green().bold());
            Ok(())
        }
    }
}

struct ScanOptions {
    directory: Option<String>,
    lrcat: Option<PathBuf>,
    policy: Policy,
    output: OutputFormat,
    dry_run: bool,
    yes: bool,
}

/// Build a workflow over HTTP; with `show_progress` a thread renders events
fn connect(
    config: ClientConfig,
    show_progress: bool,
) -> Result<(HttpWorkflow, Option<thread::JoinHandle<()>>)> {
    let backend = Arc::new(HttpBackend::new(&config)?);
    let push = Arc::new(WebSocketConnector::new(&config)?);
    tracing::debug!(url = %push.url(), "Progress stream endpoint");
    let (sender, receiver) = EventChannel::new();

    let renderer = if show_progress {
        Some(thread::spawn(move || render_events(receiver.iter())))
    } else {
        None
    };

    Ok((Workflow::new(config, backend, push, sender), renderer))
}

fn render_events(events: impl Iterator<Item = Event>) {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    for event in events {
        match event {
            Event::Scan(ScanEvent::Connected { transport }) => {
                let via = match transport {
                    Transport::Push => "live updates",
                    Transport::Poll => "status polling",
                };
                pb.println(format!("{}", style(format!("Following progress via {}", via)).dim()));
            }
            Event::Scan(ScanEvent::Progress(p)) => {
                if let Some(percent) = p.percent {
                    pb.set_position(u64::from(percent));
                }
                match p.message {
                    Some(message) => pb.set_message(format!("{} {}", p.title, style(message).dim())),
                    None => pb.set_message(p.title),
                }
            }
            Event::Scan(ScanEvent::Completed { .. }) | Event::Scan(ScanEvent::Failed { .. }) => {
                pb.finish_and_clear();
            }
            Event::Delete(DeleteEvent::Started { count }) => {
                eprintln!("Deleting {} photos...", count);
            }
            _ => {}
        }
    }
    pb.finish_and_clear();
}

async fn run_scan(config: ClientConfig, options: ScanOptions) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(options.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Review").bold().cyan(),
            style(config.base_url()).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (mut workflow, renderer) = connect(config, pretty)?;

    let directory = match options.directory {
        Some(directory) => directory,
        None => choose_folder(&term, &workflow).await?,
    };

    let mut request = workflow.scan_request(directory);
    if let Some(lrcat) = options.lrcat.as_ref() {
        request = request.lrcat_path(lrcat.display().to_string());
    }

    workflow.start_scan(request).await?;
    let outcome = workflow.run_until_settled().await?;

    if outcome == ScanOutcome::Interrupted {
        term.write_line(&format!(
            "{} Lost contact with the server before the scan finished",
            style("!").yellow().bold()
        ))
        .ok();
        return Ok(());
    }

    let has_groups = workflow
        .session()
        .is_some_and(|s| s.results().group_count() > 0);

    if has_groups {
        if let Some(bulk) = options.policy.bulk() {
            apply_policy(&term, &mut workflow, bulk)?;
        } else if matches!(options.policy, Policy::Auto) {
            match workflow.enter_auto_mode() {
                Ok(plan) if pretty => print_auto_plan(&term, &plan),
                Ok(_) => {}
                Err(e) => {
                    term.write_line(&format!("{} {}", style("!").yellow(), e)).ok();
                }
            }
        }
    }

    let plan = match workflow.prepare_delete() {
        Ok(plan) => Some(plan),
        Err(DeleteError::NothingSelected) => None,
        Err(e) => return Err(e.into()),
    };

    match options.output {
        OutputFormat::Pretty => print_pretty_review(&term, &workflow),
        OutputFormat::Json => print_json_review(&workflow, plan.as_ref()),
    }

    let deleted = match plan {
        Some(plan) if !options.dry_run => {
            if options.yes || confirm(&term, &plan) {
                Some(workflow.commit_delete(&plan).await?)
            } else {
                workflow.close_panel();
                term.write_line("Nothing was deleted.").ok();
                None
            }
        }
        Some(_) => {
            term.write_line(&format!("{}", style("Dry run: nothing was deleted.").dim()))
                .ok();
            None
        }
        None => {
            if pretty && has_groups {
                term.write_line("Nothing is marked for deletion.").ok();
            }
            None
        }
    };

    // Dropping the workflow closes the event channel
    drop(workflow);
    if let Some(renderer) = renderer {
        renderer.join().ok();
    }

    if let Some(outcome) = deleted {
        print_outcome(&term, &outcome);
    }

    Ok(())
}

async fn choose_folder(term: &Term, workflow: &HttpWorkflow) -> Result<String> {
    if let FolderChoice::Picked(path) = workflow.pick_folder().await {
        return Ok(path);
    }

    term.write_str("Folder to scan: ").ok();
    let entered = term.read_line().unwrap_or_default();
    let entered = entered.trim();
    if entered.is_empty() {
        return Err(ScanError::EmptyDirectory.into());
    }
    Ok(entered.to_string())
}

fn apply_policy(term: &Term, workflow: &mut HttpWorkflow, policy: BulkPolicy) -> Result<()> {
    loop {
        match workflow.bulk_apply(policy) {
            Ok(()) => {}
            Err(e @ ReviewError::NoEditedPhotos { .. }) => {
                term.write_line(&format!("{} {}", style("!").yellow(), e)).ok();
            }
            Err(e) => return Err(e.into()),
        }

        if !workflow.next_group() {
            return Ok(());
        }
    }
}

fn confirm(term: &Term, plan: &DeletePlan) -> bool {
    term.write_str(&format!("{} [y/N] ", plan.confirmation_prompt()))
        .ok();
    match term.read_line() {
        Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn print_pretty_review(term: &Term, workflow: &HttpWorkflow) {
    let Some(session) = workflow.session() else {
        return;
    };
    let results = session.results();

    term.write_line("").ok();
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    if let Some(summary) = results.summary() {
        term.write_line(&format!(
            "  {} photos in {} similar groups",
            style(summary.total_photos).cyan(),
            style(summary.total_groups).cyan()
        ))
        .ok();
        term.write_line(&format!(
            "  {} potential space savings",
            style(format!("{:.2} GB", summary.save_gb)).yellow()
        ))
        .ok();
        term.write_line("").ok();
    }

    if results.group_count() == 0 {
        term.write_line("  No similar photos found!").ok();
        return;
    }

    let total = results.group_count();
    for (i, group) in results.groups().iter().enumerate() {
        term.write_line(&format!(
            "  {} ({} photos, {})",
            style(format!("Group {} / {}", i + 1, total)).bold(),
            group.len(),
            format_file_size(group.total_size)
        ))
        .ok();

        let primary = group.primary().map(|p| p.path.as_str());
        for photo in &group.photos {
            let star = if primary == Some(photo.path.as_str()) {
                style("★").yellow().to_string()
            } else {
                " ".to_string()
            };
            let marker = match session.verdict(&photo.path) {
                Verdict::Keep => style("✓ keep  ").green().to_string(),
                Verdict::Delete => style("✗ delete").red().to_string(),
                Verdict::Undecided => style("○       ").dim().to_string(),
            };
            let mut tags = String::new();
            if photo.is_edited {
                tags.push_str(&style(" edited").magenta().to_string());
            }
            if photo.is_rejected() {
                tags.push_str(&style(" rejected").red().to_string());
            }
            term.write_line(&format!(
                "    {} {} {} {} {}{}",
                star,
                marker,
                style(photo.file_name()).bold(),
                style(&photo.path).dim(),
                style(format_file_size(photo.size)).dim(),
                tags
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    let counts = session.counts();
    term.write_line(&format!(
        "  Keep {} / Delete {}",
        style(counts.keep).green(),
        style(counts.delete).red()
    ))
    .ok();
}

fn print_auto_plan(term: &Term, plan: &AutoPlan) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} keep {} / delete {}, saving {:.2} GB",
        style("Automatic cleanup:").bold(),
        style(plan.keep_count).green(),
        style(plan.delete_count).red(),
        plan.save_gb
    ))
    .ok();
    for line in &plan.groups {
        term.write_line(&format!(
            "  Group {}: {} photos, keep {}, delete {} ({})",
            line.group_id,
            line.photo_count,
            line.keep_count,
            line.delete_count,
            format_file_size(line.save_bytes)
        ))
        .ok();
    }
}

fn print_json_review(workflow: &HttpWorkflow, plan: Option<&DeletePlan>) {
    let Some(session) = workflow.session() else {
        return;
    };
    let results = session.results();

    let output = serde_json::json!({
        "summary": results.summary(),
        "groups": results.groups().iter().map(|g| {
            serde_json::json!({
                "group_id": g.group_id,
                "photos": g.photos.iter().map(|p| {
                    serde_json::json!({
                        "path": p.path,
                        "size": p.size,
                        "is_edited": p.is_edited,
                        "verdict": session.verdict(&p.path),
                    })
                }).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>(),
        "delete": plan.map(|p| p.paths().to_vec()).unwrap_or_default(),
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "Could not render results as JSON"),
    }
}

fn print_outcome(term: &Term, outcome: &DeleteOutcome) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        outcome.completion_message()
    ))
    .ok();

    for failure in &outcome.failures {
        term.write_line(&format!(
            "    {} {} {}",
            style("✗").red(),
            failure.path,
            style(&failure.error).dim()
        ))
        .ok();
    }
}
