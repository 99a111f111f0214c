use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;

use client::api::{ApiClient, DiffKind, SelectedFile};
use client::config::{PostUploadStrategy, WorkflowConfig};
use client::naming::RenameStrategy;
use client::store::{JsonNameStore, NameStore};
use client::workflow::{Workflow, WorkflowOutcome};

#[derive(Parser)]
#[command(name = "modrelay", version, about = "Upload mod archives and fetch version-diff reports")]
struct Cli {
    /// Base URL of the gateway.
    #[arg(long, env = "MODRELAY_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Path of the name-mapping state file.
    #[arg(long, env = "MODRELAY_NAMES_FILE")]
    names_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the gateway is reachable.
    Health,
    /// Upload an archive and wait for the conversion result.
    Upload {
        /// Archive to upload.
        file: PathBuf,
        /// Target game version to convert against.
        #[arg(long, short)]
        version: String,
        /// Poll for comparison logs instead of requesting a one-shot
        /// conversion.
        #[arg(long)]
        poll: bool,
        /// Derive assigned names from the submission time instead of the
        /// persisted counter.
        #[arg(long)]
        timestamp_names: bool,
        /// Seconds to wait before the conversion request, or between polls.
        #[arg(long, default_value_t = 5)]
        delay: u64,
    },
    /// Download the latest diff report.
    Download {
        /// Fetch the report scoped to the uploaded archive.
        #[arg(long)]
        mod_file: bool,
        /// Directory to save the report into.
        #[arg(long, short, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the newest diff report to stdout.
    Latest,
    /// List recorded assigned-to-original name mappings.
    Mappings,
}

fn names_file(cli_path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }
    let base = dirs::data_dir().context("No data directory available on this platform")?;
    Ok(base.join("modrelay").join("names.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing_subscriber::filter::LevelFilter::WARN)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.url).context("Invalid gateway URL")?;

    match cli.command {
        Commands::Health => {
            api.health().await.context("Gateway is not reachable")?;
            println!("{} {}", style("ok").green().bold(), cli.url);
        }
        Commands::Upload {
            file,
            version,
            poll,
            timestamp_names,
            delay,
        } => {
            let selected = SelectedFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let delay = Duration::from_secs(delay);
            let config = WorkflowConfig {
                rename: if timestamp_names {
                    RenameStrategy::Timestamp
                } else {
                    RenameStrategy::Counter
                },
                post_upload: if poll {
                    PostUploadStrategy::Poll {
                        interval: delay,
                        max_retries: 3,
                    }
                } else {
                    PostUploadStrategy::ConvertAfterDelay { delay }
                },
                ..WorkflowConfig::default()
            };

            let names = JsonNameStore::new(names_file(cli.names_file)?);
            let mut workflow = Workflow::new(api, names, config);

            println!(
                "{} {} (target {})",
                style("uploading").cyan().bold(),
                selected.name,
                version
            );
            match workflow.run(selected, &version).await {
                Ok(outcome) => {
                    println!("{} {}", style("done").green().bold(), outcome.render());
                    if let WorkflowOutcome::Logs(logs) = &outcome {
                        if let Some(report) = &logs.diff_report {
                            for line in report {
                                println!("  {line}");
                            }
                        }
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", style("error").red().bold(), e.user_message());
                    return Err(e.into());
                }
            }
        }
        Commands::Download { mod_file, out_dir } => {
            let kind = if mod_file {
                DiffKind::ModFile
            } else {
                DiffKind::Latest
            };
            let report = api
                .download_diff(kind)
                .await
                .context("Failed to download the diff report")?;
            let path = report
                .save_to(&out_dir)
                .await
                .with_context(|| format!("Failed to save into {}", out_dir.display()))?;
            println!("{} {}", style("saved").green().bold(), path.display());
        }
        Commands::Latest => {
            let doc = api
                .latest_diff()
                .await
                .context("Failed to fetch the latest diff report")?;
            if let Some(name) = &doc.filename {
                eprintln!("{} {}", style("report").cyan().bold(), name);
            }
            print!("{}", doc.content);
        }
        Commands::Mappings => {
            let names = JsonNameStore::new(names_file(cli.names_file)?);
            let mappings = names.mappings().context("Failed to read the name store")?;
            if mappings.is_empty() {
                println!("No mappings recorded yet.");
            } else {
                for (assigned, original) in mappings {
                    println!("{}  {}", style(assigned).bold(), original);
                }
            }
        }
    }

    Ok(())
}
