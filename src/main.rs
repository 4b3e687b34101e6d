/// A CLI to track your Grind 169 practice against the problems API.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute. If no command is given, an interactive shell starts.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the problems API (overrides GRIND_TRACK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print without terminal colours.
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists every problem in the chosen order.
    #[command(name = "list", alias = "ls")]
    List {
        #[arg(long, short, value_enum, default_value_t = SortMode::CurriculumOrder)]
        sort: SortMode,
    },

    /// Adds a new problem.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edits an existing problem. Only the given fields change.
    Edit {
        /// The id of the problem.
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Marks a problem as just studied without changing anything else.
    #[command(alias = "bump")]
    Touch {
        /// The id of the problem.
        id: i64,
    },

    /// Deletes a problem.
    #[command(alias = "rm")]
    Delete {
        /// The id of the problem.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Starts an interactive session with the list and the add/edit/delete dialogs.
    Shell {
        #[arg(long, short, value_enum, default_value_t = SortMode::CurriculumOrder)]
        sort: SortMode,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Position in the Grind 169 curriculum (1-169).
    #[arg(long)]
    order: Option<String>,
    /// The problem's name.
    #[arg(long)]
    name: Option<String>,
    /// Link to the problem statement. Pass an empty string to clear it.
    #[arg(long)]
    link: Option<String>,
    /// Notes on the solution. Pass an empty string to clear them.
    #[arg(long)]
    solution: Option<String>,
    /// easy, medium or hard.
    #[arg(long)]
    difficulty: Option<String>,
    /// Topic, e.g. "Dynamic Programming". Pass an empty string to clear it.
    #[arg(long)]
    topic: Option<String>,
    /// Your confidence in recalling the solution (0-10).
    #[arg(long)]
    confidence: Option<String>,
}

impl FieldArgs {
    /// Copies every given flag into the draft.
    fn apply(&self, draft: &mut ProblemDraft) -> Result<(), Error> {
        let given = [
            (DraftField::OrderNumber, &self.order),
            (DraftField::ProblemName, &self.name),
            (DraftField::LinkToProblem, &self.link),
            (DraftField::Solution, &self.solution),
            (DraftField::Difficulty, &self.difficulty),
            (DraftField::Topic, &self.topic),
            (DraftField::ConfidenceRating, &self.confidence),
        ];
        for (field, value) in given {
            if let Some(value) = value {
                draft.set(field, value)?;
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Logging ---
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // --- Parse CLI commands ---
    let cli = Cli::parse();
    let colored = !cli.no_color;

    // --- API Setup ---
    let config = Config::load(cli.api_url)?;
    let repo = HttpProblemRepository::new(&config.api_url, config.timeout)?;
    info!(api_url = repo.base_url(), "using problems API");
    let cache = QueryCache::new(repo);
    let keys = KeyDispatcher::new();

    // --- Handle Subcommands ---
    match cli.command.unwrap_or(Commands::Shell {
        sort: SortMode::CurriculumOrder,
    }) {
        Commands::List { sort } => {
            let mut view = ListView::new(sort);
            view.refresh(&cache).await;
            print!("{}", list_output(&view, colored)?);
        }
        Commands::Add { fields } => {
            let mut form = AddProblemForm::new();
            form.open(&keys);
            if let Some(draft) = form.dialog.draft_mut() {
                fields.apply(draft)?;
            }
            let created = form
                .submit(&cache, Utc::now())
                .await
                .context("Problem was not added")?;
            println!(
                "Added problem #{}: {} (order {})",
                created.id, created.problem_name, created.order_number
            );
        }
        Commands::Edit { id, fields } => {
            let problem = find_problem(&cache, id).await?;
            let mut form = EditProblemForm::new();
            form.open(&problem, &keys);
            if let Some(draft) = form.dialog.draft_mut() {
                fields.apply(&mut draft.fields)?;
            }
            let updated = form
                .submit(&cache, Utc::now())
                .await
                .with_context(|| format!("Problem #{} was not updated", id))?;
            println!("Updated problem #{}: {}", updated.id, updated.problem_name);
        }
        Commands::Touch { id } => {
            let problem = find_problem(&cache, id).await?;
            let mut form = EditProblemForm::new();
            form.open(&problem, &keys);
            let touched = form
                .touch(&cache)
                .await
                .with_context(|| format!("Timestamp of problem #{} was not updated", id))?;
            println!(
                "Touched problem #{}: last edited {}",
                touched.id,
                touched.last_edited.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
        }
        Commands::Delete { id, yes } => {
            let problem = find_problem(&cache, id).await?;
            let mut dialog = DeleteProblemDialog::new();
            dialog.request(problem.id, &keys);

            if !yes && !confirm(&format!("Delete problem #{} ({})?", id, problem.problem_name))? {
                dialog.cancel();
                println!("Cancelled.");
                return Ok(());
            }
            dialog
                .confirm(&cache)
                .await
                .with_context(|| format!("Problem #{} was not deleted", id))?;
            println!("Deleted problem #{}.", id);
        }
        Commands::Shell { sort } => {
            let mut session = Session::new(cache, sort, colored);
            session.run(BufReader::new(tokio::io::stdin())).await?;
        }
    }

    Ok(())
}

/// The rendered list, or the load failure as an error so it is reported once.
fn list_output(view: &ListView, colored: bool) -> anyhow::Result<String> {
    match view.state() {
        ListState::Failed(e) => anyhow::bail!("Could not load problems: {}", e),
        _ => Ok(view.render(colored)),
    }
}

/// Looks a problem up in the curriculum-ordered list.
async fn find_problem<R: ProblemRepository>(
    cache: &QueryCache<R>,
    id: i64,
) -> anyhow::Result<Problem> {
    let problems = cache
        .read(SortMode::CurriculumOrder)
        .await
        .context("Could not load problems")?;
    problems
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .with_context(|| format!("No problem with id {}", id))
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}


pub mod api;
pub mod colors;
pub mod config;
pub mod error;
pub mod forms;
pub mod list_view;
pub mod modal;
pub mod problems;
pub mod query_cache;
pub mod shell;
#[cfg(test)]
pub mod testing;

use anyhow::Context;
use api::{HttpProblemRepository, ProblemRepository};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use config::Config;
use error::Error;
use forms::{AddProblemForm, DeleteProblemDialog, DraftField, EditProblemForm, ProblemDraft};
use list_view::{ListState, ListView};
use modal::KeyDispatcher;
use problems::{Problem, SortMode};
use query_cache::QueryCache;
use shell::Session;
use std::io::{self, Write};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
