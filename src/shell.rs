const HELP: &str = "\
Commands:
  list                      refresh and show the problem list
  sort <mode>               order | last-edited | difficulty | confidence
  select <id>               show or hide a problem's link and solution
  add                       open the add dialog
  edit <id>                 open the edit dialog for a problem
  delete <id>               ask to delete a problem
  set <field> <value>       order, name, link, solution, difficulty, topic, confidence
  show                      show the open dialog
  save                      submit the open add/edit dialog
  touch                     bump the last-edited time of the problem being edited
  confirm                   confirm the pending delete
  cancel | esc              close the open dialog
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    List,
    Sort(SortMode),
    Select(i64),
    Add,
    Edit(i64),
    Delete(i64),
    Set(DraftField, String),
    Show,
    Save,
    Touch,
    Confirm,
    Escape,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let id = || -> Result<i64, String> {
            rest.parse()
                .map_err(|_| format!("'{}' expects a problem id", word))
        };

        match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "list" | "ls" | "refresh" => Ok(Command::List),
            "sort" => rest.parse().map(Command::Sort),
            "select" => id().map(Command::Select),
            "add" | "new" => Ok(Command::Add),
            "edit" => id().map(Command::Edit),
            "delete" | "rm" => id().map(Command::Delete),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "show" => Ok(Command::Show),
            "save" | "submit" => Ok(Command::Save),
            "touch" | "bump" => Ok(Command::Touch),
            "confirm" | "yes" => Ok(Command::Confirm),
            "cancel" | "esc" | "escape" | "no" => Ok(Command::Escape),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session: the list view and the dialogs that act on it.
pub struct Session<R> {
    cache: QueryCache<R>,
    keys: KeyDispatcher,
    list: ListView,
    add: AddProblemForm,
    edit: EditProblemForm,
    delete: DeleteProblemDialog,
    colored: bool,
}

impl<R: ProblemRepository> Session<R> {
    pub fn new(cache: QueryCache<R>, sort: SortMode, colored: bool) -> Self {
        Session {
            cache,
            keys: KeyDispatcher::new(),
            list: ListView::new(sort),
            add: AddProblemForm::new(),
            edit: EditProblemForm::new(),
            delete: DeleteProblemDialog::new(),
            colored,
        }
    }

    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, input: I) -> anyhow::Result<()> {
        self.list.refresh(&self.cache).await;
        println!("{}", self.list.render(self.colored));
        println!("Type 'help' for commands.");

        let mut lines = input.lines();
        loop {
            print!("> ");
            io::stdout().flush().context("Failed to flush stdout")?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    let (flow, output) = self.handle(command).await;
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                    if flow == Flow::Quit {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        Ok(())
    }

    pub async fn handle(&mut self, command: Command) -> (Flow, String) {
        let output = match command {
            Command::Help => HELP.to_string(),
            Command::Quit => return (Flow::Quit, String::new()),
            Command::List => self.refreshed().await,
            Command::Sort(mode) => {
                self.list.set_sort(mode, &self.cache).await;
                self.list.render(self.colored)
            }
            Command::Select(id) => {
                if self.list.find(id).is_none() {
                    format!("No problem #{} in the list.", id)
                } else {
                    self.list.toggle_select(id);
                    self.list.render(self.colored)
                }
            }
            Command::Add => match self.blocked_by_dialog() {
                Some(message) => message,
                None => {
                    self.add.open(&self.keys);
                    format!(
                        "Add New Problem\n{}",
                        describe_draft(&ProblemDraft::default(), None)
                    )
                }
            },
            Command::Edit(id) => match (self.blocked_by_dialog(), self.list.edit_intent(id)) {
                (Some(message), _) => message,
                (None, None) => format!("No problem #{} in the list.", id),
                (None, Some(problem)) => {
                    self.edit.open(&problem, &self.keys);
                    let draft = ProblemDraft::from_problem(&problem);
                    format!("Edit Problem #{}\n{}", id, describe_draft(&draft, None))
                }
            },
            Command::Delete(id) => match (self.blocked_by_dialog(), self.list.delete_intent(id)) {
                (Some(message), _) => message,
                (None, None) => format!("No problem #{} in the list.", id),
                (None, Some(id)) => {
                    self.delete.request(id, &self.keys);
                    "Are you sure you want to delete this problem? ('confirm' or 'cancel')".to_string()
                }
            },
            Command::Set(field, value) => {
                let draft = match self.add.dialog.draft_mut() {
                    Some(draft) => Some(draft),
                    None => self.edit.dialog.draft_mut().map(|draft| &mut draft.fields),
                };
                match draft {
                    None => "No add or edit dialog is open.".to_string(),
                    Some(draft) => match draft.set(field, &value) {
                        Ok(()) => describe_draft(draft, None),
                        Err(e) => format!("Error: {}", e),
                    },
                }
            }
            Command::Show => self.describe_open_dialog(),
            Command::Save => self.save().await,
            Command::Touch => {
                let touched = self.edit.touch(&self.cache).await;
                match touched {
                    Ok(problem) => format!(
                        "Timestamp updated for #{}.\n{}",
                        problem.id,
                        self.refreshed().await
                    ),
                    Err(e) => format!("Error: {}", e),
                }
            }
            Command::Confirm => {
                let Some(id) = self.delete.pending() else {
                    return (Flow::Continue, "Nothing to confirm.".to_string());
                };
                let deleted = self.delete.confirm(&self.cache).await;
                match deleted {
                    Ok(()) => format!("Deleted problem #{}.\n{}", id, self.refreshed().await),
                    Err(e) => format!("Error: {}", e),
                }
            }
            Command::Escape => {
                if !self.keys.dispatch(Key::Escape) {
                    "Nothing to close.".to_string()
                } else {
                    let closed = self.add.dialog.poll_escape()
                        | self.edit.dialog.poll_escape()
                        | self.delete.dialog.poll_escape();
                    if closed { "Closed.".to_string() } else { String::new() }
                }
            }
        };
        (Flow::Continue, output)
    }

    async fn save(&mut self) -> String {
        let now = Utc::now();
        let result = if self.add.dialog.is_open() {
            self.add.submit(&self.cache, now).await
        } else if self.edit.dialog.is_open() {
            self.edit.submit(&self.cache, now).await
        } else {
            return "No add or edit dialog is open.".to_string();
        };

        match result {
            Ok(problem) => format!(
                "Saved problem #{} ({}).\n{}",
                problem.id,
                problem.problem_name,
                self.refreshed().await
            ),
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn refreshed(&mut self) -> String {
        self.list.refresh(&self.cache).await;
        self.list.render(self.colored)
    }

    fn blocked_by_dialog(&self) -> Option<String> {
        let open = self.add.dialog.is_open()
            || self.edit.dialog.is_open()
            || self.delete.dialog.is_open();
        open.then(|| "Another dialog is open. Use 'cancel' to close it first.".to_string())
    }

    fn describe_open_dialog(&self) -> String {
        if let Some(draft) = self.add.dialog.draft() {
            format!("Add New Problem\n{}", describe_draft(draft, self.add.dialog.error()))
        } else if let Some(draft) = self.edit.dialog.draft() {
            format!(
                "Edit Problem #{}\n{}",
                draft.id,
                describe_draft(&draft.fields, self.edit.dialog.error())
            )
        } else if let Some(id) = self.delete.pending() {
            format!("Pending delete of problem #{}.", id)
        } else {
            "No dialog is open.".to_string()
        }
    }
}

fn describe_draft(draft: &ProblemDraft, error: Option<&Error>) -> String {
    let mut out = format!(
        "  order:      {}\n  name:       {}\n  link:       {}\n  solution:   {}\n  difficulty: {}\n  topic:      {}\n  confidence: {:.1}",
        draft.order_number,
        draft.problem_name,
        draft.link_to_problem,
        draft.solution,
        draft.difficulty,
        draft.topic,
        draft.confidence_rating
    );
    if let Some(e) = error {
        out.push_str(&format!("\n  Error: {}", e));
    }
    out
}


use crate::api::ProblemRepository;
use crate::error::Error;
use crate::forms::{AddProblemForm, DeleteProblemDialog, DraftField, EditProblemForm, ProblemDraft};
use crate::list_view::ListView;
use crate::modal::{Key, KeyDispatcher};
use crate::problems::SortMode;
use crate::query_cache::QueryCache;
use anyhow::Context;
use chrono::Utc;
use std::io::{self, Write};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
