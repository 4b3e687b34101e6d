#[derive(Debug, Clone)]
pub enum ListState {
    Loading,
    Failed(Error),
    Ready(Collection),
}

/// The problem list under the active sort mode, plus the local selection.
#[derive(Debug)]
pub struct ListView {
    sort: SortMode,
    selected: Option<i64>,
    state: ListState,
}

impl ListView {
    pub fn new(sort: SortMode) -> Self {
        ListView {
            sort,
            selected: None,
            state: ListState::Loading,
        }
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub async fn refresh<R: ProblemRepository>(&mut self, cache: &QueryCache<R>) {
        self.state = match cache.read(self.sort).await {
            Ok(problems) => ListState::Ready(problems),
            Err(e) => ListState::Failed(e),
        };
    }

    pub async fn set_sort<R: ProblemRepository>(&mut self, sort: SortMode, cache: &QueryCache<R>) {
        self.sort = sort;
        self.state = ListState::Loading;
        self.refresh(cache).await;
    }

    /// Selecting the selected problem again clears the selection.
    pub fn toggle_select(&mut self, id: i64) {
        self.selected = if self.selected == Some(id) { None } else { Some(id) };
    }

    pub fn find(&self, id: i64) -> Option<&Problem> {
        match &self.state {
            ListState::Ready(problems) => problems.iter().find(|p| p.id == id),
            _ => None,
        }
    }

    /// The problem to load into the edit dialog.
    pub fn edit_intent(&self, id: i64) -> Option<Problem> {
        self.find(id).cloned()
    }

    /// The id to hand to the delete dialog, if it is on screen.
    pub fn delete_intent(&self, id: i64) -> Option<i64> {
        self.find(id).map(|p| p.id)
    }

    pub fn render(&self, colored: bool) -> String {
        let mut out = String::new();
        out.push_str("Grind 169 questions\n");
        out.push_str(&format!("Sort: {}\n\n", self.sort.label()));

        let problems = match &self.state {
            ListState::Loading => {
                out.push_str("Loading...\n");
                return out;
            }
            ListState::Failed(e) => {
                out.push_str(&format!("Error: {}\n", e));
                return out;
            }
            ListState::Ready(problems) => problems,
        };

        if problems.is_empty() {
            out.push_str("No problems yet. Use 'add' to create one.\n");
            return out;
        }

        for problem in problems.iter() {
            let is_selected = self.selected == Some(problem.id);
            out.push_str(&render_row(problem, is_selected, colored));
            out.push('\n');
            if is_selected {
                out.push_str(&render_details(problem));
            }
        }
        out
    }
}

fn render_row(problem: &Problem, is_selected: bool, colored: bool) -> String {
    let marker = if is_selected { '>' } else { ' ' };
    let difficulty = format!("{:<6}", problem.difficulty.map_or("N/A", |d| d.as_str()));
    let confidence = format!("{:>4.1}", problem.confidence_rating);
    let (difficulty, confidence) = if colored {
        (
            difficulty_category(&difficulty).paint(&difficulty),
            confidence_category(problem.confidence_rating).paint(&confidence),
        )
    } else {
        (difficulty, confidence)
    };

    format!(
        "{} {:>3}  {:<40} {} {:<20} {} {}  [#{}]",
        marker,
        problem.order_number,
        problem.problem_name,
        difficulty,
        problem.topic.as_deref().unwrap_or("N/A"),
        confidence,
        problem.last_edited.with_timezone(&Local).format("%Y-%m-%d"),
        problem.id
    )
}

fn render_details(problem: &Problem) -> String {
    format!(
        "      Link:     {}\n      Solution: {}\n",
        problem.link_to_problem.as_deref().unwrap_or("-"),
        problem.solution.as_deref().unwrap_or("-")
    )
}


use crate::api::ProblemRepository;
use crate::colors::{confidence_category, difficulty_category};
use crate::error::Error;
use crate::problems::{Problem, SortMode};
use crate::query_cache::{Collection, QueryCache};
use chrono::Local;
