//! Add, edit and delete dialogs.
//!
//! Each dialog is an explicit state value moved through `open`,
//! `begin_submit`, `finish` and `close`. The async `submit`/`confirm` helpers
//! run those steps around a cache mutation, but an event loop can drive them
//! separately, which is how late responses end up being ignored: `finish`
//! only applies to the submission that is still pending.

/// The editable fields of a problem, as the user typed them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDraft {
    pub order_number: String,
    pub problem_name: String,
    pub link_to_problem: String,
    pub solution: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub confidence_rating: f64,
}

impl Default for ProblemDraft {
    fn default() -> Self {
        ProblemDraft {
            order_number: String::new(),
            problem_name: String::new(),
            link_to_problem: String::new(),
            solution: String::new(),
            difficulty: Difficulty::Easy,
            topic: String::new(),
            confidence_rating: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    OrderNumber,
    ProblemName,
    LinkToProblem,
    Solution,
    Difficulty,
    Topic,
    ConfidenceRating,
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "order" | "ordernumber" => Ok(DraftField::OrderNumber),
            "name" | "problemname" => Ok(DraftField::ProblemName),
            "link" | "linktoproblem" => Ok(DraftField::LinkToProblem),
            "solution" => Ok(DraftField::Solution),
            "difficulty" => Ok(DraftField::Difficulty),
            "topic" => Ok(DraftField::Topic),
            "confidence" | "confidencerating" => Ok(DraftField::ConfidenceRating),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

impl ProblemDraft {
    pub fn from_problem(problem: &Problem) -> Self {
        ProblemDraft {
            order_number: problem.order_number.to_string(),
            problem_name: problem.problem_name.clone(),
            link_to_problem: problem.link_to_problem.clone().unwrap_or_default(),
            solution: problem.solution.clone().unwrap_or_default(),
            difficulty: problem.difficulty.unwrap_or_default(),
            topic: problem.topic.clone().unwrap_or_default(),
            confidence_rating: problem.confidence_rating,
        }
    }

    /// Sets one field from text. Only the typed fields can be rejected here;
    /// range checks wait for submission.
    pub fn set(&mut self, field: DraftField, value: &str) -> Result<()> {
        match field {
            DraftField::OrderNumber => self.order_number = value.to_string(),
            DraftField::ProblemName => self.problem_name = value.to_string(),
            DraftField::LinkToProblem => self.link_to_problem = value.to_string(),
            DraftField::Solution => self.solution = value.to_string(),
            DraftField::Topic => self.topic = value.to_string(),
            DraftField::Difficulty => {
                self.difficulty = value
                    .parse()
                    .map_err(|e: String| Error::validation("difficulty", e))?;
            }
            DraftField::ConfidenceRating => {
                self.confidence_rating = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::validation("confidenceRating", "must be a number"))?;
            }
        }
        Ok(())
    }

    pub fn to_new_problem(&self, now: DateTime<Utc>) -> Result<NewProblem> {
        let fields = self.validate()?;
        Ok(NewProblem {
            order_number: fields.order_number,
            problem_name: fields.problem_name,
            link_to_problem: fields.link_to_problem,
            solution: fields.solution,
            difficulty: self.difficulty,
            topic: fields.topic,
            confidence_rating: self.confidence_rating,
            last_edited: now,
        })
    }

    /// The whole draft as an update, with `lastEdited` refreshed to `now`.
    pub fn to_update(&self, now: DateTime<Utc>) -> Result<ProblemUpdate> {
        let fields = self.validate()?;
        Ok(ProblemUpdate {
            order_number: Some(fields.order_number),
            problem_name: Some(fields.problem_name),
            link_to_problem: Some(fields.link_to_problem),
            solution: Some(fields.solution),
            difficulty: Some(self.difficulty),
            topic: Some(fields.topic),
            confidence_rating: Some(self.confidence_rating),
            last_edited: Some(now),
        })
    }

    fn validate(&self) -> Result<ValidFields> {
        let order_number: i64 = self
            .order_number
            .trim()
            .parse()
            .map_err(|_| Error::validation("orderNumber", "must be a whole number"))?;
        if !(MIN_ORDER_NUMBER..=MAX_ORDER_NUMBER).contains(&order_number) {
            return Err(Error::validation(
                "orderNumber",
                format!("must be between {} and {}", MIN_ORDER_NUMBER, MAX_ORDER_NUMBER),
            ));
        }

        let problem_name = self.problem_name.trim();
        if problem_name.is_empty() {
            return Err(Error::validation("problemName", "is required"));
        }

        let link_to_problem = optional(&self.link_to_problem);
        if let Some(link) = &link_to_problem {
            Url::parse(link).map_err(|e| Error::validation("linkToProblem", e.to_string()))?;
        }

        // NaN fails the range check too.
        if !(0.0..=MAX_CONFIDENCE).contains(&self.confidence_rating) {
            return Err(Error::validation(
                "confidenceRating",
                format!("must be between 0 and {}", MAX_CONFIDENCE),
            ));
        }
        let steps = self.confidence_rating / CONFIDENCE_STEP;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(Error::validation(
                "confidenceRating",
                format!("must be a multiple of {}", CONFIDENCE_STEP),
            ));
        }

        Ok(ValidFields {
            order_number,
            problem_name: problem_name.to_string(),
            link_to_problem,
            solution: verbatim(&self.solution),
            topic: optional(&self.topic),
        })
    }
}

struct ValidFields {
    order_number: i64,
    problem_name: String,
    link_to_problem: Option<String>,
    solution: Option<String>,
    topic: Option<String>,
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Like `optional`, but keeps the indentation of pasted code.
fn verbatim(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

const CONFIDENCE_STEP: f64 = 0.1;

/// Identifies one submission, so a response can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<D> {
    Closed,
    Open { draft: D, error: Option<Error> },
    Submitting { draft: D, ticket: Ticket },
}

#[derive(Debug)]
pub struct Dialog<D> {
    name: &'static str,
    state: DialogState<D>,
    scope: Option<ModalScope>,
    next_ticket: u64,
}

impl<D> Dialog<D> {
    pub fn new(name: &'static str) -> Self {
        Dialog {
            name,
            state: DialogState::Closed,
            scope: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &DialogState<D> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, DialogState::Submitting { .. })
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            DialogState::Closed => None,
            DialogState::Open { draft, .. } | DialogState::Submitting { draft, .. } => Some(draft),
        }
    }

    /// Editable only while open; a draft that is being submitted is frozen.
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            DialogState::Open { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            DialogState::Open { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    pub fn open(&mut self, draft: D, keys: &KeyDispatcher) {
        if self.scope.is_none() {
            self.scope = Some(keys.acquire(self.name));
        }
        self.state = DialogState::Open { draft, error: None };
    }

    /// Discards the draft. A submission still in flight is left to finish on
    /// its own; its response will be ignored here.
    pub fn close(&mut self) {
        if self.is_submitting() {
            debug!(dialog = self.name, "closed while submitting");
        }
        self.state = DialogState::Closed;
        self.scope = None;
    }

    /// Closes the dialog if Escape was delivered to it since the last poll.
    pub fn poll_escape(&mut self) -> bool {
        let escaped = self.scope.as_ref().is_some_and(|scope| scope.take_escape());
        if escaped {
            self.close();
        }
        escaped
    }

    /// Turns the open draft into a request payload and moves to submitting.
    /// A draft that fails `prepare` stays open with the error attached.
    pub fn begin_submit<T>(&mut self, prepare: impl FnOnce(&D) -> Result<T>) -> Result<(Ticket, T)> {
        match std::mem::replace(&mut self.state, DialogState::Closed) {
            DialogState::Open { draft, .. } => match prepare(&draft) {
                Ok(payload) => {
                    let ticket = Ticket(self.next_ticket);
                    self.next_ticket += 1;
                    self.state = DialogState::Submitting { draft, ticket };
                    Ok((ticket, payload))
                }
                Err(e) => {
                    self.state = DialogState::Open {
                        draft,
                        error: Some(e.clone()),
                    };
                    Err(e)
                }
            },
            DialogState::Submitting { draft, ticket } => {
                self.state = DialogState::Submitting { draft, ticket };
                Err(Error::NotReady("a submission is already in progress"))
            }
            DialogState::Closed => Err(Error::NotReady("the dialog is not open")),
        }
    }

    /// Settles the submission identified by `ticket`. Returns false when the
    /// dialog has moved on and the outcome was ignored.
    pub fn finish(&mut self, ticket: Ticket, outcome: std::result::Result<(), Error>) -> bool {
        match std::mem::replace(&mut self.state, DialogState::Closed) {
            DialogState::Submitting {
                draft,
                ticket: pending,
            } if pending == ticket => {
                match outcome {
                    Ok(()) => self.scope = None,
                    Err(error) => self.state = DialogState::Open { draft, error: Some(error) },
                }
                true
            }
            other => {
                debug!(dialog = self.name, "ignoring late response");
                self.state = other;
                false
            }
        }
    }

    /// Attaches an error to an open dialog without changing its draft.
    fn fail(&mut self, e: Error) {
        if let DialogState::Open { error, .. } = &mut self.state {
            *error = Some(e);
        }
    }
}

pub struct AddProblemForm {
    pub dialog: Dialog<ProblemDraft>,
}

impl AddProblemForm {
    pub fn new() -> Self {
        AddProblemForm {
            dialog: Dialog::new("add"),
        }
    }

    pub fn open(&mut self, keys: &KeyDispatcher) {
        self.dialog.open(ProblemDraft::default(), keys);
    }

    pub async fn submit<R: ProblemRepository>(
        &mut self,
        cache: &QueryCache<R>,
        now: DateTime<Utc>,
    ) -> Result<Problem> {
        let (ticket, new_problem) = self.dialog.begin_submit(|draft| draft.to_new_problem(now))?;
        let outcome = cache.create(&new_problem).await;
        self.dialog.finish(ticket, settled(&outcome));
        outcome
    }
}

/// The draft being edited, together with the problem it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: i64,
    pub fields: ProblemDraft,
}

pub struct EditProblemForm {
    pub dialog: Dialog<EditDraft>,
    touching: bool,
}

impl EditProblemForm {
    pub fn new() -> Self {
        EditProblemForm {
            dialog: Dialog::new("edit"),
            touching: false,
        }
    }

    pub fn open(&mut self, problem: &Problem, keys: &KeyDispatcher) {
        let draft = EditDraft {
            id: problem.id,
            fields: ProblemDraft::from_problem(problem),
        };
        self.dialog.open(draft, keys);
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub async fn submit<R: ProblemRepository>(
        &mut self,
        cache: &QueryCache<R>,
        now: DateTime<Utc>,
    ) -> Result<Problem> {
        let (ticket, (id, update)) = self
            .dialog
            .begin_submit(|draft| Ok((draft.id, draft.fields.to_update(now)?)))?;
        let outcome = cache.update(id, &update).await;
        self.dialog.finish(ticket, settled(&outcome));
        outcome
    }

    /// Starts a timestamp bump for the problem on screen. Independent of the
    /// draft, but only one bump may run at a time.
    pub fn begin_touch(&mut self) -> Result<i64> {
        if self.touching {
            return Err(Error::NotReady("the timestamp is already being updated"));
        }
        let id = match self.dialog.state() {
            DialogState::Open { draft, .. } => draft.id,
            DialogState::Submitting { .. } => {
                return Err(Error::NotReady("changes are being saved"));
            }
            DialogState::Closed => return Err(Error::NotReady("no problem is being edited")),
        };
        self.touching = true;
        Ok(id)
    }

    /// A successful bump closes the dialog; a failed one leaves it open with
    /// the error shown.
    pub fn finish_touch(&mut self, outcome: std::result::Result<(), Error>) {
        self.touching = false;
        if !matches!(self.dialog.state(), DialogState::Open { .. }) {
            return;
        }
        match outcome {
            Ok(()) => self.dialog.close(),
            Err(e) => self.dialog.fail(e),
        }
    }

    pub async fn touch<R: ProblemRepository>(&mut self, cache: &QueryCache<R>) -> Result<Problem> {
        let id = self.begin_touch()?;
        let outcome = cache.touch_timestamp(id).await;
        self.finish_touch(settled(&outcome));
        outcome
    }
}

pub struct DeleteProblemDialog {
    pub dialog: Dialog<i64>,
}

impl DeleteProblemDialog {
    pub fn new() -> Self {
        DeleteProblemDialog {
            dialog: Dialog::new("delete"),
        }
    }

    pub fn request(&mut self, id: i64, keys: &KeyDispatcher) {
        self.dialog.open(id, keys);
    }

    pub fn pending(&self) -> Option<i64> {
        self.dialog.draft().copied()
    }

    pub fn cancel(&mut self) {
        self.dialog.close();
    }

    pub async fn confirm<R: ProblemRepository>(&mut self, cache: &QueryCache<R>) -> Result<()> {
        let (ticket, id) = self.dialog.begin_submit(|id| Ok(*id))?;
        let outcome = cache.delete(id).await;
        self.dialog.finish(ticket, settled(&outcome));
        outcome
    }
}

fn settled<T>(outcome: &Result<T>) -> std::result::Result<(), Error> {
    outcome.as_ref().map(|_| ()).map_err(|e| e.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::modal::Key;
    use crate::problems::SortMode;
    use crate::testing::{base_time, seeded};
    use chrono::Duration;

    fn filled_draft() -> ProblemDraft {
        ProblemDraft {
            order_number: " 12 ".to_string(),
            problem_name: "Valid Parentheses".to_string(),
            link_to_problem: "https://leetcode.com/problems/valid-parentheses".to_string(),
            difficulty: Difficulty::Easy,
            confidence_rating: 7.5,
            ..Default::default()
        }
    }

    fn validation_field(result: Result<NewProblem>) -> &'static str {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn new_draft_defaults() {
        let draft = ProblemDraft::default();
        assert_eq!(draft.difficulty, Difficulty::Easy);
        assert_eq!(draft.confidence_rating, 0.0);
        assert!(draft.order_number.is_empty());
    }

    #[test]
    fn draft_converts_with_blank_optionals_as_null() {
        let now = base_time();
        let problem = filled_draft().to_new_problem(now).unwrap();
        assert_eq!(problem.order_number, 12);
        assert_eq!(problem.topic, None);
        assert_eq!(problem.solution, None);
        assert_eq!(problem.last_edited, now);
    }

    #[test]
    fn draft_rejects_out_of_range_values() {
        let now = base_time();
        for order in ["0", "170", "abc", ""] {
            let draft = ProblemDraft {
                order_number: order.to_string(),
                ..filled_draft()
            };
            assert_eq!(validation_field(draft.to_new_problem(now)), "orderNumber");
        }
        for rating in [-0.1, 10.1, f64::NAN, 7.55, 0.05] {
            let draft = ProblemDraft {
                confidence_rating: rating,
                ..filled_draft()
            };
            assert_eq!(validation_field(draft.to_new_problem(now)), "confidenceRating");
        }

        let draft = ProblemDraft {
            problem_name: "   ".to_string(),
            ..filled_draft()
        };
        assert_eq!(validation_field(draft.to_new_problem(now)), "problemName");

        let draft = ProblemDraft {
            link_to_problem: "not a url".to_string(),
            ..filled_draft()
        };
        assert_eq!(validation_field(draft.to_new_problem(now)), "linkToProblem");

        for rating in [10.0, 0.3, 6.7] {
            let edge = ProblemDraft {
                order_number: "169".to_string(),
                confidence_rating: rating,
                ..filled_draft()
            };
            assert!(edge.to_new_problem(now).is_ok());
        }
    }

    #[test]
    fn solution_keeps_its_indentation() {
        let now = base_time();
        let notes = "    stack = []\n    for c in s:\n        push(c)\n";
        let draft = ProblemDraft {
            solution: notes.to_string(),
            topic: "  Stack  ".to_string(),
            ..filled_draft()
        };
        let problem = draft.to_new_problem(now).unwrap();
        assert_eq!(problem.solution.as_deref(), Some(notes));
        assert_eq!(problem.topic.as_deref(), Some("Stack"));

        let blank = ProblemDraft {
            solution: " \n\t".to_string(),
            ..filled_draft()
        };
        assert_eq!(blank.to_update(now).unwrap().solution, Some(None));
    }

    #[test]
    fn set_parses_typed_fields() {
        let mut draft = ProblemDraft::default();
        draft.set("difficulty".parse().unwrap(), "Hard").unwrap();
        draft.set("confidence".parse().unwrap(), "6.5").unwrap();
        assert_eq!(draft.difficulty, Difficulty::Hard);
        assert_eq!(draft.confidence_rating, 6.5);
        assert!(draft.set(DraftField::ConfidenceRating, "high").is_err());
        assert!("colour".parse::<DraftField>().is_err());
    }

    #[test]
    fn dialog_walks_its_state_machine() {
        let keys = KeyDispatcher::new();
        let mut dialog: Dialog<u32> = Dialog::new("test");
        assert!(dialog.begin_submit(|d| Ok(*d)).is_err());

        dialog.open(1, &keys);
        assert_eq!(keys.open_scopes(), 1);
        let (ticket, payload) = dialog.begin_submit(|d| Ok(*d)).unwrap();
        assert_eq!(payload, 1);
        assert!(dialog.is_submitting());
        assert!(dialog.draft_mut().is_none());
        assert!(matches!(
            dialog.begin_submit(|d| Ok(*d)),
            Err(Error::NotReady(_))
        ));

        let failure = Error::Status {
            operation: Operation::Create,
            status: 500,
        };
        assert!(dialog.finish(ticket, Err(failure.clone())));
        assert_eq!(
            dialog.state(),
            &DialogState::Open {
                draft: 1,
                error: Some(failure)
            }
        );

        let (ticket, _) = dialog.begin_submit(|d| Ok(*d)).unwrap();
        assert!(dialog.finish(ticket, Ok(())));
        assert_eq!(dialog.state(), &DialogState::Closed);
        assert_eq!(keys.open_scopes(), 0);
    }

    #[test]
    fn late_response_after_close_is_ignored() {
        let keys = KeyDispatcher::new();
        let mut dialog: Dialog<u32> = Dialog::new("test");
        dialog.open(1, &keys);
        let (stale, _) = dialog.begin_submit(|d| Ok(*d)).unwrap();
        dialog.close();
        assert_eq!(keys.open_scopes(), 0);

        dialog.open(2, &keys);
        assert!(!dialog.finish(stale, Ok(())));
        assert_eq!(dialog.draft(), Some(&2));

        let (fresh, _) = dialog.begin_submit(|d| Ok(*d)).unwrap();
        assert!(!dialog.finish(stale, Ok(())));
        assert!(dialog.is_submitting());
        assert!(dialog.finish(fresh, Ok(())));
    }

    #[test]
    fn escape_closes_only_the_innermost_dialog() {
        let keys = KeyDispatcher::new();
        let mut edit: Dialog<u32> = Dialog::new("edit");
        let mut delete: Dialog<u32> = Dialog::new("delete");
        edit.open(1, &keys);
        delete.open(2, &keys);

        keys.dispatch(Key::Escape);
        assert!(!edit.poll_escape());
        assert!(delete.poll_escape());
        assert!(!delete.is_open());
        assert!(edit.is_open());
        assert_eq!(keys.open_scopes(), 1);
    }

    #[tokio::test]
    async fn add_form_creates_and_closes() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[5.0]));
        let mut form = AddProblemForm::new();
        form.open(&keys);

        let draft = form.dialog.draft_mut().unwrap();
        *draft = filled_draft();

        let now = base_time() + Duration::days(1);
        let created = form.submit(&cache, now).await.unwrap();
        assert_eq!(created.last_edited, now);
        assert!(!form.dialog.is_open());
        assert_eq!(keys.open_scopes(), 0);

        let listed = cache.read(SortMode::CurriculumOrder).await.unwrap();
        assert!(listed.iter().any(|p| p.id == created.id));
    }

    #[tokio::test]
    async fn add_form_keeps_draft_on_failure() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[]));
        cache.repository().fail_next(Operation::Create);
        let mut form = AddProblemForm::new();
        form.open(&keys);
        *form.dialog.draft_mut().unwrap() = filled_draft();

        let err = form.submit(&cache, base_time()).await.unwrap_err();
        assert!(err.is_transport_failure());
        assert_eq!(form.dialog.draft(), Some(&filled_draft()));
        assert_eq!(form.dialog.error(), Some(&err));
        assert!(cache.repository().problems().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_backend() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[]));
        let mut form = AddProblemForm::new();
        form.open(&keys);

        let err = form.submit(&cache, base_time()).await.unwrap_err();
        assert!(matches!(err, Error::Validation { field: "orderNumber", .. }));
        assert!(form.dialog.is_open());
        assert!(cache.repository().problems().is_empty());
    }

    #[tokio::test]
    async fn edit_form_sends_full_draft_with_fresh_timestamp() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[5.0, 6.0]));
        let stored = cache.read(SortMode::CurriculumOrder).await.unwrap()[1].clone();

        let mut form = EditProblemForm::new();
        form.open(&stored, &keys);
        let draft = form.dialog.draft_mut().unwrap();
        draft.fields.set(DraftField::ConfidenceRating, "9").unwrap();
        draft.fields.set(DraftField::Topic, "").unwrap();

        let now = base_time() + Duration::days(2);
        let updated = form.submit(&cache, now).await.unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.confidence_rating, 9.0);
        assert_eq!(updated.topic, None);
        assert_eq!(updated.problem_name, stored.problem_name);
        assert_eq!(updated.last_edited, now);
        assert!(!form.dialog.is_open());

        let listed = cache.read(SortMode::CurriculumOrder).await.unwrap();
        assert_eq!(listed[1], updated);
    }

    #[tokio::test]
    async fn touch_ignores_the_draft_and_closes_on_success() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[5.0]));
        let stored = cache.read(SortMode::CurriculumOrder).await.unwrap()[0].clone();

        let mut form = EditProblemForm::new();
        form.open(&stored, &keys);
        form.dialog.draft_mut().unwrap().fields.problem_name = "Edited".to_string();

        let touched = form.touch(&cache).await.unwrap();
        assert_eq!(touched.problem_name, stored.problem_name);
        assert!(touched.last_edited > stored.last_edited);
        assert!(!form.dialog.is_open());
        assert!(!form.is_touching());
    }

    #[tokio::test]
    async fn failed_touch_keeps_edit_dialog_open() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[5.0]));
        let stored = cache.read(SortMode::CurriculumOrder).await.unwrap()[0].clone();
        cache.repository().fail_next(Operation::Touch);

        let mut form = EditProblemForm::new();
        form.open(&stored, &keys);
        assert!(form.touch(&cache).await.is_err());
        assert!(form.dialog.is_open());
        assert!(form.dialog.error().is_some());

        let id = form.begin_touch().unwrap();
        assert_eq!(id, stored.id);
        assert!(form.begin_touch().is_err());
    }

    #[tokio::test]
    async fn delete_confirm_and_cancel() {
        let keys = KeyDispatcher::new();
        let cache = QueryCache::new(seeded(&[5.0, 6.0]));
        let mut dialog = DeleteProblemDialog::new();

        dialog.request(1, &keys);
        assert_eq!(dialog.pending(), Some(1));
        dialog.cancel();
        assert_eq!(dialog.pending(), None);
        assert_eq!(cache.repository().problems().len(), 2);

        dialog.request(2, &keys);
        dialog.confirm(&cache).await.unwrap();
        assert!(!dialog.dialog.is_open());
        let remaining = cache.repository().problems();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 1);

        dialog.request(2, &keys);
        let err = dialog.confirm(&cache).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert_eq!(dialog.pending(), Some(2));
    }
}

use crate::api::ProblemRepository;
use crate::error::{Error, Result};
use crate::modal::{KeyDispatcher, ModalScope};
use crate::problems::{
    Difficulty, MAX_CONFIDENCE, MAX_ORDER_NUMBER, MIN_ORDER_NUMBER, NewProblem, Problem,
    ProblemUpdate,
};
use crate::query_cache::QueryCache;
use chrono::{DateTime, Utc};
use reqwest::Url;
use std::str::FromStr;
use tracing::debug;
