//! In-memory stand-in for the problems backend, for tests.

pub struct FakeRepository {
    state: Mutex<FakeState>,
    list_calls: AtomicUsize,
    held: AtomicBool,
    gate: Semaphore,
}

struct FakeState {
    problems: Vec<Problem>,
    next_id: i64,
    clock: DateTime<Utc>,
    fail_next: Option<Operation>,
}

impl FakeRepository {
    pub fn new(problems: Vec<Problem>) -> Self {
        let next_id = problems.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        FakeRepository {
            state: Mutex::new(FakeState {
                problems,
                next_id,
                clock: base_time() + Duration::days(30),
                fail_next: None,
            }),
            list_calls: AtomicUsize::new(0),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Makes list calls wait until `release_lists` hands out a permit.
    pub fn hold_lists(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release_lists(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// The next call of `operation` fails with HTTP 500.
    pub fn fail_next(&self, operation: Operation) {
        self.lock().fail_next = Some(operation);
    }

    pub fn problems(&self) -> Vec<Problem> {
        self.lock().problems.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FakeState {
    fn check(&mut self, operation: Operation) -> Result<()> {
        if self.fail_next == Some(operation) {
            self.fail_next = None;
            return Err(Error::Status {
                operation,
                status: 500,
            });
        }
        Ok(())
    }

    fn find_mut(&mut self, operation: Operation, id: i64) -> Result<&mut Problem> {
        self.problems
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::Status {
                operation,
                status: 404,
            })
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::minutes(1);
        self.clock
    }
}

impl ProblemRepository for FakeRepository {
    async fn list_sorted_by(&self, mode: SortMode) -> Result<Vec<Problem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        let mut state = self.lock();
        state.check(Operation::List)?;
        let mut problems = state.problems.clone();
        match mode {
            SortMode::CurriculumOrder => problems.sort_by_key(|p| p.order_number),
            SortMode::LastEdited => problems.sort_by_key(|p| p.last_edited),
            SortMode::DifficultyAscending => problems.sort_by_key(|p| p.difficulty),
            SortMode::ConfidenceAscending => {
                problems.sort_by(|a, b| a.confidence_rating.total_cmp(&b.confidence_rating))
            }
        }
        Ok(problems)
    }

    async fn create(&self, problem: &NewProblem) -> Result<Problem> {
        let mut state = self.lock();
        state.check(Operation::Create)?;
        let created = problem.clone().with_id(state.next_id);
        state.next_id += 1;
        state.problems.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, fields: &ProblemUpdate) -> Result<Problem> {
        let mut state = self.lock();
        state.check(Operation::Update)?;
        let problem = state.find_mut(Operation::Update, id)?;
        fields.apply_to(problem);
        Ok(problem.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.lock();
        state.check(Operation::Delete)?;
        state.find_mut(Operation::Delete, id)?;
        state.problems.retain(|p| p.id != id);
        Ok(())
    }

    async fn touch_timestamp(&self, id: i64) -> Result<Problem> {
        let mut state = self.lock();
        state.check(Operation::Touch)?;
        let now = state.tick();
        let problem = state.find_mut(Operation::Touch, id)?;
        problem.last_edited = now;
        Ok(problem.clone())
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

pub fn new_problem(order_number: i64, name: &str, confidence_rating: f64) -> NewProblem {
    NewProblem {
        order_number,
        problem_name: name.to_string(),
        link_to_problem: None,
        solution: None,
        difficulty: Difficulty::Medium,
        topic: Some("Arrays".to_string()),
        confidence_rating,
        last_edited: base_time() + Duration::hours(order_number),
    }
}

/// A backend holding one problem per rating, with ids and order numbers
/// counting up from 1.
pub fn seeded(ratings: &[f64]) -> FakeRepository {
    let problems = ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            let n = i as i64 + 1;
            new_problem(n, &format!("Problem {}", n), *rating).with_id(n)
        })
        .collect();
    FakeRepository::new(problems)
}

use crate::api::ProblemRepository;
use crate::error::{Error, Operation, Result};
use crate::problems::{Difficulty, NewProblem, Problem, ProblemUpdate, SortMode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;
