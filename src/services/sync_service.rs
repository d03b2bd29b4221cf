use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::board::{BoardClient, NewCardRequest, UpdateCardRequest};
use crate::courses::CourseResolver;
use crate::error::AppError;
use crate::models::{Assignment, SyncOutcome, SyncStats};
use crate::state::SyncContext;

/// A card already on the board, keyed by its name in the card index.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingCard {
    pub id: String,
    pub due: Option<String>,
}

pub struct SyncService {
    board: Arc<dyn BoardClient>,
    ctx: SyncContext,
    existing_cards: HashMap<String, ExistingCard>,
    /// Titles already synced this run; later events with the same title are skipped.
    handled: HashSet<String>,
}

impl SyncService {
    /// Reads every card on the board once to build the name index.
    pub async fn new(board: Arc<dyn BoardClient>, ctx: SyncContext) -> Result<Self, AppError> {
        let mut existing_cards = HashMap::new();
        for list in &ctx.lists {
            for card in board.fetch_cards(&list.id).await? {
                existing_cards.entry(card.name).or_insert(ExistingCard {
                    id: card.id,
                    due: card.due,
                });
            }
        }
        info!("Indexed {} existing cards", existing_cards.len());

        Ok(Self {
            board,
            ctx,
            existing_cards,
            handled: HashSet::new(),
        })
    }

    pub fn existing_card(&self, title: &str) -> Option<&ExistingCard> {
        self.existing_cards.get(title)
    }

    /// Creates, updates or skips the card for each assignment, in the given
    /// order, then reorders the target list by due date.
    pub async fn sync_all(
        &mut self,
        assignments: &mut [Assignment],
        resolver: &mut dyn CourseResolver,
    ) -> Result<SyncStats, AppError> {
        info!("Syncing {} assignments", assignments.len());
        let mut stats = SyncStats::default();

        let total = assignments.len();
        for (i, assignment) in assignments.iter_mut().enumerate() {
            let outcome = self.sync_assignment(assignment, resolver).await?;
            stats.record(outcome);
            println!("{}", outcome.progress_line(i + 1, total, &assignment.title));
        }

        info!("Sorting list by due date");
        stats.repositioned = self.sort_list().await?;

        info!(
            "Sync completed: {} added, {} updated, {} skipped, {} repositioned",
            stats.added, stats.updated, stats.skipped, stats.repositioned
        );
        Ok(stats)
    }

    pub async fn sync_assignment(
        &mut self,
        assignment: &mut Assignment,
        resolver: &mut dyn CourseResolver,
    ) -> Result<SyncOutcome, AppError> {
        if !self.handled.insert(assignment.title.clone()) {
            warn!(
                "Skipping repeated title {} (due {}); the first event with this title is kept",
                assignment.title,
                assignment.due_date_string()
            );
            return Ok(SyncOutcome::Skipped);
        }

        let due = assignment.due_date_string();

        let Some(existing) = self.existing_cards.get_mut(&assignment.title) else {
            let course = resolver.resolve(&assignment.title, &self.ctx.courses)?;
            assignment.course = Some(course);
            let card = self.add_assignment_card(assignment).await?;
            self.existing_cards.insert(
                assignment.title.clone(),
                ExistingCard {
                    id: card.id,
                    due: Some(due),
                },
            );
            return Ok(SyncOutcome::Added);
        };

        if existing.due.as_deref() == Some(due.as_str()) {
            debug!("Already synced: {}", assignment.title);
            return Ok(SyncOutcome::Skipped);
        }

        info!(
            "Updating due date of {}: {} -> {}",
            assignment.title,
            existing.due.as_deref().unwrap_or("none"),
            due
        );
        self.board
            .update_card(&existing.id, &UpdateCardRequest::due(assignment.due_param()))
            .await?;
        existing.due = Some(due);
        Ok(SyncOutcome::Updated)
    }

    async fn add_assignment_card(
        &self,
        assignment: &Assignment,
    ) -> Result<crate::board::Card, AppError> {
        let course = assignment
            .course
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput(format!("no course for {}", assignment.title)))?;
        let label_id = self.ctx.label_id(course)?;

        let request = NewCardRequest {
            id_list: self.ctx.list_id.clone(),
            name: assignment.title.clone(),
            due: assignment.due_param(),
            id_labels: vec![label_id.to_string()],
            pos: "bottom".to_string(),
        };
        info!("Creating card {} ({})", assignment.title, course);
        self.board.create_card(&request).await
    }

    /// Rewrites card positions in the target list as 1, 2, 3, ... by
    /// ascending due, cards without a due first. Returns the number of cards
    /// moved. Not atomic: a failure leaves the list partly reordered.
    pub async fn sort_list(&self) -> Result<usize, AppError> {
        let mut cards = self.board.fetch_cards(&self.ctx.list_id).await?;
        cards.sort_by(|a, b| {
            a.due
                .as_deref()
                .unwrap_or("")
                .cmp(b.due.as_deref().unwrap_or(""))
        });

        for (pos, card) in (1u32..).zip(cards.iter()) {
            self.board
                .update_card(&card.id, &UpdateCardRequest::pos(pos))
                .await?;
        }
        Ok(cards.len())
    }
}
