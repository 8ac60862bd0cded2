//! Support tickets and conversation threads

use std::sync::Arc;

use chrono::Utc;
use portal_api::{ListQuery, MessageAuthor, Ticket, TicketApi, TicketMessage, TicketReply};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{report, ListState};
use crate::error::{CoreError, CoreResult};
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic_with;
use crate::validation::{FieldErrors, Schema, TicketForm};

/// Prefix of locally created message ids awaiting server confirmation.
pub const PENDING_MESSAGE_PREFIX: &str = "pending-";

const MAX_REPLY_LEN: usize = 5000;

#[derive(Debug, Clone, Default)]
pub struct TicketState {
    pub list: ListState<Ticket>,
    /// Ticket whose thread is open.
    pub current: Option<Ticket>,
}

pub struct TicketStore {
    api: Arc<dyn TicketApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<TicketState>,
}

impl TicketStore {
    #[must_use]
    pub fn new(api: Arc<dyn TicketApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(TicketState::default()),
        }
    }

    pub async fn snapshot(&self) -> TicketState {
        self.state.read().await.clone()
    }

    pub async fn fetch(&self, query: ListQuery) -> CoreResult<()> {
        let query = query.validated();
        self.state.write().await.list.begin(query.clone());

        let result = self.api.list_tickets(&query).await;
        self.state
            .write()
            .await
            .list
            .finish(result)
            .map_err(|e| report(self.notifier.as_ref(), "load tickets", e))
    }

    /// Load a ticket with its thread and make it current.
    pub async fn open_ticket(&self, id: &str) -> CoreResult<Ticket> {
        let ticket = self
            .api
            .get_ticket(id)
            .await
            .map_err(|e| report(self.notifier.as_ref(), "load ticket", e))?;
        self.state.write().await.current = Some(ticket.clone());
        Ok(ticket)
    }

    /// Open a new ticket. It is prepended to the list once created.
    pub async fn create(&self, form: &TicketForm) -> CoreResult<Ticket> {
        form.check()?;

        let ticket = self
            .api
            .create_ticket(&form.to_new_ticket())
            .await
            .map_err(|e| report(self.notifier.as_ref(), "create ticket", e))?;

        {
            let mut state = self.state.write().await;
            state.list.items.insert(0, ticket.clone());
            state.list.total += 1;
        }
        self.notifier
            .notify(Notification::success(format!("Ticket {} created", ticket.id)));
        Ok(ticket)
    }

    /// Reply on the current ticket.
    ///
    /// A pending message is appended immediately, replaced by the stored
    /// message on success and removed on failure.
    pub async fn reply(&self, id: &str, body: &str) -> CoreResult<TicketMessage> {
        let body = body.trim();
        if body.is_empty() {
            return Err(FieldErrors::single("message", "Message is required").into());
        }
        if body.chars().count() > MAX_REPLY_LEN {
            return Err(FieldErrors::single(
                "message",
                "Message must be at most 5000 characters",
            )
            .into());
        }

        {
            let state = self.state.read().await;
            let ticket = state
                .current
                .as_ref()
                .filter(|t| t.id == id)
                .ok_or_else(|| CoreError::NotFound(format!("Open ticket '{id}'")))?;
            if !ticket.status.accepts_replies() {
                return Err(CoreError::Conflict(format!("Ticket '{id}' is closed")));
            }
        }

        let pending_id = format!("{PENDING_MESSAGE_PREFIX}{}", Uuid::new_v4());
        let pending = TicketMessage {
            id: pending_id.clone(),
            author: MessageAuthor::Customer,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let reply = TicketReply {
            message: body.to_string(),
        };

        let result = apply_optimistic_with(
            &self.state,
            |s| {
                if let Some(ticket) = s.current.as_mut().filter(|t| t.id == id) {
                    ticket.messages.push(pending);
                }
            },
            self.api.reply_to_ticket(id, &reply),
            |s, ()| {
                if let Some(ticket) = s.current.as_mut().filter(|t| t.id == id) {
                    ticket.messages.retain(|m| m.id != pending_id);
                }
            },
            |s, stored: &TicketMessage| {
                if let Some(ticket) = s.current.as_mut().filter(|t| t.id == id) {
                    if let Some(slot) = ticket.messages.iter_mut().find(|m| m.id == pending_id) {
                        *slot = stored.clone();
                    }
                    ticket.updated_at = stored.created_at;
                }
                if let Some(listed) = s.list.get_mut(id) {
                    listed.updated_at = stored.created_at;
                }
            },
        )
        .await;

        match result {
            Ok(message) => {
                self.notifier.notify(Notification::success("Reply sent"));
                Ok(message)
            }
            Err(e) => Err(report(self.notifier.as_ref(), "send reply", e)),
        }
    }
}
