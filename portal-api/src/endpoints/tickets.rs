use async_trait::async_trait;

use crate::client::{ApiClient, segment};
use crate::error::Result;
use crate::query::{ListQuery, Page};
use crate::traits::TicketApi;
use crate::types::{NewTicket, Ticket, TicketMessage, TicketReply};

#[async_trait]
impl TicketApi for ApiClient {
    async fn list_tickets(&self, query: &ListQuery) -> Result<Page<Ticket>> {
        self.get_list("/tickets", query).await
    }

    async fn get_ticket(&self, id: &str) -> Result<Ticket> {
        self.get_json(&format!("/tickets/{}", segment(id))).await
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket> {
        self.post_json("/tickets", ticket).await
    }

    async fn reply_to_ticket(&self, id: &str, reply: &TicketReply) -> Result<TicketMessage> {
        self.post_json(&format!("/tickets/{}/reply", segment(id)), reply)
            .await
    }
}
