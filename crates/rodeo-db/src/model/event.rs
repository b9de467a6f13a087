use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::EventStatus, schema};

/// One persisted event occurrence
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::event)]
#[diesel(check_for_backend(Pg))]
pub struct Event {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub venue_id: uuid::Uuid,
    pub start_datetime: chrono::DateTime<chrono::Utc>,
    pub end_datetime: chrono::DateTime<chrono::Utc>,
    pub timezone: String,
    pub flyer_image_url: Option<String>,
    pub official_website_url: Option<String>,
    pub classes_details: Option<String>,
    pub status: EventStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new events
///
/// Owned so that a row can move into a transaction closure.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::event)]
pub struct NewEvent {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub venue_id: uuid::Uuid,
    pub start_datetime: chrono::DateTime<chrono::Utc>,
    pub end_datetime: chrono::DateTime<chrono::Utc>,
    pub timezone: String,
    pub flyer_image_url: Option<String>,
    pub official_website_url: Option<String>,
    pub classes_details: Option<String>,
    pub status: EventStatus,
}

/// Discipline link for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::event_discipline)]
#[diesel(check_for_backend(Pg))]
pub struct EventDiscipline {
    pub event_id: uuid::Uuid,
    pub discipline_id: i32,
}

/// Sanctioning body link for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::event_sanction)]
#[diesel(check_for_backend(Pg))]
pub struct EventSanction {
    pub event_id: uuid::Uuid,
    pub sanction_id: i32,
}
