//! Medication and hydration reminders with a per-response adherence log.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdherenceRecord, AdherenceStatus, Reminder, ReminderDraft, ReminderId, ReminderKind,
    ReminderOverview,
};
pub use repository::ReminderRepository;
pub use router::reminder_router;
pub use service::{ReminderError, ReminderService};
