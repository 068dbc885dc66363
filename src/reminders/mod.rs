use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, RouterError},
    router::Router,
};

pub use repository::Repository;

mod handlers;
mod repository;

pub type SharedRepository = Arc<Mutex<Repository>>;

const ID: &str = "/reminders/{id}:^[0-9]+$";
const IDS: &str = "/reminders/{ids}:^[0-9]+(,[0-9]+)*$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub title: String,
    pub message: String,
    /// Seconds until the reminder is due.
    pub duration: u64,
}

#[derive(Debug, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub message: String,
    pub duration: u64,
}

impl NewReminder {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("message", &self.message)?;
        require_duration(self.duration)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EditReminder {
    pub title: Option<String>,
    pub message: Option<String>,
    pub duration: Option<u64>,
}

impl EditReminder {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_none() && self.message.is_none() && self.duration.is_none() {
            return Err(ApiError::FormatValidation(
                "at least one of title, message or duration is required".to_owned(),
            ));
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(message) = &self.message {
            require_text("message", message)?;
        }
        self.duration.map_or(Ok(()), require_duration)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::DataValidation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn require_duration(duration: u64) -> Result<(), ApiError> {
    if duration == 0 {
        return Err(ApiError::DataValidation(
            "duration must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

/// Builds the router serving the reminders API.
pub fn router(repo: SharedRepository) -> Result<Router, RouterError> {
    let mut router = Router::new();
    router.get("/health", handlers::health)?;
    router.post("/reminders", handlers::create(Arc::clone(&repo)))?;
    router.patch(ID, handlers::edit(Arc::clone(&repo)))?;
    router.get(IDS, handlers::fetch(Arc::clone(&repo)))?;
    router.delete(IDS, handlers::delete(repo))?;
    Ok(router)
}
