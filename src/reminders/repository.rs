use std::collections::BTreeMap;

use crate::{
    db::Db,
    error::{ApiError, StoreError},
};

use super::{EditReminder, NewReminder, Reminder};

type Reminders = BTreeMap<u64, Reminder>;

/// Reminders kept as a JSON object keyed by id in a [`Db`] blob.
#[derive(Debug)]
pub struct Repository {
    db: Db,
}

impl Repository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn load(&self) -> Result<Reminders, StoreError> {
        Ok(serde_json::from_slice(self.db.contents())?)
    }

    fn save(&mut self, reminders: &Reminders) -> Result<(), StoreError> {
        let bs = serde_json::to_vec(reminders)?;
        self.db.write(&bs)?;
        Ok(())
    }

    pub fn create(&mut self, new: NewReminder) -> Result<Reminder, ApiError> {
        new.validate()?;
        let mut reminders = self.load()?;
        let reminder = Reminder {
            id: self.db.generate_id(),
            title: new.title,
            message: new.message,
            duration: new.duration,
        };
        reminders.insert(reminder.id, reminder.clone());
        self.save(&reminders)?;
        Ok(reminder)
    }

    pub fn edit(&mut self, id: u64, edit: EditReminder) -> Result<Reminder, ApiError> {
        edit.validate()?;
        let mut reminders = self.load()?;
        let reminder = reminders.get_mut(&id).ok_or_else(|| not_found(&[id]))?;
        if let Some(title) = edit.title {
            reminder.title = title;
        }
        if let Some(message) = edit.message {
            reminder.message = message;
        }
        if let Some(duration) = edit.duration {
            reminder.duration = duration;
        }
        let reminder = reminder.clone();
        self.save(&reminders)?;
        Ok(reminder)
    }

    /// Returns the reminders in the order of `ids`. Fails if any is unknown.
    pub fn fetch(&self, ids: &[u64]) -> Result<Vec<Reminder>, ApiError> {
        let reminders = self.load()?;
        check_exist(&reminders, ids)?;
        Ok(ids
            .iter()
            .filter_map(|id| reminders.get(id).cloned())
            .collect())
    }

    /// Deletes all of `ids`, or none of them if any is unknown.
    pub fn delete(&mut self, ids: &[u64]) -> Result<(), ApiError> {
        let mut reminders = self.load()?;
        check_exist(&reminders, ids)?;
        for id in ids {
            reminders.remove(id);
        }
        self.save(&reminders)?;
        Ok(())
    }
}

fn check_exist(reminders: &Reminders, ids: &[u64]) -> Result<(), ApiError> {
    let missing: Vec<_> = ids
        .iter()
        .copied()
        .filter(|id| !reminders.contains_key(id))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(not_found(&missing))
    }
}

fn not_found(ids: &[u64]) -> ApiError {
    let ids = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ApiError::NotFound(format!("reminders not found: {}", ids))
}
