//! Row operations on a [`ListView`] of entities.
//!
//! Rows change only after the server confirms the write; there is no
//! optimistic update.

use serde::Serialize;
use validator::Validate;

use crate::domain::entity::Entity;
use crate::domain::notification::Notification;
use crate::forms::{FormError, validation_to_field_errors};
use crate::repository::errors::RepositoryError;
use crate::repository::{self, ResourceWriter};
use crate::services::list::ListView;
use crate::services::notify::Notifier;
use crate::services::{ServiceError, ServiceResult};

impl<T> ListView<T>
where
    T: Entity,
{
    fn write_failed<N>(&mut self, err: RepositoryError, ui: &N) -> ServiceError
    where
        N: Notifier + ?Sized,
    {
        log::error!("Failed to save {}: {err}", T::LABEL);
        match err.field_errors() {
            Some(errors) => {
                self.field_errors = errors.clone();
                ui.notify(Notification::danger(format!(
                    "{} could not be saved!",
                    T::LABEL
                )));
            }
            None => ui.notify(Notification::error_occurred(&err)),
        }
        ServiceError::from(err)
    }

    /// POSTs a new record and puts it at the top of the list.
    pub fn create<R, N, P>(&mut self, repo: &R, ui: &N, payload: &P) -> ServiceResult<T>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
        P: Serialize + ?Sized,
    {
        self.field_errors.clear();

        let created: T = match repository::create(repo, T::ENDPOINT, payload) {
            Ok(created) => created,
            Err(err) => return Err(self.write_failed(err, ui)),
        };

        self.data.results.insert(0, created.clone());
        self.data.count += 1;
        ui.notify(Notification::success(format!(
            "{} has been saved!",
            T::LABEL
        )));
        Ok(created)
    }

    /// Validates the form locally before creating; invalid forms never reach
    /// the server.
    pub fn create_validated<R, N, F>(&mut self, repo: &R, ui: &N, form: &F) -> ServiceResult<T>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
        F: Validate + Serialize,
    {
        if let Err(errors) = form.validate() {
            log::error!("Failed to validate {} form: {errors}", T::LABEL);
            self.field_errors = validation_to_field_errors(&errors);
            ui.notify(Notification::danger(format!(
                "{} could not be saved!",
                T::LABEL
            )));
            return Err(ServiceError::Form(FormError::Validation(errors)));
        }
        self.create(repo, ui, form)
    }

    /// PATCHes a record and swaps the returned row in place.
    pub fn update<R, N, P>(&mut self, repo: &R, ui: &N, id: T::Id, payload: &P) -> ServiceResult<T>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
        P: Serialize + ?Sized,
    {
        self.field_errors.clear();

        let updated: T = match repository::update(repo, &T::detail_url(id), payload) {
            Ok(updated) => updated,
            Err(err) => return Err(self.write_failed(err, ui)),
        };

        if let Some(row) = self.data.results.iter_mut().find(|row| row.id() == id) {
            *row = updated.clone();
        }
        ui.notify(Notification::success(format!(
            "{} has been saved!",
            T::LABEL
        )));
        Ok(updated)
    }

    /// Asks for confirmation, then DELETEs the record and splices it out.
    ///
    /// Returns `false` when the user declines. The count drops by exactly
    /// one on success even if the row was not on the current page.
    pub fn delete<R, N>(&mut self, repo: &R, ui: &N, id: T::Id) -> ServiceResult<bool>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
    {
        let question = format!(
            "Are you sure you want to delete this {}?",
            T::LABEL.to_lowercase()
        );
        if !ui.confirm(&question) {
            return Ok(false);
        }

        if let Err(err) = repo.delete(&T::detail_url(id)) {
            log::error!("Failed to delete {} {id}: {err}", T::LABEL);
            ui.notify(Notification::error_occurred(&err));
            return Err(ServiceError::from(err));
        }

        self.data.results.retain(|row| row.id() != id);
        self.data.count = self.data.count.saturating_sub(1);
        ui.notify(Notification::success(format!(
            "{} has been deleted!",
            T::LABEL
        )));
        Ok(true)
    }
}
