//! Personalized voice/SMS messages sent from the contacts page.

use std::collections::BTreeSet;

use crate::domain::entity::Entity;
use crate::domain::filter::FilterState;
use crate::domain::message::{MessageKind, PersonalizedMessage};
use crate::domain::notification::Notification;
use crate::domain::types::{ContactId, MessageId, PhoneNumber};
use crate::dto::api::SendMessagePayload;
use crate::forms::message::{SendMessageForm, contacts_payload};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ResourceReader, ResourceWriter, fetch_all, fetch_page};
use crate::services::list::{ListView, SEARCH_FIELD};
use crate::services::notify::Notifier;
use crate::services::{ServiceError, ServiceResult};

pub const SELECT_NUMBER_MESSAGE: &str = "Please select a number for this action";
const CONTACT_IDS_URL: &str = "/api/contacts/ids/";
const TYPE_FIELD: &str = "type";

fn missing_default_message(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Voice => {
            "Please set a default Voice Message by clicking on Configure Defaults link"
        }
        MessageKind::Sms => "Please set a default SMS by clicking on Configure Defaults link",
    }
}

/// An in-flight send of a default message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    kind: MessageKind,
    message: MessageId,
    payload: SendMessagePayload,
}

impl SendTicket {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn url(&self) -> String {
        send_url(self.message)
    }
}

fn send_url(message: MessageId) -> String {
    format!("{}send/", PersonalizedMessage::detail_url(message))
}

#[derive(Debug, Default, Clone)]
struct KindState {
    messages: Vec<PersonalizedMessage>,
    default: Option<PersonalizedMessage>,
    sending_to: BTreeSet<ContactId>,
}

impl KindState {
    fn replace(&mut self, messages: Vec<PersonalizedMessage>) {
        self.default = messages.iter().find(|m| m.is_default).cloned();
        self.messages = messages;
    }
}

pub struct MessageCenter {
    messages: ListView<PersonalizedMessage>,
    voice: KindState,
    sms: KindState,
    selected: Vec<ContactId>,
    select_all: bool,
}

impl Default for MessageCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCenter {
    pub fn new() -> Self {
        Self {
            messages: ListView::new(
                PersonalizedMessage::ENDPOINT,
                FilterState::with_fields([SEARCH_FIELD, TYPE_FIELD]),
            ),
            voice: KindState::default(),
            sms: KindState::default(),
            selected: Vec::new(),
            select_all: false,
        }
    }

    fn kind(&self, kind: MessageKind) -> &KindState {
        match kind {
            MessageKind::Voice => &self.voice,
            MessageKind::Sms => &self.sms,
        }
    }

    fn kind_mut(&mut self, kind: MessageKind) -> &mut KindState {
        match kind {
            MessageKind::Voice => &mut self.voice,
            MessageKind::Sms => &mut self.sms,
        }
    }

    /// Paged listing of every personalized message.
    pub fn listing(&self) -> &ListView<PersonalizedMessage> {
        &self.messages
    }

    pub fn listing_mut(&mut self) -> &mut ListView<PersonalizedMessage> {
        &mut self.messages
    }

    pub fn messages_of(&self, kind: MessageKind) -> &[PersonalizedMessage] {
        &self.kind(kind).messages
    }

    pub fn default_of(&self, kind: MessageKind) -> Option<&PersonalizedMessage> {
        self.kind(kind).default.as_ref()
    }

    /// Whether a send of `kind` to `contact` is in flight.
    pub fn is_sending(&self, kind: MessageKind, contact: ContactId) -> bool {
        self.kind(kind).sending_to.contains(&contact)
    }

    pub fn selected_contacts(&self) -> &[ContactId] {
        &self.selected
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    /// Reloads the voice and SMS lists and their defaults.
    ///
    /// Each kind loads on its own; a failed kind keeps its previous list and
    /// the first failure is returned once both have been tried.
    pub fn refresh<R, N>(&mut self, repo: &R, ui: &N) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut first_error = None;
        for kind in [MessageKind::Sms, MessageKind::Voice] {
            let url = format!("{}all/?type={}", PersonalizedMessage::ENDPOINT, kind.as_str());
            match fetch_all::<PersonalizedMessage, _>(repo, &url) {
                Ok(messages) => self.kind_mut(kind).replace(messages),
                Err(err) => {
                    log::error!("Failed to load {kind} messages: {err}");
                    ui.notify(Notification::danger("Error occurred loading messages"));
                    first_error.get_or_insert(ServiceError::from(err));
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Marks `id` as the default message of its kind on the server.
    pub fn set_as_default<R, N>(&mut self, repo: &R, ui: &N, kind: MessageKind, id: MessageId) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let url = format!("{}set-as-default/", PersonalizedMessage::detail_url(id));
        if let Err(err) = repo.get_json(&url) {
            log::error!("Failed to set message {id} as default: {err}");
            ui.notify(Notification::danger("Error setting as default"));
            return Err(err.into());
        }

        let state = self.kind_mut(kind);
        for message in &mut state.messages {
            message.is_default = message.id == id;
        }
        state.default = state.messages.iter().find(|m| m.id == id).cloned();
        Ok(())
    }

    /// Searches the messages of one kind, replacing that kind's list.
    pub fn search<R, N>(&mut self, repo: &R, ui: &N, kind: MessageKind, term: &str) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut query = FilterState::new([("page_size", "1000")]);
        query.set(SEARCH_FIELD, term.trim());
        query.set(TYPE_FIELD, kind.as_str());
        let url = query.apply_to(PersonalizedMessage::ENDPOINT);

        match fetch_page::<PersonalizedMessage, _>(repo, &url) {
            Ok(page) => {
                self.kind_mut(kind).messages = page.results;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to search {kind} messages: {err}");
                ui.notify(Notification::danger("Error occurred searching"));
                Err(err.into())
            }
        }
    }

    /// Validates a send of the default `kind` message and marks the
    /// recipients as in flight.
    ///
    /// Returns `None` after alerting the user when no number is selected or
    /// no default is configured.
    pub fn begin_send<N>(
        &mut self,
        ui: &N,
        kind: MessageKind,
        from: Option<&PhoneNumber>,
        contacts: &[ContactId],
    ) -> Option<SendTicket>
    where
        N: Notifier + ?Sized,
    {
        let Some(from) = from else {
            ui.alert(SELECT_NUMBER_MESSAGE);
            return None;
        };
        let Some(default) = self.default_of(kind).map(|m| m.id) else {
            ui.alert(missing_default_message(kind));
            return None;
        };

        self.kind_mut(kind).sending_to.extend(contacts.iter().copied());
        Some(SendTicket {
            kind,
            message: default,
            payload: contacts_payload(from, contacts),
        })
    }

    /// Clears the in-flight markers of `ticket`'s kind and reports the
    /// outcome.
    pub fn finish_send<N, V>(
        &mut self,
        ticket: SendTicket,
        outcome: RepositoryResult<V>,
        ui: &N,
    ) -> ServiceResult<()>
    where
        N: Notifier + ?Sized,
    {
        self.kind_mut(ticket.kind).sending_to.clear();
        match outcome {
            Ok(_) => {
                ui.notify(Notification::success(format!(
                    "{} has been sent successfully!",
                    ticket.kind
                )));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to send {}: {err}", ticket.url());
                ui.notify(Notification::danger(format!(
                    "Error occurred sending {}",
                    ticket.kind
                )));
                Err(err.into())
            }
        }
    }

    /// Sends the default `kind` message to `contacts`. Returns `false` when
    /// nothing was sent because a precondition failed.
    pub fn send_default<R, N>(
        &mut self,
        repo: &R,
        ui: &N,
        kind: MessageKind,
        from: Option<&PhoneNumber>,
        contacts: &[ContactId],
    ) -> ServiceResult<bool>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
    {
        let Some(ticket) = self.begin_send(ui, kind, from, contacts) else {
            return Ok(false);
        };
        let outcome = serde_json::to_value(&ticket.payload)
            .map_err(Into::into)
            .and_then(|body| repo.post_json(&ticket.url(), &body));
        self.finish_send(ticket, outcome, ui).map(|_| true)
    }

    /// Broadcasts the default `kind` message to the selected contacts.
    pub fn send_to_selected<R, N>(
        &mut self,
        repo: &R,
        ui: &N,
        kind: MessageKind,
        from: Option<&PhoneNumber>,
    ) -> ServiceResult<bool>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
    {
        let selected = self.selected.clone();
        self.send_default(repo, ui, kind, from, &selected)
    }

    /// Sends one message of the listing to a typed-in number.
    pub fn send_to_number<R, N>(
        &mut self,
        repo: &R,
        ui: &N,
        message: MessageId,
        form: SendMessageForm,
    ) -> ServiceResult<()>
    where
        R: ResourceWriter + ?Sized,
        N: Notifier + ?Sized,
    {
        let kind = self
            .messages
            .results()
            .iter()
            .chain(self.voice.messages.iter())
            .chain(self.sms.messages.iter())
            .find(|m| m.id == message)
            .map(|m| m.kind)
            .ok_or_else(|| ServiceError::InvalidState(format!("unknown message {message}")))?;

        let payload = SendMessagePayload::try_from(form)?;
        let body = serde_json::to_value(&payload).map_err(crate::repository::errors::RepositoryError::from)?;

        match repo.post_json(&send_url(message), &body) {
            Ok(_) => {
                ui.notify(Notification::success(format!("{kind} has been sent successfully!")));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to send message {message}: {err}");
                ui.notify(Notification::danger(format!("Error occurred sending {kind}")));
                Err(err.into())
            }
        }
    }

    /// Selects every contact matching `filters`, or clears the selection
    /// when everything is already selected.
    pub fn toggle_select_all<R>(&mut self, repo: &R, filters: &FilterState) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
    {
        if self.select_all {
            self.select_all = false;
            self.selected.clear();
            return Ok(());
        }

        let url = format!("{CONTACT_IDS_URL}?{}", filters.to_query());
        match fetch_all::<ContactId, _>(repo, &url) {
            Ok(ids) => {
                self.selected = ids;
                self.select_all = true;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to load contact ids: {err}");
                Err(err.into())
            }
        }
    }

    pub fn toggle_contact(&mut self, contact: ContactId) {
        if let Some(pos) = self.selected.iter().position(|c| *c == contact) {
            self.selected.remove(pos);
            self.select_all = false;
        } else {
            self.selected.push(contact);
        }
    }
}
