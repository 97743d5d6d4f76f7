//! The auto-dialer contacts page.
//!
//! Composes the contacts listing, the browser phone, the auto-dialer and the
//! personalized messages panel around one selected campaign number.

use crate::domain::call::CallState;
use crate::domain::campaign::Campaign;
use crate::domain::contact::{Contact, ContactGroup};
use crate::domain::entity::Entity;
use crate::domain::filter::FilterState;
use crate::domain::message::MessageKind;
use crate::domain::notification::Notification;
use crate::domain::number::EngagedNumber;
use crate::domain::types::{CampaignId, ContactId, GroupId, NumberId, PhoneNumber};
use crate::models::config::ClientConfig;
use crate::repository::{ResourceReader, ResourceWriter, fetch_all};
use crate::services::autodialer::{AutoDialer, COMPLETE_MESSAGE, DialAction};
use crate::services::call::{CallConnection, CallEvent, CallSession, CallUi, TelephonyDevice};
use crate::services::list::{ListView, SEARCH_FIELD};
use crate::services::messages::MessageCenter;
use crate::services::{ServiceError, ServiceResult};

pub const SELECT_NUMBER_TO_USE: &str = "Please select a number to use";
pub const ENTER_NUMBER_MESSAGE: &str = "Please enter a number to call or dial from your contacts";
pub const GROUP_FILTER: &str = "group";
pub const CAMPAIGN_FILTER: &str = "campaign";

const LOOKUP_PAGE_SIZE: &str = "?page_size=200";

pub struct ContactsPage<C> {
    contacts: ListView<Contact>,
    call: CallSession<C>,
    dialer: AutoDialer,
    messages: MessageCenter,
    numbers: Vec<EngagedNumber>,
    selected_number: Option<EngagedNumber>,
    number_to_call: String,
    campaigns: Vec<Campaign>,
    groups: Vec<ContactGroup>,
}

impl<C> ContactsPage<C>
where
    C: CallConnection,
{
    pub fn new(token_expired_code: u32, call_interval_secs: u64) -> Self {
        Self {
            contacts: ListView::new(
                Contact::ENDPOINT,
                FilterState::with_fields([GROUP_FILTER, CAMPAIGN_FILTER, SEARCH_FIELD]),
            ),
            call: CallSession::new(token_expired_code),
            dialer: AutoDialer::new(call_interval_secs),
            messages: MessageCenter::new(),
            numbers: Vec::new(),
            selected_number: None,
            number_to_call: String::new(),
            campaigns: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.token_expired_code, config.call_interval_secs)
    }

    pub fn contacts(&self) -> &ListView<Contact> {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ListView<Contact> {
        &mut self.contacts
    }

    pub fn call(&self) -> &CallSession<C> {
        &self.call
    }

    pub fn call_mut(&mut self) -> &mut CallSession<C> {
        &mut self.call
    }

    pub fn dialer(&self) -> &AutoDialer {
        &self.dialer
    }

    pub fn messages(&self) -> &MessageCenter {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageCenter {
        &mut self.messages
    }

    pub fn numbers(&self) -> &[EngagedNumber] {
        &self.numbers
    }

    pub fn selected_number(&self) -> Option<&EngagedNumber> {
        self.selected_number.as_ref()
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn groups(&self) -> &[ContactGroup] {
        &self.groups
    }

    pub fn number_to_call(&self) -> &str {
        &self.number_to_call
    }

    pub fn set_number_to_call(&mut self, number: impl Into<String>) {
        self.number_to_call = number.into();
    }

    /// Loads the contacts and every lookup the page needs.
    ///
    /// Lookup failures are reported and leave their list empty; only a
    /// failure to load the contacts themselves is returned.
    pub fn mount<R, U>(&mut self, repo: &R, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        U: CallUi + ?Sized,
    {
        let campaigns_url = format!("{}{LOOKUP_PAGE_SIZE}", Campaign::ENDPOINT);
        self.campaigns = lookup(repo, ui, &campaigns_url, "campaigns");

        let groups_url = format!("{}{LOOKUP_PAGE_SIZE}", ContactGroup::ENDPOINT);
        self.groups = lookup(repo, ui, &groups_url, "groups");

        let numbers_url = format!("{}?engaged_by=campaign", EngagedNumber::ENDPOINT);
        self.numbers = lookup(repo, ui, &numbers_url, "campaign numbers");

        if let Err(err) = self.messages.refresh(repo, ui) {
            log::warn!("Personalized messages unavailable: {err}");
        }
        if let Err(err) = self.messages.listing_mut().load(repo, ui, None) {
            log::warn!("Message listing unavailable: {err}");
        }

        self.contacts.load(repo, ui, None)
    }

    pub fn select_number(&mut self, id: NumberId) -> ServiceResult<()> {
        let number = self
            .numbers
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::InvalidState(format!("unknown number {id}")))?;
        log::info!("Using {} for outgoing calls", number.twilio_number);
        self.selected_number = Some(number);
        Ok(())
    }

    /// The selected campaign number as a dialable sender.
    pub fn selected_phone(&self) -> Option<PhoneNumber> {
        let number = self.selected_number.as_ref()?;
        match PhoneNumber::new(number.twilio_number.as_str()) {
            Ok(phone) => Some(phone),
            Err(err) => {
                log::warn!("Selected number {} is unusable: {err}", number.twilio_number);
                None
            }
        }
    }

    /// Dials a contact from the selected number. Returns `false` after
    /// alerting when the contact has no usable phone or no number is
    /// selected.
    pub fn call_contact<D, U>(&mut self, device: &mut D, ui: &U, contact: &Contact) -> ServiceResult<bool>
    where
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        let Some(raw) = contact.dialable_phone() else {
            ui.alert(&format!("{} has no phone number attached", contact.first_name));
            return Ok(false);
        };
        let phone = match PhoneNumber::new(raw) {
            Ok(phone) => phone,
            Err(err) => {
                log::warn!("Skipping contact {}: {raw:?} {err}", contact.id);
                ui.alert(&format!("{} has an invalid phone number", contact.first_name));
                return Ok(false);
            }
        };
        let Some(from) = self.selected_phone() else {
            ui.alert(SELECT_NUMBER_TO_USE);
            return Ok(false);
        };

        self.number_to_call = phone.to_string();
        self.call.dial(device, ui, phone.as_str(), &from)?;
        Ok(true)
    }

    /// Dials the typed-in number.
    pub fn call_number<D, U>(&mut self, device: &mut D, ui: &U) -> ServiceResult<bool>
    where
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        if self.number_to_call.trim().is_empty() {
            ui.alert(ENTER_NUMBER_MESSAGE);
            return Ok(false);
        }
        let Some(from) = self.selected_phone() else {
            ui.alert(SELECT_NUMBER_TO_USE);
            return Ok(false);
        };

        let to = self.number_to_call.clone();
        self.call.dial(device, ui, &to, &from)?;
        Ok(true)
    }

    pub fn hangup<U>(&mut self, ui: &U)
    where
        U: CallUi + ?Sized,
    {
        self.call.hangup(ui);
        self.dialer.call_finished();
    }

    /// Applies a telephony callback; a call that just ended starts the
    /// auto-dialer countdown.
    pub fn on_call_event<U>(&mut self, event: CallEvent<C>, ui: &U)
    where
        U: CallUi + ?Sized,
    {
        let was_busy = !self.call.state().is_idle();
        self.call.handle(event, ui);
        if was_busy && self.call.state() == CallState::Idle {
            self.dialer.call_finished();
        }
    }

    pub fn start_autodial<R, D, U>(&mut self, repo: &R, device: &mut D, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        if self.selected_phone().is_none() {
            ui.alert(SELECT_NUMBER_TO_USE);
            return Ok(());
        }
        self.dialer.start();
        self.run_dialer(repo, device, ui)
    }

    pub fn pause_autodial(&mut self) {
        self.dialer.pause();
    }

    pub fn resume_autodial<R, D, U>(&mut self, repo: &R, device: &mut D, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        self.dialer.resume();
        self.run_dialer(repo, device, ui)
    }

    pub fn stop_autodial(&mut self) {
        self.dialer.stop();
    }

    /// Stops the dialer countdown and the call timer and releases the device.
    pub fn unmount<D, U>(&mut self, device: &mut D, ui: &U)
    where
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        self.dialer.stop();
        self.call.teardown(device, ui);
    }

    /// One-second heartbeat driving the call timer and the dialer countdown.
    pub fn tick<R, D, U>(&mut self, repo: &R, device: &mut D, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        self.call.tick();
        if self.dialer.tick() {
            return self.run_dialer(repo, device, ui);
        }
        Ok(())
    }

    /// Performs dialer steps until a call is placed or the dialer halts.
    fn run_dialer<R, D, U>(&mut self, repo: &R, device: &mut D, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        loop {
            match self.dialer.plan(self.contacts.data()) {
                DialAction::Call(contact) => match self.call_contact(device, ui, &contact) {
                    Ok(true) => return Ok(()),
                    Ok(false) => self.dialer.skip(),
                    Err(err) => {
                        self.dialer.stop();
                        return Err(err);
                    }
                },
                DialAction::FetchNextPage => match self.contacts.next(repo, ui) {
                    Ok(true) => self.dialer.page_loaded(),
                    Ok(false) => {
                        self.dialer.stop();
                        return Ok(());
                    }
                    Err(err) => {
                        self.dialer.stop();
                        return Err(err);
                    }
                },
                DialAction::Complete => {
                    ui.alert(COMPLETE_MESSAGE);
                    return Ok(());
                }
                DialAction::Halted => return Ok(()),
            }
        }
    }

    pub fn filter_by_group<R, U>(&mut self, repo: &R, ui: &U, group: Option<GroupId>) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        U: CallUi + ?Sized,
    {
        let value = group.map(|g| g.to_string()).unwrap_or_default();
        self.contacts.filters_mut().set(GROUP_FILTER, value);
        self.contacts.filter(repo, ui)
    }

    pub fn filter_by_campaign<R, U>(
        &mut self,
        repo: &R,
        ui: &U,
        campaign: Option<CampaignId>,
    ) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        U: CallUi + ?Sized,
    {
        let value = campaign.map(|c| c.to_string()).unwrap_or_default();
        self.contacts.filters_mut().set(CAMPAIGN_FILTER, value);
        self.contacts.filter(repo, ui)
    }

    /// Sends the default message of `kind` to one contact from the selected
    /// number.
    pub fn send_default<R, U>(&mut self, repo: &R, ui: &U, kind: MessageKind, contact: ContactId) -> ServiceResult<bool>
    where
        R: ResourceWriter + ?Sized,
        U: CallUi + ?Sized,
    {
        let from = self.selected_phone();
        self.messages
            .send_default(repo, ui, kind, from.as_ref(), &[contact])
    }

    /// Broadcasts the default message of `kind` to the selected contacts.
    pub fn broadcast<R, U>(&mut self, repo: &R, ui: &U, kind: MessageKind) -> ServiceResult<bool>
    where
        R: ResourceWriter + ?Sized,
        U: CallUi + ?Sized,
    {
        let from = self.selected_phone();
        self.messages.send_to_selected(repo, ui, kind, from.as_ref())
    }

    /// Selects every contact matching the current filters, or clears the
    /// selection.
    pub fn toggle_select_all<R, U>(&mut self, repo: &R, ui: &U) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        U: CallUi + ?Sized,
    {
        self.messages
            .toggle_select_all(repo, self.contacts.filters())
            .inspect_err(|err| ui.notify(Notification::error_occurred(err)))
    }
}

fn lookup<T, R, U>(repo: &R, ui: &U, url: &str, what: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
    R: ResourceReader + ?Sized,
    U: CallUi + ?Sized,
{
    fetch_all(repo, url).unwrap_or_else(|err| {
        log::error!("Failed to load {what} from {url}: {err}");
        ui.notify(Notification::danger(format!("Could not load {what}: {err}")));
        Vec::new()
    })
}
