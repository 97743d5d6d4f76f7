//! Recording UI double shared by the view-model unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::domain::call::{CallDirection, DialParams};
use crate::domain::notification::Notification;
use crate::services::call::{CallConnection, CallUi, TelephonyDevice, TelephonyError};
use crate::services::notify::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowModal(String, CallDirection),
    HideModal,
    Reload,
}

pub struct RecordingUi {
    notifications: RefCell<Vec<Notification>>,
    alerts: RefCell<Vec<String>>,
    confirms: RefCell<Vec<String>>,
    confirm_answer: Cell<bool>,
    events: RefCell<Vec<UiEvent>>,
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self {
            notifications: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            confirms: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
            events: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingUi {
    pub fn answer_confirms(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }
}

impl Notifier for RecordingUi {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }
}

impl CallUi for RecordingUi {
    fn show_calling_modal(&self, number: &str, direction: CallDirection) {
        self.events
            .borrow_mut()
            .push(UiEvent::ShowModal(number.to_string(), direction));
    }

    fn hide_calling_modal(&self) {
        self.events.borrow_mut().push(UiEvent::HideModal);
    }

    fn reload_page(&self) {
        self.events.borrow_mut().push(UiEvent::Reload);
    }
}

/// Connection double recording every action taken on it.
#[derive(Clone, Debug, Default)]
pub struct FakeConnection {
    actions: Rc<RefCell<Vec<String>>>,
}

impl FakeConnection {
    pub fn log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.actions)
    }
}

impl CallConnection for FakeConnection {
    fn accept(&self) {
        self.actions.borrow_mut().push("accept".into());
    }

    fn reject(&self) {
        self.actions.borrow_mut().push("reject".into());
    }

    fn mute(&self, muted: bool) {
        self.actions.borrow_mut().push(format!("mute:{muted}"));
    }

    fn disconnect(&self) {
        self.actions.borrow_mut().push("disconnect".into());
    }
}

/// Device double handing out clones of one connection.
#[derive(Debug, Default)]
pub struct FakeDevice {
    pub token: Option<String>,
    pub dialed: Vec<DialParams>,
    pub connection: FakeConnection,
    pub fail_with: Option<TelephonyError>,
    pub released: bool,
}

impl TelephonyDevice for FakeDevice {
    type Connection = FakeConnection;

    fn setup(&mut self, token: &str) -> Result<(), TelephonyError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn connect(&mut self, params: &DialParams) -> Result<FakeConnection, TelephonyError> {
        if let Some(err) = self.fail_with.clone() {
            return Err(err);
        }
        self.dialed.push(params.clone());
        Ok(self.connection.clone())
    }

    fn disconnect_all(&mut self) {
        self.released = true;
    }
}
