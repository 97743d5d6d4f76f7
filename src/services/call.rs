//! Browser phone call-state machine.
//!
//! The telephony SDK owns signaling and media; this module only tracks
//! `idle -> ringing -> in_call -> idle` from the SDK's callbacks and drives
//! the calling modal and the duration timer.

use thiserror::Error;

use crate::domain::call::{CallDirection, CallState, DialParams, format_mm_ss};
use crate::domain::notification::Notification;
use crate::domain::types::PhoneNumber;
use crate::dto::api::TokenResponse;
use crate::repository::{ResourceReader, fetch_one};
use crate::services::notify::{LogNotifier, Notifier};
use crate::services::{ServiceError, ServiceResult};

/// Error reported by the telephony SDK.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("telephony error {code}: {message}")]
pub struct TelephonyError {
    pub code: u32,
    pub message: String,
}

/// A live call handle as exposed by the SDK.
pub trait CallConnection {
    fn accept(&self);
    fn reject(&self);
    fn mute(&self, muted: bool);
    fn disconnect(&self);
}

pub trait TelephonyDevice {
    type Connection: CallConnection;

    fn setup(&mut self, token: &str) -> Result<(), TelephonyError>;
    fn connect(&mut self, params: &DialParams) -> Result<Self::Connection, TelephonyError>;
    fn disconnect_all(&mut self);
}

/// Page-level side effects of call transitions.
pub trait CallUi: Notifier {
    fn show_calling_modal(&self, number: &str, direction: CallDirection);
    fn hide_calling_modal(&self);
    /// Full reload, used to re-authenticate after the capability token expires.
    fn reload_page(&self);
}

impl CallUi for LogNotifier {
    fn show_calling_modal(&self, number: &str, direction: CallDirection) {
        match direction {
            CallDirection::Outgoing => log::info!("Calling {number}"),
            CallDirection::Incoming => log::info!("Incoming call from {number}"),
        }
    }

    fn hide_calling_modal(&self) {
        log::info!("Call ended");
    }

    fn reload_page(&self) {
        log::warn!("Telephony token expired; restart to re-authenticate");
    }
}

/// Callbacks fired by the device.
#[derive(Debug)]
pub enum CallEvent<C> {
    Connect,
    Disconnect,
    Incoming { from: String, connection: C },
    Error { code: u32, message: String },
}

/// Call duration counter advanced by a 1 Hz tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallTimer {
    running: bool,
    elapsed: u64,
}

impl CallTimer {
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed
    }
}

pub struct CallSession<C> {
    state: CallState,
    connection: Option<C>,
    remote: Option<String>,
    muted: bool,
    timer: CallTimer,
    token_expired_code: u32,
}

impl<C> CallSession<C>
where
    C: CallConnection,
{
    pub fn new(token_expired_code: u32) -> Self {
        Self {
            state: CallState::Idle,
            connection: None,
            remote: None,
            muted: false,
            timer: CallTimer::default(),
            token_expired_code,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    /// Number on the other end of the current call.
    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn timer(&self) -> &CallTimer {
        &self.timer
    }

    pub fn duration_display(&self) -> String {
        format_mm_ss(self.timer.elapsed_secs())
    }

    /// Fetches a capability token and registers the device with it.
    pub fn setup<R, D>(&mut self, repo: &R, device: &mut D, token_url: &str) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        D: TelephonyDevice<Connection = C>,
    {
        let token: TokenResponse = fetch_one(repo, token_url).map_err(|err| {
            log::error!("Failed to fetch telephony token: {err}");
            err
        })?;
        device.setup(&token.token).map_err(|err| {
            log::error!("Failed to set up telephony device: {err}");
            ServiceError::InvalidState(err.to_string())
        })
    }

    /// Places an outgoing call from one of the account's numbers.
    pub fn dial<D, U>(
        &mut self,
        device: &mut D,
        ui: &U,
        to: &str,
        from: &PhoneNumber,
    ) -> ServiceResult<()>
    where
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        if !self.state.is_idle() {
            return Err(ServiceError::InvalidState(format!(
                "cannot dial while {}",
                self.state
            )));
        }

        let to = PhoneNumber::new(to)?;
        let params = DialParams {
            to: to.to_string(),
            from: from.to_string(),
        };

        let connection = device.connect(&params).map_err(|err| {
            log::error!("Failed to dial {to}: {err}");
            ui.notify(Notification::error_occurred(&err.message));
            ServiceError::InvalidState(err.to_string())
        })?;

        log::info!("Dialing {to} from {from}");
        self.connection = Some(connection);
        self.remote = Some(to.to_string());
        self.muted = false;
        self.state = CallState::Ringing {
            direction: CallDirection::Outgoing,
        };
        ui.show_calling_modal(to.as_str(), CallDirection::Outgoing);
        Ok(())
    }

    /// Applies a device callback.
    pub fn handle<U>(&mut self, event: CallEvent<C>, ui: &U)
    where
        U: CallUi + ?Sized,
    {
        match event {
            CallEvent::Connect => match self.state {
                CallState::Ringing { direction } => {
                    log::info!("Call connected");
                    self.state = CallState::InCall { direction };
                    self.timer.start();
                }
                CallState::InCall { .. } => {}
                CallState::Idle => log::warn!("Ignoring connect while idle"),
            },
            CallEvent::Disconnect => {
                log::info!("Call disconnected");
                self.end_call(ui);
            }
            CallEvent::Incoming { from, connection } => {
                if !self.state.is_idle() {
                    log::info!("Rejecting incoming call from {from} while {}", self.state);
                    connection.reject();
                    return;
                }
                log::info!("Incoming call from {from}");
                ui.show_calling_modal(&from, CallDirection::Incoming);
                self.connection = Some(connection);
                self.remote = Some(from);
                self.muted = false;
                self.state = CallState::Ringing {
                    direction: CallDirection::Incoming,
                };
            }
            CallEvent::Error { code, message } => {
                log::error!("Telephony error {code}: {message}");
                self.end_call(ui);
                if code == self.token_expired_code {
                    ui.reload_page();
                } else {
                    ui.notify(Notification::error_occurred(message));
                }
            }
        }
    }

    fn incoming_connection(&self) -> ServiceResult<&C> {
        match (self.state, &self.connection) {
            (
                CallState::Ringing {
                    direction: CallDirection::Incoming,
                },
                Some(connection),
            ) => Ok(connection),
            _ => Err(ServiceError::InvalidState(format!(
                "no incoming call to answer while {}",
                self.state
            ))),
        }
    }

    pub fn accept(&mut self) -> ServiceResult<()> {
        self.incoming_connection()?.accept();
        self.state = CallState::InCall {
            direction: CallDirection::Incoming,
        };
        self.timer.start();
        Ok(())
    }

    pub fn reject<U>(&mut self, ui: &U) -> ServiceResult<()>
    where
        U: CallUi + ?Sized,
    {
        self.incoming_connection()?.reject();
        self.end_call(ui);
        Ok(())
    }

    /// Flips mute on the live connection and returns the new mute state.
    pub fn toggle_mute(&mut self) -> ServiceResult<bool> {
        match (self.state, &self.connection) {
            (CallState::InCall { .. }, Some(connection)) => {
                self.muted = !self.muted;
                connection.mute(self.muted);
                Ok(self.muted)
            }
            _ => Err(ServiceError::InvalidState(format!(
                "cannot mute while {}",
                self.state
            ))),
        }
    }

    pub fn hangup<U>(&mut self, ui: &U)
    where
        U: CallUi + ?Sized,
    {
        if let Some(connection) = &self.connection {
            connection.disconnect();
        }
        self.end_call(ui);
    }

    /// Drops every connection the device holds and returns to idle.
    pub fn teardown<D, U>(&mut self, device: &mut D, ui: &U)
    where
        D: TelephonyDevice<Connection = C>,
        U: CallUi + ?Sized,
    {
        log::info!("Tearing down telephony device");
        device.disconnect_all();
        self.end_call(ui);
    }

    /// Advances the duration timer; the host calls this once per second.
    pub fn tick(&mut self) {
        if matches!(self.state, CallState::InCall { .. }) {
            self.timer.tick();
        }
    }

    fn end_call<U>(&mut self, ui: &U)
    where
        U: CallUi + ?Sized,
    {
        self.timer.stop();
        self.connection = None;
        self.muted = false;
        if !self.state.is_idle() {
            self.state = CallState::Idle;
            ui.hide_calling_modal();
        }
    }
}
