//! Auto-dialer walking the contacts list one call at a time.
//!
//! The dialer only decides what happens next; the contacts page performs
//! the call or page fetch it asks for. After every finished call a countdown
//! of `call_interval` seconds runs before the next contact is dialed.

use crate::domain::call::format_mm_ss;
use crate::domain::contact::Contact;
use crate::pagination::PagedList;

pub const COMPLETE_MESSAGE: &str = "Autodialing complete!";

/// Next step requested by the dialer.
#[derive(Clone, Debug, PartialEq)]
pub enum DialAction {
    Call(Contact),
    /// The current page is exhausted; follow its `next` cursor and resume
    /// from the top of the new page.
    FetchNextPage,
    /// The last page is exhausted.
    Complete,
    /// Not running, or paused.
    Halted,
}

#[derive(Clone, Debug)]
pub struct AutoDialer {
    in_progress: bool,
    paused: bool,
    position: usize,
    countdown: u64,
    counting: bool,
    call_interval: u64,
}

impl AutoDialer {
    pub fn new(call_interval: u64) -> Self {
        Self {
            in_progress: false,
            paused: false,
            position: 0,
            countdown: call_interval,
            counting: false,
            call_interval,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Index into the current page of the contact being dialed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    pub fn is_counting_down(&self) -> bool {
        self.counting
    }

    pub fn countdown_display(&self) -> String {
        format_mm_ss(self.countdown)
    }

    /// Starts from the first contact of the current page.
    pub fn start(&mut self) {
        log::info!("Autodialing started");
        self.in_progress = true;
        self.paused = false;
        self.position = 0;
        self.stop_countdown();
    }

    /// Decides what to do at the current position of `contacts`.
    pub fn plan(&mut self, contacts: &PagedList<Contact>) -> DialAction {
        if !self.in_progress || self.paused {
            return DialAction::Halted;
        }
        self.stop_countdown();

        if let Some(contact) = contacts.results.get(self.position) {
            self.countdown = self.call_interval;
            return DialAction::Call(contact.clone());
        }

        if contacts.has_next() {
            DialAction::FetchNextPage
        } else {
            log::info!("Autodialing complete");
            self.in_progress = false;
            DialAction::Complete
        }
    }

    /// A new page replaced the list; dialing restarts at its first row.
    pub fn page_loaded(&mut self) {
        self.position = 0;
    }

    /// The current call ended; starts the countdown to the next one.
    pub fn call_finished(&mut self) {
        if self.in_progress && !self.paused {
            self.countdown = self.call_interval;
            self.counting = true;
        }
    }

    /// Skips the current contact without calling it.
    pub fn skip(&mut self) {
        if self.in_progress {
            self.position += 1;
        }
    }

    /// Advances the countdown by one second. Returns `true` when it ran out
    /// and the next contact is due.
    pub fn tick(&mut self) -> bool {
        if !self.counting || self.paused {
            return false;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return false;
        }
        self.counting = false;
        self.position += 1;
        true
    }

    pub fn pause(&mut self) {
        if self.in_progress {
            log::info!("Autodialing paused at position {}", self.position);
            self.paused = true;
            self.stop_countdown();
        }
    }

    /// Resumes with the contact after the one dialed before pausing.
    pub fn resume(&mut self) {
        if self.in_progress && self.paused {
            self.paused = false;
            self.position += 1;
        }
    }

    pub fn stop(&mut self) {
        self.in_progress = false;
        self.paused = false;
        self.stop_countdown();
    }

    fn stop_countdown(&mut self) {
        self.counting = false;
        self.countdown = 0;
    }
}
