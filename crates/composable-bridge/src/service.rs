//! Messaging service with a one-slot session cache
//!
//! ```text
//! Idle ──request──▶ Converting ──ok──▶ Cached
//!                        ▲               │
//!                        └──refresh──────┘
//! ```
//!
//! Requests arriving while a result is cached are answered from the cache.
//! Uncached requests each run their own conversion; the last successful
//! run owns the slot and a failed run leaves it untouched.

use crate::dispatcher::MessageHandler;
use crate::errors::{BridgeError, Result};
use crate::export::export_result;
use crate::protocol::{AllowList, InboundEvent, OutboundMessage, Rejection, RequestOptions, validate};
use chrono::Utc;
use composable_core::config::{Config, ConverterConfig};
use composable_core::ConversionResult;
use composable_html::{PageSource, RenderWait, convert_page, wait_for_content};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info};

/// Delivers outbound messages to another window
pub trait Outbox {
    fn post(&self, message: &OutboundMessage<'_>, target_origin: &str);
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Converting,
    Cached,
}

/// What handling one inbound message did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Invalid message; nothing was sent and no state changed
    Ignored(Rejection),
    RepliedFromCache,
    Converted,
    /// Conversion failed; an error reply carrying this text was sent
    Failed(String),
}

#[derive(Default)]
struct Session {
    cached: Option<Rc<ConversionResult>>,
    in_flight: usize,
}

/// Counts one running conversion for as long as it lives
struct InFlight<'a> {
    session: &'a RefCell<Session>,
}

impl<'a> InFlight<'a> {
    fn enter(session: &'a RefCell<Session>) -> Self {
        session.borrow_mut().in_flight += 1;
        Self { session }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = self.session.borrow_mut();
        session.in_flight = session.in_flight.saturating_sub(1);
    }
}

/// Service settings
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub allowed_origins: AllowList,
    pub render_wait: RenderWait,
    pub converter: ConverterConfig,
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            allowed_origins: AllowList::new(config.bridge.allowed_origins.iter().cloned()),
            render_wait: config.render_wait.into(),
            converter: config.converter,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct MessagingService<S, O> {
    source: S,
    outbox: O,
    settings: ServiceSettings,
    session: RefCell<Session>,
}

impl<S: PageSource, O: Outbox> MessagingService<S, O> {
    pub fn new(source: S, outbox: O, settings: ServiceSettings) -> Self {
        Self {
            source,
            outbox,
            settings,
            session: RefCell::new(Session::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    pub fn state(&self) -> SessionState {
        let session = self.session.borrow();
        if session.in_flight > 0 {
            SessionState::Converting
        } else if session.cached.is_some() {
            SessionState::Cached
        } else {
            SessionState::Idle
        }
    }

    /// The cached result of this session, if any
    pub fn cached(&self) -> Option<Rc<ConversionResult>> {
        self.session.borrow().cached.clone()
    }

    /// Drops the cached result, starting a new session
    pub fn reset(&self) {
        self.session.borrow_mut().cached = None;
        debug!("session cache cleared");
    }

    /// Validates and answers one inbound message
    pub async fn handle_message(&self, event: InboundEvent) -> Outcome {
        let options = match validate(&event, &self.settings.allowed_origins) {
            Ok(options) => options,
            Err(rejection) => {
                debug!("ignoring message: {}", rejection);
                return Outcome::Ignored(rejection);
            }
        };
        info!(origin = %event.origin, refresh = options.refresh, "conversion requested");

        if !options.refresh
            && let Some(cached) = self.cached()
        {
            self.outbox
                .post(&OutboundMessage::Response { data: &cached }, &event.origin);
            debug!("replied from cache");
            return Outcome::RepliedFromCache;
        }

        self.convert_and_send(&options, &event.origin).await
    }

    /// Converts, caches and posts the result or an error to `target_origin`
    pub async fn convert_and_send(&self, options: &RequestOptions, target_origin: &str) -> Outcome {
        match self.convert(options).await {
            Ok(result) => {
                self.outbox
                    .post(&OutboundMessage::Response { data: &result }, target_origin);
                info!(target_origin, "sent conversion result");
                Outcome::Converted
            }
            Err(e) => {
                let message = match &e {
                    BridgeError::Conversion(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                error!("conversion request failed: {}", message);
                self.outbox.post(
                    &OutboundMessage::Error {
                        error: message.clone(),
                    },
                    target_origin,
                );
                Outcome::Failed(message)
            }
        }
    }

    /// Runs one conversion and stores it in the session cache on success
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be loaded or converted
    pub async fn convert(&self, options: &RequestOptions) -> Result<Rc<ConversionResult>> {
        let _in_flight = InFlight::enter(&self.session);

        wait_for_content(&self.source, self.settings.render_wait).await;
        let page = self.source.snapshot()?;
        let result = Rc::new(convert_page(
            &page,
            &options.component_mappings,
            &self.settings.converter,
        )?);

        self.session.borrow_mut().cached = Some(Rc::clone(&result));
        Ok(result)
    }

    /// Writes the cached result to `directory`
    ///
    /// # Errors
    ///
    /// Returns error if nothing is cached or the file cannot be written
    pub fn export_latest(&self, directory: &Path) -> Result<PathBuf> {
        let cached = self.cached().ok_or(BridgeError::NothingToExport)?;
        let page = self.source.snapshot()?;
        export_result(&cached, directory, page.location(), Utc::now())
    }
}

impl<S: PageSource, O: Outbox> MessageHandler for MessagingService<S, O> {
    type Outcome = Outcome;

    async fn handle(&self, event: InboundEvent) -> Outcome {
        self.handle_message(event).await
    }
}
