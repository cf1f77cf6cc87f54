use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::builder::QRBuilder;
use crate::common::error::{DecodeError, EncodeResult};
use crate::common::metadata::ECLevel;
use crate::render::{Renderer, MAX_IMAGE_SIZE, MAX_QUIET_ZONE, MIN_QUIET_ZONE};
use crate::scan::{classify_results, format, Content, DecodedPayload, FormattedResult};

// Session state
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Classified(Content),
    Failed(DecodeError),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Identifies one scan. Only the most recently issued ticket may complete.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct ScanTicket(u64);

impl ScanTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

// Config
//------------------------------------------------------------------------------

/// Settings for symbols produced by [`ScanSession::generate`].
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Requested side length of generated images, in pixels.
    pub image_size: u32,
    pub ec_level: ECLevel,
    pub boost_ec_level: bool,
    pub foreground: [u8; 3],
    pub background: [u8; 3],
    pub quiet_zone: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            ec_level: ECLevel::L,
            boost_ec_level: true,
            foreground: [0, 0, 0],
            background: [255, 255, 255],
            quiet_zone: MIN_QUIET_ZONE,
        }
    }
}

impl SessionConfig {
    /// Parses a config, rejecting sizes the renderer cannot honour.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        if config.image_size > MAX_IMAGE_SIZE {
            return Err(serde_json::Error::custom(format!(
                "image_size {} exceeds {MAX_IMAGE_SIZE}",
                config.image_size
            )));
        }
        if !(MIN_QUIET_ZONE..=MAX_QUIET_ZONE).contains(&config.quiet_zone) {
            return Err(serde_json::Error::custom(format!(
                "quiet_zone {} outside {MIN_QUIET_ZONE}..={MAX_QUIET_ZONE}",
                config.quiet_zone
            )));
        }
        Ok(config)
    }

    pub fn renderer(&self) -> Renderer {
        let mut renderer = Renderer::new();
        renderer.foreground(self.foreground).background(self.background).quiet_zone(self.quiet_zone);
        renderer
    }
}

// Scan session
//------------------------------------------------------------------------------

/// Observable scan state machine.
///
/// `Idle -> Loading -> Classified | Failed`, and `reset` returns to `Idle`
/// from anywhere. Every scan is tagged with a ticket from a monotonic counter;
/// completions carrying anything but the latest ticket are dropped, so a
/// superseded scan never overwrites a newer one. Token check and state write
/// happen under the channel's write lock.
///
/// ```rust
/// use qrscan::{DecodedPayload, ScanSession, SessionState, ValueType};
///
/// let session = ScanSession::default();
/// let ticket = session.start_scan();
/// assert_eq!(session.state(), SessionState::Loading);
///
/// let payload = DecodedPayload::new(ValueType::Text).with_raw("hello");
/// assert!(session.succeed(ticket, vec![payload]));
/// assert_eq!(session.formatted().unwrap().display, "Text: hello");
/// ```
#[derive(Debug)]
pub struct ScanSession {
    state: watch::Sender<SessionState>,
    token: AtomicU64,
    config: SessionConfig,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ScanSession {
    pub fn new(config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self { state, token: AtomicU64::new(0), config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Enters `Loading` and supersedes any scan in flight.
    pub fn start_scan(&self) -> ScanTicket {
        let mut ticket = ScanTicket(0);
        self.state.send_modify(|state| {
            ticket = ScanTicket(self.token.fetch_add(1, Ordering::SeqCst) + 1);
            *state = SessionState::Loading;
        });
        debug!(ticket = ticket.0, "Scan started");
        ticket
    }

    /// Applies the recognizer's outcome for `ticket`. Returns `false` when the
    /// ticket was superseded, cancelled or reset, leaving the state untouched.
    pub fn complete(
        &self,
        ticket: ScanTicket,
        result: Result<Vec<DecodedPayload>, DecodeError>,
    ) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) || !state.is_loading() {
                return false;
            }
            *state = match &result {
                Ok(payloads) => SessionState::Classified(classify_results(payloads)),
                Err(err) => SessionState::Failed(err.clone()),
            };
            true
        });

        match (&result, applied) {
            (_, false) => debug!(ticket = ticket.0, "Discarded stale scan result"),
            (Ok(payloads), true) => {
                debug!(ticket = ticket.0, barcodes = payloads.len(), "Scan classified")
            }
            (Err(err), true) => warn!(ticket = ticket.0, %err, "Scan failed"),
        }
        applied
    }

    pub fn succeed(&self, ticket: ScanTicket, payloads: Vec<DecodedPayload>) -> bool {
        self.complete(ticket, Ok(payloads))
    }

    pub fn fail(&self, ticket: ScanTicket, err: DecodeError) -> bool {
        self.complete(ticket, Err(err))
    }

    /// Returns to `Idle` if `ticket` is still loading. The recognizer is not
    /// interrupted; its eventual result is dropped.
    pub fn cancel(&self, ticket: ScanTicket) -> bool {
        let cancelled = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) || !state.is_loading() {
                return false;
            }
            self.token.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Idle;
            true
        });
        if cancelled {
            debug!(ticket = ticket.0, "Scan cancelled");
        }
        cancelled
    }

    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.token.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Idle;
        });
        debug!("Session reset");
    }

    /// Runs one scan cycle over `decode`. Returns whether its result was applied.
    pub async fn scan<F>(&self, decode: F) -> bool
    where
        F: Future<Output = Result<Vec<DecodedPayload>, DecodeError>>,
    {
        let ticket = self.start_scan();
        let result = decode.await;
        self.complete(ticket, result)
    }

    /// Display text for the current result, if one is classified.
    pub fn formatted(&self) -> Option<FormattedResult> {
        match &*self.state.borrow() {
            SessionState::Classified(content) => Some(format(content)),
            _ => None,
        }
    }

    /// Encodes and renders `text`. Leaves the session state unchanged and
    /// yields `None` when the text does not fit a symbol.
    pub fn generate(&self, text: &str) -> Option<RgbImage> {
        self.try_generate(text)
            .map_err(|err| warn!(len = text.len(), %err, "Failed to generate QR"))
            .ok()
    }

    pub fn try_generate(&self, text: &str) -> EncodeResult<RgbImage> {
        let matrix = QRBuilder::new(text.as_bytes())
            .ec_level(self.config.ec_level)
            .boost_ec_level(self.config.boost_ec_level)
            .build()?;
        debug!(len = text.len(), version = *matrix.version(), "QR generated from text");
        Ok(self.config.renderer().render(&matrix, self.config.image_size))
    }

    fn is_current(&self, ticket: ScanTicket) -> bool {
        self.token.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod session_tests {
    use tokio::sync::oneshot;

    use super::{ScanSession, SessionConfig, SessionState};
    use crate::common::error::DecodeError;
    use crate::common::metadata::ECLevel;
    use crate::scan::{Content, DecodedPayload, ValueType};

    fn text(raw: &str) -> DecodedPayload {
        DecodedPayload::new(ValueType::Text).with_raw(raw)
    }

    fn plain(raw: &str) -> SessionState {
        SessionState::Classified(Content::PlainText { raw: Some(raw.to_string()) })
    }

    #[test]
    fn test_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScanSession>();
    }

    #[test]
    fn test_scan_success() {
        let session = ScanSession::default();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.formatted(), None);

        let ticket = session.start_scan();
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.succeed(ticket, vec![text("hello")]));
        assert_eq!(session.state(), plain("hello"));

        let res = session.formatted().unwrap();
        assert_eq!(res.display, "Text: hello");
        assert_eq!(res.editable_raw, "hello");
    }

    #[test]
    fn test_scan_failure() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        let err = DecodeError::SourceUnreadable("gone".into());
        assert!(session.fail(ticket, err.clone()));
        assert_eq!(session.state(), SessionState::Failed(err.clone()));
        assert_eq!(err.user_message(), "The selected QR code cannot be read");
        assert_eq!(session.formatted(), None);
    }

    #[test]
    fn test_zero_barcodes() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        assert!(session.succeed(ticket, Vec::new()));
        assert_eq!(
            session.state(),
            SessionState::Classified(Content::Unrecognized {
                message: "not recognized".into(),
                raw: String::new(),
            })
        );
    }

    #[test]
    fn test_last_request_wins() {
        let session = ScanSession::default();
        let first = session.start_scan();
        let second = session.start_scan();
        assert!(second > first);

        assert!(session.succeed(second, vec![text("second")]));
        assert!(!session.succeed(first, vec![text("first")]));
        assert_eq!(session.state(), plain("second"));

        // Superseded scan finishing first leaves the newer one loading
        let third = session.start_scan();
        let fourth = session.start_scan();
        assert!(!session.fail(third, DecodeError::Recognizer("late".into())));
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.succeed(fourth, vec![text("fourth")]));
        assert_eq!(session.state(), plain("fourth"));
    }

    #[test]
    fn test_complete_once() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        assert!(session.succeed(ticket, vec![text("a")]));
        assert!(!session.succeed(ticket, vec![text("b")]));
        assert_eq!(session.state(), plain("a"));
    }

    #[test]
    fn test_cancel() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        assert!(session.cancel(ticket));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.succeed(ticket, vec![text("late")]));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.cancel(ticket));
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.succeed(ticket, vec![text("late")]));
        assert_eq!(session.state(), SessionState::Idle);

        let ticket = session.start_scan();
        assert!(session.succeed(ticket, vec![text("ok")]));
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_generate_keeps_state() {
        let session = ScanSession::default();
        let ticket = session.start_scan();
        session.succeed(ticket, vec![text("hello")]);

        let img = session.generate("hello").unwrap();
        assert_eq!(img.dimensions(), (512, 512));
        assert_eq!(session.state(), plain("hello"));

        assert!(session.generate(&"x".repeat(3000)).is_none());
        assert_eq!(session.state(), plain("hello"));
    }

    #[test]
    fn test_config_from_json() {
        let config =
            SessionConfig::from_json(r#"{"image_size": 256, "ec_level": "M", "quiet_zone": 6}"#)
                .unwrap();
        assert_eq!(config.image_size, 256);
        assert_eq!(config.ec_level, ECLevel::M);
        assert!(config.boost_ec_level);
        assert_eq!(config.foreground, [0, 0, 0]);
        assert_eq!(config.renderer().quiet_zone_modules(), 6);

        let session = ScanSession::new(config);
        assert_eq!(session.generate("hi").unwrap().width(), 256);
        assert!(SessionConfig::from_json(r#"{"image_size": "big"}"#).is_err());
    }

    #[test]
    fn test_config_out_of_range() {
        assert!(SessionConfig::from_json(r#"{"quiet_zone": 3000000000}"#).is_err());
        assert!(SessionConfig::from_json(r#"{"quiet_zone": 2}"#).is_err());
        assert!(SessionConfig::from_json(r#"{"image_size": 4000000000}"#).is_err());
        assert!(SessionConfig::from_json(r#"{"image_size": 8192, "quiet_zone": 64}"#).is_ok());

        // Hand-built configs are bounded by the renderer instead
        let config = SessionConfig { quiet_zone: 3_000_000_000, ..SessionConfig::default() };
        let img = ScanSession::new(config).generate("hi").unwrap();
        assert_eq!(img.dimensions(), (512, 512));
    }

    #[tokio::test]
    async fn test_subscribe_sees_transitions() {
        let session = ScanSession::default();
        let mut rx = session.subscribe();
        let ticket = session.start_scan();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SessionState::Loading);

        session.succeed(ticket, vec![text("hi")]);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), plain("hi"));

        // Stale completion doesn't notify
        session.succeed(ticket, vec![text("again")]);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_scans_last_wins() {
        let session = ScanSession::default();
        let (tx1, rx1) = oneshot::channel::<Vec<DecodedPayload>>();
        let (tx2, rx2) = oneshot::channel::<Vec<DecodedPayload>>();

        let first = session.scan(async { rx1.await.map_err(|e| DecodeError::Recognizer(e.to_string())) });
        let second = session.scan(async { rx2.await.map_err(|e| DecodeError::Recognizer(e.to_string())) });
        let recognizer = async {
            tx2.send(vec![text("second")]).unwrap();
            tokio::task::yield_now().await;
            tx1.send(vec![text("first")]).unwrap();
        };

        let (first_applied, second_applied, _) = tokio::join!(first, second, recognizer);
        assert!(!first_applied);
        assert!(second_applied);
        assert_eq!(session.state(), plain("second"));
    }

    #[tokio::test]
    async fn test_scan_failure_future() {
        let session = ScanSession::default();
        let applied = session
            .scan(async { Err(DecodeError::Recognizer("no barcode service".into())) })
            .await;
        assert!(applied);
        assert!(matches!(session.state(), SessionState::Failed(DecodeError::Recognizer(_))));
    }
}

// Global constants
//------------------------------------------------------------------------------

const DEFAULT_IMAGE_SIZE: u32 = 512;
