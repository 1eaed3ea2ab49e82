//! Request configuration.
//!
//! A [`Config`] mixes per-call settings (cancellation, deadline, extra
//! acceptable statuses) with the transport settings that decide which pooled
//! client serves the call. Zero values stand for "use the default" and are
//! replaced when the call runs.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default overall request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default maximum number of idle connections.
pub const DEFAULT_MAX_IDLE_CONNS: usize = 100;
/// Default idle connection timeout.
pub const DEFAULT_IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);
/// Default TLS handshake timeout.
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a single call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use courier::Config;
///
/// let config = Config::new()
///     .timeout(Duration::from_secs(5))
///     .acceptable_status([201, 422]);
///
/// assert!(config.is_acceptable(422));
/// assert!(!config.is_acceptable(404));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Token that aborts the call when cancelled.
    pub cancel: Option<CancellationToken>,
    /// Point in time after which the call fails with a timeout.
    pub deadline: Option<Instant>,
    /// Overall request timeout (zero: 30s).
    pub timeout: Duration,
    /// Maximum idle connections kept by the pooled client (zero: 100).
    pub max_idle_conns: usize,
    /// How long an idle connection is kept (zero: 90s).
    pub idle_conn_timeout: Duration,
    /// Bound on connection establishment, TLS handshake included (zero: 10s).
    pub tls_handshake_timeout: Duration,
    /// Statuses accepted in addition to 2xx.
    pub acceptable_status_codes: Vec<u16>,
}

impl Config {
    /// Creates a configuration where every field uses its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum idle connections.
    #[must_use]
    pub const fn max_idle_conns(mut self, count: usize) -> Self {
        self.max_idle_conns = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn idle_conn_timeout(mut self, timeout: Duration) -> Self {
        self.idle_conn_timeout = timeout;
        self
    }

    /// Set the TLS handshake timeout.
    #[must_use]
    pub const fn tls_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.tls_handshake_timeout = timeout;
        self
    }

    /// Add statuses that count as success besides 2xx.
    #[must_use]
    pub fn acceptable_status(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.acceptable_status_codes.extend(codes);
        self
    }

    /// Replace zero fields with their defaults.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        let settings = self.transport_settings();
        self.timeout = settings.timeout;
        self.max_idle_conns = settings.max_idle_conns;
        self.idle_conn_timeout = settings.idle_conn_timeout;
        self.tls_handshake_timeout = settings.tls_handshake_timeout;
        self
    }

    /// Returns `true` if `status` is 2xx or listed in the acceptable statuses.
    #[must_use]
    pub fn is_acceptable(&self, status: u16) -> bool {
        (200..300).contains(&status) || self.acceptable_status_codes.contains(&status)
    }

    /// Defaulted settings that shape the pooled client.
    #[must_use]
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            timeout: non_zero(self.timeout, DEFAULT_TIMEOUT),
            max_idle_conns: if self.max_idle_conns == 0 {
                DEFAULT_MAX_IDLE_CONNS
            } else {
                self.max_idle_conns
            },
            idle_conn_timeout: non_zero(self.idle_conn_timeout, DEFAULT_IDLE_CONN_TIMEOUT),
            tls_handshake_timeout: non_zero(
                self.tls_handshake_timeout,
                DEFAULT_TLS_HANDSHAKE_TIMEOUT,
            ),
        }
    }
}

fn non_zero(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

/// The part of a [`Config`] that shapes a pooled client.
///
/// Cancellation, deadline and acceptable statuses are per call and do not
/// appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportSettings {
    /// Overall request timeout.
    pub timeout: Duration,
    /// Maximum idle connections.
    pub max_idle_conns: usize,
    /// Idle connection timeout.
    pub idle_conn_timeout: Duration,
    /// Connection establishment timeout.
    pub tls_handshake_timeout: Duration,
}

impl TransportSettings {
    /// Pool key: `<timeout_ms>-<max_idle>-<idle_timeout_ms>-<tls_handshake_ms>`.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.timeout.as_millis(),
            self.max_idle_conns,
            self.idle_conn_timeout.as_millis(),
            self.tls_handshake_timeout.as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_zero() {
        let config = Config::default();
        assert!(config.timeout.is_zero());
        assert_eq!(config.max_idle_conns, 0);
        assert!(config.cancel.is_none());
        assert!(config.deadline.is_none());
        assert!(config.acceptable_status_codes.is_empty());
    }

    #[test]
    fn with_defaults_fills_zero_fields() {
        let config = Config::default().with_defaults();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_idle_conns, 100);
        assert_eq!(config.idle_conn_timeout, Duration::from_secs(90));
        assert_eq!(config.tls_handshake_timeout, Duration::from_secs(10));
    }

    #[test]
    fn with_defaults_keeps_explicit_values() {
        let config = Config::new()
            .timeout(Duration::from_secs(60))
            .max_idle_conns(16)
            .with_defaults();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_idle_conns, 16);
        assert_eq!(config.idle_conn_timeout, Duration::from_secs(90));
    }

    #[test]
    fn fingerprint_of_defaults() {
        let settings = Config::default().transport_settings();
        assert_eq!(settings.fingerprint(), "30000-100-90000-10000");
    }

    #[test]
    fn fingerprint_ignores_per_call_fields() {
        let plain = Config::new().timeout(Duration::from_secs(5));
        let decorated = Config::new()
            .timeout(Duration::from_secs(5))
            .cancel_token(CancellationToken::new())
            .acceptable_status([404]);

        assert_eq!(
            plain.transport_settings().fingerprint(),
            decorated.transport_settings().fingerprint()
        );
    }

    #[test]
    fn fingerprint_uses_milliseconds() {
        let settings = Config::new()
            .timeout(Duration::from_millis(1500))
            .tls_handshake_timeout(Duration::from_micros(2_500))
            .transport_settings();

        assert_eq!(settings.fingerprint(), "1500-100-90000-2");
    }

    #[test]
    fn acceptable_statuses() {
        let config = Config::new().acceptable_status([201, 404]);

        assert!(config.is_acceptable(200));
        assert!(config.is_acceptable(201));
        assert!(config.is_acceptable(299));
        assert!(config.is_acceptable(404));
        assert!(!config.is_acceptable(300));
        assert!(!config.is_acceptable(500));
    }
}
