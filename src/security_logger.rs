//! Security-focused logging module to track authentication events

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { email: String, reason: String },
    AuthenticationSuccess { subject_id: i64 },
    AccountRegistered { subject_id: i64 },
    PasswordChanged { subject_id: i64 },
    TokenValidationFailed { route: String, reason: String },

    // Authorization events
    PermissionDenied { subject_id: i64, route: String, required: String },
    UnauthorizedAccess { route: String },

    // System security
    ConfigurationError { component: String, error: String },
}

impl SecurityEvent {
    /// Counter key for this kind of event
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::AccountRegistered { .. } => "account_registered",
            SecurityEvent::PasswordChanged { .. } => "password_changed",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::UnauthorizedAccess { .. } => "unauthorized_access",
            SecurityEvent::ConfigurationError { .. } => "config_error",
        }
    }
}

/// Security event with timestamp
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

#[derive(Default)]
struct LoggerState {
    events: VecDeque<TimestampedEvent>,
    counts: HashMap<&'static str, usize>,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    state: Mutex<LoggerState>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    /// Create a new security logger
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    pub fn with_capacity(max_events: usize) -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);
        alert_thresholds.insert("permission_denied", 20);
        alert_thresholds.insert("unauthorized_access", 20);
        alert_thresholds.insert("config_error", 1);

        Self {
            state: Mutex::new(LoggerState::default()),
            max_events,
            alert_thresholds,
        }
    }

    /// Log a security event
    pub fn log_event(&self, event: SecurityEvent) {
        let key = event.key();

        {
            // A poisoned lock only means another thread panicked mid-record
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

            state.events.push_back(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });
            while state.events.len() > self.max_events {
                state.events.pop_front();
            }

            let count = state.counts.entry(key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(key) {
                if *count % threshold == 0 {
                    log::error!("SECURITY ALERT: {} events of type '{}' recorded", count, key);
                }
            }
        }

        match event {
            SecurityEvent::AuthenticationFailed { email, reason } => {
                log::warn!("SECURITY: Authentication failed - Email: {}, Reason: {}", email, reason);
            }
            SecurityEvent::AuthenticationSuccess { subject_id } => {
                log::info!("SECURITY: Authentication success - Subject: {}", subject_id);
            }
            SecurityEvent::AccountRegistered { subject_id } => {
                log::info!("SECURITY: Account registered - Subject: {}", subject_id);
            }
            SecurityEvent::PasswordChanged { subject_id } => {
                log::info!("SECURITY: Password changed - Subject: {}", subject_id);
            }
            SecurityEvent::TokenValidationFailed { route, reason } => {
                log::warn!("SECURITY: Token validation failed - Route: {}, Reason: {}", route, reason);
            }
            SecurityEvent::PermissionDenied { subject_id, route, required } => {
                log::warn!(
                    "SECURITY: Permission denied - Subject: {}, Route: {}, Required: {}",
                    subject_id,
                    route,
                    required
                );
            }
            SecurityEvent::UnauthorizedAccess { route } => {
                log::warn!("SECURITY: Unauthorized access attempt - Route: {}", route);
            }
            SecurityEvent::ConfigurationError { component, error } => {
                log::error!("SECURITY: Configuration error - Component: {}, Error: {}", component, error);
            }
        }
    }

    /// Get security events recorded within `duration`
    pub fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        state
            .events
            .iter()
            .filter(|event| now.duration_since(event.timestamp) <= duration)
            .map(|event| event.event.clone())
            .collect()
    }

    /// Get event statistics
    pub fn get_event_stats(&self) -> HashMap<String, usize> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .counts
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global security logger instance
static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger
pub fn init_security_logger() -> Arc<SecurityLogger> {
    SECURITY_LOGGER
        .get_or_init(|| Arc::new(SecurityLogger::new()))
        .clone()
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger; no-op before initialisation
pub fn log_security_event(event: SecurityEvent) {
    if let Some(logger) = get_security_logger() {
        logger.log_event(event);
    }
}
