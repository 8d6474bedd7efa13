//! Telemetry Module
//!
//! Collects anonymous operational counters for:
//! - Impact reports ("1,200 donors funded 3,000 school terms this quarter")
//! - Performance monitoring
//! - The public stats endpoint
//!
//! Privacy-first: no donor names or emails are recorded, only event kinds,
//! rounded amounts and latencies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Telemetry event kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DonationInitialized,
    DonationVerified,
    FormSubmission,
    LoanQuote,
    ImpactEstimate,
    ContentEdit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DonationInitialized => "donation_initialized",
            EventKind::DonationVerified => "donation_verified",
            EventKind::FormSubmission => "form_submission",
            EventKind::LoanQuote => "loan_quote",
            EventKind::ImpactEstimate => "impact_estimate",
            EventKind::ContentEdit => "content_edit",
        }
    }
}

/// Single telemetry event (anonymized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Unix timestamp
    pub timestamp: u64,
    /// What happened
    pub kind: EventKind,
    /// Amount involved, rounded to whole currency units (0 for non-monetary events)
    pub amount: f64,
    /// Handler latency in milliseconds
    pub latency_ms: u64,
    /// Additional context (no PII)
    pub context: String,
}

impl TelemetryEvent {
    pub fn new(kind: EventKind, amount: f64, latency_ms: u64, context: String) -> Self {
        Self {
            timestamp: current_timestamp(),
            kind,
            // Whole units only; exact cents are not telemetry's business
            amount: amount.round(),
            latency_ms,
            context,
        }
    }
}

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Total events recorded
    pub total_events: u64,
    /// Events by kind
    pub events_by_kind: HashMap<String, u64>,
    /// Donations started at the gateway
    pub donations_initialized: u64,
    /// Donations confirmed by verification
    pub donations_verified: u64,
    /// Sum of verified donation amounts (currency units)
    pub total_raised: f64,
    /// Form submissions accepted
    pub forms_received: u64,
    /// Loan quotes served
    pub quotes_served: u64,
    /// Content documents edited
    pub content_edits: u64,
    /// Average handler latency (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

impl TelemetryStats {
    /// Export as CSV row
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.2},{},{},{:.2}\n",
            self.period_start,
            self.period_end,
            self.total_events,
            self.donations_initialized,
            self.donations_verified,
            self.total_raised,
            self.forms_received,
            self.quotes_served,
            self.avg_latency_ms,
        )
    }
}

/// Main telemetry collector
pub struct TelemetryCollector {
    /// Event buffer (in-memory)
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
    /// Atomic counters for fast updates
    total_events: AtomicU64,
    donations_initialized: AtomicU64,
    donations_verified: AtomicU64,
    forms_received: AtomicU64,
    quotes_served: AtomicU64,
    content_edits: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Sum of verified amounts, in whole cents to stay atomic
    total_raised_cents: AtomicU64,
    /// Event counters by kind
    kind_counts: Arc<RwLock<HashMap<EventKind, u64>>>,
    /// Session start time
    session_start: u64,
    /// Export directory
    export_dir: PathBuf,
    /// Max events in memory before flush
    max_buffer_size: usize,
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_config(PathBuf::from("./telemetry"), 1000)
    }

    /// Create collector with custom config
    pub fn with_config(export_dir: PathBuf, max_buffer_size: usize) -> Self {
        // Ensure export directory exists
        let _ = fs::create_dir_all(&export_dir);

        Self {
            events: Arc::new(RwLock::new(Vec::with_capacity(max_buffer_size))),
            total_events: AtomicU64::new(0),
            donations_initialized: AtomicU64::new(0),
            donations_verified: AtomicU64::new(0),
            forms_received: AtomicU64::new(0),
            quotes_served: AtomicU64::new(0),
            content_edits: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            total_raised_cents: AtomicU64::new(0),
            kind_counts: Arc::new(RwLock::new(HashMap::new())),
            session_start: current_timestamp(),
            export_dir,
            max_buffer_size,
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(event.latency_ms, Ordering::Relaxed);

        match event.kind {
            EventKind::DonationInitialized => {
                self.donations_initialized.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::DonationVerified => {
                self.donations_verified.fetch_add(1, Ordering::Relaxed);
                let cents = (event.amount * 100.0).max(0.0) as u64;
                self.total_raised_cents.fetch_add(cents, Ordering::Relaxed);
            }
            EventKind::FormSubmission => {
                self.forms_received.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::LoanQuote => {
                self.quotes_served.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::ImpactEstimate => {}
            EventKind::ContentEdit => {
                self.content_edits.fetch_add(1, Ordering::Relaxed);
            }
        }

        if let Ok(mut counts) = self.kind_counts.write() {
            *counts.entry(event.kind.clone()).or_insert(0) += 1;
        }

        let should_flush = {
            let mut events = match self.events.write() {
                Ok(events) => events,
                Err(_) => return,
            };
            events.push(event);
            events.len() >= self.max_buffer_size
        };

        if should_flush {
            if let Err(e) = self.flush_events() {
                tracing::warn!("Telemetry flush failed: {}", e);
            }
        }
    }

    /// Shorthand for non-monetary events
    pub fn record_kind(&self, kind: EventKind, latency_ms: u64, context: impl Into<String>) {
        self.record(TelemetryEvent::new(kind, 0.0, latency_ms, context.into()));
    }

    /// Current aggregated statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_events = self.total_events.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);
        let avg_latency_ms = if total_events > 0 {
            total_latency as f64 / total_events as f64
        } else {
            0.0
        };

        let events_by_kind = self
            .kind_counts
            .read()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(kind, count)| (kind.as_str().to_string(), *count))
                    .collect()
            })
            .unwrap_or_default();

        TelemetryStats {
            total_events,
            events_by_kind,
            donations_initialized: self.donations_initialized.load(Ordering::Relaxed),
            donations_verified: self.donations_verified.load(Ordering::Relaxed),
            total_raised: self.total_raised_cents.load(Ordering::Relaxed) as f64 / 100.0,
            forms_received: self.forms_received.load(Ordering::Relaxed),
            quotes_served: self.quotes_served.load(Ordering::Relaxed),
            content_edits: self.content_edits.load(Ordering::Relaxed),
            avg_latency_ms,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Seconds since the collector was created
    pub fn uptime_seconds(&self) -> u64 {
        current_timestamp().saturating_sub(self.session_start)
    }

    /// Append buffered events to the JSONL event log and clear the buffer
    pub fn flush_events(&self) -> std::io::Result<()> {
        let drained: Vec<TelemetryEvent> = {
            let mut events = self
                .events
                .write()
                .map_err(|_| std::io::Error::other("telemetry buffer lock poisoned"))?;
            events.drain(..).collect()
        };

        if drained.is_empty() {
            return Ok(());
        }

        let path = self.export_dir.join("events.jsonl");
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for event in &drained {
            if let Ok(line) = serde_json::to_string(event) {
                writeln!(file, "{}", line)?;
            }
        }

        tracing::debug!("Flushed {} telemetry events to {}", drained.len(), path.display());
        Ok(())
    }

    /// Write current stats as pretty JSON, returns the file path
    pub fn export_stats_json(&self) -> std::io::Result<PathBuf> {
        let stats = self.get_stats();
        let path = self.export_dir.join(format!("stats-{}.json", stats.period_end));
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Append current stats to the CSV report
    pub fn export_stats_csv(&self) -> std::io::Result<PathBuf> {
        let stats = self.get_stats();
        let path = self.export_dir.join("stats.csv");

        let needs_header = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if needs_header {
            writeln!(
                file,
                "period_start,period_end,total_events,donations_initialized,donations_verified,total_raised,forms_received,quotes_served,avg_latency_ms"
            )?;
        }
        file.write_all(stats.to_csv_row().as_bytes())?;
        Ok(path)
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_collector(tag: &str) -> TelemetryCollector {
        let dir = std::env::temp_dir().join(format!("amani-telemetry-{}-{}", tag, uuid::Uuid::new_v4()));
        TelemetryCollector::with_config(dir, 100)
    }

    #[test]
    fn test_verified_donations_accumulate() {
        let telemetry = temp_collector("raised");

        telemetry.record(TelemetryEvent::new(
            EventKind::DonationVerified,
            50.0,
            12,
            "ref AMN-1".to_string(),
        ));
        telemetry.record(TelemetryEvent::new(
            EventKind::DonationVerified,
            25.0,
            9,
            "ref AMN-2".to_string(),
        ));

        let stats = telemetry.get_stats();
        assert_eq!(stats.donations_verified, 2);
        assert!((stats.total_raised - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_counters() {
        let telemetry = temp_collector("kinds");

        telemetry.record_kind(EventKind::LoanQuote, 1, "quote");
        telemetry.record_kind(EventKind::LoanQuote, 1, "quote");
        telemetry.record_kind(EventKind::FormSubmission, 2, "contact");

        let stats = telemetry.get_stats();
        assert_eq!(stats.quotes_served, 2);
        assert_eq!(stats.forms_received, 1);
        assert_eq!(stats.events_by_kind.get("loan_quote"), Some(&2));
    }

    #[test]
    fn test_avg_latency() {
        let telemetry = temp_collector("latency");

        telemetry.record_kind(EventKind::LoanQuote, 10, "a");
        telemetry.record_kind(EventKind::LoanQuote, 30, "b");

        let stats = telemetry.get_stats();
        assert!((stats.avg_latency_ms - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flush_writes_jsonl() {
        let telemetry = temp_collector("flush");
        telemetry.record_kind(EventKind::ContentEdit, 3, "home");

        telemetry.flush_events().unwrap();

        let log = telemetry.export_dir.join("events.jsonl");
        let contents = fs::read_to_string(log).unwrap();
        assert!(contents.contains("content_edit"));

        // Buffer is drained; a second flush appends nothing
        telemetry.flush_events().unwrap();
    }

    #[test]
    fn test_stats_export_json() {
        let telemetry = temp_collector("export");
        telemetry.record_kind(EventKind::FormSubmission, 5, "volunteer");

        let path = telemetry.export_stats_json().unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("forms_received"));
    }
}
