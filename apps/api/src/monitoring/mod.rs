//! Call-level performance and cost monitoring for model invocations.
//!
//! Aggregates are lifetime-cumulative and additive: no windowing, no reset
//! short of a process restart.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Single calls slower than this raise a warning. Strictly greater-than.
pub const SLOW_CALL_THRESHOLD_MS: u64 = 10_000;
/// Services whose error rate exceeds this raise a warning. Strictly greater-than.
pub const ERROR_RATE_THRESHOLD: f64 = 0.1;

/// Cost surcharge per whole second of call duration, in won.
const COST_PER_SECOND: u64 = 10;
const DEFAULT_BASE_COST: u64 = 50;

// ── Pricing ───────────────────────────────────────────────────────────────

/// Base fee per call in won. Unknown services get the default.
fn base_cost(service: &str) -> u64 {
    match service {
        "OpenAI" => 100,
        "Claude" => 150,
        _ => DEFAULT_BASE_COST,
    }
}

/// Base fee plus a per-second surcharge (whole seconds only).
pub fn call_cost(service: &str, duration_ms: u64) -> u64 {
    base_cost(service) + (duration_ms / 1000) * COST_PER_SECOND
}

// ── Metrics ───────────────────────────────────────────────────────────────

/// Running totals for one service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceMetrics {
    pub calls: u64,
    pub errors: u64,
    pub total_duration_ms: u64,
    /// `None` until the first call is recorded.
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub total_cost: u64,
    pub last_error: Option<String>,
}

impl ServiceMetrics {
    fn record(&mut self, duration_ms: u64, success: bool, error: Option<&str>) {
        self.calls += 1;
        if !success {
            self.errors += 1;
            self.last_error = error.map(str::to_string);
        }
        self.total_duration_ms += duration_ms;
        self.min_duration_ms = Some(self.min_duration_ms.map_or(duration_ms, |m| m.min(duration_ms)));
        self.max_duration_ms = Some(self.max_duration_ms.map_or(duration_ms, |m| m.max(duration_ms)));
    }

    pub fn error_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.errors as f64 / self.calls as f64
        }
    }

    pub fn average_duration_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.calls as f64
        }
    }
}

/// Threshold breach raised by `record_call`. Informational, never a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorWarning {
    SlowCall { service: String, duration_ms: u64 },
    HighErrorRate { service: String, error_rate: f64 },
}

/// Shared, lock-protected per-service accumulators.
#[derive(Debug, Default)]
pub struct CallMonitor {
    services: Mutex<BTreeMap<String, ServiceMetrics>>,
}

impl CallMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, ServiceMetrics>> {
        // Poison is ignored: updates are plain additions.
        self.services.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records one call and returns any thresholds it crossed.
    pub fn record_call(
        &self,
        service: &str,
        duration_ms: u64,
        success: bool,
        error: Option<&str>,
    ) -> Vec<MonitorWarning> {
        let cost = call_cost(service, duration_ms);
        let error_rate = {
            let mut services = self.lock();
            let metrics = services.entry(service.to_string()).or_default();
            metrics.record(duration_ms, success, error);
            metrics.total_cost += cost;
            metrics.error_rate()
        };

        info!(
            "Model call recorded: service={service}, duration={duration_ms}ms, success={success}"
        );
        debug!("Model call cost: service={service}, cost={cost}원");

        let mut warnings = Vec::new();
        if duration_ms > SLOW_CALL_THRESHOLD_MS {
            warn!("Slow model call: service={service}, duration={duration_ms}ms");
            warnings.push(MonitorWarning::SlowCall {
                service: service.to_string(),
                duration_ms,
            });
        }
        if error_rate > ERROR_RATE_THRESHOLD {
            warn!(
                "High model error rate: service={service}, error_rate={:.2}%",
                error_rate * 100.0
            );
            warnings.push(MonitorWarning::HighErrorRate {
                service: service.to_string(),
                error_rate,
            });
        }
        warnings
    }

    /// Error rate for a service; 0.0 for a service never seen.
    pub fn error_rate(&self, service: &str) -> f64 {
        self.lock()
            .get(service)
            .map(ServiceMetrics::error_rate)
            .unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> BTreeMap<String, ServiceMetrics> {
        self.lock().clone()
    }

    pub fn performance_report(&self) -> String {
        let services = self.snapshot();
        let (calls, cost) = totals(&services);

        let mut report = String::new();
        let _ = writeln!(report, "=== AI 서비스 성능 리포트 ===");
        let _ = writeln!(report, "생성 시간: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(report, "총 호출 수: {calls}");
        let _ = writeln!(report, "총 비용: {cost}원");
        let _ = writeln!(report, "평균 비용: {:.2}원", average(cost, calls));
        let _ = writeln!(report, "\n=== 서비스별 상세 메트릭 ===");
        for (name, m) in &services {
            let _ = writeln!(report, "\n[{name}]");
            let _ = writeln!(report, "  총 호출 수: {}", m.calls);
            let _ = writeln!(report, "  성공률: {:.2}%", (1.0 - m.error_rate()) * 100.0);
            let _ = writeln!(report, "  평균 응답 시간: {:.2}ms", m.average_duration_ms());
            let _ = writeln!(report, "  최대 응답 시간: {}", format_ms(m.max_duration_ms));
            let _ = writeln!(report, "  최소 응답 시간: {}", format_ms(m.min_duration_ms));
            if let Some(err) = &m.last_error {
                let _ = writeln!(report, "  최근 오류: {err}");
            }
        }
        report
    }

    pub fn cost_report(&self) -> String {
        let services = self.snapshot();
        let (calls, cost) = totals(&services);

        let mut report = String::new();
        let _ = writeln!(report, "=== AI 서비스 비용 리포트 ===");
        let _ = writeln!(report, "생성 시간: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(report, "총 비용: {cost}원");
        let _ = writeln!(report, "총 호출 수: {calls}");
        let _ = writeln!(report, "평균 비용: {:.2}원", average(cost, calls));
        let _ = writeln!(report, "\n=== 서비스별 비용 분석 ===");
        for (name, m) in &services {
            let _ = writeln!(
                report,
                "{name}: {}원 ({}회, 호출당 {:.2}원)",
                m.total_cost,
                m.calls,
                average(m.total_cost, m.calls)
            );
        }
        report
    }
}

fn totals(services: &BTreeMap<String, ServiceMetrics>) -> (u64, u64) {
    services
        .values()
        .fold((0, 0), |(calls, cost), m| (calls + m.calls, cost + m.total_cost))
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

fn format_ms(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}ms"))
}
