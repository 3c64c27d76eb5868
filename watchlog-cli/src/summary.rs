use std::time::Instant;

use watchlog_core::DecodeStats;

/// Итог одного прогона дампа для вывода в лог.
#[derive(Debug, Clone)]
pub struct DumpSummary {
    pub duration_secs: f64,
    pub messages: u64,
    pub dense: u64,
    pub sparse: u64,
    pub elements: u64,
    pub bytes_consumed: u64,
    pub throughput_mbps: f64,
}

impl DumpSummary {
    pub fn new(
        stats: &DecodeStats,
        started: &Instant,
    ) -> Self {
        let duration_secs = started.elapsed().as_secs_f64();

        let throughput_mbps = if duration_secs < 1e-9 {
            0.0
        } else {
            stats.bytes_consumed as f64 / duration_secs / 1_000_000.0
        };

        Self {
            duration_secs,
            messages: stats.messages,
            dense: stats.dense,
            sparse: stats.sparse,
            elements: stats.elements,
            bytes_consumed: stats.bytes_consumed,
            throughput_mbps,
        }
    }
}

impl std::fmt::Display for DumpSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.3}s", self.duration_secs)?;
        writeln!(
            f,
            "  Messages      : {} (dense {}, sparse {})",
            self.messages, self.dense, self.sparse
        )?;
        writeln!(f, "  Elements      : {}", self.elements)?;
        writeln!(f, "  Bytes read    : {}", self.bytes_consumed)?;
        writeln!(f, "  Throughput    : {:.1} MB/s", self.throughput_mbps)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
