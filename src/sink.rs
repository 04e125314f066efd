//! Result sinks
//!
//! A sink receives finished reports for display or storage.

use crate::encoder::AnalysisReport;
use crate::error::AnalysisError;
use std::io::Write;

/// Consumer of analysis reports
pub trait ResultSink {
    fn publish(&mut self, report: &AnalysisReport) -> Result<(), AnalysisError>;
}

/// Keeps every published report in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<AnalysisReport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AnalysisReport> {
        self.reports.last()
    }
}

impl ResultSink for MemorySink {
    fn publish(&mut self, report: &AnalysisReport) -> Result<(), AnalysisError> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Writes one compact JSON report per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn publish(&mut self, report: &AnalysisReport) -> Result<(), AnalysisError> {
        let line = serde_json::to_string(report)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::pipeline::CorrelationAnalyzer;
    use crate::sources::MemorySource;
    use crate::types::RawRecord;

    fn source() -> MemorySource {
        MemorySource(vec![
            RawRecord::new(Some(1.0), Some(8.0)),
            RawRecord::new(Some(2.0), Some(6.0)),
            RawRecord::new(Some(3.0), Some(4.0)),
            RawRecord::new(Some(4.0), Some(2.0)),
        ])
    }

    #[test]
    fn test_json_lines_sink() {
        let analyzer = CorrelationAnalyzer::new(AnalysisConfig::default()).unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        analyzer.run(&source(), &mut sink).unwrap();
        analyzer.run(&source(), &mut sink).unwrap();

        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["correlation"]["bucket"], "strong_negative");
    }

    #[test]
    fn test_memory_sink() {
        let analyzer = CorrelationAnalyzer::new(AnalysisConfig::default()).unwrap();
        let mut sink = MemorySink::new();
        analyzer.run(&source(), &mut sink).unwrap();

        let report = sink.last().unwrap();
        assert!((report.correlation.coefficient + 1.0).abs() < 1e-9);
    }
}
