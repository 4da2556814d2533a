//! ConsoleSink - one JSON line per frame on stdout

use std::io::{self, Write};

use contracts::{ContractError, DriverTip, SnapshotSink, TelemetryFrame};
use tracing::{debug, info, instrument};

/// Sink that prints every snapshot as a JSON line
///
/// A `Switching to mode N` line follows the snapshot of the tick that ended
/// the previous mode, so it precedes the first snapshot computed in mode N.
pub struct ConsoleSink {
    name: String,
    out: Box<dyn Write + Send>,
    last_tip: Option<DriverTip>,
}

impl ConsoleSink {
    /// Console sink on stdout
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_writer(name, Box::new(io::stdout()))
    }

    /// Console sink on an arbitrary writer
    pub fn with_writer(name: impl Into<String>, out: Box<dyn Write + Send>) -> Self {
        Self {
            name: name.into(),
            out,
            last_tip: None,
        }
    }

    fn print_frame(&mut self, frame: &TelemetryFrame) -> Result<(), ContractError> {
        let json = frame.snapshot.to_json()?;
        writeln!(self.out, "{json}")?;

        if frame.mode_switched {
            if let Some(mode) = frame.mode {
                writeln!(self.out, "Switching to mode {}", mode.index())?;
            }
        }
        Ok(())
    }

    fn note_tip(&mut self, frame: &TelemetryFrame) {
        let tip = DriverTip::classify(&frame.snapshot);
        if self.last_tip != Some(tip) {
            info!(sink = %self.name, tick = frame.tick, tip = tip.as_str(), "driver tip changed");
            self.last_tip = Some(tip);
        }
    }
}

impl SnapshotSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "console_sink_write",
        skip(self, frame),
        fields(sink = %self.name, tick = frame.tick)
    )]
    async fn write(&mut self, frame: &TelemetryFrame) -> Result<(), ContractError> {
        self.print_frame(frame)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        self.note_tip(frame);
        Ok(())
    }

    #[instrument(name = "console_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.out.flush()?;
        Ok(())
    }

    #[instrument(name = "console_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.out.flush()?;
        debug!(sink = %self.name, "ConsoleSink closed");
        Ok(())
    }
}
