//! Send/echo/response loop
//!
//! For every command the transactor writes the framed command, then reads
//! lines until the command is finished:
//!
//! - an echo of the command finishes it, unless it is a sequence command;
//! - a `done` payload finishes it;
//! - any other line is a payload and is collected.
//!
//! The first transport fault aborts the batch. Payloads collected up to that
//! point are kept.

use crate::log_sink::LogSink;
use sbb_core::protocol::{frame_command, is_sequence_command, Line};
use sbb_core::{Reply, SbbError, SbbResult};
use sbb_transport::LineAccessor;
use std::sync::Arc;

/// What a batch produced
#[derive(Debug)]
pub struct TransactionOutcome {
    /// Payloads in emission order, `done` sentinels excluded
    pub payloads: Vec<String>,
    /// Fault that aborted the batch, if any
    pub fault: Option<SbbError>,
}

impl TransactionOutcome {
    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }

    pub fn into_reply(self) -> Reply {
        Reply::from_payloads(self.payloads)
    }
}

/// Runs command batches over a line stream
#[derive(Clone)]
pub struct Transactor {
    sink: Arc<dyn LogSink>,
}

impl Transactor {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Run `commands` in order over `stream`
    ///
    /// Never fails: a fault ends the batch and is reported in the outcome.
    pub async fn run<A, S>(&self, stream: &mut A, commands: &[S]) -> TransactionOutcome
    where
        A: LineAccessor + ?Sized,
        S: AsRef<str> + Sync,
    {
        let mut payloads = Vec::new();
        for command in commands {
            if let Err(fault) = self.run_command(stream, command.as_ref(), &mut payloads).await {
                return TransactionOutcome {
                    payloads,
                    fault: Some(fault),
                };
            }
        }

        TransactionOutcome {
            payloads,
            fault: None,
        }
    }

    async fn run_command<A>(
        &self,
        stream: &mut A,
        command: &str,
        payloads: &mut Vec<String>,
    ) -> SbbResult<()>
    where
        A: LineAccessor + ?Sized,
    {
        self.sink.progress(&format!("Sending {:?}", command));
        let framed = frame_command(command);
        stream.send_line(&framed).await?;

        let sequence = is_sequence_command(command);
        loop {
            let raw = stream.read_line().await?;
            match Line::classify(&raw, &framed) {
                Line::Echo if sequence => {
                    self.sink
                        .progress(&format!("Received echo, waiting for sequence {:?}", command));
                }
                Line::Echo => {
                    self.sink.progress("Received echo");
                    return Ok(());
                }
                line if line.is_done() => {
                    self.sink.progress(&format!("Command {:?} done", command));
                    return Ok(());
                }
                Line::Payload(payload) => {
                    self.sink
                        .progress(&format!("Received payload of {} bytes", payload.len()));
                    payloads.push(payload);
                }
            }
            tokio::task::yield_now().await;
        }
    }
}
