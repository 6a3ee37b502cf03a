use alloy_primitives::{Address, Bytes, U256};

use crate::error::CallError;

/// Outbound boundary of the engine: performs an authorized call against the
/// outside world.
///
/// The engine never interprets foreign targets itself; once a call is
/// admitted it is handed here. Implementations decide what "performing a
/// call" means: an EVM, an RPC relay, a test recorder.
pub trait CallExecutor {
    fn execute(&mut self, to: Address, value: U256, data: &Bytes) -> Result<Bytes, CallError>;
}

/// Executor that accepts every call and returns empty data.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopExecutor;

impl CallExecutor for NoopExecutor {
    fn execute(&mut self, _to: Address, _value: U256, _data: &Bytes) -> Result<Bytes, CallError> {
        Ok(Bytes::new())
    }
}

/// One call accepted by a [`RecordingExecutor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Executor that records every accepted call, or fails each call with a
/// fixed reason.
#[derive(Clone, Debug, Default)]
pub struct RecordingExecutor {
    pub calls: Vec<RecordedCall>,
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor that rejects every call with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Vec::new(),
            fail_with: Some(reason.to_owned()),
        }
    }
}

impl CallExecutor for RecordingExecutor {
    fn execute(&mut self, to: Address, value: U256, data: &Bytes) -> Result<Bytes, CallError> {
        if let Some(reason) = &self.fail_with {
            return Err(CallError(reason.clone()));
        }
        self.calls.push(RecordedCall {
            to,
            value,
            data: data.clone(),
        });
        Ok(Bytes::new())
    }
}
