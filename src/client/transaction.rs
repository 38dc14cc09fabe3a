// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One request, one response.

use std::time::{Duration, Instant};

use super::{Error, Result};
use crate::{
    rtu::{
        MAX_FRAME_LEN, MIN_FRAME_LEN, RequestFrame, ResponseFrame, client::decode_response,
        response_frame_len,
    },
    transport::Transport,
};

/// State of the most recent transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionState {
    /// Nothing was sent yet or the manager was reset.
    #[default]
    Idle,
    /// The request is on the wire and no outcome is known.
    Sent,
    Completed,
    TimedOut,
    Failed,
}

impl TransactionState {
    /// `true` if no transaction is outstanding.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Sent)
    }
}

/// Drives request/response exchanges over a [`Transport`].
///
/// Only one transaction can be outstanding at a time. A transaction that
/// never reached an outcome (e.g. because the transport panicked) blocks
/// further calls with [`Error::TransactionInProgress`] until
/// [`reset`](Self::reset) is called.
#[derive(Debug)]
pub struct TransactionManager<T> {
    transport: T,
    state: TransactionState,
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl<T> TransactionManager<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            state: TransactionState::Idle,
            buf: [0; MAX_FRAME_LEN],
            len: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Forget about the last transaction.
    pub fn reset(&mut self) {
        self.state = TransactionState::Idle;
        self.len = 0;
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: Transport> TransactionManager<T> {
    /// Send `request` and wait up to `timeout` for the matching response.
    ///
    /// There are no retries: every call has exactly one outcome.
    pub fn execute(&mut self, request: &RequestFrame, timeout: Duration) -> Result<ResponseFrame<'_>> {
        if self.state == TransactionState::Sent {
            return Err(Error::TransactionInProgress);
        }
        self.len = 0;
        self.state = TransactionState::Sent;

        let len = match self.exchange(request, timeout) {
            Ok(len) => len,
            Err(err) => {
                self.state = if err.is_timeout() {
                    TransactionState::TimedOut
                } else {
                    TransactionState::Failed
                };
                #[cfg(feature = "log")]
                log::warn!("Request to slave {} failed: {err}", request.slave());
                return Err(err);
            }
        };
        let frame = &self.buf[..len];
        #[cfg(feature = "log")]
        log::debug!("RX {frame:02X?}");
        let checked = decode_response(frame, request.slave(), request.function())
            .and_then(|rsp| request.check_response(&rsp).map(|_| rsp));
        match checked {
            Ok(rsp) => {
                self.state = TransactionState::Completed;
                Ok(rsp)
            }
            Err(err) => {
                self.state = TransactionState::Failed;
                #[cfg(feature = "log")]
                log::warn!("Invalid response from slave {}: {err}", request.slave());
                Err(err.into())
            }
        }
    }

    /// Write the request and collect bytes until a frame is complete.
    ///
    /// Returns the frame length. A partial frame of at least
    /// [`MIN_FRAME_LEN`] bytes is returned when the deadline passes,
    /// so that the decoder can classify it.
    fn exchange(&mut self, request: &RequestFrame, timeout: Duration) -> Result<usize> {
        let deadline = Instant::now() + timeout;
        self.transport.discard_input()?;
        #[cfg(feature = "log")]
        log::debug!("TX {:02X?}", request.as_bytes());
        self.transport.write(request.as_bytes())?;
        loop {
            let frame_len = response_frame_len(request, &self.buf[..self.len]);
            if self.len >= frame_len {
                return Ok(frame_len);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                if self.len >= MIN_FRAME_LEN {
                    #[cfg(feature = "log")]
                    log::debug!("Incomplete response: {} of {frame_len} bytes", self.len);
                    return Ok(self.len);
                }
                return Err(Error::RequestTimeout(timeout));
            }
            let cnt = self
                .transport
                .read_available(&mut self.buf[self.len..frame_len], remaining)?;
            self.len += cnt;
        }
    }
}
