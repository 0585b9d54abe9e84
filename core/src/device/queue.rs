// Pending request queue, drained in FIFO order

use alloc::collections::VecDeque;

use crate::block::{BlockRequest, Completion, DispatchResult};

/// Identifies a queued request in its outcome.
pub type RequestId = u64;

pub struct RequestQueue<'a> {
    pending: VecDeque<(RequestId, BlockRequest<'a>)>,
    next_id: RequestId,
}

impl<'a> RequestQueue<'a> {
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Queue a request; returns the id its outcome will carry.
    pub fn push(&mut self, request: BlockRequest<'a>) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back((id, request));
        id
    }

    pub fn pop(&mut self) -> Option<(RequestId, BlockRequest<'a>)> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Result of one processed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub id: RequestId,
    pub result: DispatchResult<Completion>,
}

impl RequestOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
