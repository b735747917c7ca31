//! Inter-processor SYNC and FIFO state (spec §4.1 IPCSYNC/IPCFIFOCNT/IPCFIFOSEND,
//! spec §5 "a single shared queue per direction with destructive read semantics").

use std::collections::VecDeque;

use super::wram::Processor;

const FIFO_DEPTH: usize = 16;

#[derive(Default)]
pub struct IpcState {
    /// `queues[p]` holds the values processor `p` has sent, waiting to be
    /// received by its peer.
    queues: [VecDeque<u32>; 2],
}

impl IpcState {
    pub fn new() -> Self {
        Self::default()
    }

    /// IPCFIFOSEND: push a word onto `sender`'s outgoing queue. Silently
    /// drops the value if the queue is already at hardware depth.
    pub fn send(&mut self, sender: Processor, value: u32) {
        let q = &mut self.queues[sender.index()];
        if q.len() < FIFO_DEPTH {
            q.push_back(value);
        }
    }

    /// IPCFIFORECV: destructively pop the next word `reader`'s peer sent it.
    pub fn receive(&mut self, reader: Processor) -> u32 {
        self.queues[reader.peer().index()]
            .pop_front()
            .unwrap_or(0)
    }

    pub fn is_empty(&self, sender: Processor) -> bool {
        self.queues[sender.index()].is_empty()
    }

    pub fn clear(&mut self, sender: Processor) {
        self.queues[sender.index()].clear();
    }
}
