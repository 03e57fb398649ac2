use std::cell::RefCell;

/// One operation enqueued on the submission queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOp {
    WriteBuffer { label: String, offset: u64, size: u64 },
    Submit { label: String },
}

/// A journal entry: the op and its position in enqueue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub index: u64,
    pub op: QueueOp,
}

/// FIFO submission queue.
///
/// Wraps the wgpu queue and journals every write and submit. The queue executes
/// operations in enqueue order, so a write journaled before a submit is visible
/// to the commands of that submit without further synchronization.
pub struct SubmissionQueue {
    queue: wgpu::Queue,
    journal: RefCell<Vec<QueueRecord>>,
}

impl SubmissionQueue {
    pub(crate) fn new(queue: wgpu::Queue) -> Self {
        Self {
            queue,
            journal: RefCell::new(Vec::new()),
        }
    }

    /// Enqueues a host-to-buffer copy.
    pub fn write_buffer(&self, label: &str, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer, offset, data);
        self.record(QueueOp::WriteBuffer {
            label: label.to_owned(),
            offset,
            size: data.len() as u64,
        });
    }

    /// Enqueues one finished command buffer and returns its journal index.
    pub fn submit(&self, label: &str, commands: wgpu::CommandBuffer) -> u64 {
        self.queue.submit(std::iter::once(commands));
        self.record(QueueOp::Submit {
            label: label.to_owned(),
        })
    }

    /// Returns a snapshot of everything enqueued so far, oldest first.
    pub fn journal(&self) -> Vec<QueueRecord> {
        self.journal.borrow().clone()
    }

    /// Journal index of the first op matching `pred`.
    pub fn position(&self, pred: impl Fn(&QueueOp) -> bool) -> Option<u64> {
        self.journal
            .borrow()
            .iter()
            .find(|r| pred(&r.op))
            .map(|r| r.index)
    }

    fn record(&self, op: QueueOp) -> u64 {
        let mut journal = self.journal.borrow_mut();
        let index = journal.len() as u64;
        log::trace!("queue #{index}: {op:?}");
        journal.push(QueueRecord { index, op });
        index
    }
}
