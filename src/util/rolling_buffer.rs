use std::collections::VecDeque;

/// Fixed-capacity FIFO window. Appending past capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer<T> {
    window: VecDeque<T>,
    max_len: usize,
}

impl<T> RollingBuffer<T> {
    /// `max_len` is clamped to at least 1.
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        RollingBuffer {
            window: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Push a new value into the window and return the evicted one, if any
    pub fn append(&mut self, value: T) -> Option<T> {
        self.window.push_back(value);
        if self.window.len() > self.max_len {
            self.window.pop_front()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.window.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.window.back()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_len
    }
}
