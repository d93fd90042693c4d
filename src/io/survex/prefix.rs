//! Label buffer treated as a stack of dotted survey components.
//!
//! Label fields never carry full names; they append to, or cut back, the
//! label of the previous record. The buffer holds raw bytes so that cuts
//! counted in bytes stay exact regardless of the text encoding.

use super::constants::TRIM_COMPONENT_BASE;

const SEPARATOR: u8 = b'.';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyPrefix {
    buffer: Vec<u8>,
}

impl SurveyPrefix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of complete components (separators) in the buffer.
    pub fn depth(&self) -> usize {
        self.buffer.iter().filter(|&&b| b == SEPARATOR).count()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Drop `n` trailing bytes. Returns `false`, leaving the buffer as it
    /// was, when fewer than `n` bytes are held.
    pub fn pop_bytes(&mut self, n: usize) -> bool {
        match self.buffer.len().checked_sub(n) {
            Some(keep) => {
                self.buffer.truncate(keep);
                true
            }
            None => false,
        }
    }

    /// Legacy component trim: skip the fixed tail, then walk back until
    /// `count` separators were passed and keep everything up to and
    /// including the last one. Returns `false` when the buffer runs out.
    pub fn pop_components(&mut self, count: usize) -> bool {
        let Some(mut i) = self.buffer.len().checked_sub(TRIM_COMPONENT_BASE) else {
            return false;
        };
        let mut found = 0;
        while found < count {
            if i == 0 {
                return false;
            }
            i -= 1;
            if self.buffer[i] == SEPARATOR {
                found += 1;
            }
        }
        self.buffer.truncate(i + 1);
        true
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
