use anyhow::Result;

use super::{CodecError, RTS_POLYDATA_MESSAGE_TYPE};
use crate::base::{ContentBuffer, MessageContent};

/// Acknowledgment of a POLYDATA message, carrying a single success flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusAckMessage {
    status: bool,
}

impl StatusAckMessage {
    pub fn new(status: bool) -> Self {
        Self { status }
    }

    pub fn status(&self) -> bool {
        self.status
    }

    pub fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}

impl MessageContent for StatusAckMessage {
    fn message_type(&self) -> &'static str {
        RTS_POLYDATA_MESSAGE_TYPE
    }

    fn calculate_content_size(&self) -> Result<usize> {
        Ok(1)
    }

    fn pack_content(&self, buffer: &mut ContentBuffer) -> Result<()> {
        buffer.allocate(1)[0] = self.status as u8;
        Ok(())
    }

    /// Only the byte 1 counts as success, every other value reads as failure
    fn unpack_content(&mut self, buffer: &ContentBuffer) -> Result<()> {
        let status = buffer.content().first().ok_or(CodecError::Truncated {
            section: "status",
            offset: 0,
            required: 1,
            available: 0,
        })?;
        self.status = *status == 1;
        Ok(())
    }
}
