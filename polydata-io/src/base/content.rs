use std::fmt::Debug;

use anyhow::Result;

/// Content section of a message, as handed out by the message envelope. When packing, the message asks for a
/// zeroed buffer of exactly its content size. When unpacking, the buffer holds the received payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuffer {
    bytes: Vec<u8>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the content with `size_bytes` zero bytes and returns them for writing
    pub fn allocate(&mut self, size_bytes: usize) -> &mut [u8] {
        self.bytes.clear();
        self.bytes.resize(size_bytes, 0);
        &mut self.bytes
    }

    pub fn content(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for ContentBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Base trait for the content of all message types
pub trait MessageContent: Debug + Send {
    /// The type tag under which this message is sent, e.g. `POLYDATA`
    fn message_type(&self) -> &'static str;
    /// Size of the packed content in bytes. This is always the number of bytes that
    /// [pack_content](MessageContent::pack_content) writes.
    fn calculate_content_size(&self) -> Result<usize>;
    /// Packs this message into `buffer`, replacing its previous content
    fn pack_content(&self, buffer: &mut ContentBuffer) -> Result<()>;
    /// Replaces the state of this message with the content in `buffer`. If this fails, the message is unchanged.
    fn unpack_content(&mut self, buffer: &ContentBuffer) -> Result<()>;
}

/// Convenience functions for [MessageContent] types
pub trait MessageContentExt: MessageContent {
    /// Packs this message into a new buffer and returns its bytes
    fn pack_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = ContentBuffer::new();
        self.pack_content(&mut buffer)?;
        Ok(buffer.into_bytes())
    }

    /// Creates a new message from the given payload
    fn unpack_from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Default + Sized,
    {
        let mut message = Self::default();
        message.unpack_content(&ContentBuffer::from(bytes.to_vec()))?;
        Ok(message)
    }
}

impl<T: MessageContent + ?Sized> MessageContentExt for T {}
