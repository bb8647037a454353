use std::collections::HashMap;

use anyhow::{bail, Result};

use super::MessageContent;
use crate::polydata::{
    GetPolyDataMessage, PolyDataMessage, StatusAckMessage, GET_POLYDATA_MESSAGE_TYPE,
    POLYDATA_MESSAGE_TYPE, RTS_POLYDATA_MESSAGE_TYPE,
};

type MessageConstructor = Box<dyn Fn() -> Box<dyn MessageContent> + Send + Sync>;

/// Creates empty messages from their type tags. The `Default` factory knows the POLYDATA message family, other
/// message types can be added through [register](MessageFactory::register).
/// ```
/// # use polydata_io::base::*;
/// let factory = MessageFactory::default();
/// let message = factory.make_message("RTS_POLYDATA").unwrap();
/// assert_eq!(message.calculate_content_size().unwrap(), 1);
/// assert!(factory.make_message("polydata").is_err());
/// ```
pub struct MessageFactory {
    constructors: HashMap<String, MessageConstructor>,
}

impl MessageFactory {
    /// Creates a factory without any registered message types
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` for the message type `tag`. Returns `true` if this replaced an existing constructor.
    pub fn register<F>(&mut self, tag: &str, constructor: F) -> bool
    where
        F: Fn() -> Box<dyn MessageContent> + Send + Sync + 'static,
    {
        self.constructors
            .insert(tag.to_owned(), Box::new(constructor))
            .is_some()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Returns all registered message type tags, in no particular order
    pub fn registered_tags(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(|tag| tag.as_str())
    }

    /// Creates a new, empty message for the given type tag. Tags are case-sensitive.
    pub fn make_message(&self, tag: &str) -> Result<Box<dyn MessageContent>> {
        match self.constructors.get(tag) {
            Some(constructor) => Ok(constructor()),
            None => bail!("No message type registered for tag '{}'", tag),
        }
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register(POLYDATA_MESSAGE_TYPE, || Box::new(PolyDataMessage::new()));
        factory.register(GET_POLYDATA_MESSAGE_TYPE, || {
            Box::new(GetPolyDataMessage::new())
        });
        factory.register(RTS_POLYDATA_MESSAGE_TYPE, || {
            Box::new(StatusAckMessage::default())
        });
        factory
    }
}

impl std::fmt::Debug for MessageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageFactory")
            .field("tags", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
