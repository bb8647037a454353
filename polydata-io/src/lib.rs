#![warn(clippy::all)]

//! Packing and unpacking of OpenIGTLink POLYDATA message content
//!
//! The [polydata] module holds the codec for the POLYDATA wire format together with the three message types
//! built on top of it: [PolyDataMessage](polydata::PolyDataMessage), [GetPolyDataMessage](polydata::GetPolyDataMessage)
//! and [StatusAckMessage](polydata::StatusAckMessage). The [base] module contains the message-agnostic pieces, i.e. the
//! content buffer handed out by the message envelope, the [MessageContent](base::MessageContent) trait and a
//! [MessageFactory](base::MessageFactory) that creates messages from their type tags.

pub mod base;
pub mod polydata;
