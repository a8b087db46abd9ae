//! # fbmqtt-domain
//!
//! Pure domain model for the FB MQTT bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Wire vocabulary: protocol versions, data types, formats, closed token sets
//! - **Messages**: typed results of decoding a topic/payload pair
//! - **Attributes** and **schemas**: payload grammars for property
//!   attributes and the `configure` control
//! - **Stored model**: devices, channels, properties and property state
//! - Value normalisation against a property's data type and format
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
mod token;

pub mod attribute;
pub mod data_type;
pub mod format;
pub mod payload;
pub mod protocol;
pub mod schema;
pub mod value;

pub mod message;

pub mod channel;
pub mod device;
pub mod property;
pub mod property_state;
