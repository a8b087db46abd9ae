//! # fbmqtt-adapter-memory
//!
//! In-memory store adapter: implements the storage port traits defined in
//! `fbmqtt-app` over a set of shared tables.
//!
//! ## Responsibilities
//! - Keep devices, channels, property definitions and property state
//! - Enforce identifier uniqueness per scope and cascade deletes
//! - Provision devices out of band ([`MemoryDeviceRepository::create`]);
//!   consumers only ever update them
//!
//! ## Dependency rule
//! Same as other adapters: depends on `fbmqtt-app` and `fbmqtt-domain`.

pub mod channel_repo;
pub mod device_repo;
pub mod error;
pub mod property_repo;
pub mod repositories;
pub mod state_repo;
pub mod store;

pub use channel_repo::MemoryChannelRepository;
pub use device_repo::MemoryDeviceRepository;
pub use error::StorageError;
pub use property_repo::MemoryPropertyRepository;
pub use repositories::MemoryRepositories;
pub use state_repo::MemoryStateRepository;
pub use store::MemoryStore;
