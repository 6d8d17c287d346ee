//! urm-domain: User-resource mapping logic
//!
//! This crate contains the mapping store and its resolution logic:
//! - Identifier and record types
//! - Composite key codec
//! - Filter evaluation
//! - Transactional mapping store
//! - Deep resolution through organization membership
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 urm-domain                  │
//! ├─────────────────────────────────────────────┤
//! │  model/     - Id, kinds, mapping record     │
//! │  keys.rs    - Composite key codec           │
//! │  filter.rs  - Mapping filters               │
//! │  store.rs   - Transactional mapping store   │
//! │  resolver/  - Deep resolution               │
//! │  service.rs - Async service boundary        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod filter;
pub mod keys;
pub mod model;
pub mod resolver;
pub mod service;
pub mod store;

// Re-export commonly used types at the crate root
pub use error::{CodecError, DomainError, DomainResult};
pub use filter::{DeepMappingFilter, MappingFilter};
pub use model::{Id, ResourceType, UserResourceMapping, UserType};
pub use resolver::{DeepResolver, MappingScan};
pub use service::{MappingService, PaginatedResult, PaginationOptions};
pub use store::{MappingStore, DEFAULT_NAMESPACE};
