// ============================================================================
// Enumify Library
// ============================================================================

//! Declarative enumerated attributes for record models.
//!
//! A [`ModelType`] declares that one of its attributes is restricted to a
//! fixed, ordered set of named values. Registration runs once, at
//! declaration time, and installs the whole generated surface: normalized
//! accessors, a per-value predicate and mutator, positive and negated
//! collection scopes, an inclusion validation rule, and change notification
//! between set values. Member-name collisions are declaration-time errors,
//! never silent overwrites.
//!
//! # Examples
//!
//! ```
//! use enumify::{EnumOptions, MemoryStore, ModelType, Record};
//!
//! # fn main() -> enumify::Result<()> {
//! let mut subscriptions = ModelType::new("subscriptions");
//! subscriptions.enum_attribute(
//!     "status",
//!     ["available", "canceled", "completed"],
//!     EnumOptions::new(),
//! )?;
//!
//! let store = MemoryStore::new();
//! store.create_table("subscriptions")?;
//!
//! let mut sub = store.build(&subscriptions);
//! subscriptions.set(&mut sub, "status", "available")?;
//! sub.persist()?;
//!
//! assert!(subscriptions.predicate(&sub, "available")?);
//!
//! // `canceled!`: assigns and persists in one step.
//! subscriptions.mutate(&mut sub, "canceled")?;
//! assert_eq!(subscriptions.get(&sub, "status")?.unwrap(), "canceled");
//!
//! let canceled = store
//!     .query("subscriptions")
//!     .scope(subscriptions.scope("canceled")?)
//!     .ids()?;
//! assert_eq!(canceled, vec![sub.id().unwrap()]);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod model;
pub mod query;
pub mod storage;

// Re-export main types for convenience
pub use self::core::{EnumError, RawValue, Result, Token, TokenInput};
pub use model::{EnumAttr, EnumOptions, InclusionRule, ModelType, Record};
pub use query::{Filter, Query, Scope};
pub use storage::{Attributes, MemoryStore, StoreRecord};
