//! Entity data and query model for netric.
//!
//! Object types are defined by the server, not compiled in. This crate turns
//! those definitions into typed working state:
//! - [`Definition`] and [`Field`]: the schema of one object type
//! - [`Entity`]: one record, with dirty tracking and change notifications
//! - [`Collection`], [`Where`], [`OrderBy`]: queries and paginated results
//! - [`BrowserView`]: saved list configurations
//! - [`Groupings`] and [`Group`]: hierarchical categories used as field values
//! - [`ActionRegistry`]: per-type toolbar actions
//!
//! Nothing here performs I/O. Request bodies and response types live in
//! [`protocol`]; sending them is the caller's job.

mod actions;
mod browser_view;
mod collection;
mod condition;
mod definition;
mod entity;
mod events;
mod field;
mod group;
mod groupings;
mod members;
mod order_by;
pub mod protocol;
mod recurrence;

pub use actions::{ActionDescriptor, ActionHandler, ActionMode, ActionOutcome, ActionRegistry};
pub use browser_view::BrowserView;
pub use collection::{Collection, DEFAULT_LIMIT};
pub use condition::{BLogic, Operator, Where};
pub use definition::{Definition, FormSize, Forms};
pub use entity::{Entity, FieldValue, ValueLabel, ValueName};
pub use events::{CollectionEvent, EntityEvent, SubscriptionId, Subscribers};
pub use field::{DefaultEvent, Field, FieldDefault, FieldType};
pub use group::Group;
pub use groupings::Groupings;
pub use members::{Member, Members};
pub use order_by::{Direction, OrderBy};
pub use protocol::{DeleteIds, DeleteRequest, DeleteResult, GroupingsKey, QueryResult};
pub use recurrence::{RecurrencePattern, RecurrenceType, weekday};

pub use netric_types::{Error, ObjectReference, Result};
