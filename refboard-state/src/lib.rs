//! Refboard state stores and coordination.
//!
//! Entity collections, selection buffers, modal visibility, transient
//! widgets and the [`AppContext`] that ties them to the console's dialogs.

pub mod alert;
pub mod context;
pub mod error;
pub mod export;
pub mod observable;
pub mod page;
pub mod pagination;
pub mod scheduler;
pub mod seed;
pub mod selection;
pub mod source;
pub mod store;
pub mod visibility;
pub mod widgets;

pub use alert::{AlertCenter, AlertLevel, AlertSnapshot};
pub use context::{AppContext, Sources};
pub use error::{ConsoleError, ConsoleResult};
pub use export::{to_csv, ExportError};
pub use page::{EntityModals, EntityPage, EntityScope, PageEntity};
pub use pagination::{paginate, Page, Pager};
pub use selection::{SelectionBuffer, SelectionSlot, SelectionState};
pub use source::{EntitySource, MockSource, SourceError};
pub use store::{CollectionState, CollectionStats, EntityStore, TabCount};
pub use visibility::{ModalKey, UiVisibility, VisibilitySnapshot};
