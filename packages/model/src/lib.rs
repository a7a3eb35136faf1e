//! # Folio Model
//!
//! Document model consumed by the Folio command core.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Snapshot: immutable doc + selection + marks │
//! └─────────────────────────────────────────────┘
//!                     ↓ tr()
//! ┌─────────────────────────────────────────────┐
//! │ Transaction: pending steps over a copy      │
//! │  - step() validates + applies each edit     │
//! │  - selection follows the edits              │
//! │  - stored marks for the next insertion      │
//! └─────────────────────────────────────────────┘
//!                     ↓ commit()
//! ┌─────────────────────────────────────────────┐
//! │ Snapshot (version + 1)                      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots never change**: every commit produces a new one
//! 2. **Node-id addressing**: steps target nodes by id, not by offset into the tree
//! 3. **Validated steps**: a step either applies fully or leaves the document untouched
//!
//! ## Usage
//!
//! ```rust
//! use folio_model::{Document, Snapshot, Selection};
//!
//! let snapshot = Snapshot::new(Document::paragraph("p", "t", "Hello"));
//!
//! let mut tr = snapshot.tr();
//! tr.set_selection(Selection::cursor("t", 5));
//! tr.insert_text(" world").unwrap();
//!
//! let next = snapshot.apply(tr);
//! assert_eq!(next.doc().text_content(), "Hello world");
//! assert_eq!(next.version(), snapshot.version() + 1);
//! ```

mod document;
mod id_generator;
mod selection;
mod snapshot;
mod step;
mod transaction;

pub use document::{Document, Mark, Node, ROOT_TAG};
pub use id_generator::IdGenerator;
pub use selection::Selection;
pub use snapshot::Snapshot;
pub use step::{Step, StepError};
pub use transaction::Transaction;
