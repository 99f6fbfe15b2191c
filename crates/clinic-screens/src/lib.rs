//! Entity screens: the list/dialog state behind each CRUD page.
//!
//! Every entity uses the same [`EntityScreen`], configured by a
//! [`ScreenSchema`] naming its collection, form fields, table columns and
//! searchable fields. The [`schemas`] module holds one schema per entity.

mod error;
mod form;
mod schema;
mod screen;
pub mod schemas;

pub use error::{FieldErrors, ScreenError, ScreenResult};
pub use form::{FieldKind, FieldSpec, FormInput};
pub use schema::{display_value, lookup_path, Column, ScreenSchema};
pub use screen::{DialogMode, EntityScreen, FetchTicket, Notification, PageWindow, Severity};
