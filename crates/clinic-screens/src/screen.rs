//! Generic list + dialog state for one entity collection.
//!
//! Fetches take a [`FetchTicket`]; only the most recently issued ticket may
//! update the list, so a slow response for an old page never overwrites a
//! newer one.

use crate::form::prefill;
use crate::{FormInput, ScreenError, ScreenResult, ScreenSchema};
use clinic_config::DEFAULT_PAGE_SIZE;
use clinic_gateway::{ApiResult, Gateway};
use clinic_resources::{Page, ResourceClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Closed,
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Transient message shown after a save or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// One-based item range shown in the pagination footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

/// Identifies one list fetch and the page it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub page: u32,
    pub size: u32,
}

pub struct EntityScreen<E, D = E> {
    client: ResourceClient<E, D>,
    schema: ScreenSchema,
    items: Vec<E>,
    rows: Vec<Value>,
    visible: Vec<usize>,
    page_index: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u32,
    search: String,
    loading: bool,
    last_error: Option<String>,
    notification: Option<Notification>,
    dialog: DialogMode,
    latest_ticket: u64,
}

impl<E, D> EntityScreen<E, D>
where
    E: Serialize + DeserializeOwned,
    D: Serialize + DeserializeOwned + Default,
{
    /// A screen over `schema.resource`. A zero `page_size` falls back to the default.
    pub fn new(gateway: Gateway, schema: ScreenSchema, page_size: u32) -> Self {
        Self {
            client: ResourceClient::new(gateway, schema.resource),
            schema,
            items: Vec::new(),
            rows: Vec::new(),
            visible: Vec::new(),
            page_index: 0,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            total_items: 0,
            total_pages: 0,
            search: String::new(),
            loading: false,
            last_error: None,
            notification: None,
            dialog: DialogMode::Closed,
            latest_ticket: 0,
        }
    }

    pub fn schema(&self) -> &ScreenSchema {
        &self.schema
    }

    pub fn client(&self) -> &ResourceClient<E, D> {
        &self.client
    }

    /// Everything on the current page, ignoring the search filter.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Items on the current page that match the search term.
    pub fn visible_items(&self) -> Vec<&E> {
        self.visible.iter().map(|&i| &self.items[i]).collect()
    }

    /// Table cells for the visible items, one row per item.
    pub fn table(&self) -> Vec<Vec<String>> {
        self.visible
            .iter()
            .map(|&i| self.schema.cells(&self.rows[i]))
            .collect()
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn dialog(&self) -> DialogMode {
        self.dialog
    }

    pub fn page_window(&self) -> PageWindow {
        if self.total_items == 0 {
            return PageWindow {
                first: 0,
                last: 0,
                total: 0,
            };
        }
        let size = u64::from(self.page_size);
        let first = u64::from(self.page_index) * size + 1;
        PageWindow {
            first: first.min(self.total_items),
            last: (first + size - 1).min(self.total_items),
            total: self.total_items,
        }
    }

    /// Start a fetch of the current page. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.loading = true;
        FetchTicket {
            id: self.latest_ticket,
            page: self.page_index,
            size: self.page_size,
        }
    }

    /// Apply the result of a fetch.
    ///
    /// Returns `Ok(false)` when `ticket` is stale; its result is dropped,
    /// errors included.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: ApiResult<Page<E>>) -> ScreenResult<bool> {
        if ticket.id != self.latest_ticket {
            debug!(
                resource = %self.schema.resource.name,
                ticket = ticket.id,
                latest = self.latest_ticket,
                "Discarding stale listing"
            );
            return Ok(false);
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.rows = page
                    .items
                    .iter()
                    .map(|item| serde_json::to_value(item).unwrap_or_default())
                    .collect();
                self.items = page.items;
                self.page_index = page.page_index;
                self.total_items = page.total_items;
                self.total_pages = page.total_pages;
                self.last_error = None;
                self.apply_search();
                Ok(true)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Re-fetch the current page.
    pub async fn refresh(&mut self) -> ScreenResult<()> {
        let ticket = self.begin_fetch();
        let result = self.client.list(ticket.page, ticket.size).await;
        self.finish_fetch(ticket, result).map(|_| ())
    }

    /// Jump to `page` (zero-based), clamped to the last known page.
    pub async fn set_page(&mut self, page: u32) -> ScreenResult<()> {
        self.page_index = match self.total_pages {
            0 => page,
            total => page.min(total - 1),
        };
        self.refresh().await
    }

    /// Change the page size and go back to the first page.
    pub async fn set_page_size(&mut self, size: u32) -> ScreenResult<()> {
        if size == 0 {
            return Err(ScreenError::InvalidPageSize);
        }
        self.page_size = size;
        self.page_index = 0;
        self.refresh().await
    }

    /// Filter the current page locally; nothing is fetched.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.schema.matches(row, &self.search))
            .map(|(i, _)| i)
            .collect();
    }

    /// Open the create dialog and return a form with default values.
    pub fn open_create(&mut self) -> ScreenResult<FormInput> {
        let blank = serde_json::to_value(D::default())?;
        self.dialog = DialogMode::Create;
        Ok(prefill(self.schema.fields, &blank))
    }

    /// Open the edit dialog for an item on the current page, prefilled.
    pub fn open_edit(&mut self, id: i64) -> ScreenResult<FormInput>
    where
        D: for<'a> From<&'a E>,
    {
        let index = self.position(id).ok_or(ScreenError::NotFound(id))?;
        let current = serde_json::to_value(D::from(&self.items[index]))?;
        self.dialog = DialogMode::Edit(id);
        Ok(prefill(self.schema.fields, &current))
    }

    pub fn close_dialog(&mut self) {
        self.dialog = DialogMode::Closed;
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get("id").and_then(Value::as_i64) == Some(id))
    }

    /// Validate the form, save it, close the dialog and re-fetch.
    ///
    /// Invalid forms never reach the network. On a failed save the dialog
    /// stays open and the error becomes the notification.
    pub async fn submit(&mut self, form: &FormInput) -> ScreenResult<E> {
        let mode = self.dialog;
        if mode == DialogMode::Closed {
            return Err(ScreenError::DialogClosed);
        }

        let values = self.schema.validate(form).map_err(ScreenError::Invalid)?;
        let draft: D = match serde_json::to_value(D::default())? {
            Value::Object(mut base) => {
                base.extend(values);
                serde_json::from_value(Value::Object(base))?
            }
            _ => serde_json::from_value(Value::Object(values))?,
        };

        self.loading = true;
        let (result, done) = match mode {
            DialogMode::Edit(id) => (self.client.update(id, &draft).await, "updated"),
            _ => (self.client.create(&draft).await, "added"),
        };
        self.loading = false;

        match result {
            Ok(saved) => {
                self.dialog = DialogMode::Closed;
                self.notify(Severity::Success, format!("{} {}", self.schema.noun, done));
                self.refresh_after_change().await;
                Ok(saved)
            }
            Err(e) => {
                self.notify(Severity::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Delete an item and re-fetch. Emptying a later page steps back one page.
    pub async fn delete(&mut self, id: i64) -> ScreenResult<()> {
        self.loading = true;
        let result = self.client.remove(id).await;
        self.loading = false;

        if let Err(e) = result {
            self.notify(Severity::Error, e.to_string());
            return Err(e.into());
        }

        self.notify(Severity::Success, format!("{} deleted", self.schema.noun));
        self.refresh_after_change().await;
        if self.items.is_empty() && self.page_index > 0 {
            self.page_index -= 1;
            self.refresh_after_change().await;
        }
        Ok(())
    }

    /// The change already succeeded; a failed re-fetch only shows up in `last_error`.
    async fn refresh_after_change(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(resource = %self.schema.resource.name, error = %e, "Re-fetch after change failed");
        }
    }

    fn notify(&mut self, severity: Severity, message: String) {
        self.notification = Some(Notification { severity, message });
    }
}
