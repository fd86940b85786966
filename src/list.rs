/// Generic resource-list controller
///
/// One instance per list screen, instantiated for accounts and for
/// donations. The per-row interaction state is a small machine with three
/// states (Viewing, Editing(id), ConfirmingDelete(id)); loading and error
/// are orthogonal flags overlaying it. Loads replace the items wholesale,
/// and a generation counter tags each load so a stale completion can never
/// overwrite fresher state.
use crate::api::ApiClient;
use crate::error::ClientResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, error};

/// How long a transient success notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// A resource kind manageable by a list controller
pub trait Resource: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Typed in-progress copy of an entity being edited
    type Draft: Clone + std::fmt::Debug + PartialEq + Send + Sync;
    /// Payload for creating a new entity
    type Create: Serialize + Send + Sync;
    /// Editable subset sent on update
    type Update: Serialize + Send + Sync;

    fn id(&self) -> &str;
    /// Human-readable label used in the delete confirmation prompt
    fn label(&self) -> &str;
    fn collection_path() -> &'static str;
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::collection_path(), id)
    }
    fn create_path() -> &'static str;
    /// Noun used in user-facing notices ("user", "donation")
    fn noun() -> &'static str;

    fn to_draft(&self) -> Self::Draft;
    /// Validate the draft and produce the update payload
    fn update_from_draft(draft: &Self::Draft) -> ClientResult<Self::Update>;
    /// Apply a committed update locally when the server does not echo the
    /// updated entity
    fn merged_with(&self, update: &Self::Update) -> Self;
    fn validate_create(create: &Self::Create) -> ClientResult<()>;
}

/// Narrow interface to the backend collection
#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<R>>;
    async fn create(&self, payload: &R::Create) -> ClientResult<()>;
    /// Returns the server's representation of the updated entity when the
    /// response carries one
    async fn update(&self, id: &str, payload: &R::Update) -> ClientResult<Option<R>>;
    async fn remove(&self, id: &str) -> ClientResult<()>;
}

/// Gateway implementation over the authorized API client
pub struct HttpGateway<R: Resource> {
    api: Arc<ApiClient>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpGateway<R> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for HttpGateway<R> {
    async fn list(&self) -> ClientResult<Vec<R>> {
        self.api.get_json(R::collection_path()).await
    }

    async fn create(&self, payload: &R::Create) -> ClientResult<()> {
        self.api.post_unit(R::create_path(), payload).await
    }

    async fn update(&self, id: &str, payload: &R::Update) -> ClientResult<Option<R>> {
        self.api.put_json(&R::item_path(id), payload).await
    }

    async fn remove(&self, id: &str) -> ClientResult<()> {
        self.api.delete(&R::item_path(id)).await
    }
}

/// Per-row interaction state; at most one edit or delete capture at a time
#[derive(Debug, Clone, PartialEq)]
pub enum ListMode<R: Resource> {
    Viewing,
    Editing { id: String, draft: R::Draft },
    ConfirmingDelete { id: String, label: String },
}

#[derive(Debug)]
struct Notice {
    text: String,
    posted_at: Instant,
}

/// Tag for an in-flight load; completions with a stale ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// State machine behind a list screen
pub struct ResourceListController<R: Resource> {
    gateway: Arc<dyn ResourceGateway<R>>,
    items: Vec<R>,
    mode: ListMode<R>,
    loading: bool,
    error: Option<String>,
    notice: Option<Notice>,
    generation: u64,
}

impl<R: Resource> ResourceListController<R> {
    pub fn new(gateway: Arc<dyn ResourceGateway<R>>) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            mode: ListMode::Viewing,
            loading: false,
            error: None,
            notice: None,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn mode(&self) -> &ListMode<R> {
        &self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error from the most recent failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transient success notice, if one is still live
    pub fn notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.posted_at.elapsed() < NOTICE_TTL)
            .map(|n| n.text.as_str())
    }

    /// Fetch the full collection and replace the items wholesale
    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let outcome = self.gateway.list().await;
        self.finish_load(ticket, outcome);
    }

    /// Re-fetch after an external mutation, e.g. a sibling create flow
    pub async fn reload(&mut self) {
        self.load().await;
    }

    /// Start a load, superseding any in-flight one.
    ///
    /// The split begin/finish API exists for event loops that drive fetches
    /// themselves; `load` composes the two around a gateway call.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        LoadTicket(self.generation)
    }

    /// Complete a load; stale tickets are discarded without touching state
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: ClientResult<Vec<R>>) {
        if ticket.0 != self.generation {
            debug!("Discarding stale {} load", R::noun());
            return;
        }
        self.loading = false;
        match outcome {
            Ok(items) => self.items = items,
            Err(err) => {
                error!("Failed to load {} list: {}", R::noun(), err);
                self.error = Some(err.to_string());
            }
        }
    }

    /// Begin editing a row, seeding the draft from the current item.
    ///
    /// Calling this while editing a different row silently switches the
    /// target; the last call wins.
    pub fn begin_edit(&mut self, id: &str) {
        if let Some(item) = self.items.iter().find(|item| item.id() == id) {
            self.mode = ListMode::Editing {
                id: id.to_string(),
                draft: item.to_draft(),
            };
        }
    }

    /// The live draft, when editing
    pub fn draft(&self) -> Option<&R::Draft> {
        match &self.mode {
            ListMode::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Mutable access to the live draft; no validation, no network effect
    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        match &mut self.mode {
            ListMode::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Discard the draft and return to viewing; no network effect
    pub fn cancel_edit(&mut self) {
        if matches!(self.mode, ListMode::Editing { .. }) {
            self.mode = ListMode::Viewing;
        }
    }

    /// Send the draft's editable subset for the row being edited.
    ///
    /// On success the matching row is replaced (with the server's returned
    /// representation when one comes back, otherwise with the locally merged
    /// draft) and the controller returns to viewing. On failure it stays in
    /// editing with the draft preserved for manual retry or cancel.
    pub async fn commit_edit(&mut self) {
        let ListMode::Editing { id, draft } = &self.mode else {
            return;
        };
        let id = id.clone();
        let update = match R::update_from_draft(draft) {
            Ok(update) => update,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };
        self.error = None;

        match self.gateway.update(&id, &update).await {
            Ok(returned) => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
                    let replacement = match returned {
                        Some(echoed) => echoed,
                        None => slot.merged_with(&update),
                    };
                    *slot = replacement;
                }
                self.mode = ListMode::Viewing;
                self.post_notice(format!("{} updated successfully!", capitalize(R::noun())));
            }
            Err(err) => {
                error!("Failed to update {} {}: {}", R::noun(), id, err);
                self.error = Some(err.to_string());
            }
        }
    }

    /// Capture a row for deletion; no network effect until confirmed
    pub fn request_delete(&mut self, id: &str) {
        if let Some(item) = self.items.iter().find(|item| item.id() == id) {
            self.mode = ListMode::ConfirmingDelete {
                id: id.to_string(),
                label: item.label().to_string(),
            };
        }
    }

    /// Drop the capture and return to viewing; no network effect
    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, ListMode::ConfirmingDelete { .. }) {
            self.mode = ListMode::Viewing;
        }
    }

    /// Delete the captured row.
    ///
    /// On success the entry is removed locally (no refetch) and a transient
    /// notice is posted. On failure the confirmation stays open; the error
    /// is logged but not surfaced inline.
    pub async fn confirm_delete(&mut self) {
        let ListMode::ConfirmingDelete { id, .. } = &self.mode else {
            return;
        };
        let id = id.clone();

        match self.gateway.remove(&id).await {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                self.mode = ListMode::Viewing;
                self.post_notice(format!("{} deleted successfully!", capitalize(R::noun())));
            }
            Err(err) => {
                error!("Failed to delete {} {}: {}", R::noun(), id, err);
            }
        }
    }

    /// Create a new entity, then re-fetch the full collection.
    ///
    /// Validation runs before the gateway is touched; the error is returned
    /// to the creating form rather than surfaced inline on the list.
    pub async fn create(&mut self, payload: &R::Create) -> ClientResult<()> {
        R::validate_create(payload)?;
        self.gateway.create(payload).await?;
        self.reload().await;
        self.post_notice(format!("{} saved successfully!", capitalize(R::noun())));
        Ok(())
    }

    fn post_notice(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            posted_at: Instant::now(),
        });
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
