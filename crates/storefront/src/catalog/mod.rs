//! In-memory catalog store.
//!
//! Holds the last fetched product collection, an optional selected product,
//! and the request state of both resources. The store is owned by
//! [`AppState`](crate::state::AppState) and cloned into handlers; all
//! mutation goes through the transitions below.
//!
//! # Request states
//!
//! ```text
//! Idle ──begin──▶ Pending ──complete(Ok)──▶ Fulfilled
//!                    │
//!                    └──complete(Err)──▶ Rejected { message }
//! ```
//!
//! Each fetch takes a [`Ticket`]. Only the most recently issued ticket of a
//! resource may complete it; older responses that arrive late are dropped.
//!
//! The store reports a single error: starting either fetch clears a
//! rejection left by the other one.

use std::sync::Arc;

use refabry_core::{Product, ProductId};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::{ApiError, CatalogApi, envelope};

/// Error shown when the product collection could not be fetched.
pub const FETCH_PRODUCTS_FAILED: &str = "Failed to fetch products";

/// Error shown when a single product could not be fetched.
pub const FETCH_PRODUCT_FAILED: &str = "Failed to fetch product details";

/// State of one remote resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected {
        message: String,
    },
}

impl RequestState {
    /// Forget a rejection, leaving other states untouched.
    fn clear_error(&mut self) {
        if matches!(self, Self::Rejected { .. }) {
            *self = Self::Idle;
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The rejection message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// Snapshot of the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogState {
    products: Vec<Product>,
    selected: Option<Product>,
    collection: RequestState,
    detail: RequestState,
}

impl CatalogState {
    /// Products in server order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The selected product.
    #[must_use]
    pub const fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    /// Request state of the product collection.
    #[must_use]
    pub const fn collection(&self) -> &RequestState {
        &self.collection
    }

    /// Request state of the single-product fetch.
    #[must_use]
    pub const fn detail(&self) -> &RequestState {
        &self.detail
    }

    /// Whether any fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.collection.is_pending() || self.detail.is_pending()
    }

    /// The collection error, falling back to the detail error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.collection.error().or_else(|| self.detail.error())
    }

    /// Linear scan of the collection by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Collection,
    Detail,
}

/// Proof that a fetch was started; required to complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a fetch that is never completed stays pending"]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

#[derive(Default)]
struct StoreInner {
    state: CatalogState,
    collection_seq: u64,
    detail_seq: u64,
}

impl StoreInner {
    fn is_current(&self, ticket: Ticket) -> bool {
        let latest = match ticket.resource {
            Resource::Collection => self.collection_seq,
            Resource::Detail => self.detail_seq,
        };
        ticket.seq == latest
    }
}

/// Shared handle to the catalog.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl CatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> CatalogState {
        self.inner.read().await.state.clone()
    }

    // =========================================================================
    // Fetch all
    // =========================================================================

    /// Fetch the product collection and return the resulting state.
    #[instrument(skip_all)]
    pub async fn fetch_all<A: CatalogApi>(&self, api: &A) -> CatalogState {
        let ticket = self.begin_fetch_all().await;
        let result = match api.fetch_all_products().await {
            Ok(response) => envelope::products(&response.body).map_err(ApiError::from),
            Err(e) => Err(e),
        };
        self.complete_fetch_all(ticket, result).await;
        self.snapshot().await
    }

    /// Mark the collection pending and clear any error.
    pub async fn begin_fetch_all(&self) -> Ticket {
        let mut inner = self.inner.write().await;
        inner.collection_seq += 1;
        inner.state.collection = RequestState::Pending;
        inner.state.detail.clear_error();
        Ticket {
            resource: Resource::Collection,
            seq: inner.collection_seq,
        }
    }

    /// Resolve a collection fetch.
    ///
    /// On success the product sequence is replaced; on failure it is kept and
    /// the collection is rejected with [`FETCH_PRODUCTS_FAILED`]. Returns
    /// `false` when the ticket was superseded and the result was discarded.
    pub async fn complete_fetch_all(
        &self,
        ticket: Ticket,
        result: Result<Vec<Product>, ApiError>,
    ) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.resource != Resource::Collection || !inner.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, "Discarding stale product collection response");
            return false;
        }

        match result {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Product collection fetched");
                inner.state.products = products;
                inner.state.collection = RequestState::Fulfilled;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products");
                inner.state.collection = RequestState::Rejected {
                    message: FETCH_PRODUCTS_FAILED.to_string(),
                };
            }
        }
        true
    }

    // =========================================================================
    // Fetch one
    // =========================================================================

    /// Fetch a single product into the selection and return the resulting
    /// state.
    #[instrument(skip(self, api), fields(product_id = %id))]
    pub async fn fetch_one<A: CatalogApi>(&self, api: &A, id: &ProductId) -> CatalogState {
        let ticket = self.begin_fetch_one().await;
        let result = match api.fetch_product_by_id(id).await {
            Ok(response) => envelope::product(&response.body).map_err(ApiError::from),
            Err(e) => Err(e),
        };
        self.complete_fetch_one(ticket, result).await;
        self.snapshot().await
    }

    /// Mark the single-product fetch pending and clear any error.
    pub async fn begin_fetch_one(&self) -> Ticket {
        let mut inner = self.inner.write().await;
        inner.detail_seq += 1;
        inner.state.detail = RequestState::Pending;
        inner.state.collection.clear_error();
        Ticket {
            resource: Resource::Detail,
            seq: inner.detail_seq,
        }
    }

    /// Resolve a single-product fetch.
    ///
    /// On success the selection is replaced (cleared when the envelope held no
    /// product); on failure it is kept and the detail is rejected with
    /// [`FETCH_PRODUCT_FAILED`]. Returns `false` for superseded tickets.
    pub async fn complete_fetch_one(
        &self,
        ticket: Ticket,
        result: Result<Option<Product>, ApiError>,
    ) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.resource != Resource::Detail || !inner.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, "Discarding stale product detail response");
            return false;
        }

        match result {
            Ok(product) => {
                inner.state.selected = product;
                inner.state.detail = RequestState::Fulfilled;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch product details");
                inner.state.detail = RequestState::Rejected {
                    message: FETCH_PRODUCT_FAILED.to_string(),
                };
            }
        }
        true
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Set the selected product.
    pub async fn select(&self, product: Product) {
        self.inner.write().await.state.selected = Some(product);
    }

    /// Clear the selected product.
    pub async fn clear_selected(&self) {
        self.inner.write().await.state.selected = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use refabry_core::Price;
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::api::ApiResponse;

    /// Catalog API double answering from canned responses.
    #[derive(Default)]
    pub struct FakeCatalog {
        pub all: Mutex<Option<Result<Value, u16>>>,
        pub one: Mutex<Option<Result<Value, u16>>>,
    }

    impl FakeCatalog {
        pub fn with_products(products: &Value) -> Self {
            let fake = Self::default();
            *fake.all.lock().unwrap() = Some(Ok(json!({ "data": { "data": products } })));
            fake
        }

        pub fn failing() -> Self {
            let fake = Self::default();
            *fake.all.lock().unwrap() = Some(Err(500));
            *fake.one.lock().unwrap() = Some(Err(500));
            fake
        }

        fn answer(slot: &Mutex<Option<Result<Value, u16>>>) -> Result<ApiResponse, ApiError> {
            match slot.lock().unwrap().clone() {
                Some(Ok(body)) => Ok(ApiResponse::new(StatusCode::OK, body)),
                Some(Err(status)) => Err(ApiError::Status {
                    status,
                    body: String::new(),
                }),
                None => Err(ApiError::Status {
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }

    impl CatalogApi for FakeCatalog {
        async fn fetch_all_products(&self) -> Result<ApiResponse, ApiError> {
            Self::answer(&self.all)
        }

        async fn fetch_product_by_id(&self, _id: &ProductId) -> Result<ApiResponse, ApiError> {
            Self::answer(&self.one)
        }
    }

    pub fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_whole(price))
    }

    fn fetch_error() -> ApiError {
        ApiError::Status {
            status: 503,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_idle_and_empty() {
        let state = CatalogStore::new().snapshot().await;
        assert!(state.products().is_empty());
        assert!(state.selected().is_none());
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.collection(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn test_fetch_all_transitions_to_fulfilled() {
        let store = CatalogStore::new();

        let ticket = store.begin_fetch_all().await;
        let pending = store.snapshot().await;
        assert!(pending.is_loading());
        assert_eq!(pending.error(), None);

        assert!(store
            .complete_fetch_all(ticket, Ok(vec![product("1", 100), product("2", 200)]))
            .await);
        let done = store.snapshot().await;
        assert!(!done.is_loading());
        assert_eq!(done.collection(), &RequestState::Fulfilled);
        assert_eq!(done.products().len(), 2);
        assert_eq!(done.products()[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_fetch_all_rejection_keeps_products() {
        let store = CatalogStore::new();
        let ticket = store.begin_fetch_all().await;
        let _ = store.complete_fetch_all(ticket, Ok(vec![product("1", 100)])).await;

        let ticket = store.begin_fetch_all().await;
        let _ = store.complete_fetch_all(ticket, Err(fetch_error())).await;

        let state = store.snapshot().await;
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some(FETCH_PRODUCTS_FAILED));
        assert_eq!(state.products().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_clears_previous_error() {
        let store = CatalogStore::new();
        let ticket = store.begin_fetch_all().await;
        let _ = store.complete_fetch_all(ticket, Err(fetch_error())).await;
        assert!(store.snapshot().await.error().is_some());

        let _ticket = store.begin_fetch_all().await;
        let state = store.snapshot().await;
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_fetch_all_clears_detail_error() {
        let store = CatalogStore::new();
        let state = store
            .fetch_one(&FakeCatalog::failing(), &ProductId::from("7"))
            .await;
        assert_eq!(state.error(), Some(FETCH_PRODUCT_FAILED));

        let api = FakeCatalog::with_products(&json!([{ "id": 1, "name": "Shirt", "price": 500 }]));
        let state = store.fetch_all(&api).await;
        assert_eq!(state.error(), None);
        assert_eq!(state.detail(), &RequestState::Idle);
        assert_eq!(state.products().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_one_clears_collection_error() {
        let store = CatalogStore::new();
        let state = store.fetch_all(&FakeCatalog::failing()).await;
        assert_eq!(state.error(), Some(FETCH_PRODUCTS_FAILED));

        let _ticket = store.begin_fetch_one().await;
        let state = store.snapshot().await;
        assert_eq!(state.collection(), &RequestState::Idle);
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_begin_keeps_other_pending_fetch() {
        let store = CatalogStore::new();
        let _all = store.begin_fetch_all().await;
        let _one = store.begin_fetch_one().await;

        let state = store.snapshot().await;
        assert!(state.collection().is_pending());
        assert!(state.detail().is_pending());
    }

    #[tokio::test]
    async fn test_stale_fetch_all_is_discarded() {
        let store = CatalogStore::new();
        let first = store.begin_fetch_all().await;
        let second = store.begin_fetch_all().await;

        assert!(store.complete_fetch_all(second, Ok(vec![product("new", 1)])).await);
        assert!(!store.complete_fetch_all(first, Ok(vec![product("old", 1)])).await);

        let state = store.snapshot().await;
        assert_eq!(state.products()[0].id.as_str(), "new");
        assert_eq!(state.collection(), &RequestState::Fulfilled);
    }

    #[tokio::test]
    async fn test_ticket_of_other_resource_is_rejected() {
        let store = CatalogStore::new();
        let detail = store.begin_fetch_one().await;
        assert!(!store.complete_fetch_all(detail, Ok(vec![])).await);
    }

    #[tokio::test]
    async fn test_fetch_all_reads_envelope() {
        let store = CatalogStore::new();
        let api = FakeCatalog::with_products(&json!([
            { "id": 1, "name": "Shirt", "price": 500 },
            { "id": 2, "name": "Saree", "price": "1500" }
        ]));

        let state = store.fetch_all(&api).await;
        assert_eq!(state.products().len(), 2);
        assert_eq!(state.collection(), &RequestState::Fulfilled);
    }

    #[tokio::test]
    async fn test_fetch_all_missing_payload_is_empty() {
        let store = CatalogStore::new();
        let api = FakeCatalog::default();
        *api.all.lock().unwrap() = Some(Ok(json!({ "status": true })));

        let state = store.fetch_all(&api).await;
        assert!(state.products().is_empty());
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_fetch_all_failure_sets_fixed_message() {
        let store = CatalogStore::new();
        let state = store.fetch_all(&FakeCatalog::failing()).await;
        assert_eq!(state.error(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn test_fetch_one_replaces_selection_not_collection() {
        let store = CatalogStore::new();
        let ticket = store.begin_fetch_all().await;
        let _ = store.complete_fetch_all(ticket, Ok(vec![product("1", 100)])).await;

        let api = FakeCatalog::default();
        *api.one.lock().unwrap() =
            Some(Ok(json!({ "data": { "data": { "id": 9, "name": "Lungi", "price": 350 } } })));

        let state = store.fetch_one(&api, &ProductId::from("9")).await;
        assert_eq!(state.selected().unwrap().name, "Lungi");
        assert_eq!(state.products().len(), 1);
        assert_eq!(state.detail(), &RequestState::Fulfilled);
    }

    #[tokio::test]
    async fn test_fetch_one_failure() {
        let store = CatalogStore::new();
        store.select(product("3", 10)).await;

        let state = store
            .fetch_one(&FakeCatalog::failing(), &ProductId::from("4"))
            .await;
        assert_eq!(state.error(), Some(FETCH_PRODUCT_FAILED));
        assert_eq!(state.selected().unwrap().id.as_str(), "3");
    }

    #[tokio::test]
    async fn test_select_and_clear() {
        let store = CatalogStore::new();
        store.select(product("5", 10)).await;
        assert_eq!(store.snapshot().await.selected().unwrap().id.as_str(), "5");

        store.clear_selected().await;
        assert!(store.snapshot().await.selected().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = CatalogStore::new();
        let clone = store.clone();
        clone.select(product("6", 10)).await;
        assert!(store.snapshot().await.selected().is_some());
    }

    #[tokio::test]
    async fn test_find_compares_ids_as_strings() {
        let store = CatalogStore::new();
        let api = FakeCatalog::with_products(&json!([{ "id": 12, "name": "A", "price": 1 }]));
        let state = store.fetch_all(&api).await;

        assert!(state.find(&ProductId::from("12")).is_some());
        assert!(state.find(&ProductId::from("13")).is_none());
    }
}
