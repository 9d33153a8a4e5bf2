//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use refabry_core::{Product, ProductId};
use tracing::instrument;

use crate::catalog::CatalogState;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::order::OrderForm;
use crate::routes::orders::OrderFormView;
use crate::state::AppState;

/// Shown when a product has no image.
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

const NO_DESCRIPTION: &str = "No description available";

// =============================================================================
// View Types
// =============================================================================

/// Product card data for the listing grid.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    /// Detail page path, percent-encoded.
    pub url: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
    /// Struck-through regular price, only when a discount price is set.
    pub regular_price: Option<String>,
    pub category: Option<String>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, image_base: &str) -> Self {
        Self {
            id: product.id.to_string(),
            url: product_path(&product.id),
            name: product.name.clone(),
            image_url: image_or_placeholder(product, image_base),
            price: product.price.to_string(),
            regular_price: product
                .regular_price
                .filter(|_| product.has_discount_price())
                .map(|p| p.to_string()),
            category: product
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .filter(|name| !name.is_empty()),
        }
    }
}

/// Full product data for the detail page.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub regular_price: Option<String>,
    pub discount_percent: Option<i64>,
    pub description: String,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub sku: Option<String>,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, image_base: &str) -> Self {
        let discount_percent = product.discount_percent();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image_url: image_or_placeholder(product, image_base),
            price: product.price.to_string(),
            regular_price: product
                .regular_price
                .filter(|_| discount_percent.is_some())
                .map(|p| p.to_string()),
            discount_percent,
            description: product
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            category: product.display_category().map(|c| c.name.clone()),
            stock: product.display_stock(),
            sku: product.display_sku().map(String::from),
        }
    }
}

fn image_or_placeholder(product: &Product, image_base: &str) -> String {
    product
        .image_url(image_base)
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// What the product listing shows, in order of precedence.
#[derive(Debug, Clone)]
pub enum ProductListing {
    Loading,
    Error(String),
    Empty,
    Grid(Vec<ProductCardView>),
}

impl ProductListing {
    #[must_use]
    pub fn from_state(state: &CatalogState, image_base: &str) -> Self {
        if state.is_loading() {
            Self::Loading
        } else if let Some(error) = state.error() {
            Self::Error(error.to_string())
        } else if state.products().is_empty() {
            Self::Empty
        } else {
            Self::Grid(
                state
                    .products()
                    .iter()
                    .map(|p| ProductCardView::new(p, image_base))
                    .collect(),
            )
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub listing: ProductListing,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub form: OrderFormView,
}

/// Shown when the detail page has no product to display.
#[derive(Template, WebTemplate)]
#[template(path = "products/missing.html")]
pub struct ProductMissingTemplate {
    pub error: Option<String>,
}

/// Spinner page that reloads itself until the catalog settles.
#[derive(Template, WebTemplate)]
#[template(path = "products/loading.html")]
pub struct LoadingTemplate {
    pub refresh_secs: u32,
}

impl LoadingTemplate {
    const fn new() -> Self {
        Self { refresh_secs: 1 }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// How the detail page finds its product.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The selected product is the one asked for.
    Selected(Product),
    /// Found by scanning the collection; should become the selection.
    Found(Product),
    /// Nothing loaded yet; fetch the product directly.
    Fetch,
    /// The collection is loaded but does not contain the product.
    Redirect,
}

/// Resolve the product for `id` against the catalog.
#[must_use]
pub fn resolve_product(state: &CatalogState, id: &ProductId) -> Resolution {
    if let Some(selected) = state.selected().filter(|p| p.id == *id) {
        return Resolution::Selected(selected.clone());
    }

    if state.products().is_empty() {
        return Resolution::Fetch;
    }

    state
        .find(id)
        .map_or(Resolution::Redirect, |p| Resolution::Found(p.clone()))
}

/// The product for `id` if it is already in the catalog, without side
/// effects.
#[must_use]
pub fn lookup_product<'a>(state: &'a CatalogState, id: &ProductId) -> Option<&'a Product> {
    state
        .selected()
        .filter(|p| p.id == *id)
        .or_else(|| state.find(id))
}

/// Path of the detail page for `id`.
#[must_use]
pub fn product_path(id: &ProductId) -> String {
    format!("/products/{}", urlencoding::encode(id.as_str()))
}

/// Render the detail page for `product` with `form` embedded.
#[must_use]
pub fn render_detail(state: &AppState, product: &Product, form: &OrderForm) -> Response {
    ProductShowTemplate {
        product: ProductDetailView::new(product, state.image_base_url()),
        form: OrderFormView::new(form),
    }
    .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing.
///
/// Fetches the collection on every render.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let catalog = state.catalog().fetch_all(state.api()).await;

    match ProductListing::from_state(&catalog, state.image_base_url()) {
        ProductListing::Loading => LoadingTemplate::new().into_response(),
        listing => ProductsIndexTemplate { listing }.into_response(),
    }
}

/// Select a product from the collection and go to its detail page.
#[instrument(skip(state))]
pub async fn select(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let id = ProductId::from(id);
    let catalog = state.catalog().snapshot().await;

    if let Some(product) = catalog.find(&id) {
        add_breadcrumb("catalog", "Selected product", Some(&[("product_id", id.as_str())][..]));
        state.catalog().select(product.clone()).await;
    } else {
        tracing::debug!(product_id = %id, "Selected product is not in the collection");
    }

    Redirect::to(&product_path(&id))
}

/// Clear the selection and go back to the listing.
#[instrument(skip(state))]
pub async fn clear_selection(State(state): State<AppState>) -> Redirect {
    state.catalog().clear_selected().await;
    Redirect::to("/")
}

/// Display the product detail page with its order form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = ProductId::from(id);
    let catalog = state.catalog().snapshot().await;

    let (product, error) = match resolve_product(&catalog, &id) {
        Resolution::Selected(product) => (Some(product), None),
        Resolution::Found(product) => {
            state.catalog().select(product.clone()).await;
            (Some(product), None)
        }
        Resolution::Redirect => {
            tracing::debug!(product_id = %id, "Product not in collection, redirecting");
            return Redirect::to("/").into_response();
        }
        Resolution::Fetch => {
            let catalog = state.catalog().fetch_one(state.api(), &id).await;
            if catalog.is_loading() {
                return LoadingTemplate::new().into_response();
            }
            let product = catalog.selected().filter(|p| p.id == id).cloned();
            (product, catalog.error().map(String::from))
        }
    };

    match product {
        Some(product) => {
            let form = OrderForm::new(product.id.clone(), product.price);
            render_detail(&state, &product, &form)
        }
        None => ProductMissingTemplate { error }.into_response(),
    }
}
