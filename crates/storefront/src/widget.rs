//! Interaction controller: wires UI events to the stores and re-renders.
//!
//! # Concurrency
//!
//! The widget is single-threaded. State lives behind `Rc<RefCell<_>>` and
//! every async method must run on a Tokio [`LocalSet`](tokio::task::LocalSet).
//! No `RefCell` borrow is held across an `.await`.
//!
//! Listing fetches take a sequence token before suspending; when the response
//! arrives and the token is no longer the latest, the response is dropped.
//! The detail modal keeps its own token for the same purpose.

// All futures here hold an `Rc` and run on a `LocalSet`.
#![allow(clippy::future_not_send)]

use std::cell::{Cell, Ref, RefCell};
use std::path::Path;
use std::rc::Rc;

use green_cart_core::normalize::{extract_array, extract_record, normalize_category, normalize_plant};
use green_cart_core::{Category, CategoryId, Plant, PlantId};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::api::CatalogClient;
use crate::error::{Result, WidgetError, add_breadcrumb};
use crate::modal::{ModalState, PlantDetail};
use crate::page::{Page, Region};
use crate::stores::{CartStore, CatalogStore};
use crate::views;

const CATEGORIES_FAILED: &str = "Failed to load categories";
const PLANTS_FAILED: &str = "Failed to load plants.";
const CATEGORY_PLANTS_FAILED: &str = "Failed to load plants for this category.";

/// A user interaction on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A category button; `None` is "All Trees".
    SelectCategory(Option<CategoryId>),
    /// A plant title in the grid.
    OpenPlant(PlantId),
    /// An "Add to Cart" button in the grid or the modal.
    AddToCart(PlantId),
    Increment(PlantId),
    Decrement(PlantId),
    Remove(PlantId),
    /// The modal's close button.
    CloseModal,
    /// A click on the modal overlay outside its panel.
    BackdropClick,
}

/// Result of a listing load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The region now shows this many entries.
    Rendered(usize),
    /// The request succeeded with no entries; the empty state is shown.
    Empty,
    /// The request failed; an inline error is shown.
    Failed,
    /// A newer request was issued meanwhile; nothing was rendered.
    Stale,
}

/// Result of an add-to-cart request.
#[derive(Debug)]
pub enum AddToCart {
    /// The plant was known and the cart was updated immediately.
    Added,
    /// The plant is being fetched; the add completes (or is dropped) when the
    /// task finishes.
    Pending(JoinHandle<()>),
}

/// The catalog-and-cart widget.
///
/// Cheaply cloneable via `Rc`; clones share all state.
#[derive(Clone)]
pub struct Widget {
    inner: Rc<WidgetInner>,
}

struct WidgetInner {
    client: CatalogClient,
    catalog: RefCell<CatalogStore>,
    cart: RefCell<CartStore>,
    page: RefCell<Page>,
    categories: RefCell<Vec<Category>>,
    active_category: RefCell<Option<CategoryId>>,
    listing_seq: Cell<u64>,
    modal_seq: Cell<u64>,
}

impl Widget {
    /// Create a widget over injected stores. Nothing is rendered until
    /// [`Widget::init`].
    #[must_use]
    pub fn new(client: CatalogClient, catalog: CatalogStore, cart: CartStore) -> Self {
        Self {
            inner: Rc::new(WidgetInner {
                client,
                catalog: RefCell::new(catalog),
                cart: RefCell::new(cart),
                page: RefCell::new(Page::new()),
                categories: RefCell::new(Vec::new()),
                active_category: RefCell::new(None),
                listing_seq: Cell::new(0),
                modal_seq: Cell::new(0),
            }),
        }
    }

    /// Current page contents.
    #[must_use]
    pub fn page(&self) -> Ref<'_, Page> {
        self.inner.page.borrow()
    }

    #[must_use]
    pub fn cart(&self) -> Ref<'_, CartStore> {
        self.inner.cart.borrow()
    }

    #[must_use]
    pub fn catalog(&self) -> Ref<'_, CatalogStore> {
        self.inner.catalog.borrow()
    }

    /// The category currently marked active (`None` is "All Trees").
    #[must_use]
    pub fn active_category(&self) -> Option<CategoryId> {
        self.inner.active_category.borrow().clone()
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Render the stored cart, then load categories, then load all plants.
    #[instrument(skip(self))]
    pub async fn init(&self) {
        self.render_cart();
        self.load_categories().await;
        self.load_plants(None).await;
        info!(
            plants = self.inner.catalog.borrow().len(),
            cart_lines = self.inner.cart.borrow().items().len(),
            "Widget initialized"
        );
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Fetch and render the category list.
    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> ListingOutcome {
        match self.inner.client.categories().await {
            Ok(response) => {
                let categories: Vec<Category> =
                    extract_array(&response).iter().map(normalize_category).collect();
                let count = categories.len();
                *self.inner.categories.borrow_mut() = categories;
                self.render_categories();
                debug!(count, "Categories rendered");
                if count == 0 {
                    ListingOutcome::Empty
                } else {
                    ListingOutcome::Rendered(count)
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to load categories");
                self.inner
                    .page
                    .borrow_mut()
                    .replace_rendered(Region::CategoryList, views::render_list_error(CATEGORIES_FAILED));
                ListingOutcome::Failed
            }
        }
    }

    /// Mark `category` active and reload the grid scoped to it.
    #[instrument(skip(self))]
    pub async fn select_category(&self, category: Option<CategoryId>) -> ListingOutcome {
        *self.inner.active_category.borrow_mut() = category.clone();
        self.render_categories();
        self.load_plants(category).await
    }

    /// Fetch the plant listing (all plants, or one category) and render the
    /// grid.
    ///
    /// The spinner shows while the request is in flight. If another listing
    /// request is issued before this one completes, this response is dropped
    /// and the spinner is left to the newer request.
    #[instrument(skip(self))]
    pub async fn load_plants(&self, category: Option<CategoryId>) -> ListingOutcome {
        let token = self.inner.listing_seq.get().wrapping_add(1);
        self.inner.listing_seq.set(token);
        self.inner.page.borrow_mut().set_spinner(true);

        let result = self.inner.client.plants(category.as_ref()).await;

        if self.inner.listing_seq.get() != token {
            debug!(token, latest = self.inner.listing_seq.get(), "Discarding stale listing response");
            return ListingOutcome::Stale;
        }

        let mut page = self.inner.page.borrow_mut();
        page.set_spinner(false);

        match result {
            Ok(response) => {
                let plants: Vec<Plant> = extract_array(&response).iter().map(normalize_plant).collect();
                self.inner.catalog.borrow_mut().replace(&plants);
                page.replace_rendered(Region::TreeList, views::render_plant_grid(&plants));
                debug!(count = plants.len(), "Plant grid rendered");
                if plants.is_empty() {
                    ListingOutcome::Empty
                } else {
                    ListingOutcome::Rendered(plants.len())
                }
            }
            Err(e) => {
                let message = if category.is_some() {
                    CATEGORY_PLANTS_FAILED
                } else {
                    PLANTS_FAILED
                };
                error!(error = %e, "Failed to load plants");
                page.replace_rendered(Region::TreeList, views::render_error(message));
                ListingOutcome::Failed
            }
        }
    }

    // =========================================================================
    // Detail modal
    // =========================================================================

    /// Open the detail modal for `id`.
    ///
    /// Shows the loading placeholder, then the cached plant if the current
    /// listing has it, then the fetched detail. A failed fetch keeps the
    /// cached render, or shows an error if there was none.
    ///
    /// Returns `None` when the modal was closed or reopened for another plant
    /// before the fetch completed; the late result is not rendered.
    #[instrument(skip(self))]
    pub async fn open_plant(&self, id: PlantId) -> Option<PlantDetail> {
        let token = self.inner.modal_seq.get().wrapping_add(1);
        self.inner.modal_seq.set(token);
        add_breadcrumb("modal", "Opened plant details", Some(&[("plant_id", id.as_str())]));

        let cached = self.inner.catalog.borrow().get(&id).cloned();
        {
            let mut page = self.inner.page.borrow_mut();
            page.set_modal(ModalState::Loading);
            page.replace_rendered(Region::ModalContent, views::render_loading());
            if let Some(plant) = &cached {
                debug!("Rendering cached plant while fetching detail");
                page.replace_rendered(
                    Region::ModalContent,
                    views::render_plant_detail(&PlantDetail::Cached(plant.clone())),
                );
                page.set_modal(ModalState::Open);
            }
        }

        let fetched = match self.fetch_plant(&id).await {
            Ok(plant) => Some(plant),
            Err(e) => {
                warn!(error = %e, "Failed to fetch plant details");
                None
            }
        };

        if self.inner.modal_seq.get() != token {
            debug!(token, "Discarding detail for superseded modal");
            return None;
        }

        let detail = PlantDetail::resolve(cached, fetched);
        let mut page = self.inner.page.borrow_mut();
        page.replace_rendered(Region::ModalContent, views::render_plant_detail(&detail));
        page.set_modal(ModalState::Open);
        Some(detail)
    }

    /// Hide the modal. Any in-flight detail fetch is discarded.
    pub fn close_modal(&self) {
        self.inner.modal_seq.set(self.inner.modal_seq.get().wrapping_add(1));
        self.inner.page.borrow_mut().set_modal(ModalState::Closed);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `id` to the cart.
    ///
    /// A plant from the current listing is added immediately. Otherwise its
    /// detail is fetched on a local task and the add happens when it arrives;
    /// if the fetch fails the add is dropped and the failure logged.
    ///
    /// # Panics
    ///
    /// The pending path uses [`tokio::task::spawn_local`] and panics outside a
    /// [`LocalSet`](tokio::task::LocalSet).
    #[instrument(skip(self))]
    pub fn add_to_cart(&self, id: PlantId) -> AddToCart {
        let known = self.inner.catalog.borrow().get(&id).cloned();
        if let Some(plant) = known {
            self.add_plant(&plant);
            return AddToCart::Added;
        }

        debug!("Plant not in catalog, fetching before add");
        let widget = self.clone();
        AddToCart::Pending(tokio::task::spawn_local(async move {
            match widget.fetch_plant(&id).await {
                Ok(plant) => widget.add_plant(&plant),
                Err(e) => error!(plant_id = %id, error = %e, "Dropping add to cart"),
            }
        }))
    }

    /// Remove the line for `id`. Returns `false` if it was not in the cart.
    pub fn remove_from_cart(&self, id: &PlantId) -> bool {
        let removed = self.inner.cart.borrow_mut().remove(id);
        if removed {
            add_breadcrumb("cart", "Removed plant", Some(&[("plant_id", id.as_str())]));
            self.render_cart();
        }
        removed
    }

    /// Change the quantity of `id` by `delta`, never below 1.
    pub fn change_qty(&self, id: &PlantId, delta: i64) -> bool {
        let changed = self.inner.cart.borrow_mut().change_qty(id, delta);
        if changed {
            self.render_cart();
        }
        changed
    }

    fn add_plant(&self, plant: &Plant) {
        self.inner.cart.borrow_mut().add(plant);
        add_breadcrumb("cart", "Added plant", Some(&[("plant_id", plant.id.as_str())]));
        self.render_cart();
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Dispatch a UI event.
    ///
    /// Adds that need a fetch are left running on the local task set.
    pub async fn handle(&self, event: UiEvent) {
        debug!(?event, "Handling UI event");
        match event {
            UiEvent::SelectCategory(category) => {
                self.select_category(category).await;
            }
            UiEvent::OpenPlant(id) => {
                self.open_plant(id).await;
            }
            UiEvent::AddToCart(id) => {
                let _ = self.add_to_cart(id);
            }
            UiEvent::Increment(id) => {
                self.change_qty(&id, 1);
            }
            UiEvent::Decrement(id) => {
                self.change_qty(&id, -1);
            }
            UiEvent::Remove(id) => {
                self.remove_from_cart(&id);
            }
            UiEvent::CloseModal | UiEvent::BackdropClick => self.close_modal(),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the whole page document.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if the page template fails.
    pub fn render_document(&self) -> Result<String> {
        let page = self.inner.page.borrow();
        let cart = self.inner.cart.borrow();
        Ok(views::render_document(&page, &cart)?)
    }

    /// Render the page document and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` or `WidgetError::Snapshot`.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        let html = self.render_document()?;
        std::fs::write(path, html)?;
        info!(path = %path.display(), "Page snapshot written");
        Ok(())
    }

    fn render_categories(&self) {
        let categories = self.inner.categories.borrow();
        let active = self.inner.active_category.borrow();
        self.inner
            .page
            .borrow_mut()
            .replace_rendered(Region::CategoryList, views::render_categories(&categories, active.as_ref()));
    }

    fn render_cart(&self) {
        let cart = self.inner.cart.borrow();
        let mut page = self.inner.page.borrow_mut();
        page.replace_rendered(Region::CartList, views::render_cart(&cart));
        page.replace(Region::CartTotal, views::render_cart_total(&cart));
    }

    /// Fetch one plant from the detail endpoint.
    async fn fetch_plant(&self, id: &PlantId) -> Result<Plant> {
        let response = self.inner.client.plant(id).await?;
        extract_record(&response)
            .map(normalize_plant)
            .ok_or_else(|| WidgetError::PlantNotFound(id.clone()))
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("api_base", &self.inner.client.base())
            .field("listing_seq", &self.inner.listing_seq.get())
            .field("modal_seq", &self.inner.modal_seq.get())
            .finish_non_exhaustive()
    }
}
