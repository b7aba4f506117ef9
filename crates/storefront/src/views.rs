//! Rendering: view models and askama templates for each page region.
//!
//! Every function here is pure; it takes normalized data and returns HTML.
//! All interpolated text is escaped by askama.

use askama::Template;
use green_cart_core::{CartLineItem, Category, CategoryId, Plant};

use crate::modal::PlantDetail;
use crate::page::{Page, Region};
use crate::stores::CartStore;

/// Maximum length of a description on a grid card.
pub const SUMMARY_MAX_CHARS: usize = 100;

const ALL_CATEGORIES_LABEL: &str = "All Trees";
const NO_DESCRIPTION: &str = "No additional information available.";
const ERROR_CLASS: &str = "text-red-600";
const MODAL_ERROR_CLASS: &str = "p-6 text-red-600";

// =============================================================================
// View Models
// =============================================================================

/// One category button.
#[derive(Debug, Clone)]
pub struct CategoryButtonView {
    /// Empty for the "All Trees" button.
    pub id: String,
    pub title: String,
    pub active: bool,
}

/// Plant card data for the grid.
#[derive(Debug, Clone)]
pub struct PlantCardView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub image: String,
    pub price: String,
}

impl From<&Plant> for PlantCardView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id.to_string(),
            name: plant.name.clone(),
            summary: truncate_text(&plant.description, SUMMARY_MAX_CHARS),
            image: plant.image.clone(),
            price: plant.price.display(),
        }
    }
}

/// Cart row data.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub line_price: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            qty: item.qty,
            line_price: item.line_total().display(),
        }
    }
}

/// Full plant data for the modal.
#[derive(Debug, Clone)]
pub struct PlantDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
}

impl From<&Plant> for PlantDetailView {
    fn from(plant: &Plant) -> Self {
        let description = if plant.description.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            plant.description.clone()
        };
        Self {
            id: plant.id.to_string(),
            name: plant.name.clone(),
            description,
            image: plant.image.clone(),
            price: plant.price.display(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Category list fragment.
#[derive(Template)]
#[template(path = "partials/category_list.html")]
pub struct CategoryListTemplate {
    pub buttons: Vec<CategoryButtonView>,
}

/// Plant grid fragment.
#[derive(Template)]
#[template(path = "partials/plant_grid.html")]
pub struct PlantGridTemplate {
    pub plants: Vec<PlantCardView>,
}

/// Cart items fragment.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub items: Vec<CartItemView>,
}

/// Plant detail modal body.
#[derive(Template)]
#[template(path = "partials/plant_modal.html")]
pub struct PlantModalTemplate {
    pub plant: PlantDetailView,
}

/// Loading placeholder.
#[derive(Template)]
#[template(path = "partials/loading.html")]
pub struct LoadingTemplate;

/// Inline error message replacing a region's contents.
#[derive(Template)]
#[template(path = "partials/inline_error.html")]
pub struct InlineErrorTemplate<'a> {
    pub message: &'a str,
    pub class: &'a str,
    pub list_item: bool,
}

/// Complete page document.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    pub category_list: &'a str,
    pub tree_list: &'a str,
    pub cart_list: &'a str,
    pub cart_total: &'a str,
    pub cart_count: u32,
    pub modal_content: &'a str,
    pub modal_open: bool,
    pub spinner_visible: bool,
}

// =============================================================================
// Render Functions
// =============================================================================

/// Render the category list with "All Trees" first and `active` marked.
///
/// `None` marks "All Trees" active.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_categories(
    categories: &[Category],
    active: Option<&CategoryId>,
) -> askama::Result<String> {
    let all = CategoryButtonView {
        id: String::new(),
        title: ALL_CATEGORIES_LABEL.to_string(),
        active: active.is_none(),
    };
    let buttons = std::iter::once(all)
        .chain(categories.iter().map(|category| CategoryButtonView {
            id: category.id.to_string(),
            title: category.title.clone(),
            active: active == Some(&category.id),
        }))
        .collect();

    CategoryListTemplate { buttons }.render()
}

/// Render the plant grid, or the empty state if there are no plants.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_plant_grid(plants: &[Plant]) -> askama::Result<String> {
    PlantGridTemplate {
        plants: plants.iter().map(PlantCardView::from).collect(),
    }
    .render()
}

/// Render the cart rows, or the empty state.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_cart(cart: &CartStore) -> askama::Result<String> {
    CartItemsTemplate {
        items: cart.items().iter().map(CartItemView::from).collect(),
    }
    .render()
}

/// Render the cart total as display text.
#[must_use]
pub fn render_cart_total(cart: &CartStore) -> String {
    cart.total().display()
}

/// Render the modal body for a detail outcome.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_plant_detail(detail: &PlantDetail) -> askama::Result<String> {
    match detail.plant() {
        Some(plant) => PlantModalTemplate {
            plant: PlantDetailView::from(plant),
        }
        .render(),
        None => render_modal_error("Failed to load plant details."),
    }
}

/// Render the loading placeholder.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_loading() -> askama::Result<String> {
    LoadingTemplate.render()
}

/// Render an inline error for a block region.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_error(message: &str) -> askama::Result<String> {
    InlineErrorTemplate {
        message,
        class: ERROR_CLASS,
        list_item: false,
    }
    .render()
}

/// Render an inline error for a list region.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_list_error(message: &str) -> askama::Result<String> {
    InlineErrorTemplate {
        message,
        class: ERROR_CLASS,
        list_item: true,
    }
    .render()
}

fn render_modal_error(message: &str) -> askama::Result<String> {
    InlineErrorTemplate {
        message,
        class: MODAL_ERROR_CLASS,
        list_item: false,
    }
    .render()
}

/// Render the whole page document from its current regions.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_document(page: &Page, cart: &CartStore) -> askama::Result<String> {
    PageTemplate {
        category_list: page.html(Region::CategoryList),
        tree_list: page.html(Region::TreeList),
        cart_list: page.html(Region::CartList),
        cart_total: page.html(Region::CartTotal),
        cart_count: cart.item_count(),
        modal_content: page.html(Region::ModalContent),
        modal_open: page.is_modal_open(),
        spinner_visible: page.is_spinner_visible(),
    }
    .render()
}

/// Shorten `text` to at most `max` characters, ending in `…` when cut.
#[must_use]
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
