use crate::{Product, ProductField, ProductFields, ProductFilter, ProductId, ProductQuery};

/// Rows per product page.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Pagination, filter and the currently rendered page of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListState {
    current_page: u64,
    page_size: u64,
    last_loaded_count: u64,
    filter: ProductFilter,
    rows: Vec<Product>,
    /// Page the rendered rows belong to.
    shown_page: u64,
    last_request: u64,
    /// Request number of the load whose answer will be applied.
    pending: Option<u64>,
}

impl Default for ProductListState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ProductListState {
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            last_loaded_count: 0,
            filter: ProductFilter::default(),
            rows: Vec::new(),
            shown_page: 1,
            last_request: 0,
            pending: None,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn last_loaded_count(&self) -> u64 {
        self.last_loaded_count
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn rows(&self) -> &[Product] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// The backend reports no total, so a full page is the only hint that more exist.
    pub fn has_next(&self) -> bool {
        self.last_loaded_count == self.page_size
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.rows.iter().find(|product| product.id == id)
    }

    pub(crate) fn set_filter(&mut self, filter: ProductFilter) {
        self.filter = filter;
    }

    pub(crate) fn reset(&mut self) {
        self.filter = ProductFilter::default();
        self.current_page = 1;
    }

    pub(crate) fn step_back(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn step_forward(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Numbers a load of the current page and filter and marks it as the
    /// only one whose answer counts.
    pub(crate) fn issue_query(&mut self) -> (u64, ProductQuery) {
        self.last_request += 1;
        self.pending = Some(self.last_request);
        let query = ProductQuery::for_page(self.current_page, self.page_size, &self.filter);
        (self.last_request, query)
    }

    pub(crate) fn is_pending(&self, request: u64) -> bool {
        self.pending == Some(request)
    }

    /// The latest load failed: the page number goes back to the rows on screen.
    pub(crate) fn load_failed(&mut self) {
        self.pending = None;
        self.current_page = self.shown_page;
    }

    /// Applies a fetched page. Returns `false` when the page came back empty
    /// past page 1; the page has then been stepped back and must be refetched.
    pub(crate) fn apply_page(&mut self, products: Vec<Product>) -> bool {
        self.pending = None;
        self.last_loaded_count = products.len() as u64;
        if products.is_empty() && self.current_page > 1 {
            self.current_page -= 1;
            self.shown_page = self.current_page;
            self.rows.clear();
            return false;
        }
        self.shown_page = self.current_page;
        self.rows = products;
        true
    }
}

/// Staged product being created (`id == None`) or updated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductEditBuffer {
    id: Option<ProductId>,
    fields: ProductFields,
}

impl ProductEditBuffer {
    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub(crate) fn load(&mut self, product: &Product) {
        self.id = Some(product.id);
        self.fields = ProductFields::from(product);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn forget_id(&mut self) {
        self.id = None;
    }

    pub(crate) fn apply(&mut self, field: ProductField) {
        match field {
            ProductField::Sku(sku) => self.fields.sku = sku,
            ProductField::Name(name) => self.fields.name = name,
            ProductField::Description(description) => self.fields.description = description,
            ProductField::Active(active) => self.fields.active = active,
        }
    }

    /// SKU and name are required before anything is sent.
    pub(crate) fn is_complete(&self) -> bool {
        !self.fields.sku.is_empty() && !self.fields.name.is_empty()
    }
}
