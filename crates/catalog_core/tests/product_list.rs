use catalog_core::{
    update, AppState, CoreSettings, Effect, Msg, PageDirection, Product, ProductFilter,
    ProductQuery, RequestFailure,
};
use pretty_assertions::assert_eq;

fn product(id: u64) -> Product {
    Product {
        id,
        sku: format!("SKU-{id}"),
        name: format!("Product {id}"),
        description: (id % 2 == 0).then(|| format!("Description {id}")),
        active: id % 3 != 0,
    }
}

fn products(range: std::ops::RangeInclusive<u64>) -> Vec<Product> {
    range.map(product).collect()
}

/// Request number and query of the single product fetch in `effects`.
fn fetched(effects: &[Effect]) -> (u64, ProductQuery) {
    match effects {
        [Effect::FetchProducts { request, query }] => (*request, query.clone()),
        other => panic!("expected one product fetch, got {other:?}"),
    }
}

fn fetched_query(effects: &[Effect]) -> ProductQuery {
    fetched(effects).1
}

/// Issues `msg`, answers the resulting fetch with `page` and returns the state.
fn load_with(state: AppState, msg: Msg, page: Vec<Product>) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, msg);
    let (request, _) = fetched(&effects);
    update(
        state,
        Msg::ProductsLoaded {
            request,
            result: Ok(page),
        },
    )
}

fn row_ids(state: &AppState) -> Vec<u64> {
    state.view().products.rows.iter().map(|row| row.id).collect()
}

fn small_pages() -> AppState {
    AppState::with_settings(CoreSettings {
        page_size: 3,
        ..CoreSettings::default()
    })
}

#[test]
fn query_uses_page_offset_and_only_set_filters() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FilterChanged(ProductFilter {
            sku: String::new(),
            name: "blue mug".to_string(),
            active: "false".to_string(),
        }),
    );
    let (_, effects) = update(state, Msg::LoadProducts);

    assert_eq!(
        fetched_query(&effects),
        ProductQuery {
            skip: 0,
            limit: 50,
            sku: None,
            name: Some("blue mug".to_string()),
            active: Some("false".to_string()),
        }
    );
}

#[test]
fn rows_render_description_and_status() {
    let (state, effects) = load_with(AppState::new(), Msg::ShowAllProducts, products(1..=3));
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.products.rows.len(), 3);
    assert_eq!(view.products.rows[0].description, "");
    assert_eq!(view.products.rows[0].status, "Success");
    assert_eq!(view.products.rows[1].description, "Description 2");
    assert_eq!(view.products.rows[2].status, "Error");
    assert_eq!(view.products.page_label, "Page 1");
}

#[test]
fn next_is_enabled_only_for_full_pages() {
    for (count, expected) in [(0, false), (1, false), (2, false), (3, true)] {
        let page = if count == 0 {
            Vec::new()
        } else {
            products(1..=count)
        };
        let (state, _) = load_with(small_pages(), Msg::ShowAllProducts, page);
        let view = state.view();
        assert_eq!(view.products.next_enabled, expected, "page of {count}");
        assert!(!view.products.previous_enabled);
        assert_eq!(state.products().last_loaded_count(), count);
    }
}

#[test]
fn paging_moves_only_when_enabled() {
    let (state, _) = load_with(small_pages(), Msg::ShowAllProducts, products(1..=3));

    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Previous));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Next));
    let (request, query) = fetched(&effects);
    assert_eq!(query.skip, 3);
    assert_eq!(state.products().current_page(), 2);

    let (state, _) = update(
        state,
        Msg::ProductsLoaded {
            request,
            result: Ok(products(4..=5)),
        },
    );
    assert!(state.view().products.previous_enabled);
    assert!(!state.view().products.next_enabled);

    let (_, effects) = update(state, Msg::PageChanged(PageDirection::Next));
    assert!(effects.is_empty());
}

#[test]
fn empty_trailing_page_steps_back_once_per_response() {
    let mut state = AppState::with_settings(CoreSettings {
        page_size: 50,
        ..CoreSettings::default()
    });
    // Walk to page 3.
    for page in [products(1..=50), products(51..=100)] {
        let (next, _) = load_with(state, Msg::LoadProducts, page);
        let (next, effects) = update(next, Msg::PageChanged(PageDirection::Next));
        assert_eq!(effects.len(), 1);
        state = next;
    }
    assert_eq!(state.products().current_page(), 3);
    let (state, effects) = update(state, Msg::LoadProducts);
    let (request, _) = fetched(&effects);
    let (state, _) = update(
        state,
        Msg::ProductsLoaded {
            request,
            result: Ok(vec![product(101)]),
        },
    );

    // Deleting the last product on page 3 reloads page 3.
    let (state, _) = update(state, Msg::DeleteProduct(101));
    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert_eq!(effects, vec![Effect::DeleteProduct { id: 101 }]);
    let (state, effects) = update(
        state,
        Msg::ProductDeleted {
            id: 101,
            result: Ok(()),
        },
    );
    let (page_three, query) = fetched(&effects);
    assert_eq!(query.skip, 100);

    let (state, effects) = update(
        state,
        Msg::ProductsLoaded {
            request: page_three,
            result: Ok(Vec::new()),
        },
    );
    let (page_two, query) = fetched(&effects);
    assert_eq!(query.skip, 50);
    assert_eq!(state.products().current_page(), 2);

    let (state, effects) = update(
        state,
        Msg::ProductsLoaded {
            request: page_two,
            result: Ok(products(51..=100)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().products.rows.len(), 50);
    assert_eq!(state.view().products.page_label, "Page 2");
}

#[test]
fn empty_first_page_does_not_retry() {
    let (state, effects) = load_with(AppState::new(), Msg::ShowAllProducts, Vec::new());
    assert!(effects.is_empty());
    assert_eq!(state.products().current_page(), 1);
    assert!(state.view().products.rows.is_empty());
}

#[test]
fn show_all_twice_renders_the_same_rows() {
    let (first, _) = load_with(AppState::new(), Msg::ShowAllProducts, products(1..=7));
    let first_rows = first.view().products.rows;
    let (second, _) = load_with(first, Msg::ShowAllProducts, products(1..=7));

    assert_eq!(second.view().products.rows, first_rows);
}

#[test]
fn show_all_clears_filters_and_returns_to_first_page() {
    let (state, _) = load_with(small_pages(), Msg::ShowAllProducts, products(1..=3));
    let (state, _) = update(state, Msg::PageChanged(PageDirection::Next));
    let (state, _) = update(
        state,
        Msg::FilterChanged(ProductFilter {
            sku: "SKU-1".to_string(),
            ..ProductFilter::default()
        }),
    );

    let (state, effects) = update(state, Msg::ShowAllProducts);
    assert_eq!(
        fetched_query(&effects),
        ProductQuery::for_page(1, 3, &ProductFilter::default())
    );
    assert!(state.view().products.filter.is_empty());
}

#[test]
fn superseded_page_response_is_dropped() {
    let (state, _) = load_with(small_pages(), Msg::ShowAllProducts, products(1..=3));
    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Next));
    let (stale, _) = fetched(&effects);
    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Previous));
    let (current, _) = fetched(&effects);

    let (state, effects) = update(
        state,
        Msg::ProductsLoaded {
            request: stale,
            result: Ok(products(4..=6)),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().products.loading);
    assert_eq!(state.view().products.rows[0].id, 1);

    let (state, _) = update(
        state,
        Msg::ProductsLoaded {
            request: current,
            result: Ok(products(1..=3)),
        },
    );
    assert!(!state.view().products.loading);
}

#[test]
fn failed_load_keeps_previous_rows() {
    let (state, _) = load_with(AppState::new(), Msg::ShowAllProducts, products(1..=2));
    let (state, effects) = update(state, Msg::LoadProducts);
    let (request, _) = fetched(&effects);

    let (state, effects) = update(
        state,
        Msg::ProductsLoaded {
            request,
            result: Err(RequestFailure::Transport {
                message: "connection refused".to_string(),
            }),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Alert(
            "Failed to load products: Error loading products".to_string()
        )]
    );
    assert_eq!(state.view().products.rows.len(), 2);
    assert!(!state.view().products.loading);
}

#[test]
fn reload_after_delete_ignores_the_older_answer_to_the_same_query() {
    let (state, _) = load_with(AppState::new(), Msg::ShowAllProducts, products(1..=2));
    let (state, effects) = update(state, Msg::LoadProducts);
    let (older, older_query) = fetched(&effects);

    let (state, _) = update(state, Msg::DeleteProduct(2));
    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert_eq!(effects, vec![Effect::DeleteProduct { id: 2 }]);
    let (state, effects) = update(
        state,
        Msg::ProductDeleted {
            id: 2,
            result: Ok(()),
        },
    );
    let (newer, newer_query) = fetched(&effects);
    assert_eq!(newer_query, older_query);
    assert!(newer > older);

    let (state, effects) = update(
        state,
        Msg::ProductsLoaded {
            request: older,
            result: Ok(products(1..=2)),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().products.loading);

    let (state, _) = update(
        state,
        Msg::ProductsLoaded {
            request: newer,
            result: Ok(products(1..=1)),
        },
    );
    assert_eq!(row_ids(&state), vec![1]);
    assert!(!state.view().products.loading);
}

#[test]
fn failed_page_turn_keeps_the_page_on_screen() {
    let two_per_page = AppState::with_settings(CoreSettings {
        page_size: 2,
        ..CoreSettings::default()
    });
    let (state, _) = load_with(two_per_page, Msg::ShowAllProducts, products(1..=2));

    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Next));
    let (request, query) = fetched(&effects);
    assert_eq!(query.skip, 2);
    let (state, _) = update(
        state,
        Msg::ProductsLoaded {
            request,
            result: Err(RequestFailure::Transport {
                message: "connection refused".to_string(),
            }),
        },
    );

    let view = state.view();
    assert_eq!(view.products.page_label, "Page 1");
    assert!(!view.products.previous_enabled);
    assert_eq!(row_ids(&state), vec![1, 2]);
    assert_eq!(state.products().current_page(), 1);

    let (state, effects) = update(state, Msg::PageChanged(PageDirection::Next));
    assert_eq!(fetched_query(&effects).skip, 2);
    assert_eq!(state.products().current_page(), 2);
}

#[test]
fn bulk_delete_requires_confirmation_and_resets_to_first_page() {
    let (state, _) = load_with(small_pages(), Msg::ShowAllProducts, products(1..=3));
    let (state, _) = update(state, Msg::PageChanged(PageDirection::Next));

    let (state, effects) = update(state, Msg::DeleteAllProducts);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().confirmation.as_deref(),
        Some("Are you sure? This will delete ALL products!")
    );

    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert_eq!(effects, vec![Effect::DeleteAllProducts]);
    assert_eq!(state.view().confirmation, None);

    let (state, effects) = update(state, Msg::AllProductsDeleted { result: Ok(()) });
    assert_eq!(fetched_query(&effects).skip, 0);
    assert_eq!(state.products().current_page(), 1);
}

#[test]
fn declined_delete_sends_nothing() {
    let (state, _) = update(AppState::new(), Msg::DeleteProduct(9));
    assert_eq!(
        state.view().confirmation.as_deref(),
        Some("Are you sure you want to delete this product?")
    );
    let (state, effects) = update(state, Msg::ConfirmationAnswered(false));
    assert!(effects.is_empty());
    assert_eq!(state.confirmation(), None);

    // A stray answer with nothing pending is a no-op.
    let (_, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert!(effects.is_empty());
}

#[test]
fn failed_deletes_alert_with_backend_detail() {
    let (_, effects) = update(
        AppState::new(),
        Msg::ProductDeleted {
            id: 4,
            result: Err(RequestFailure::Rejected {
                status: 404,
                detail: Some("Product not found".to_string()),
            }),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Alert(
            "Failed to delete product: Product not found".to_string()
        )]
    );

    let (_, effects) = update(
        AppState::new(),
        Msg::AllProductsDeleted {
            result: Err(RequestFailure::Transport {
                message: "timed out".to_string(),
            }),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Alert("Failed to delete all products".to_string())]
    );
}
