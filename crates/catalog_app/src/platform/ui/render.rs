use catalog_core::{
    AppViewModel, FormMode, ImportView, ProductFormView, ProductTableView, WebhookFormView,
    WebhookTableView,
};
use chrono::Local;

use super::constants::{DESCRIPTION_WIDTH, PROGRESS_BAR_WIDTH};

/// Lines for every section of `view` that differs from `previous`; all
/// sections when there is no previous frame.
pub fn render(previous: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if previous.map_or(true, |prev| prev.import != view.import) {
        lines.extend(render_import(&view.import));
    }
    if previous.map_or(true, |prev| prev.products != view.products) {
        lines.extend(render_products(&view.products));
    }
    if previous.map_or(true, |prev| prev.product_form != view.product_form) {
        lines.push(render_product_form(&view.product_form));
    }
    if previous.map_or(true, |prev| prev.webhooks != view.webhooks) {
        lines.extend(render_webhooks(&view.webhooks));
    }
    if previous.map_or(true, |prev| prev.webhook_form != view.webhook_form) {
        lines.push(render_webhook_form(&view.webhook_form));
    }
    if previous.map_or(true, |prev| prev.confirmation != view.confirmation) {
        if let Some(prompt) = &view.confirmation {
            lines.push(format!("{prompt} (yes/no)"));
        }
    }
    lines
}

pub fn alert(text: &str) -> String {
    format!("[{}] {}", Local::now().format("%H:%M:%S"), text)
}

fn render_import(import: &ImportView) -> Vec<String> {
    let Some(status) = &import.status else {
        return Vec::new();
    };
    let mut lines = vec![format!("Import: {status}")];
    if let Some(percent) = import.progress {
        lines.push(progress_bar(percent));
    }
    lines
}

fn progress_bar(percent: u32) -> String {
    let percent = percent.min(100);
    let filled = PROGRESS_BAR_WIDTH * percent as usize / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

fn render_products(table: &ProductTableView) -> Vec<String> {
    let mut lines = Vec::new();
    if table.loading {
        lines.push("Loading products...".to_string());
    }
    lines.push(format!("Products ({})", table.page_label));
    let filter = &table.filter;
    if !filter.is_empty() {
        lines.push(format!(
            "Filter: sku={:?} name={:?} active={:?}",
            filter.sku, filter.name, filter.active
        ));
    }

    let rows: Vec<[String; 5]> = table
        .rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.sku.clone(),
                row.name.clone(),
                truncate(&row.description, DESCRIPTION_WIDTH),
                row.status.to_string(),
            ]
        })
        .collect();
    if rows.is_empty() {
        lines.push("  (no products)".to_string());
    } else {
        lines.extend(table_lines(
            ["ID", "SKU", "Name", "Description", "Status"],
            &rows,
        ));
    }

    let navigation = format!(
        "{}  {}  {}",
        if table.previous_enabled { "< prev" } else { "      " },
        table.page_label,
        if table.next_enabled { "next >" } else { "" }
    );
    lines.push(navigation.trim_end().to_string());
    lines
}

fn render_webhooks(table: &WebhookTableView) -> Vec<String> {
    let rows: Vec<[String; 4]> = table
        .rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.url.clone(),
                row.event.clone(),
                row.status.to_string(),
            ]
        })
        .collect();
    let mut lines = Vec::new();
    if table.loading {
        lines.push("Loading webhooks...".to_string());
    }
    lines.push("Webhooks".to_string());
    if rows.is_empty() {
        lines.push("  (no webhooks)".to_string());
    } else {
        lines.extend(table_lines(["ID", "URL", "Event", "Status"], &rows));
    }
    lines
}

fn render_product_form(form: &ProductFormView) -> String {
    let fields = &form.fields;
    format!(
        "Product form ({}): sku={:?} name={:?} description={:?} active={}",
        mode_label(form.mode),
        fields.sku,
        fields.name,
        fields.description,
        fields.active
    )
}

fn render_webhook_form(form: &WebhookFormView) -> String {
    let fields = &form.fields;
    format!(
        "Webhook form ({}): url={:?} event={} enabled={}",
        mode_label(form.mode),
        fields.url,
        fields.event,
        fields.enabled
    )
}

fn mode_label(mode: FormMode) -> String {
    match mode {
        FormMode::Create => "new".to_string(),
        FormMode::Update(id) => format!("editing #{id}"),
    }
}

fn table_lines<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> Vec<String> {
    let mut widths = headers.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format!("  {}", format_row(headers.to_vec()))];
    for row in rows {
        lines.push(format!(
            "  {}",
            format_row(row.iter().map(String::as_str).collect())
        ));
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
