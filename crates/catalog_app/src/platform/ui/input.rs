use std::path::PathBuf;

use catalog_core::{Msg, PageDirection, ProductField, ProductFilter, WebhookField, WEBHOOK_EVENTS};

/// What one console line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Blank,
    /// Unusable line, with the reason shown to the user.
    Invalid(String),
}

pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Blank;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Command::Help,
        "quit" | "exit" => return Command::Quit,
        "yes" | "y" => Msg::ConfirmationAnswered(true),
        "no" | "n" => Msg::ConfirmationAnswered(false),

        "upload" => Msg::UploadRequested {
            file: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        },

        "products" => Msg::LoadProducts,
        "all" => Msg::ShowAllProducts,
        "filter" => {
            return match parse_filter(rest) {
                Ok(filter) => {
                    Command::Dispatch(vec![Msg::FilterChanged(filter), Msg::LoadProducts])
                }
                Err(reason) => Command::Invalid(reason),
            }
        }
        "next" => Msg::PageChanged(PageDirection::Next),
        "prev" | "previous" => Msg::PageChanged(PageDirection::Previous),
        "new-product" => Msg::NewProduct,
        "edit" => return with_id(rest, Msg::EditProduct),
        "set" => {
            return match parse_product_field(rest) {
                Ok(field) => Command::Dispatch(vec![Msg::ProductFieldChanged(field)]),
                Err(reason) => Command::Invalid(reason),
            }
        }
        "save" => Msg::SaveProduct,
        "delete" => return with_id(rest, Msg::DeleteProduct),
        "delete-all" => Msg::DeleteAllProducts,

        "webhooks" => Msg::LoadWebhooks,
        "new-webhook" => Msg::NewWebhook,
        "edit-webhook" => return with_id(rest, Msg::EditWebhook),
        "set-webhook" => {
            return match parse_webhook_field(rest) {
                Ok(field) => Command::Dispatch(vec![Msg::WebhookFieldChanged(field)]),
                Err(reason) => Command::Invalid(reason),
            }
        }
        "save-webhook" => Msg::SaveWebhook,
        "delete-webhook" => return with_id(rest, Msg::DeleteWebhook),
        "test-webhook" => return with_id(rest, Msg::TestWebhook),

        other => return Command::Invalid(format!("Unknown command '{other}'. Type 'help'.")),
    };
    Command::Dispatch(vec![msg])
}

fn with_id(rest: &str, to_msg: fn(u64) -> Msg) -> Command {
    match rest.parse::<u64>() {
        Ok(id) => Command::Dispatch(vec![to_msg(id)]),
        Err(_) if rest.is_empty() => Command::Invalid("An id is required.".to_string()),
        Err(_) => Command::Invalid(format!("'{rest}' is not a valid id.")),
    }
}

/// Splits `key=value` pairs. A word without `=` continues the previous value,
/// so `name=desk lamp` keeps its space.
fn parse_pairs(rest: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in rest.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) => pairs.push((key.to_ascii_lowercase(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("Expected key=value, got '{word}'.")),
            },
        }
    }
    Ok(pairs)
}

fn parse_filter(rest: &str) -> Result<ProductFilter, String> {
    let mut filter = ProductFilter::default();
    for (key, value) in parse_pairs(rest)? {
        match key.as_str() {
            "sku" => filter.sku = value,
            "name" => filter.name = value,
            "active" => {
                let value = value.to_ascii_lowercase();
                if !matches!(value.as_str(), "" | "true" | "false") {
                    return Err("active must be true, false or empty.".to_string());
                }
                filter.active = value;
            }
            other => return Err(format!("Unknown filter '{other}'.")),
        }
    }
    Ok(filter)
}

fn single_pair(rest: &str) -> Result<(String, String), String> {
    let mut pairs = parse_pairs(rest)?;
    match pairs.len() {
        1 => Ok(pairs.remove(0)),
        0 => Err("Expected field=value.".to_string()),
        _ => Err("Set one field at a time.".to_string()),
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("'{other}' is not true or false.")),
    }
}

fn parse_product_field(rest: &str) -> Result<ProductField, String> {
    let (key, value) = single_pair(rest)?;
    match key.as_str() {
        "sku" => Ok(ProductField::Sku(value)),
        "name" => Ok(ProductField::Name(value)),
        "description" => Ok(ProductField::Description(value)),
        "active" => parse_flag(&value).map(ProductField::Active),
        other => Err(format!("Unknown product field '{other}'.")),
    }
}

fn parse_webhook_field(rest: &str) -> Result<WebhookField, String> {
    let (key, value) = single_pair(rest)?;
    match key.as_str() {
        "url" => Ok(WebhookField::Url(value)),
        "event" if WEBHOOK_EVENTS.contains(&value.as_str()) => Ok(WebhookField::Event(value)),
        "event" => Err(format!("Event must be one of {}.", WEBHOOK_EVENTS.join(", "))),
        "enabled" => parse_flag(&value).map(WebhookField::Enabled),
        other => Err(format!("Unknown webhook field '{other}'.")),
    }
}
