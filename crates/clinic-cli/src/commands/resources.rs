//! Record commands over the clinic's collections.

use crate::console::Console;
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::Args;
use clinic_resources::{catalog, DiagnosisClient, ResourceSpec, UntypedClient};
use clinic_screens::{display_value, schemas, EntityScreen, FormInput, PageWindow, ScreenError, ScreenSchema};
use serde_json::{json, Value};

/// Record contents for create and update.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Payload {
    /// Record as a JSON object, sent as-is
    #[arg(long)]
    data: Option<String>,

    /// Form field as FIELD=VALUE, checked like the console's forms (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    fields: Vec<String>,
}

impl Payload {
    fn body(&self, spec: &ResourceSpec) -> Result<Value> {
        if let Some(data) = &self.data {
            let value: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
            ensure!(value.is_object(), "--data must be a JSON object");
            return Ok(value);
        }

        let schema = schemas::for_resource(spec.name)
            .ok_or_else(|| anyhow!("{} has no form fields, use --data", spec.label))?;
        let form = parse_fields(&self.fields)?;
        let values = schema.validate(&form).map_err(ScreenError::Invalid)?;
        Ok(Value::Object(values))
    }
}

fn parse_fields(pairs: &[String]) -> Result<FormInput> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok((field.trim().to_string(), value.to_string()))
            }
            _ => bail!("Expected FIELD=VALUE, got '{}'", pair),
        })
        .collect()
}

fn resolve(name: &str) -> Result<ResourceSpec> {
    catalog::lookup(name).ok_or_else(|| {
        let known: Vec<&str> = catalog::CATALOG.iter().map(|spec| spec.name).collect();
        anyhow!("Unknown resource '{}' (known: {})", name, known.join(", "))
    })
}

fn id_cell(row: &Value) -> String {
    row.get("id").map(display_value).unwrap_or_default()
}

fn print_rows(schema: &ScreenSchema, rows: &[&Value]) {
    let mut headers = vec!["Id"];
    headers.extend(schema.columns.iter().map(|column| column.header));
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut line = vec![id_cell(row)];
            line.extend(schema.cells(row));
            line
        })
        .collect();
    println!("{}", output::render_table(&headers, &cells));
}

fn print_footer(window: PageWindow, page: u32, total_pages: u32) {
    println!(
        "\n{}-{} of {} (page {} of {})",
        window.first,
        window.last,
        window.total,
        page + 1,
        total_pages.max(1)
    );
}

pub async fn list(
    console: &Console,
    resource: &str,
    page: u32,
    size: Option<u32>,
    search: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let spec = resolve(resource)?;
    console.require_session().await?;
    let size = size.unwrap_or(console.config.default_page_size);

    let Some(schema) = schemas::for_resource(spec.name) else {
        return list_untyped(console, spec, page, size, search, format).await;
    };

    let mut screen: EntityScreen<Value> = EntityScreen::new(console.gateway.clone(), *schema, size);
    screen.set_page(page).await?;
    if let Some(term) = search {
        screen.set_search(term);
    }

    let rows = screen.visible_items();
    match format {
        OutputFormat::Json => output::print_json(&json!({
            "items": rows,
            "page": screen.page_index(),
            "size": screen.page_size(),
            "totalItems": screen.total_items(),
            "totalPages": screen.total_pages(),
        })),
        OutputFormat::Text => {
            print_rows(schema, &rows);
            print_footer(screen.page_window(), screen.page_index(), screen.total_pages());
        }
    }
    Ok(())
}

/// Collections without a screen schema: raw JSON, searched as text.
async fn list_untyped(
    console: &Console,
    spec: ResourceSpec,
    page: u32,
    size: u32,
    search: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let client = UntypedClient::new(console.gateway.clone(), spec);
    let listing = client.list(page, size).await?;

    let term = search.map(|t| t.trim().to_lowercase()).unwrap_or_default();
    let rows: Vec<&Value> = listing
        .items
        .iter()
        .filter(|item| term.is_empty() || item.to_string().to_lowercase().contains(&term))
        .collect();

    match format {
        OutputFormat::Json => output::print_json(&json!({
            "items": rows,
            "page": listing.page_index,
            "size": listing.page_size,
            "totalItems": listing.total_items,
            "totalPages": listing.total_pages,
        })),
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", row);
            }
            let first = u64::from(listing.page_index) * u64::from(listing.page_size) + 1;
            let window = PageWindow {
                first: first.min(listing.total_items),
                last: (first + listing.items.len() as u64).saturating_sub(1),
                total: listing.total_items,
            };
            print_footer(window, listing.page_index, listing.total_pages);
        }
    }
    Ok(())
}

pub async fn get(console: &Console, resource: &str, id: i64) -> Result<()> {
    let spec = resolve(resource)?;
    console.require_session().await?;

    let record = UntypedClient::new(console.gateway.clone(), spec).get(id).await?;
    output::print_json(&record);
    Ok(())
}

pub async fn create(
    console: &Console,
    resource: &str,
    payload: &Payload,
    format: &OutputFormat,
) -> Result<()> {
    let spec = resolve(resource)?;
    let body = payload.body(&spec)?;
    console.require_session().await?;

    let created = UntypedClient::new(console.gateway.clone(), spec)
        .create(&body)
        .await?;
    report_saved(&spec, "Created", &created, format);
    Ok(())
}

pub async fn update(
    console: &Console,
    resource: &str,
    id: i64,
    payload: &Payload,
    format: &OutputFormat,
) -> Result<()> {
    let spec = resolve(resource)?;
    let body = payload.body(&spec)?;
    console.require_session().await?;

    let updated = UntypedClient::new(console.gateway.clone(), spec)
        .update(id, &body)
        .await?;
    report_saved(&spec, "Updated", &updated, format);
    Ok(())
}

fn report_saved(spec: &ResourceSpec, verb: &str, record: &Value, format: &OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(record),
        OutputFormat::Text => {
            output::print_success(&format!("{} {} {}", verb, spec.label, id_cell(record)), format);
            output::print_json(record);
        }
    }
}

pub async fn delete(console: &Console, resource: &str, id: i64, format: &OutputFormat) -> Result<()> {
    let spec = resolve(resource)?;
    console.require_session().await?;

    UntypedClient::new(console.gateway.clone(), spec).remove(id).await?;
    output::print_success(&format!("Deleted {} {}", spec.label, id), format);
    Ok(())
}

pub async fn diagnoses(console: &Console, patient: i64, format: &OutputFormat) -> Result<()> {
    console.require_session().await?;

    let diagnoses = DiagnosisClient::new(console.gateway.clone())
        .for_patient(patient)
        .await?;
    let rows: Vec<Value> = diagnoses
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    match format {
        OutputFormat::Json => output::print_json(&rows),
        OutputFormat::Text if rows.is_empty() => {
            println!("No diagnoses recorded for patient {}", patient)
        }
        OutputFormat::Text => print_rows(&schemas::DIAGNOSES, &rows.iter().collect::<Vec<_>>()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(data: Option<&str>, fields: &[&str]) -> Payload {
        Payload {
            data: data.map(str::to_string),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_accepts_aliases() {
        assert_eq!(resolve("blood-types").unwrap().name, "bloodTypes");
        let err = resolve("vaccines").unwrap_err().to_string();
        assert!(err.contains("known: owners"));
    }

    #[test]
    fn test_parse_fields() {
        let form = parse_fields(&["fullName=Jane Doe".to_string(), "email=".to_string()]).unwrap();
        assert_eq!(form.get("fullName").map(String::as_str), Some("Jane Doe"));
        assert_eq!(form.get("email").map(String::as_str), Some(""));

        assert!(parse_fields(&["fullName".to_string()]).is_err());
        assert!(parse_fields(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_raw_data_must_be_an_object() {
        let body = payload(Some(r#"{"name":"Cat"}"#), &[]).body(&catalog::SPECIES).unwrap();
        assert_eq!(body, json!({ "name": "Cat" }));

        assert!(payload(Some("[1,2]"), &[]).body(&catalog::SPECIES).is_err());
        assert!(payload(Some("{oops"), &[]).body(&catalog::SPECIES).is_err());
    }

    #[test]
    fn test_fields_are_validated_with_the_form_schema() {
        let body = payload(None, &["fullName=Jane Doe", "phone=555-0100"])
            .body(&catalog::OWNERS)
            .unwrap();
        assert_eq!(
            body,
            json!({ "fullName": "Jane Doe", "phone": "555-0100", "email": "", "address": "" })
        );

        let err = payload(None, &["fullName=Jane Doe", "email=nope"])
            .body(&catalog::OWNERS)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("phone: Phone is required"));
        assert!(message.contains("email: Enter a valid email address"));
    }

    #[test]
    fn test_fields_need_a_schema() {
        let err = payload(None, &["dosage=5ml"])
            .body(&catalog::PRESCRIPTIONS)
            .unwrap_err();
        assert!(err.to_string().contains("use --data"));
    }
}
