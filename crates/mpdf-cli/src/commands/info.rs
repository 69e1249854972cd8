use super::{heading, json_pretty, EXIT_SUCCESS};
use mpdf_container::{manifest_of, read_container};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct EntryInfo<'a> {
    name: &'a str,
    size: usize,
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

pub fn run(file: &Path, json: bool) -> Result<u8, String> {
    let container = read_container(file).map_err(|e| e.to_string())?;
    let manifest = manifest_of(&container).map_err(|e| e.to_string())?;
    let entries: Vec<EntryInfo<'_>> = container
        .iter()
        .map(|(name, data)| EntryInfo {
            name,
            size: data.len(),
        })
        .collect();

    if json {
        let payload = serde_json::json!({
            "manifest": manifest,
            "entries": entries,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    let page = &manifest.page;
    let ai = &manifest.ai;
    println!("{}", heading(&manifest.title));
    println!("format:       {}", manifest.format_version);
    println!("author:       {}", or_none(&manifest.author));
    println!("description:  {}", or_none(&manifest.description));
    println!("created:      {}", manifest.created);
    println!("modified:     {}", manifest.modified);
    println!("language:     {}", manifest.language);
    println!("theme:        {}", manifest.theme);
    println!(
        "tags:         {}",
        if manifest.tags.is_empty() {
            "(none)".to_owned()
        } else {
            manifest.tags.join(", ")
        }
    );
    println!(
        "page:         {} {} (margins {}/{}/{}/{} mm)",
        page.size,
        page.orientation,
        page.margins.top,
        page.margins.bottom,
        page.margins.left,
        page.margins.right
    );
    println!();
    println!("{}", heading("Document"));
    println!("words:        {}", ai.word_count);
    println!("headings:     {}", ai.heading_count);
    println!("tables:       {}", ai.table_count);
    println!("code blocks:  {}", ai.code_block_count);
    println!("images:       {}", ai.image_count);
    println!("detected:     {}", ai.language_detected);
    println!("content hash: {}", ai.content_hash);
    println!();
    println!("{}", heading("Entries"));
    for entry in &entries {
        println!("  {:<32} {:>10} bytes", entry.name, entry.size);
    }
    Ok(EXIT_SUCCESS)
}
