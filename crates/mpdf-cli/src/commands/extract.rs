use super::{json_pretty, EXIT_SUCCESS};
use mpdf_container::extract_markdown;
use std::io::Write;
use std::path::Path;

pub fn run(file: &Path, output: Option<&Path>, json: bool) -> Result<u8, String> {
    let content = extract_markdown(file).map_err(|e| e.to_string())?;

    match output {
        Some(dest) => {
            std::fs::write(dest, &content)
                .map_err(|e| format!("failed to write {}: {e}", dest.display()))?;
            if json {
                let payload = serde_json::json!({
                    "output": dest.display().to_string(),
                    "bytes": content.len(),
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                println!("wrote {} ({} bytes)", dest.display(), content.len());
            }
        }
        None if json => {
            let payload = serde_json::json!({ "content": content });
            println!("{}", json_pretty(&payload)?);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(EXIT_SUCCESS)
}
