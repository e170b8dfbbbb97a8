use std::path::PathBuf;

use clap::{ArgGroup, Args};

use scrapfly_core::ExtractionConfig;

use super::{Connection, runtime, spinner};
use crate::error::CliError;

#[derive(Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["prompt", "model", "template"])))]
pub(crate) struct ExtractArgs {
    /// Document to extract from
    file: PathBuf,

    /// MIME type of the document (e.g., text/html, application/json)
    #[arg(long)]
    content_type: String,

    /// Free-form instruction for LLM extraction
    #[arg(long)]
    prompt: Option<String>,

    /// Predefined extraction model (e.g., product, article, review_list)
    #[arg(long)]
    model: Option<String>,

    /// Name of a saved extraction template
    #[arg(long)]
    template: Option<String>,

    /// Original URL of the document
    #[arg(long)]
    url: Option<String>,
}

impl ExtractArgs {
    fn to_config(&self, body: Vec<u8>) -> ExtractionConfig {
        ExtractionConfig {
            url: self.url.clone(),
            extraction_prompt: self.prompt.clone(),
            extraction_model: self.model.clone(),
            extraction_template: self.template.clone(),
            ..ExtractionConfig::new(body, self.content_type.as_str())
        }
    }
}

/// Run the extract command. Prints the extracted data as JSON.
pub(crate) fn run_extract(conn: &Connection, args: ExtractArgs) -> Result<(), CliError> {
    let body = std::fs::read(&args.file)?;
    log::debug!("Read {} bytes from {}", body.len(), args.file.display());
    let config = args.to_config(body);
    let client = conn.client()?;

    let pb = spinner(format!("Extracting from {}...", args.file.display()), conn.quiet);
    let rt = runtime()?;
    let result = rt.block_on(client.extract(&config));
    pb.finish_and_clear();
    let result = result?;

    let json = serde_json::to_string_pretty(&result.data)
        .map_err(|e| CliError::other(format!("Failed to format result: {e}")))?;
    // Data goes to stdout even in quiet mode.
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_config() {
        let args = ExtractArgs {
            file: PathBuf::from("page.html"),
            content_type: "text/html".into(),
            prompt: None,
            model: Some("product".into()),
            template: None,
            url: Some("https://web-scraping.dev/product/1".into()),
        };
        let config = args.to_config(b"<html></html>".to_vec());
        assert_eq!(config.extraction_model.as_deref(), Some("product"));
        assert_eq!(config.extraction_prompt, None);
        assert_eq!(config.content_type, "text/html");
        assert_eq!(config.body, b"<html></html>");
    }
}
