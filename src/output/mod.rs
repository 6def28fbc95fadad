use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcribe::SubtitleResult;

pub mod formatters;

pub use formatters::*;

/// Save a subtitle result to file
pub async fn save_to_file(
    result: &SubtitleResult,
    path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let content = match format {
        OutputFormat::Text => format_as_text(result),
        OutputFormat::Json => format_as_json(result)?,
        OutputFormat::Srt => format_as_srt(result),
        OutputFormat::Vtt => format_as_vtt(result),
    };

    fs_err::write(path, content)?;
    Ok(())
}

/// Print a subtitle result to the console
pub fn print_to_console(result: &SubtitleResult, format: &OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Text => format_as_text(result),
        OutputFormat::Json => format_as_json(result)?,
        OutputFormat::Srt => format_as_srt(result),
        OutputFormat::Vtt => format_as_vtt(result),
    };

    println!("{}", content);
    Ok(())
}
