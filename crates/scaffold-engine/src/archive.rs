//! Zip packaging of rendered output

use crate::render::RenderedOutput;
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Pack `output` into an in-memory zip with every entry under `{root}/`.
///
/// Entries are written in path order so the same output always yields the
/// same entry sequence.
pub fn write_zip(root: &str, output: &RenderedOutput) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (path, content) in output {
            let entry = format!("{}/{}", root, path);
            zip.start_file(&entry, options)
                .with_context(|| format!("Failed to add {} to archive", entry))?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish().context("Failed to finish archive")?;
    }
    Ok(buffer)
}
