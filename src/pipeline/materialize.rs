use std::io::Cursor;

use anyhow::anyhow;
use docx_rs::{Docx, Paragraph, Run};

/// Serializes rewritten text into a Word document: one paragraph per line,
/// in order, empty lines becoming empty paragraphs so the visual structure
/// survives. Returns the complete document bytes; persisting them is the
/// store's job.
pub fn materialize_docx(text: &str) -> anyhow::Result<Vec<u8>> {
    let mut docx = Docx::new();
    for line in text.split('\n') {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| anyhow!("failed to serialize Word document: {}", e))?;
    Ok(buffer.into_inner())
}
