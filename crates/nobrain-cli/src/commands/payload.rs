//! `payload`: append a data file to an executable.

use std::path::Path;

use anyhow::Context;
use nobrain_pack::payload::append_payload;
use tracing::debug;

use crate::output::StyledOutput;

/// Append `data` to `exe` and write the result to `out_path`, which may be
/// `exe` itself.
pub fn execute(
    exe: &Path,
    data: &Path,
    out_path: &Path,
    output: &mut StyledOutput,
) -> anyhow::Result<()> {
    let summary = append_payload(exe, data, out_path).with_context(|| {
        format!(
            "unable to append '{}' to '{}'",
            data.display(),
            exe.display()
        )
    })?;

    debug!(
        output = %out_path.display(),
        data_start = summary.data_start,
        data_len = summary.data_len,
        "appended payload"
    );
    output.success("Appended");
    output.plain(&format!(" {} bytes at offset {} to ", summary.data_len, summary.data_start));
    output.info(&out_path.display().to_string());
    output.newline();
    output.flush();
    Ok(())
}
