//! `blob`: pack a file or folder into a blob container.

use std::fs;
use std::path::Path;

use anyhow::Context;
use nobrain_pack::blob::pack_path;
use tracing::debug;

use crate::output::StyledOutput;

pub fn execute(input: &Path, out_path: &Path, output: &mut StyledOutput) -> anyhow::Result<()> {
    let meta = fs::symlink_metadata(input)
        .with_context(|| format!("cannot find input path '{}'", input.display()))?;

    let blob = pack_path(input).with_context(|| {
        if meta.is_dir() {
            "unable to traverse input directory"
        } else {
            "unable to read input file"
        }
    })?;
    blob.write_to_path(out_path)
        .context("unable to write output file")?;

    debug!(
        output = %out_path.display(),
        entries = blob.item_count(),
        bytes = blob.data_len(),
        "wrote blob"
    );
    output.success("Packed");
    output.plain(&format!(
        " {} entries ({} bytes) into ",
        blob.item_count(),
        blob.data_len()
    ));
    output.info(&out_path.display().to_string());
    output.newline();
    output.flush();
    Ok(())
}
