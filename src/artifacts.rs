//! Artifact packaging
//!
//! Bundles the outputs of a training run (the model input spec, the fitted
//! encoding table, and the selected model) into a single zip archive for
//! download. Staging files are removed after zipping; failure to remove them
//! is reported as a warning and never masks a successful run.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::modelspec::ModelInputSpec;
use crate::preprocessing::EncodingTable;
use crate::training::SelectedModel;

const SPEC_FILE: &str = "model_inputs.json";
const ENCODERS_FILE: &str = "encoders.json";
const MODEL_FILE: &str = "model.json";
const PACKAGE_FILE: &str = "model_package.zip";

/// Write the three artifact files and zip them into `model_package.zip`
/// under `out_dir`. Returns the archive path.
pub fn write_package(
    out_dir: &Path,
    spec: &ModelInputSpec,
    encoders: &EncodingTable,
    model: &dyn SelectedModel,
) -> Result<PathBuf> {
    let staging = out_dir.join("artifacts");
    fs::create_dir_all(&staging)?;

    let model_doc = serde_json::json!({
        "model": model.name(),
        "parameters": model.to_json()?,
    });

    let entries: [(&str, String); 3] = [
        (SPEC_FILE, serde_json::to_string_pretty(spec)?),
        (ENCODERS_FILE, serde_json::to_string_pretty(encoders)?),
        (MODEL_FILE, serde_json::to_string_pretty(&model_doc)?),
    ];

    for (name, content) in &entries {
        fs::write(staging.join(name), content)?;
    }

    let package_path = out_dir.join(PACKAGE_FILE);
    let file = File::create(&package_path)?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in &entries {
        archive.start_file(*name, options)?;
        archive.write_all(content.as_bytes())?;
    }
    archive.finish()?;

    cleanup_staging(&staging);

    Ok(package_path)
}

/// Best-effort removal of the staging directory. Never fails the run.
fn cleanup_staging(staging: &Path) {
    for name in [SPEC_FILE, ENCODERS_FILE, MODEL_FILE] {
        if let Err(e) = fs::remove_file(staging.join(name)) {
            warn!("cleanup failed for {}: {}", name, e);
        }
    }
    if let Err(e) = fs::remove_dir(staging) {
        warn!("cleanup failed for staging directory: {}", e);
    }
}
