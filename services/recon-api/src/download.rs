//! Save actions for observations and their plots.

use serde::Serialize;

use recon_common::{Observation, ReconError, ReconResult};
use recon_render::{ImageRef, ObservationImage, ObservationKey};

/// A pretty-printed observation ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationDownload {
    pub filename: String,
    pub body: String,
}

fn key(obs: &Observation) -> ReconResult<ObservationKey> {
    obs.basic_info
        .as_ref()
        .map(ObservationKey::from_basic_info)
        .ok_or_else(|| ReconError::InvalidParameter {
            param: "marker".to_string(),
            message: "observation has no basic_info".to_string(),
        })
}

/// The observation as `<Storm><Year>_<mission>_<obs>.json`.
pub fn observation_download(obs: &Observation) -> ReconResult<ObservationDownload> {
    let key = key(obs)?;
    Ok(ObservationDownload {
        filename: key.json_download_name(),
        body: obs.to_pretty_json()?,
    })
}

/// Where each plot can be fetched and the name it is saved under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDownloads {
    pub images: Vec<ImageRef>,
}

pub fn image_downloads(obs: &Observation) -> ReconResult<ImageDownloads> {
    Ok(ImageDownloads {
        images: ObservationImage::all_references(&key(obs)?),
    })
}

/// `Content-Disposition` value for an attachment.
pub fn attachment_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}
