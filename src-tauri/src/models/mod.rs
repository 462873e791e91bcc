mod capture;
mod video;

pub use capture::{CameraFacing, CapturePayload};
pub use video::{CatalogEntry, HistoryItem, Source, VideoResult};

#[cfg(test)]
pub(crate) use video::sample_result;
