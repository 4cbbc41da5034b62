use std::io;
use std::path::PathBuf;

use crate::capture::Region;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen capture is unavailable: {0}")]
    PlatformUnavailable(String),

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Region {region} is not inside the {screen_width}x{screen_height} screen")]
    InvalidRegion {
        region: Region,
        screen_width: u32,
        screen_height: u32,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write image {}: {source}", path.display())]
    EncodingFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
