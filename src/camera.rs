use anyhow::{anyhow, Context, Result};
use colored::*;
use image::RgbImage;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use tracing::info;

pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn new(index: u32) -> Result<Self> {
        let cam_index = CameraIndex::Index(index);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera =
            Camera::new(cam_index, requested).context("Failed to create camera instance")?;

        camera
            .open_stream()
            .map_err(|e| anyhow!(e))
            .context("Failed to open camera stream")?;

        println!("{}", format!("Opened camera: {}", camera.info().human_name()).green());
        info!("Camera format: {}", camera.camera_format());

        Ok(Self { camera })
    }

    pub fn capture(&mut self) -> Result<RgbImage> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow!(e))
            .context("Failed to get frame")?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow!(e))
            .context("Failed to decode frame")?;
        Ok(decoded)
    }

    pub fn width(&self) -> u32 {
        self.camera.resolution().width()
    }

    pub fn height(&self) -> u32 {
        self.camera.resolution().height()
    }
}

/// Print the attached cameras as a table.
pub fn list_cameras() -> Result<()> {
    let cameras = nokhwa::query(ApiBackend::Auto)
        .map_err(|e| anyhow!(e))
        .context("Failed to query cameras")?;
    println!("{}", "Available Cameras:".bold());
    println!("{:<5} | {:<30} | {:<10}", "Index", "Name", "Misc");
    println!("{}", "-".repeat(60));
    for cam in cameras {
        println!("{:<5} | {:<30} | {:?}", cam.index(), cam.human_name(), cam.misc());
    }
    Ok(())
}
