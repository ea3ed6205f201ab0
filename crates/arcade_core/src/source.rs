use crate::error::CaptureError;

/// Something that hands out camera frames.
pub trait FrameSource {
    type Frame;

    /// The newest frame since the previous call, `Ok(None)` when nothing new
    /// arrived. An error means the source is gone for good.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>, CaptureError>;
}

/// Checks that an RGBA8 payload matches its advertised dimensions.
pub fn check_rgba(width: u32, height: u32, len: usize) -> Result<(), CaptureError> {
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(CaptureError::InvalidFrame { expected, actual: len });
    }
    Ok(())
}
