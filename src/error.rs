use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("frame request was refused: {0}")]
    FrameRequest(String),

    #[error("frame scheduler has no callback attached")]
    SchedulerDetached,

    #[error("frame rate must be a positive finite number, got {0}")]
    InvalidFrameRate(f64),

    #[error("frame loop has already stopped")]
    LoopStopped,

    #[error("frame loop task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
