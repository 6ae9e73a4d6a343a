use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("spi transfer failed: {0}")]
    Spi(String),
    #[error("pin error: {0}")]
    Pin(String),
    #[error("bus opened as {opened} but transaction requested {requested}")]
    ProfileMismatch { opened: String, requested: String },
    #[error("simulated bus fault")]
    SimulatedFault,
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    #[error("gpio error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    #[error("open spi: {0}")]
    SpiOpen(#[from] rppal::spi::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
