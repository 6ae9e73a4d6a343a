//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use loadcell_core::error::{BuildError, CoreError, RegisterError};

    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return match ce {
            CoreError::Timeout => format!(
                "What happened: The load cells did not deliver data in time ({err}).\nLikely causes: DOUT/DRDY not wired, converter unpowered or held in power-down, or --timeout-ms too low.\nHow to fix: Check the drdy_pin and cs_pin values and supply, then raise --timeout-ms or polling.timeout_ms."
            ),
            CoreError::HardwareFault(msg) => format!(
                "What happened: The SPI bus or a GPIO reported a fault ({msg}).\nLikely causes: Wrong pin numbers, SPI disabled, or missing permissions on /dev/spidev* and /dev/gpiomem.\nHow to fix: Enable SPI, fix [[cells]] pins, and run with access to the SPI and GPIO devices."
            ),
            CoreError::Bus(msg) => format!(
                "What happened: A bus transaction failed ({msg}).\nLikely causes: Loose wiring or a second device driving the bus.\nHow to fix: Re-run with --log-level=debug to see the failing transfer."
            ),
        };
    }

    if let Some(RegisterError::Full { max }) = err.downcast_ref::<RegisterError>() {
        return format!(
            "What happened: More cells were configured than the scheduler accepts (max {max}).\nLikely causes: Extra [[cells]] entries or a low sampling.max_cells.\nHow to fix: Remove cells or raise sampling.max_cells (at most 15)."
        );
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid cell parameters ({be}).\nLikely causes: Missing or non-positive capacity/sensitivity in [[cells]].\nHow to fix: Edit the config file, then rerun."
        );
    }

    if let Some(te) = err.downcast_ref::<toml::de::Error>() {
        return format!(
            "What happened: The config file is not valid TOML for this tool.\nLikely causes: A typo, a missing required key (capacity, sensitivity), or a wrong value type.\nHow to fix: Compare against etc/loadcell.toml. Parser said: {}",
            te.message()
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass an existing file with --config. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid or incomplete ({msg}).\nLikely causes: Missing [[cells]], or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    if lower.contains("loadcell_sim_raw") {
        return format!(
            "What happened: The simulated raw value is not usable ({msg}).\nHow to fix: Set LOADCELL_SIM_RAW to a signed integer, or unset it."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 timeout, 4 hardware/bus fault, 5 too many cells, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use loadcell_core::error::{CoreError, RegisterError};
    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return match ce {
            CoreError::Timeout => 3,
            CoreError::HardwareFault(_) | CoreError::Bus(_) => 4,
        };
    }
    if err.downcast_ref::<RegisterError>().is_some() {
        return 5;
    }
    1
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    use loadcell_core::error::{BuildError, CoreError, RegisterError};
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::Timeout) => "Timeout",
        Some(CoreError::HardwareFault(_)) => "HardwareFault",
        Some(CoreError::Bus(_)) => "Bus",
        None if err.downcast_ref::<RegisterError>().is_some() => "TooManyCells",
        None if err.downcast_ref::<BuildError>().is_some() => "InvalidCell",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
