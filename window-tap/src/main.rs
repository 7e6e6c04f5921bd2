//! Reads raw native-endian f32 mono samples from stdin and reports the level
//! of the most recent audio every 100 ms until the stream ends, or until the
//! optional time limit runs out.
//!
//! Usage: `window-tap [--seconds N] [config.json] < samples.f32`

use std::fs;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use audio_window_core::{
    AnyQuit, CaptureConfiguration, CaptureController, CaptureError, EventGate, QuitFlag, StreamEndGate,
};

const STEP_MS: u64 = 100;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

struct Args {
    config_path: Option<String>,
    seconds: Option<u64>,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args, CaptureError> {
    let mut args = Args {
        config_path: None,
        seconds: None,
    };
    while let Some(arg) = it.next() {
        if arg == "--seconds" {
            let value = it
                .next()
                .ok_or_else(|| CaptureError::ConfigurationFailed("--seconds needs a value".into()))?;
            let seconds = value
                .parse()
                .map_err(|_| CaptureError::ConfigurationFailed(format!("invalid --seconds value '{}'", value)))?;
            args.seconds = Some(seconds);
        } else {
            args.config_path = Some(arg);
        }
    }
    Ok(args)
}

fn run() -> Result<(), CaptureError> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config_path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            CaptureConfiguration::from_json(&json)?
        }
        None => CaptureConfiguration::default(),
    };
    log::info!(
        "capturing {} Hz mono from stdin, keeping {} ms",
        config.sample_rate,
        config.window_ms
    );

    let controller = CaptureController::new(config);
    controller.init_stdin()?;
    controller.resume()?;

    let quit = QuitFlag::new();
    if let Some(seconds) = args.seconds {
        let handle = quit.handle();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            log::info!("time limit of {} s reached", seconds);
            handle.request_quit();
        });
    }

    let mut gate = AnyQuit::new(quit, StreamEndGate::new(&controller));
    while gate.poll() {
        let recent = controller.get(STEP_MS as i32)?;
        if !recent.is_empty() {
            log::info!("last {} samples: rms {:.4}", recent.len(), rms(&recent));
        }
        thread::sleep(Duration::from_millis(STEP_MS));
    }

    let window = controller.get(0)?;
    let diagnostics = controller.diagnostics();
    log::info!(
        "capture finished: window holds {} samples (rms {:.4}), {} written, {} dropped, {} reads",
        window.len(),
        rms(&window),
        diagnostics.samples_written,
        diagnostics.samples_dropped,
        diagnostics.stream_reads,
    );
    controller.pause()?;
    Ok(())
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CaptureError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_time_limit_and_config() {
        let parsed = args(&["--seconds", "5", "tap.json"]).unwrap();
        assert_eq!(parsed.seconds, Some(5));
        assert_eq!(parsed.config_path.as_deref(), Some("tap.json"));

        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.seconds, None);
        assert_eq!(parsed.config_path, None);
    }

    #[test]
    fn rejects_bad_time_limit() {
        assert!(matches!(args(&["--seconds"]), Err(CaptureError::ConfigurationFailed(_))));
        assert!(matches!(args(&["--seconds", "soon"]), Err(CaptureError::ConfigurationFailed(_))));
    }

    #[test]
    fn rms_of_constant_signal() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5]) - 0.5).abs() < 1e-6);
    }
}
