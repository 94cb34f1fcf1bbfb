/// Duration probes.
///
/// [`FfprobeProbe`] runs the external `ffprobe` once per file and reads a
/// single number from its stdout. [`ContainerProbe`] is the in-process
/// fallback built on `symphonia`: no external tool needed, but it has to
/// open and parse every container itself and knows fewer formats.
use crate::config::ProbeConfig;
use crate::error::{ProbeError, ScanError, ScanResult};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use symphonia::core::codecs::CodecParameters;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, warn};

/// Something that can report a media file's playback length.
///
/// Implementations are shared by every worker thread, so they must be
/// `Send + Sync` and must not hold per-call mutable state.
pub trait DurationProbe: Send + Sync {
    /// Short name shown to the user.
    fn name(&self) -> &'static str;

    /// Checked once before any file is dispatched. `Err` carries the reason
    /// the probe cannot run at all.
    fn check_available(&self) -> Result<(), String> {
        Ok(())
    }

    /// Duration of one file in seconds.
    fn probe(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// Arguments asking `ffprobe` for the container duration as a bare number.
const FFPROBE_ARGS: &[&str] = &[
    "-v",
    "error",
    "-show_entries",
    "format=duration",
    "-of",
    "default=noprint_wrappers=1:nokey=1",
];

/// Runs the `ffprobe` executable.
#[derive(Debug)]
pub struct FfprobeProbe {
    program: PathBuf,
    available: OnceLock<Result<(), String>>,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            available: OnceLock::new(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run_version(&self) -> Result<(), String> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("cannot run {}: {e}", self.program.display()))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} -version exited with {status}", self.program.display()))
        }
    }
}

impl DurationProbe for FfprobeProbe {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn check_available(&self) -> Result<(), String> {
        self.available.get_or_init(|| self.run_version()).clone()
    }

    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.program)
            .args(FFPROBE_ARGS)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProbeError::Spawn {
                tool: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::ExitStatus {
                status: output.status.to_string(),
                stderr: stderr
                    .lines()
                    .rev()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("no error output")
                    .trim()
                    .to_string(),
            });
        }

        parse_duration_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `ffprobe`'s bare duration output. The first non-empty line must be
/// a finite, non-negative number; `N/A` and anything else is an error.
pub fn parse_duration_output(stdout: &str) -> Result<f64, ProbeError> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty());
    match line.map(str::parse::<f64>) {
        Some(Ok(secs)) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(ProbeError::Parse {
            output: stdout.trim().to_string(),
        }),
    }
}

/// In-process fallback reading track lengths from the container headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerProbe;

impl DurationProbe for ContainerProbe {
    fn name(&self) -> &'static str {
        "container reader"
    }

    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let file = File::open(path)
            .map_err(|e| ProbeError::Decode(format!("failed to open file: {e}")))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(&ext.to_string_lossy());
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| ProbeError::Decode(format!("unsupported container: {e}")))?;

        // The longest track is the playback length of the whole file.
        probed
            .format
            .tracks()
            .iter()
            .filter_map(|t| track_seconds(&t.codec_params))
            .fold(None, |longest: Option<f64>, secs| {
                Some(longest.map_or(secs, |l| l.max(secs)))
            })
            .ok_or_else(|| ProbeError::Decode("no track reports a duration".into()))
    }
}

fn track_seconds(params: &CodecParameters) -> Option<f64> {
    let n_frames = params.n_frames?;
    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        return Some(time.seconds as f64 + time.frac);
    }
    let rate = params.sample_rate.filter(|r| *r > 0)?;
    Some(n_frames as f64 / f64::from(rate))
}

/// Pick the probe for a run: `ffprobe` when it can be executed, otherwise
/// the container reader if the configuration allows it.
pub fn select_probe(config: &ProbeConfig) -> ScanResult<Box<dyn DurationProbe>> {
    let ffprobe = FfprobeProbe::new(config.ffprobe.clone());
    match ffprobe.check_available() {
        Ok(()) => {
            debug!("Using ffprobe at {}", ffprobe.program().display());
            Ok(Box::new(ffprobe))
        }
        Err(detail) if config.allow_fallback => {
            warn!("{detail}; falling back to the built-in container reader");
            info!("The container reader is slower and supports fewer formats than ffprobe");
            Ok(Box::new(ContainerProbe))
        }
        Err(detail) => Err(ScanError::ProbeUnavailable {
            detail: format!(
                "{detail}. Install FFmpeg and put ffprobe on PATH, or enable the fallback reader"
            ),
        }),
    }
}
