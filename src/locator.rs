//! Engine orchestration and the public locate operations.
//!
//! Sources are tried strictly in registration order; the first satisfying
//! match is returned and later sources are never consulted. A failing source
//! is logged and skipped - a single backend failure is never fatal to the
//! lookup - and "no match" is a normal outcome, not an error.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::{EngineKind, OcrSource, TokenCapture};
use crate::config::LocatorConfig;
use crate::diagnostics::{DiagEvent, DiagnosticsSink, NullSink};
use crate::error::LocateError;
use crate::geometry::{map_to_absolute, BoundingBox, Region};
use crate::line::aggregate;
use crate::matcher::{find_pair, match_lines, MatchTarget, TextTarget};

/// A resolved text location in absolute screen coordinates.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub bbox: BoundingBox,
    /// The target variant that satisfied the match.
    pub matched_variant: String,
    /// Which engine produced it.
    pub engine: EngineKind,
    /// Full text of the matched line as recognized.
    pub line_text: String,
}

/// Options for [`TextLocator::find_text`] and [`TextLocator::wait_for_text`].
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Minimum token confidence as a fraction in `[0, 1]`. Backend-native
    /// confidences (0-100) are divided by 100 before comparison.
    pub confidence: f32,
    /// Minimum similarity ratio for fuzzy matching.
    pub fuzz_threshold: f32,
    /// Canonicalize text before comparison; trimmed raw text otherwise.
    pub normalize: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            confidence: 0.8,
            fuzz_threshold: 0.8,
            normalize: true,
        }
    }
}

impl FindOptions {
    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            confidence: config.confidence_threshold,
            fuzz_threshold: config.fuzz_threshold,
            normalize: true,
        }
    }
}

/// Options for [`TextLocator::find_word_pair`].
#[derive(Debug, Clone)]
pub struct PairOptions {
    /// Maximum horizontal distance in pixels between the two words' left
    /// edges.
    pub max_gap_px: i32,
    /// Minimum token confidence on the backend-native 0-100 scale.
    pub min_confidence: f32,
}

impl Default for PairOptions {
    fn default() -> Self {
        Self {
            max_gap_px: 300,
            min_confidence: 30.0,
        }
    }
}

impl PairOptions {
    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            max_gap_px: config.pair_gap_px,
            min_confidence: config.pair_min_confidence,
        }
    }
}

/// Drives the configured OCR sources and resolves text targets to screen
/// regions.
pub struct TextLocator {
    engines: Vec<Box<dyn OcrSource>>,
    config: LocatorConfig,
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl TextLocator {
    /// Create a locator over sources in priority order.
    pub fn new(engines: Vec<Box<dyn OcrSource>>) -> Self {
        Self::with_config(engines, LocatorConfig::default())
    }

    pub fn with_config(engines: Vec<Box<dyn OcrSource>>, config: LocatorConfig) -> Self {
        Self {
            engines,
            config,
            diagnostics: Box::new(NullSink),
        }
    }

    /// Replace the diagnostics sink for this instance.
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Locate a text target on screen.
    ///
    /// Sources are tried in order; the first that yields a satisfying line
    /// wins. `Ok(None)` means every source was consulted and none matched.
    pub fn find_text(
        &self,
        target: &TextTarget,
        region: Option<&Region>,
        options: &FindOptions,
    ) -> Result<Option<MatchResult>, LocateError> {
        if let Some(r) = region {
            r.validate()?;
        }
        if !(0.0..=1.0).contains(&options.confidence) {
            return Err(LocateError::InvalidThreshold(options.confidence));
        }
        let target = MatchTarget::new(target, options.fuzz_threshold, options.normalize)?;
        let min_token_confidence = options.confidence * 100.0;

        let mut last_seen: Vec<String> = Vec::new();

        for engine in &self.engines {
            let Some(capture) = self.capture_from(engine.as_ref(), region) else {
                continue;
            };

            let lines = aggregate(
                &capture.tokens,
                min_token_confidence,
                self.config.line_gap_px,
            );
            debug!(
                engine = %engine.kind(),
                tokens = capture.tokens.len(),
                lines = lines.len(),
                "ocr pass complete"
            );

            if let Some(found) = match_lines(&lines, &target) {
                let bbox = self.to_screen(engine.kind(), found.bbox, region, &capture);
                return Ok(Some(MatchResult {
                    bbox,
                    matched_variant: found.matched_variant,
                    engine: engine.kind(),
                    line_text: found.line_text,
                }));
            }

            last_seen = lines.into_iter().map(|l| l.raw_text).collect();
        }

        self.diagnostics.record(DiagEvent::NoMatch {
            last_seen_lines: last_seen,
        });
        Ok(None)
    }

    /// Locate two words that co-occur on one visual line within a horizontal
    /// gap budget.
    pub fn find_word_pair(
        &self,
        region: Option<&Region>,
        left_word: &str,
        right_word: &str,
        options: &PairOptions,
    ) -> Result<Option<BoundingBox>, LocateError> {
        if let Some(r) = region {
            r.validate()?;
        }
        if options.max_gap_px <= 0 {
            return Err(LocateError::InvalidGap(options.max_gap_px));
        }
        for word in [left_word, right_word] {
            if word.trim().is_empty() {
                return Err(LocateError::EmptyPairWord(word.to_string()));
            }
        }

        for engine in &self.engines {
            let Some(capture) = self.capture_from(engine.as_ref(), region) else {
                continue;
            };

            let lines = aggregate(
                &capture.tokens,
                options.min_confidence,
                self.config.line_gap_px,
            );

            if let Some(bbox) = find_pair(&lines, left_word, right_word, options.max_gap_px) {
                return Ok(Some(self.to_screen(engine.kind(), bbox, region, &capture)));
            }
        }

        Ok(None)
    }

    /// Poll until the target appears or the deadline passes.
    ///
    /// Each iteration performs one full pass over the sources and then
    /// sleeps the configured poll interval. `Ok(false)` means timeout; the
    /// elapsed duration is reported to the diagnostics sink.
    pub fn wait_for_text(
        &self,
        target: &TextTarget,
        timeout: Duration,
        region: Option<&Region>,
        options: &FindOptions,
    ) -> Result<bool, LocateError> {
        let started = Instant::now();
        let deadline = started + timeout;

        loop {
            if self.find_text(target, region, options)?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(self.config.poll_interval());
        }

        let elapsed = started.elapsed();
        warn!(?elapsed, "timed out waiting for text");
        self.diagnostics.record(DiagEvent::Timeout {
            elapsed_ms: elapsed.as_millis() as u64,
        });
        Ok(false)
    }

    /// Locate a target from the config target library by name.
    pub fn find_named(
        &self,
        name: &str,
        region: Option<&Region>,
        options: &FindOptions,
    ) -> Result<Option<MatchResult>, LocateError> {
        let target = self
            .config
            .target(name)
            .ok_or_else(|| LocateError::UnknownTarget(name.to_string()))?;
        self.find_text(&target, region, options)
    }

    /// Run one source, recovering failures into a skipped engine.
    fn capture_from(&self, engine: &dyn OcrSource, region: Option<&Region>) -> Option<TokenCapture> {
        match engine.capture_tokens(region) {
            Ok(capture) => Some(capture),
            Err(err) => {
                warn!(engine = %engine.kind(), error = %err, "ocr source failed, trying next");
                self.diagnostics.record(DiagEvent::BackendFailed {
                    engine: engine.kind(),
                    message: err.to_string(),
                });
                None
            }
        }
    }

    fn to_screen(
        &self,
        engine: EngineKind,
        bbox: BoundingBox,
        region: Option<&Region>,
        capture: &TokenCapture,
    ) -> BoundingBox {
        if capture.scale_x <= 0.0 || capture.scale_y <= 0.0 {
            self.diagnostics.record(DiagEvent::DegenerateScale {
                engine,
                scale_x: capture.scale_x,
                scale_y: capture.scale_y,
            });
        }
        map_to_absolute(bbox, region, capture.scale_x, capture.scale_y)
    }
}
