use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::annotate::Annotator;
use crate::detector::Detector;
use crate::error::Error;
use crate::frame::Frame;
use crate::meter::FpsMeter;
use crate::palette::{ColorSource, RandomColors};

/// Produces frames, one per loop iteration.
pub trait FrameSource {
    type Frame: Frame;

    /// `Ok(None)` when no frame could be read.
    fn read(&mut self) -> Result<Option<Self::Frame>, Error>;

    fn release(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Shows annotated frames and reports key presses.
pub trait Display<F: ?Sized> {
    fn show(&mut self, frame: &F) -> Result<(), Error>;

    /// Waits briefly for a key press.
    fn poll_key(&mut self) -> Result<Option<char>, Error>;

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CaptureFailed,
    QuitKey,
    Interrupted,
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Shown { annotations: usize, quit: bool },
    Skipped,
    CaptureFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub skipped: u64,
    pub annotations: u64,
    pub reason: StopReason,
}

/// Capture, detect, annotate and display, owning every resource the loop touches.
pub struct Session<S, D, V, C = RandomColors> {
    source: S,
    detector: D,
    display: V,
    annotator: Annotator<C>,
    meter: FpsMeter,
    quit_key: char,
}

impl<S, D, V, C> Session<S, D, V, C>
where
    S: FrameSource,
    D: Detector<S::Frame>,
    V: Display<S::Frame>,
    C: ColorSource,
{
    pub fn new(source: S, detector: D, display: V, annotator: Annotator<C>, quit_key: char) -> Self {
        Self {
            source,
            detector,
            display,
            annotator,
            meter: FpsMeter::default(),
            quit_key,
        }
    }

    pub fn with_meter(mut self, meter: FpsMeter) -> Self {
        self.meter = meter;
        self
    }

    #[inline]
    pub fn annotator(&self) -> &Annotator<C> {
        &self.annotator
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    #[inline]
    pub fn display(&self) -> &V {
        &self.display
    }

    /// Runs one iteration. Model and display failures propagate.
    pub fn step(&mut self) -> Result<Step, Error> {
        let mut frame = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                error!("can't receive frame from video stream");
                return Ok(Step::CaptureFailed);
            }
            Err(err) => {
                error!("can't receive frame from video stream: {}", err);
                return Ok(Step::CaptureFailed);
            }
        };

        if frame.is_empty() {
            warn!("skipping empty frame {:?}", frame.dimensions());
            return Ok(Step::Skipped);
        }

        let detections = self.detector.detect(&frame)?;
        let annotations =
            self.annotator
                .annotate(&mut frame, &detections, self.detector.class_names())?;

        self.display.show(&frame)?;

        if let Some(fps) = self.meter.tick(Instant::now()) {
            debug!("{:.1} fps", fps);
        }

        let quit = self.display.poll_key()? == Some(self.quit_key);

        Ok(Step::Shown { annotations, quit })
    }

    /// Loops until capture fails, the quit key is pressed or `stop` is raised.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunSummary, Error> {
        let mut frames = 0;
        let mut skipped = 0;
        let mut total = 0;

        let reason = loop {
            if stop.load(Ordering::Relaxed) {
                break StopReason::Interrupted;
            }

            match self.step()? {
                Step::Shown { annotations, quit } => {
                    frames += 1;
                    total += annotations as u64;

                    if quit {
                        break StopReason::QuitKey;
                    }
                }
                Step::Skipped => skipped += 1,
                Step::CaptureFailed => break StopReason::CaptureFailed,
            }
        };

        let summary = RunSummary {
            frames,
            skipped,
            annotations: total,
            reason,
        };

        info!(
            "stopped ({:?}) after {} frames, {} skipped, {} boxes drawn",
            summary.reason, summary.frames, summary.skipped, summary.annotations
        );

        Ok(summary)
    }

    /// Releases the capture device and closes the display.
    pub fn close(mut self) -> Result<(), Error> {
        let released = self.source.release();
        self.display.close()?;

        released
    }

    /// Runs until stopped, then closes. A run error wins over a close error,
    /// which is only logged in that case.
    pub fn finish(mut self, stop: &AtomicBool) -> Result<RunSummary, Error> {
        let summary = self.run(stop);

        match (summary, self.close()) {
            (Ok(summary), closed) => closed.map(|_| summary),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                error!("shutdown failed after loop error: {}", close_err);
                Err(err)
            }
        }
    }
}
