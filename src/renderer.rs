// SPDX-License-Identifier: GPL-3.0-only

//! Frame renderer: bounded conversion scheduling and display publication
//!
//! The conversion pipeline itself is synchronous and side-effect-free, so it
//! runs on whichever thread delivers the frame. This module adds the thin
//! policy layer around it:
//!
//! - an atomic counter bounds how many frames may be in conversion at once;
//!   excess frames are dropped, never queued,
//! - a bounded channel limits how many converted images may await
//!   publication; a full channel drops the image to keep display latency low,
//! - a dedicated publisher thread owns the display sink, so the sink only
//!   ever sees images from a single thread.
//!
//! Dropped frames are simply discarded; a conversion that has started always
//! runs to completion.

use crate::config::RendererConfig;
use crate::constants::DepthRangePreset;
use crate::convert::convert_frame;
use crate::frame::{DisplayImage, FrameView};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Receives converted images on the renderer's publisher thread
///
/// `publish` is only ever invoked from that one thread, satisfying sinks
/// with single-threaded affinity.
pub trait DisplaySink: Send + 'static {
    fn publish(&mut self, image: DisplayImage);
}

impl<F: FnMut(DisplayImage) + Send + 'static> DisplaySink for F {
    fn publish(&mut self, image: DisplayImage) {
        self(image)
    }
}

/// Snapshot of renderer frame accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames successfully converted
    pub converted: u64,
    /// Images handed to the display sink
    pub published: u64,
    /// Frames dropped because too many conversions were pending
    pub dropped_scheduled: u64,
    /// Images dropped because the publish queue was full
    pub dropped_publish: u64,
    /// Frames that produced no image (unsupported or malformed)
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    converted: AtomicU64,
    published: AtomicU64,
    dropped_scheduled: AtomicU64,
    dropped_publish: AtomicU64,
    failed: AtomicU64,
}

/// Converts incoming frames and publishes them to a display sink
///
/// The sensor profile is fixed at construction; frames may arrive from any
/// thread.
pub struct FrameRenderer {
    preset: DepthRangePreset,
    max_scheduled: u32,
    scheduled: AtomicU32,
    sender: Option<SyncSender<DisplayImage>>,
    publisher: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl FrameRenderer {
    /// Start a renderer publishing to the given sink
    pub fn new(config: &RendererConfig, mut sink: impl DisplaySink) -> Self {
        let preset = config.depth_range_preset();
        let capacity = config.max_publish_in_flight.max(1);
        let (sender, receiver) = mpsc::sync_channel::<DisplayImage>(capacity);
        let counters = Arc::new(Counters::default());
        let publisher_counters = Arc::clone(&counters);

        info!(
            profile = %config.sensor_profile,
            preset = preset.display_name(),
            max_scheduled = config.max_frames_scheduled,
            publish_capacity = capacity,
            "starting frame renderer"
        );

        let publisher = std::thread::spawn(move || {
            debug!("publisher thread started");
            while let Ok(image) = receiver.recv() {
                sink.publish(image);
                publisher_counters.published.fetch_add(1, Ordering::Relaxed);
            }
            debug!("publisher thread exiting");
        });

        Self {
            preset,
            max_scheduled: config.max_frames_scheduled.max(1),
            scheduled: AtomicU32::new(0),
            sender: Some(sender),
            publisher: Some(publisher),
            counters,
        }
    }

    /// Convert one frame and hand the result to the display sink
    ///
    /// Frames beyond the scheduling bound and images beyond the publish bound
    /// are dropped rather than queued. Conversion failures are contained; the
    /// renderer keeps processing subsequent frames.
    pub fn process_frame(&self, frame: &FrameView<'_>) {
        if self.scheduled.fetch_add(1, Ordering::SeqCst) >= self.max_scheduled {
            self.scheduled.fetch_sub(1, Ordering::SeqCst);
            self.counters.dropped_scheduled.fetch_add(1, Ordering::Relaxed);
            debug!("conversion backlog full, dropping frame");
            return;
        }

        let image = convert_frame(frame, self.preset);
        self.scheduled.fetch_sub(1, Ordering::SeqCst);

        let Some(image) = image else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            return;
        };
        self.counters.converted.fetch_add(1, Ordering::Relaxed);

        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        match sender.try_send(image) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.counters.dropped_publish.fetch_add(1, Ordering::Relaxed);
                debug!("publish queue full, dropping image");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("display sink disconnected");
            }
        }
    }

    /// Depth range preset resolved from the configured sensor profile
    pub fn depth_range_preset(&self) -> DepthRangePreset {
        self.preset
    }

    /// Current frame accounting
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            converted: self.counters.converted.load(Ordering::Relaxed),
            published: self.counters.published.load(Ordering::Relaxed),
            dropped_scheduled: self.counters.dropped_scheduled.load(Ordering::Relaxed),
            dropped_publish: self.counters.dropped_publish.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for FrameRenderer {
    fn drop(&mut self) {
        // Closing the channel lets the publisher drain and exit.
        drop(self.sender.take());
        if let Some(handle) = self.publisher.take() {
            debug!("waiting for publisher thread to finish");
            if handle.join().is_err() {
                warn!("publisher thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::sensor_names;
    use crate::frame::{RawPixelFormat, SourceKind};
    use std::sync::mpsc::Receiver;
    use std::sync::{Barrier, Mutex};

    fn depth_frame(data: &[u8]) -> FrameView<'_> {
        FrameView {
            kind: SourceKind::Depth,
            format: RawPixelFormat::Gray16,
            width: 2,
            height: 2,
            stride: 4,
            data,
        }
    }

    fn collecting_sink() -> (impl DisplaySink, Receiver<DisplayImage>) {
        let (tx, rx) = mpsc::channel();
        (
            move |image: DisplayImage| {
                let _ = tx.send(image);
            },
            rx,
        )
    }

    #[test]
    fn test_converted_frames_reach_sink() {
        let (sink, rx) = collecting_sink();
        let renderer = FrameRenderer::new(
            &RendererConfig::for_sensor(sensor_names::LONG_THROW),
            sink,
        );
        let data: Vec<u8> = [1000u16, 2000, 0, 4001]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        renderer.process_frame(&depth_frame(&data));

        let image = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        drop(renderer);
    }

    #[test]
    fn test_failed_conversion_publishes_nothing() {
        let (sink, rx) = collecting_sink();
        let renderer = FrameRenderer::new(&RendererConfig::default(), sink);
        let frame = FrameView {
            kind: SourceKind::Depth,
            format: RawPixelFormat::Bgra8, // unsupported for depth
            width: 2,
            height: 2,
            stride: 8,
            data: &[0u8; 16],
        };
        renderer.process_frame(&frame);
        drop(renderer);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_bound_drops_excess_images() {
        // A sink blocked on a mutex forces the publish queue to fill.
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();
        let sink_gate = Arc::clone(&gate);
        let sink = move |_image: DisplayImage| {
            let _unblocked = sink_gate.lock().unwrap();
        };

        let mut config = RendererConfig::for_sensor(sensor_names::SHORT_THROW);
        config.max_publish_in_flight = 1;
        let renderer = FrameRenderer::new(&config, sink);

        let data: Vec<u8> = [500u16, 600, 700, 800]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        // Enough frames to saturate one in-flight publish plus one queued.
        for _ in 0..8 {
            renderer.process_frame(&depth_frame(&data));
        }
        let stats = renderer.stats();
        assert_eq!(stats.converted, 8);
        assert!(stats.dropped_publish > 0, "expected drops, got {:?}", stats);

        drop(held);
        drop(renderer);
    }

    #[test]
    fn test_schedule_bound_drops_concurrent_frames() {
        let mut config = RendererConfig::for_sensor(sensor_names::LONG_THROW);
        config.max_frames_scheduled = 1;
        let renderer = Arc::new(FrameRenderer::new(&config, |_image: DisplayImage| {}));

        // Full-size frames keep each conversion in flight long enough for the
        // barrier-released threads to overlap on the scheduled counter.
        let data = Arc::new(vec![0u8; 1280 * 720 * 2]);
        let barrier = Arc::new(Barrier::new(4));
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let renderer = Arc::clone(&renderer);
                let barrier = Arc::clone(&barrier);
                let data = Arc::clone(&data);
                std::thread::spawn(move || {
                    for _ in 0..4 {
                        barrier.wait();
                        let frame = FrameView {
                            kind: SourceKind::Depth,
                            format: RawPixelFormat::Gray16,
                            width: 1280,
                            height: 720,
                            stride: 2560,
                            data: &data,
                        };
                        renderer.process_frame(&frame);
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        let stats = renderer.stats();
        assert!(stats.dropped_scheduled > 0, "expected drops, got {:?}", stats);
        // Every frame is accounted for: it either converted or was dropped.
        assert_eq!(stats.dropped_scheduled + stats.converted, 16);
    }

    #[test]
    fn test_stats_track_failures() {
        let renderer = FrameRenderer::new(&RendererConfig::default(), |_image: DisplayImage| {});
        let frame = FrameView {
            kind: SourceKind::Infrared,
            format: RawPixelFormat::Gray16,
            width: 100,
            height: 100,
            stride: 200,
            data: &[0u8; 64], // far too short
        };
        renderer.process_frame(&frame);
        assert_eq!(renderer.stats().failed, 1);
        assert_eq!(renderer.stats().converted, 0);
    }
}
