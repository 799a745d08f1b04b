//! GPU object picking
//!
//! Clicking the viewport reads a node id back from the picking render
//! target. The readback is asynchronous, so a two-state machine decouples
//! the issuing frame from the resolving frame: the completion closure
//! (which may run on the renderer's thread) only decodes the pixel and
//! posts it into a channel the next poll drains. Requests cannot be
//! cancelled; a stale result is consumed last-write-wins.

use std::sync::mpsc::{channel, Receiver, Sender};

use engine::prelude::{
    InputState, ReadbackRequest, RenderBackend, Scene, PICKING_TARGET,
};
use tracing::{debug, trace};
use winit::event::MouseButton;

use crate::selection::{PickMode, SelectionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickPhase {
    Idle,
    AwaitingReadback,
}

/// Asynchronous picking state machine
pub struct Picking {
    phase: PickPhase,
    tx: Sender<u32>,
    rx: Receiver<u32>,
}

impl Default for Picking {
    fn default() -> Self {
        Self::new()
    }
}

impl Picking {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            phase: PickPhase::Idle,
            tx,
            rx,
        }
    }

    /// Whether a readback is in flight
    pub fn awaiting(&self) -> bool {
        self.phase == PickPhase::AwaitingReadback
    }

    /// Drive the state machine one frame.
    ///
    /// Arms a readback on a fresh left click inside the viewport while
    /// the UI is not capturing the mouse; resolves a completed readback
    /// into the selection exactly once.
    pub fn update(
        &mut self,
        scene: &Scene,
        selection: &mut SelectionSet,
        input: &InputState,
        ui_capture: bool,
        backend: &dyn RenderBackend,
        viewport: (u32, u32),
    ) {
        match self.phase {
            PickPhase::AwaitingReadback => {
                // Drain everything; a burst of stale results collapses to
                // the latest
                let mut result = None;
                while let Ok(index) = self.rx.try_recv() {
                    result = Some(index);
                }
                if let Some(index) = result {
                    debug!(index, "picking resolved");
                    selection.add(index, PickMode::from_input(input), scene.node_count());
                    self.phase = PickPhase::Idle;
                }
            }
            PickPhase::Idle => {
                if ui_capture || !input.button_pressed(MouseButton::Left) {
                    return;
                }

                let (mx, my) = input.mouse_position;
                if mx < 0.0 || my < 0.0 || mx >= viewport.0 as f32 || my >= viewport.1 as f32 {
                    return;
                }

                let Some(target) = backend.render_targets().get(PICKING_TARGET) else {
                    trace!("no picking render target, skipping pick");
                    return;
                };
                if target.is_zero_sized() {
                    trace!("picking render target is zero-sized, skipping pick");
                    return;
                }

                let block_size = target.block_size();
                let row_pitch = target.width * block_size;
                let buffer_size = row_pitch * target.height;

                let x = (mx as u32).min(target.width - 1);
                let y = (my as u32).min(target.height - 1);

                let tx = self.tx.clone();
                let on_complete = Box::new(move |data: &[u8], pitch: u32, block: u32| {
                    let offset = (y * pitch + x * block) as usize;
                    if let Some(bytes) = data.get(offset..offset + 4) {
                        let index = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                        let _ = tx.send(index);
                    }
                });

                backend.read_back_resource(
                    ReadbackRequest {
                        resource_handle: target.handle,
                        format: target.format,
                        row_pitch,
                        buffer_size,
                        block_size,
                        total_size: buffer_size,
                    },
                    on_complete,
                );

                debug!(x, y, "picking readback armed");
                self.phase = PickPhase::AwaitingReadback;
            }
        }
    }
}
