//! The rendering collaborator's side of the per-tick contract.
//!
//! The driver never draws. It hands grid positions and evaluated frames to a
//! [`RenderSink`], which owns whatever GPU or host buffers the embedding uses.
//! The trait is **object-safe** so hosts can swap sinks behind `dyn RenderSink`.

use crate::frame::FieldFrame;
use crate::grid::Grid;

/// Receives buffers from the animation driver.
pub trait RenderSink {
    /// Called whenever the grid is regenerated, before the next frame.
    fn submit_positions(&mut self, grid: &Grid);

    /// Called once per tick with the freshly evaluated frame.
    fn submit_frame(&mut self, frame: &FieldFrame);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn submit_positions(&mut self, grid: &Grid) {
        (**self).submit_positions(grid);
    }

    fn submit_frame(&mut self, frame: &FieldFrame) {
        (**self).submit_frame(frame);
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn submit_positions(&mut self, grid: &Grid) {
        (**self).submit_positions(grid);
    }

    fn submit_frame(&mut self, frame: &FieldFrame) {
        (**self).submit_frame(frame);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn submit_positions(&mut self, _grid: &Grid) {}

    fn submit_frame(&mut self, _frame: &FieldFrame) {}
}

/// Keeps the latest position, size and intensity buffers as `f32`.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    positions: Vec<f32>,
    sizes: Vec<f32>,
    intensities: Vec<f32>,
    position_uploads: usize,
    frames: usize,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// xyz triples of the current grid.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Dot sizes of the latest frame.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Normalized intensities of the latest frame.
    pub fn intensities(&self) -> &[f32] {
        &self.intensities
    }

    /// How many times positions have been submitted.
    pub fn position_uploads(&self) -> usize {
        self.position_uploads
    }

    /// How many frames have been submitted.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl RenderSink for BufferSink {
    fn submit_positions(&mut self, grid: &Grid) {
        grid.write_positions(&mut self.positions);
        self.position_uploads += 1;
    }

    fn submit_frame(&mut self, frame: &FieldFrame) {
        frame.write_f32(&mut self.sizes);
        self.intensities.clear();
        self.intensities
            .extend(frame.intensities().iter().map(|&v| v as f32));
        self.frames += 1;
    }
}
