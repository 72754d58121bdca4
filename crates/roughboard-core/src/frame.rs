//! Damage tracking and frame scheduling.

/// Asks the host for one future frame callback.
///
/// In the browser this is `requestAnimationFrame`; the host answers by calling
/// [`Engine::on_frame`](crate::Engine::on_frame).
pub trait FrameScheduler {
    fn schedule_frame(&mut self);
}

impl<F: FnMut()> FrameScheduler for F {
    fn schedule_frame(&mut self) {
        self()
    }
}

/// Coalesces redraw requests into at most one pending frame.
pub struct FrameLoop {
    scheduler: Box<dyn FrameScheduler>,
    /// Scene changed since the last paint.
    dirty: bool,
    /// A frame callback has been requested and not yet delivered.
    pending: bool,
}

impl FrameLoop {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            dirty: false,
            pending: false,
        }
    }

    /// Mark damage. Schedules a frame only if none is pending.
    pub fn request_redraw(&mut self) {
        self.dirty = true;
        if !self.pending {
            self.pending = true;
            self.scheduler.schedule_frame();
        }
    }

    /// Start handling a delivered frame. Returns whether there is anything to paint.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = false;
        std::mem::take(&mut self.dirty)
    }

    /// Finish a frame, scheduling another if damage arrived meanwhile.
    pub fn end_frame(&mut self) {
        if self.dirty && !self.pending {
            self.pending = true;
            self.scheduler.schedule_frame();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("dirty", &self.dirty)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_loop() -> (FrameLoop, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let frames = FrameLoop::new(Box::new(move || counter.set(counter.get() + 1)));
        (frames, count)
    }

    #[test]
    fn test_requests_coalesce() {
        let (mut frames, count) = counting_loop();
        for _ in 0..5 {
            frames.request_redraw();
        }
        assert_eq!(count.get(), 1);
        assert!(frames.is_pending());
        assert!(frames.is_dirty());
    }

    #[test]
    fn test_frame_clears_damage() {
        let (mut frames, count) = counting_loop();
        frames.request_redraw();
        assert!(frames.begin_frame());
        frames.end_frame();
        assert!(!frames.is_pending());
        assert!(!frames.is_dirty());
        assert_eq!(count.get(), 1);

        // Spurious callback paints nothing
        assert!(!frames.begin_frame());
    }

    #[test]
    fn test_damage_during_frame_reschedules() {
        let (mut frames, count) = counting_loop();
        frames.request_redraw();
        assert!(frames.begin_frame());
        frames.request_redraw();
        frames.end_frame();
        assert_eq!(count.get(), 2);
        assert!(frames.is_pending());
    }

    #[test]
    fn test_request_after_frame_schedules_again() {
        let (mut frames, count) = counting_loop();
        frames.request_redraw();
        frames.begin_frame();
        frames.end_frame();
        frames.request_redraw();
        assert_eq!(count.get(), 2);
    }
}
