//! Frame scheduling
//!
//! The loop is a chain of one-shot callbacks: each frame asks the scheduler
//! for the next one only while the driver reports it is still running.
//! Nothing here owns a thread or a timer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Callback invoked with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host primitive for "call me on the next frame"
pub trait FrameScheduler {
    fn request_next_frame(&self, callback: FrameCallback);
}

/// Something that does one frame of work
pub trait FrameDriver {
    /// Run one frame; return true to keep the loop going
    fn on_frame(&mut self, time_ms: f64) -> bool;
}

/// Schedule `driver` on the next frame, rescheduling itself while it runs
pub fn run_loop<D>(driver: Rc<RefCell<D>>, scheduler: Rc<dyn FrameScheduler>)
where
    D: FrameDriver + 'static,
{
    let next = scheduler.clone();
    scheduler.request_next_frame(Box::new(move |time_ms| {
        let keep_going = driver.borrow_mut().on_frame(time_ms);
        if keep_going {
            run_loop(driver, next);
        }
    }));
}

/// Queue of pending frame callbacks fired by hand (native runs and tests)
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<VecDeque<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire every callback queued before this call; returns how many ran.
    /// Callbacks queued while firing wait for the next call.
    pub fn fire(&self, time_ms: f64) -> usize {
        let due: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let count = due.len();
        for callback in due {
            callback(time_ms);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_next_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}

/// `window.requestAnimationFrame` (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct AnimationFrameScheduler;

#[cfg(target_arch = "wasm32")]
impl FrameScheduler for AnimationFrameScheduler {
    fn request_next_frame(&self, callback: FrameCallback) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            log::error!("no window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| callback(time));
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed, frame loop stopped");
        }
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: u32,
        frames: Vec<f64>,
    }

    impl FrameDriver for Countdown {
        fn on_frame(&mut self, time_ms: f64) -> bool {
            self.frames.push(time_ms);
            self.left -= 1;
            self.left > 0
        }
    }

    #[test]
    fn test_loop_stops_when_driver_stops() {
        let scheduler = Rc::new(ManualScheduler::new());
        let driver = Rc::new(RefCell::new(Countdown {
            left: 3,
            frames: Vec::new(),
        }));
        run_loop(driver.clone(), scheduler.clone());

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.fire(16.0), 1);
        assert_eq!(scheduler.fire(32.0), 1);
        assert_eq!(scheduler.fire(48.0), 1);
        // Driver returned false on the third frame
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.fire(64.0), 0);
        assert_eq!(driver.borrow().frames, vec![16.0, 32.0, 48.0]);
    }

    #[test]
    fn test_one_frame_per_fire() {
        let scheduler = Rc::new(ManualScheduler::new());
        let driver = Rc::new(RefCell::new(Countdown {
            left: 100,
            frames: Vec::new(),
        }));
        run_loop(driver.clone(), scheduler.clone());
        scheduler.fire(1.0);
        // Rescheduled callback waits for the next fire
        assert_eq!(driver.borrow().frames.len(), 1);
        assert_eq!(scheduler.pending(), 1);
    }
}
