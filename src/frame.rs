//! Per-frame driver: populate the atlas on the first frame, draw on every
//! frame.

use std::fmt;

/// Whether the one-time atlas population has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No frame has been drawn yet.
    #[default]
    NotLoaded,
    /// Population has been attempted. There is no way back.
    Loaded,
}

/// Something the [`FrameDriver`] can fill once and then draw repeatedly.
pub trait FrameTarget {
    /// Why population failed.
    type Error: fmt::Display;

    /// Fill the target, returning how many tiles were written.
    ///
    /// # Errors
    ///
    /// Implementations report load or blit failures here. The driver logs
    /// them and keeps drawing.
    fn populate(&mut self) -> Result<usize, Self::Error>;

    /// Draw the current contents.
    fn draw(&mut self);
}

/// Owns a [`FrameTarget`] and the [`LoadState`] guarding its population.
#[derive(Debug)]
pub struct FrameDriver<T> {
    target: T,
    state: LoadState,
    frames: u64,
}

impl<T: FrameTarget> FrameDriver<T> {
    /// Wrap `target` in the [`LoadState::NotLoaded`] state.
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            state: LoadState::NotLoaded,
            frames: 0,
        }
    }

    /// Run one frame.
    ///
    /// The first call populates the target. A failed population is logged
    /// and not retried; the target is drawn regardless.
    pub fn frame(&mut self) {
        if self.state == LoadState::NotLoaded {
            match self.target.populate() {
                Ok(tiles) => log::info!("atlas populated with {tiles} tiles"),
                Err(err) => log::error!("atlas left unpopulated: {err}"),
            }
            self.state = LoadState::Loaded;
        }

        self.target.draw();
        self.frames += 1;
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Borrow the target.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Give back the target, e.g. to release its resources.
    #[must_use]
    pub fn into_target(self) -> T {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        populates: usize,
        draws: usize,
        fail: bool,
    }

    impl FrameTarget for Counting {
        type Error = &'static str;

        fn populate(&mut self) -> Result<usize, Self::Error> {
            self.populates += 1;
            if self.fail {
                Err("no sheet")
            } else {
                Ok(192)
            }
        }

        fn draw(&mut self) {
            self.draws += 1;
        }
    }

    #[test]
    fn starts_not_loaded() {
        let driver = FrameDriver::new(Counting::default());
        assert_eq!(driver.state(), LoadState::NotLoaded);
        assert_eq!(driver.target().populates, 0);
    }

    #[test]
    fn populates_once_draws_every_frame() {
        let mut driver = FrameDriver::new(Counting::default());
        for _ in 0..100 {
            driver.frame();
        }

        assert_eq!(driver.state(), LoadState::Loaded);
        assert_eq!(driver.frames(), 100);
        let target = driver.into_target();
        assert_eq!(target.populates, 1);
        assert_eq!(target.draws, 100);
    }

    #[test]
    fn failed_populate_is_not_retried() {
        let mut driver = FrameDriver::new(Counting {
            fail: true,
            ..Counting::default()
        });
        driver.frame();
        assert_eq!(driver.state(), LoadState::Loaded);
        driver.frame();
        driver.frame();

        assert_eq!(driver.target().populates, 1);
        assert_eq!(driver.target().draws, 3);
    }
}
