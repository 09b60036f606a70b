//! A context rendered on demand instead of by a sound card.
//!
//! Time only moves when someone calls [`OfflineRenderer::render`], which
//! makes the whole loop reproducible: tests drive it frame by frame, the
//! bounce command drives it as fast as the CPU allows.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    config::CompressorSettings,
    engine::{
        context::{AudioContext, ContextFactory},
        mixer::Mixer,
    },
    error::{Result, RetroError},
    voices::Voice,
};

pub struct OfflineContext {
    mixer: Rc<RefCell<Mixer>>,
    closed: bool,
}

impl AudioContext for OfflineContext {
    fn sample_rate(&self) -> f32 {
        self.mixer.borrow().sample_rate()
    }

    fn current_time(&self) -> f64 {
        self.mixer.borrow().time()
    }

    fn install_compressor(&mut self, settings: CompressorSettings) -> Result<()> {
        if self.closed {
            return Err(RetroError::ContextClosed);
        }
        self.mixer.borrow_mut().set_compressor(settings);
        Ok(())
    }

    fn schedule(&mut self, at: f64, voice: Voice) -> Result<()> {
        if self.closed {
            return Err(RetroError::ContextClosed);
        }
        self.mixer.borrow_mut().add(at, voice)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let mut mixer = self.mixer.borrow_mut();
            mixer.clear();
            mixer.drain_retired().for_each(drop);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Handle for pulling audio out of an offline context.
#[derive(Clone)]
pub struct OfflineRenderer {
    mixer: Rc<RefCell<Mixer>>,
}

impl OfflineRenderer {
    pub fn render(&self, left: &mut [f32], right: &mut [f32]) {
        let mut mixer = self.mixer.borrow_mut();
        mixer.render(left, right);
        mixer.drain_retired().for_each(drop);
    }

    /// Render interleaved stereo.
    pub fn render_interleaved(&self, out: &mut [f32]) {
        let mut mixer = self.mixer.borrow_mut();
        mixer.render_interleaved(out, 2, |_| {});
        mixer.drain_retired().for_each(drop);
    }

    pub fn time(&self) -> f64 {
        self.mixer.borrow().time()
    }

    pub fn frame(&self) -> u64 {
        self.mixer.borrow().frame()
    }

    pub fn active_voices(&self) -> usize {
        self.mixer.borrow().active_voices()
    }
}

/// Opens offline contexts and keeps a renderer for the latest one.
pub struct OfflineFactory {
    sample_rate: f32,
    latest: Option<Rc<RefCell<Mixer>>>,
    opened: usize,
}

impl OfflineFactory {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            latest: None,
            opened: 0,
        }
    }

    /// Renderer for the most recently opened context.
    pub fn renderer(&self) -> Option<OfflineRenderer> {
        self.latest.as_ref().map(|mixer| OfflineRenderer {
            mixer: Rc::clone(mixer),
        })
    }

    /// Contexts opened so far.
    pub fn opened(&self) -> usize {
        self.opened
    }
}

impl ContextFactory for OfflineFactory {
    fn open(&mut self) -> Result<Box<dyn AudioContext>> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(RetroError::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        let mixer = Rc::new(RefCell::new(Mixer::new(self.sample_rate)));
        self.latest = Some(Rc::clone(&mixer));
        self.opened += 1;
        debug!(sample_rate = self.sample_rate, "offline context opened");
        Ok(Box::new(OfflineContext {
            mixer,
            closed: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices;

    #[test]
    fn clock_follows_rendered_frames() {
        let mut factory = OfflineFactory::new(48_000.0);
        let context = factory.open().unwrap();
        let renderer = factory.renderer().unwrap();

        assert_eq!(context.current_time(), 0.0);
        let mut l = vec![0.0; 4_800];
        let mut r = vec![0.0; 4_800];
        renderer.render(&mut l, &mut r);
        assert!((context.current_time() - 0.1).abs() < 1e-9);
        assert_eq!(renderer.frame(), 4_800);
    }

    #[test]
    fn closed_context_refuses_voices_and_goes_quiet() {
        let mut factory = OfflineFactory::new(48_000.0);
        let mut context = factory.open().unwrap();
        let renderer = factory.renderer().unwrap();

        context.schedule(0.0, voices::kick().unwrap()).unwrap();
        assert_eq!(renderer.active_voices(), 1);

        context.close();
        assert!(context.is_closed());
        assert_eq!(renderer.active_voices(), 0);
        assert_eq!(renderer.mixer.borrow().retired_voices(), 0);
        assert!(matches!(
            context.schedule(0.0, voices::kick().unwrap()),
            Err(RetroError::ContextClosed)
        ));

        let mut l = vec![1.0; 256];
        let mut r = vec![1.0; 256];
        renderer.render(&mut l, &mut r);
        assert!(l.iter().chain(&r).all(|&s| s == 0.0));
    }

    #[test]
    fn finished_voices_are_freed_after_render() {
        let mut factory = OfflineFactory::new(8_000.0);
        let mut context = factory.open().unwrap();
        let renderer = factory.renderer().unwrap();

        for _ in 0..8 {
            context.schedule(0.0, voices::kick().unwrap()).unwrap();
        }
        let mut buf = vec![0.0; 2 * 8_000];
        renderer.render_interleaved(&mut buf);

        assert_eq!(renderer.active_voices(), 0);
        assert_eq!(renderer.mixer.borrow().retired_voices(), 0);
    }

    #[test]
    fn each_open_is_a_fresh_clock() {
        let mut factory = OfflineFactory::new(8_000.0);
        let _first = factory.open().unwrap();
        let mut buf = vec![0.0; 800];
        factory.renderer().unwrap().render_interleaved(&mut buf);

        let second = factory.open().unwrap();
        assert_eq!(second.current_time(), 0.0);
        assert_eq!(factory.opened(), 2);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(OfflineFactory::new(0.0).open().is_err());
    }
}
