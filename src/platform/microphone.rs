//! Microphone volume via the Web Audio API
//!
//! `getUserMedia` resolves asynchronously. Until it does (or if it fails)
//! the volume reads as 0, so the frame loop never waits on it.

use std::cell::Cell;

/// Where the microphone permission request stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MicrophoneStatus {
    #[default]
    Disconnected,
    /// `getUserMedia` in flight
    Connecting,
    Ready,
    /// Denied or unavailable; a later user gesture may ask again
    Failed,
}

impl MicrophoneStatus {
    /// Whether a new permission request should be made
    pub fn should_request(self) -> bool {
        matches!(self, MicrophoneStatus::Disconnected | MicrophoneStatus::Failed)
    }
}

/// Claim the request slot: true (and now `Connecting`) if the caller should ask
pub fn begin_request(status: &Cell<MicrophoneStatus>) -> bool {
    if !status.get().should_request() {
        return false;
    }
    status.set(MicrophoneStatus::Connecting);
    true
}

#[cfg(target_arch = "wasm32")]
pub use web::MicrophoneVolume;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AnalyserNode, AudioContext, MediaStream, MediaStreamConstraints};

    use super::{MicrophoneStatus, begin_request};
    use crate::input::{VolumeSource, mean_magnitude};

    /// Analyser FFT size (gives half as many frequency bins)
    const FFT_SIZE: u32 = 256;

    struct Analyser {
        // Keeps the context alive as long as the analyser is in use
        _ctx: AudioContext,
        node: AnalyserNode,
        bins: Vec<u8>,
    }

    /// Live microphone volume, silent until the user grants access
    #[derive(Clone, Default)]
    pub struct MicrophoneVolume {
        analyser: Rc<RefCell<Option<Analyser>>>,
        status: Rc<Cell<MicrophoneStatus>>,
    }

    impl MicrophoneVolume {
        pub fn new() -> Self {
            Self::default()
        }

        /// Ask for microphone access in the background.
        /// Does nothing while a request is pending or once connected.
        pub fn connect(&self) {
            if !begin_request(&self.status) {
                return;
            }

            let slot = self.analyser.clone();
            let status = self.status.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match open_analyser().await {
                    Ok(analyser) => {
                        log::info!("Microphone connected ({} bins)", analyser.bins.len());
                        *slot.borrow_mut() = Some(analyser);
                        status.set(MicrophoneStatus::Ready);
                    }
                    Err(err) => {
                        log::error!("Error accessing microphone: {:?}", err);
                        status.set(MicrophoneStatus::Failed);
                    }
                }
            });
        }

        pub fn status(&self) -> MicrophoneStatus {
            self.status.get()
        }
    }

    impl VolumeSource for MicrophoneVolume {
        fn current_volume(&mut self) -> f32 {
            let mut slot = self.analyser.borrow_mut();
            let Some(analyser) = slot.as_mut() else {
                return 0.0;
            };
            analyser.node.get_byte_frequency_data(&mut analyser.bins);
            mean_magnitude(&analyser.bins)
        }
    }

    async fn open_analyser() -> Result<Analyser, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let devices = window.navigator().media_devices()?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices.get_user_media_with_constraints(&constraints)?;
        let stream: MediaStream = JsFuture::from(promise).await?.dyn_into()?;

        let ctx = AudioContext::new()?;
        let node = ctx.create_analyser()?;
        let source = ctx.create_media_stream_source(&stream)?;
        source.connect_with_audio_node(&node)?;

        node.set_fft_size(FFT_SIZE);
        let bins = vec![0u8; node.frequency_bin_count() as usize];

        Ok(Analyser {
            _ctx: ctx,
            node,
            bins,
        })
    }
}
