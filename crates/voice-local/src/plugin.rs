#[cfg(feature = "mock")]
use crate::{MockRecognizer, MockSynthesizer};
use crate::{Recognizer, RecognizerConfig, Result, Synthesizer, SynthesizerConfig, VoiceError};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecognizerBackendKind {
    Mock,
    Deepgram,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SynthesizerBackendKind {
    Mock,
    ElevenLabs,
}

pub fn new_recognizer_backend(
    kind: RecognizerBackendKind,
    cfg: RecognizerConfig,
) -> Result<Box<dyn Recognizer + Send>> {
    match kind {
        RecognizerBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockRecognizer::new(cfg)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = cfg;
                Err(VoiceError::Unsupported("mock feature not enabled"))
            }
        }
        RecognizerBackendKind::Deepgram => {
            let _ = cfg;
            #[cfg(feature = "deepgram")]
            {
                Err(VoiceError::Unsupported("deepgram backend not yet integrated"))
            }
            #[cfg(not(feature = "deepgram"))]
            {
                Err(VoiceError::Unsupported("deepgram feature not enabled"))
            }
        }
    }
}

pub fn new_synthesizer_backend(
    kind: SynthesizerBackendKind,
    cfg: SynthesizerConfig,
) -> Result<Box<dyn Synthesizer + Send>> {
    match kind {
        SynthesizerBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockSynthesizer::new(cfg)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = cfg;
                Err(VoiceError::Unsupported("mock feature not enabled"))
            }
        }
        SynthesizerBackendKind::ElevenLabs => {
            let _ = cfg;
            #[cfg(feature = "elevenlabs")]
            {
                Err(VoiceError::Unsupported("elevenlabs backend not yet integrated"))
            }
            #[cfg(not(feature = "elevenlabs"))]
            {
                Err(VoiceError::Unsupported("elevenlabs feature not enabled"))
            }
        }
    }
}
