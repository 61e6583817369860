use std::{fs::File, io::BufReader, path::Path};

use rodio::{source::Buffered, Decoder, OutputStream, Sink, Source};

/// Continuous siren playback. A missing or unplayable audio resource is a
/// degraded mode: alerting stays visual-only and the monitor keeps running.
pub struct Alarm {
    audio: Option<Audio>,
    playing: bool,
}

struct Audio {
    _stream: OutputStream,
    sink: Sink,
    source: Buffered<Decoder<BufReader<File>>>,
}

impl Alarm {
    pub fn new(sound_path: &Path) -> Self {
        let audio = match Audio::load(sound_path) {
            Ok(audio) => Some(audio),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %sound_path.display(),
                    "alert audio unavailable, continuing with visual alerts only"
                );
                None
            }
        };
        Self {
            audio,
            playing: false,
        }
    }

    /// No-op while already sounding.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        if let Some(audio) = &self.audio {
            audio.sink.append(audio.source.clone().repeat_infinite());
            audio.sink.play();
        }
        self.playing = true;
    }

    /// No-op while already silent.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        if let Some(audio) = &self.audio {
            audio.sink.stop();
        }
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for Alarm {
    fn drop(&mut self) {
        self.stop();
        log::info!("Shutting down alert channel");
    }
}

impl Audio {
    fn load(sound_path: &Path) -> crate::Result<Self> {
        if !sound_path.exists() {
            return Err(crate::Error::UnknownError(
                format!("no alert sound at {}", sound_path.display()).into(),
            ));
        }
        let (stream, handle) =
            OutputStream::try_default().map_err(crate::Error::as_unknown_error)?;
        let source = Decoder::new(BufReader::new(
            File::open(sound_path).map_err(crate::Error::as_unknown_error)?,
        ))
        .map_err(crate::Error::as_unknown_error)?
        .buffered();
        Ok(Self {
            _stream: stream,
            sink: Sink::try_new(&handle).map_err(crate::Error::as_unknown_error)?,
            source,
        })
    }
}
