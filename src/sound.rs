//! Sound output capability
//!
//! The engine never talks to an audio device directly. Whatever owns the
//! [`Stage`](crate::Stage) hands it a [`SoundOutput`] and every note-on and
//! note-off goes through it, in frame order, on the update thread.

use serde::Serialize;

/// Receiver of MIDI note events.
///
/// Implementations are expected to return immediately; the update loop calls
/// them synchronously.
pub trait SoundOutput {
    fn note_on(&mut self, pitch: u8, velocity: u8, channel: u8);

    fn note_off(&mut self, pitch: u8, velocity: u8, channel: u8);

    /// Select the General MIDI program played on `channel`.
    fn set_instrument(&mut self, _program: u8, _channel: u8) {}
}

impl<T: SoundOutput + ?Sized> SoundOutput for &mut T {
    fn note_on(&mut self, pitch: u8, velocity: u8, channel: u8) {
        (**self).note_on(pitch, velocity, channel)
    }

    fn note_off(&mut self, pitch: u8, velocity: u8, channel: u8) {
        (**self).note_off(pitch, velocity, channel)
    }

    fn set_instrument(&mut self, program: u8, channel: u8) {
        (**self).set_instrument(program, channel)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput;

impl SoundOutput for SilentOutput {
    fn note_on(&mut self, _pitch: u8, _velocity: u8, _channel: u8) {}

    fn note_off(&mut self, _pitch: u8, _velocity: u8, _channel: u8) {}
}

/// Writes every event to the `log` facade at trace level and counts them.
#[derive(Debug, Default, Clone)]
pub struct LogOutput {
    pub note_ons: usize,
    pub note_offs: usize,
}

impl SoundOutput for LogOutput {
    fn note_on(&mut self, pitch: u8, velocity: u8, channel: u8) {
        self.note_ons += 1;
        log::trace!("note on  ch={:2} pitch={:3} vel={:3}", channel, pitch, velocity);
    }

    fn note_off(&mut self, pitch: u8, velocity: u8, channel: u8) {
        self.note_offs += 1;
        log::trace!("note off ch={:2} pitch={:3} vel={:3}", channel, pitch, velocity);
    }

    fn set_instrument(&mut self, program: u8, channel: u8) {
        log::debug!("program {} on channel {}", program, channel);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SoundEvent {
    NoteOn { pitch: u8, velocity: u8, channel: u8 },
    NoteOff { pitch: u8, velocity: u8, channel: u8 },
    Program { program: u8, channel: u8 },
}

/// Keeps every event in order. Used by tests and offline tools.
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    pub events: Vec<SoundEvent>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_ons(&self) -> impl Iterator<Item = &SoundEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SoundEvent::NoteOn { .. }))
    }

    pub fn note_offs(&self) -> impl Iterator<Item = &SoundEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SoundEvent::NoteOff { .. }))
    }

    /// Notes switched on and not yet switched off, as (channel, pitch).
    pub fn sounding(&self) -> Vec<(u8, u8)> {
        let mut active: Vec<(u8, u8)> = Vec::new();
        for event in &self.events {
            match *event {
                SoundEvent::NoteOn { pitch, channel, .. } => active.push((channel, pitch)),
                SoundEvent::NoteOff { pitch, channel, .. } => {
                    if let Some(pos) = active.iter().position(|&n| n == (channel, pitch)) {
                        active.remove(pos);
                    }
                }
                SoundEvent::Program { .. } => {}
            }
        }
        active
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundOutput for RecordingOutput {
    fn note_on(&mut self, pitch: u8, velocity: u8, channel: u8) {
        self.events.push(SoundEvent::NoteOn {
            pitch,
            velocity,
            channel,
        });
    }

    fn note_off(&mut self, pitch: u8, velocity: u8, channel: u8) {
        self.events.push(SoundEvent::NoteOff {
            pitch,
            velocity,
            channel,
        });
    }

    fn set_instrument(&mut self, program: u8, channel: u8) {
        self.events.push(SoundEvent::Program { program, channel });
    }
}
