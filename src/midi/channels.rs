//! Playback channel assignment

use super::types::{Instrument, DRUM_CHANNEL};

const MIDI_CHANNELS: usize = 16;

/// Give every instrument an output channel.
///
/// Percussion always plays on [`DRUM_CHANNEL`]. Melodic instruments share a
/// channel per program: the n-th distinct program (in order of first
/// appearance) gets channel n. When the file has any percussion, melodic
/// channels from 9 upwards move up by one so they never land on the drum
/// channel. Whether drums exist is decided before any channel is handed out,
/// so instrument order does not matter.
///
/// Files with more programs than free channels reuse channels in a cycle.
pub fn assign_channels(instruments: &[Instrument]) -> Vec<u8> {
    let has_drums = instruments.iter().any(|i| i.is_drum);

    let mut programs: Vec<u8> = Vec::new();
    for instrument in instruments.iter().filter(|i| !i.is_drum) {
        if !programs.contains(&instrument.program) {
            programs.push(instrument.program);
        }
    }

    let melodic_slots = if has_drums {
        MIDI_CHANNELS - 1
    } else {
        MIDI_CHANNELS
    };
    if programs.len() > melodic_slots {
        log::warn!(
            "{} melodic programs but only {} channels; channels will be shared",
            programs.len(),
            melodic_slots
        );
    }

    instruments
        .iter()
        .map(|instrument| {
            if instrument.is_drum {
                return DRUM_CHANNEL;
            }
            let index = programs
                .iter()
                .position(|&p| p == instrument.program)
                .unwrap_or(0);
            let mut channel = (index % melodic_slots) as u8;
            if has_drums && channel >= DRUM_CHANNEL {
                channel += 1;
            }
            log::debug!(
                "program {} (track {}) -> channel {}",
                instrument.program,
                instrument.track,
                channel
            );
            channel
        })
        .collect()
}
