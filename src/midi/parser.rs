//! Standard MIDI File decoding
//!
//! Turns SMF bytes into [`Instrument`]s with note times in seconds.

use std::collections::{HashMap, VecDeque};

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use super::types::{Instrument, RawNote};

/// MIDI default tempo: 120 BPM.
const DEFAULT_USEC_PER_BEAT: u32 = 500_000;

/// Converts absolute ticks to seconds.
///
/// Metrical files are converted through the tempo map, piece by piece;
/// timecode files have a fixed number of ticks per second.
struct TickClock {
    ticks_per_beat: f64,
    ticks_per_second: Option<f64>,
    /// (tick, seconds at tick, microseconds per beat from tick on)
    segments: Vec<(u64, f64, f64)>,
}

impl TickClock {
    fn new(smf: &Smf) -> Self {
        let (ticks_per_beat, ticks_per_second) = match smf.header.timing {
            Timing::Metrical(tpb) => (tpb.as_int().max(1) as f64, None),
            Timing::Timecode(fps, subframe) => {
                let per_second = fps.as_f32() as f64 * subframe.max(1) as f64;
                (1.0, Some(per_second))
            }
        };

        let mut changes: Vec<(u64, u32)> = Vec::new();
        for track in &smf.tracks {
            let mut tick: u64 = 0;
            for event in track {
                tick += event.delta.as_int() as u64;
                if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                    changes.push((tick, tempo.as_int()));
                }
            }
        }
        // stable sort keeps file order, so the last change at a tick wins below
        changes.sort_by_key(|&(tick, _)| tick);

        let mut segments: Vec<(u64, f64, f64)> = vec![(0, 0.0, DEFAULT_USEC_PER_BEAT as f64)];
        for (tick, usec) in changes {
            let &(last_tick, last_seconds, last_usec) = segments.last().unwrap_or(&(0, 0.0, 0.0));
            if tick == last_tick {
                if let Some(last) = segments.last_mut() {
                    last.2 = usec as f64;
                }
                continue;
            }
            let seconds =
                last_seconds + (tick - last_tick) as f64 / ticks_per_beat * last_usec / 1_000_000.0;
            segments.push((tick, seconds, usec as f64));
        }

        TickClock {
            ticks_per_beat,
            ticks_per_second,
            segments,
        }
    }

    fn seconds(&self, tick: u64) -> f64 {
        if let Some(per_second) = self.ticks_per_second {
            return tick as f64 / per_second;
        }
        let segment = self
            .segments
            .iter()
            .rev()
            .find(|(start, _, _)| *start <= tick)
            .copied()
            .unwrap_or((0, 0.0, DEFAULT_USEC_PER_BEAT as f64));
        let (start, seconds, usec) = segment;
        seconds + (tick - start) as f64 / self.ticks_per_beat * usec / 1_000_000.0
    }
}

struct OpenNote {
    tick: u64,
    velocity: u8,
    instrument: usize,
}

/// Decode an SMF file into instruments.
///
/// Instruments are keyed by (track, channel, program) and listed track by
/// track; within a track, in the order of their first note-on. A note belongs to the program that was active on
/// its channel when it started. Note offs close the oldest open note of the
/// same key; notes never closed are dropped.
pub fn parse_instruments(data: &[u8]) -> Result<Vec<Instrument>, midly::Error> {
    let smf = Smf::parse(data)?;
    let clock = TickClock::new(&smf);

    let mut instruments: Vec<Instrument> = Vec::new();
    let mut lookup: HashMap<(usize, u8, u8), usize> = HashMap::new();

    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut tick: u64 = 0;
        let mut programs = [0u8; 16];
        let mut track_name: Option<String> = None;
        let mut open: HashMap<(u8, u8), VecDeque<OpenNote>> = HashMap::new();

        for event in track {
            tick += event.delta.as_int() as u64;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                    let name = String::from_utf8_lossy(name).trim().to_string();
                    if !name.is_empty() {
                        track_name = Some(name);
                    }
                }
                TrackEventKind::Midi { channel, message } => {
                    let channel = channel.as_int();
                    match message {
                        MidiMessage::ProgramChange { program } => {
                            programs[channel as usize] = program.as_int();
                        }
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            let program = programs[channel as usize];
                            let index = *lookup
                                .entry((track_index, channel, program))
                                .or_insert_with(|| {
                                    instruments.push(Instrument::new(program, channel, track_index));
                                    instruments.len() - 1
                                });
                            open.entry((channel, key.as_int()))
                                .or_default()
                                .push_back(OpenNote {
                                    tick,
                                    velocity: vel.as_int(),
                                    instrument: index,
                                });
                        }
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            let closed = open
                                .get_mut(&(channel, key.as_int()))
                                .and_then(VecDeque::pop_front);
                            if let Some(note) = closed {
                                instruments[note.instrument].notes.push(RawNote {
                                    pitch: key.as_int(),
                                    velocity: note.velocity,
                                    start: clock.seconds(note.tick),
                                    end: clock.seconds(tick),
                                });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if let Some(name) = track_name {
            for instrument in instruments.iter_mut().filter(|i| i.track == track_index) {
                instrument.name.get_or_insert_with(|| name.clone());
            }
        }
    }

    instruments.retain(|i| !i.notes.is_empty());
    for instrument in &mut instruments {
        instrument
            .notes
            .sort_by(|a, b| a.start.total_cmp(&b.start).then(a.pitch.cmp(&b.pitch)));
    }

    Ok(instruments)
}
