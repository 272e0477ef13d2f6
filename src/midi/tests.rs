use super::*;
use crate::sound::{RecordingOutput, SoundEvent};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

const TICKS_PER_BEAT: u16 = 480;

fn midi(delta: u32, channel: u8, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::from(delta),
        kind: TrackEventKind::Midi {
            channel: u4::from(channel),
            message,
        },
    }
}

fn on(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOn {
            key: u7::from(key),
            vel: u7::from(100),
        },
    )
}

fn off(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOff {
            key: u7::from(key),
            vel: u7::from(0),
        },
    )
}

fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::from(delta),
        kind: TrackEventKind::Meta(message),
    }
}

fn smf_bytes(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let format = if tracks.len() == 1 {
        Format::SingleTrack
    } else {
        Format::Parallel
    };
    let mut smf = Smf::new(Header::new(
        format,
        Timing::Metrical(u15::from(TICKS_PER_BEAT)),
    ));
    for mut track in tracks {
        track.push(meta(0, MetaMessage::EndOfTrack));
        smf.tracks.push(track);
    }
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();
    bytes
}

/// Three quarter-length-thirds at one-second spacing (120 BPM, 480 tpb).
fn three_notes() -> Vec<TrackEvent<'static>> {
    vec![
        on(0, 0, 60),
        off(160, 0, 60),
        on(800, 0, 64),
        off(160, 0, 64),
        on(800, 0, 67),
        off(160, 0, 67),
    ]
}

#[test]
fn test_parse_single_track_seconds() {
    let instruments = parse_instruments(&smf_bytes(vec![three_notes()])).unwrap();

    assert_eq!(instruments.len(), 1);
    let notes = &instruments[0].notes;
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].pitch, 60);
    assert!((notes[0].start - 0.0).abs() < 1e-9);
    assert!((notes[1].start - 1.0).abs() < 1e-9);
    assert!((notes[2].start - 2.0).abs() < 1e-9);
    assert!((notes[2].duration() - 1.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_source_frame_conversion() {
    let instruments = parse_instruments(&smf_bytes(vec![three_notes()])).unwrap();
    let source = MidiSource::from_instruments(instruments, 1.0, 60);

    let frames: Vec<(i64, i64)> = source.notes()[0]
        .iter()
        .map(|n| (n.time, n.duration))
        .collect();
    assert_eq!(frames, vec![(0, 10), (60, 10), (120, 10)]);
}

#[test]
fn test_tempo_scalar_speeds_up() {
    let instruments = parse_instruments(&smf_bytes(vec![three_notes()])).unwrap();
    let source = MidiSource::from_instruments(instruments, 2.0, 60);

    let times: Vec<i64> = source.notes()[0].iter().map(|n| n.time).collect();
    assert_eq!(times, vec![0, 30, 60]);
    assert_eq!(source.notes()[0][0].duration, 5);
}

#[test]
fn test_frame_time_monotonic_for_any_tempo() {
    let notes: Vec<RawNote> = (0..50)
        .map(|i| RawNote {
            pitch: 60,
            velocity: 100,
            start: i as f64 * 0.137,
            end: i as f64 * 0.137 + 0.1,
        })
        .collect();
    for tempo in [0.3, 0.75, 1.0, 1.6, 3.0] {
        let source = MidiSource::from_instruments(
            vec![Instrument::new(0, 0, 0).with_notes(notes.clone())],
            tempo,
            60,
        );
        let times: Vec<i64> = source.notes()[0].iter().map(|n| n.time).collect();
        assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "not monotonic at tempo {}",
            tempo
        );
    }
}

#[test]
fn test_tempo_map_is_applied() {
    let track = vec![
        meta(0, MetaMessage::Tempo(u24::from(1_000_000))),
        on(0, 0, 60),
        off(480, 0, 60),
        on(480, 0, 62),
        off(480, 0, 62),
    ];
    let instruments = parse_instruments(&smf_bytes(vec![track])).unwrap();
    let notes = &instruments[0].notes;

    // 60 BPM: one beat per second
    assert!((notes[0].duration() - 1.0).abs() < 1e-9);
    assert!((notes[1].start - 2.0).abs() < 1e-9);
}

#[test]
fn test_tempo_change_mid_song() {
    let tempo_track = vec![
        meta(0, MetaMessage::Tempo(u24::from(500_000))),
        meta(960, MetaMessage::Tempo(u24::from(1_000_000))),
    ];
    let notes = vec![on(1440, 0, 60), off(480, 0, 60)];
    let instruments = parse_instruments(&smf_bytes(vec![tempo_track, notes])).unwrap();
    let note = &instruments[0].notes[0];

    // two beats at 120 BPM, then one at 60 BPM
    assert!((note.start - 2.0).abs() < 1e-9);
    assert!((note.end - 3.0).abs() < 1e-9);
}

#[test]
fn test_velocity_zero_closes_note() {
    let track = vec![
        on(0, 0, 60),
        midi(
            240,
            0,
            MidiMessage::NoteOn {
                key: u7::from(60),
                vel: u7::from(0),
            },
        ),
        on(0, 0, 72),
    ];
    let instruments = parse_instruments(&smf_bytes(vec![track])).unwrap();

    // the unterminated 72 is dropped
    assert_eq!(instruments.len(), 1);
    assert_eq!(instruments[0].notes.len(), 1);
    assert!((instruments[0].notes[0].duration() - 0.25).abs() < 1e-9);
}

#[test]
fn test_programs_and_drums_split_instruments() {
    let track = vec![
        meta(0, MetaMessage::TrackName(b"Band")),
        midi(
            0,
            0,
            MidiMessage::ProgramChange {
                program: u7::from(24),
            },
        ),
        on(0, 0, 60),
        on(0, 9, 36),
        off(240, 0, 60),
        off(0, 9, 36),
        midi(
            0,
            0,
            MidiMessage::ProgramChange {
                program: u7::from(33),
            },
        ),
        on(0, 0, 40),
        off(240, 0, 40),
    ];
    let instruments = parse_instruments(&smf_bytes(vec![track])).unwrap();

    assert_eq!(instruments.len(), 3);
    assert_eq!(instruments[0].program, 24);
    assert!(!instruments[0].is_drum);
    assert!(instruments[1].is_drum);
    assert_eq!(instruments[2].program, 33);
    assert_eq!(instruments[0].name.as_deref(), Some("Band"));
}

#[test]
fn test_malformed_file_fails() {
    let result = parse_instruments(b"MThd not really a midi file");
    assert!(result.is_err());
}

#[test]
fn test_load_reports_paths() {
    let missing = MidiSource::load("/definitely/not/here.mid", 1.0);
    assert!(matches!(
        missing,
        Err(crate::RushError::LoadError { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.mid");
    std::fs::write(&path, b"garbage").unwrap();
    let broken = MidiSource::load(&path, 1.0);
    assert!(matches!(broken, Err(crate::RushError::ParseError { .. })));
}

#[test]
fn test_drums_reserve_channel_nine() {
    let mut instruments: Vec<Instrument> = (0..12u8).map(|p| Instrument::new(p, 0, 0)).collect();
    instruments.push(Instrument::new(0, DRUM_CHANNEL, 1));

    let channels = assign_channels(&instruments);

    assert_eq!(channels[12], DRUM_CHANNEL);
    // instruments before the drum track are still moved off channel 9
    assert_eq!(channels[8], 8);
    assert_eq!(channels[9], 10);
    assert_eq!(channels[11], 12);
    let melodic = &channels[..12];
    for (i, a) in melodic.iter().enumerate() {
        for b in &melodic[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_channels_shared_per_program() {
    let instruments = vec![
        Instrument::new(5, 0, 0),
        Instrument::new(7, 1, 0),
        Instrument::new(5, 2, 1),
    ];
    assert_eq!(assign_channels(&instruments), vec![0, 1, 0]);
}

#[test]
fn test_no_drums_keeps_channel_nine_available() {
    let instruments: Vec<Instrument> = (0..10u8).map(|p| Instrument::new(p, 0, 0)).collect();
    let channels = assign_channels(&instruments);
    assert_eq!(channels[9], 9);
}

#[test]
fn test_intro_shifts_every_note() {
    let instruments = vec![
        Instrument::new(0, 0, 0).with_notes(vec![RawNote {
            pitch: 60,
            velocity: 100,
            start: 0.0,
            end: 0.5,
        }]),
        Instrument::new(0, DRUM_CHANNEL, 0).with_notes(vec![RawNote {
            pitch: 36,
            velocity: 100,
            start: 1.0,
            end: 1.1,
        }]),
    ];
    let mut source = MidiSource::from_instruments(instruments, 1.0, 60);
    source.intro(3.0);

    assert_eq!(source.notes()[0][0].time, 180);
    assert_eq!(source.notes()[1][0].time, 240);
    assert_eq!(source.notes()[1][0].channel, DRUM_CHANNEL);
}

#[test]
fn test_instruments_by_index() {
    let instruments = vec![Instrument::new(1, 0, 0), Instrument::new(2, 1, 0)];
    let source = MidiSource::from_instruments(instruments, 1.0, 60);

    let picked = source.instruments_by_index(&[1, 0]).unwrap();
    assert_eq!(picked[0].program, 2);
    assert_eq!(picked[1].program, 1);
    assert!(matches!(
        source.instruments_by_index(&[0, 4]),
        Err(crate::RushError::InvalidInstrument {
            index: 4,
            available: 2
        })
    ));
}

#[test]
fn test_initialise_player_sends_programs() {
    let instruments = vec![Instrument::new(19, 0, 0), Instrument::new(0, DRUM_CHANNEL, 0)];
    let source = MidiSource::from_instruments(instruments, 1.0, 60);
    let mut output = RecordingOutput::new();

    source.initialise_player(&mut output);

    assert_eq!(
        output.events,
        vec![
            SoundEvent::Program {
                program: 19,
                channel: 0
            },
            SoundEvent::Program {
                program: 0,
                channel: 9
            },
        ]
    );
}
