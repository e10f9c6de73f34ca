//! The byte boundary between core and shell.
//!
//! Events come in as bytes, effect requests and ViewModels go out as bytes;
//! a shell in any language only needs this encoding, never the Rust types.
//! The encoding is JSON with tagged enums, so adding a variant or an
//! optional field never breaks an older payload.

use crate::effect::EffectRequest;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::view::ViewModel;

pub fn encode_event(event: &Event) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(event)?)
}

pub fn decode_event(bytes: &[u8]) -> Result<Event> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Decode(format!("invalid event bytes: {}", e)))
}

pub fn encode_requests(requests: &[EffectRequest]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(requests)?)
}

pub fn decode_requests(bytes: &[u8]) -> Result<Vec<EffectRequest>> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Decode(format!("invalid effect request bytes: {}", e)))
}

pub fn encode_view(view: &ViewModel) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(view)?)
}

pub fn decode_view(bytes: &[u8]) -> Result<ViewModel> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Decode(format!("invalid view model bytes: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlator::EffectTracker;
    use crate::effect::{PersistenceOutcome, RequestId, SnapshotOutcome, TimerOutcome};
    use crate::event::SetPatch;
    use crate::model::{Model, Tab};
    use crate::types::{Equipment, Workout};
    use crate::update::update;
    use crate::view::view;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn every_event() -> Vec<Event> {
        let at = Utc.with_ymd_and_hms(2026, 3, 12, 17, 30, 0).unwrap();
        let exercise_id = Uuid::new_v4();
        let set_id = Uuid::new_v4();
        let workout_id = Uuid::new_v4();
        let patch = SetPatch {
            weight_kg: Some(82.5),
            reps: Some(5),
            ..SetPatch::default()
        };
        vec![
            Event::Launched,
            Event::StartWorkout { at },
            Event::FinishWorkout,
            Event::DiscardWorkout,
            Event::AddExercise {
                name: "Bench Press".to_string(),
                equipment: Equipment::Barbell,
            },
            Event::DeleteExercise { exercise_id },
            Event::MoveExercise { from: 0, to: 2 },
            Event::AddSet { exercise_id },
            Event::DeleteSet {
                exercise_id,
                set_id,
            },
            Event::UpdateSetSuggested {
                exercise_id,
                set_id,
                patch: patch.clone(),
            },
            Event::UpdateSetActual {
                exercise_id,
                set_id,
                patch,
            },
            Event::ToggleSetCompleted {
                exercise_id,
                set_id,
            },
            Event::UpdateWorkoutName {
                name: "Push Day".to_string(),
            },
            Event::UpdateWorkoutNote {
                note: "felt strong".to_string(),
            },
            Event::CommitEdits,
            Event::ChangeTab { tab: Tab::History },
            Event::RefreshHistory,
            Event::SelectHistoryWorkout { workout_id },
            Event::DeleteHistoryWorkout { workout_id },
            Event::PersistenceResponded {
                request: RequestId(3),
                outcome: PersistenceOutcome::Loaded {
                    workout: Some(Workout::new(at)),
                },
            },
            Event::SnapshotResponded {
                request: RequestId(4),
                outcome: SnapshotOutcome::Loaded { workout: None },
            },
            Event::TimerResponded {
                request: RequestId(5),
                outcome: TimerOutcome::Tick,
            },
        ]
    }

    #[test]
    fn test_every_event_survives_the_boundary() {
        for event in every_event() {
            let bytes = encode_event(&event).unwrap();
            let decoded = decode_event(&bytes).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn test_effect_requests_survive_the_boundary() {
        let mut model = Model::new();
        let mut tracker = EffectTracker::new();
        let requests = update(
            Event::StartWorkout {
                at: Utc.with_ymd_and_hms(2026, 3, 12, 17, 30, 0).unwrap(),
            },
            &mut model,
            &mut tracker,
        );

        let bytes = encode_requests(&requests).unwrap();
        let decoded = decode_requests(&bytes).unwrap();
        assert_eq!(decoded, requests);
    }

    #[test]
    fn test_view_model_survives_the_boundary() {
        let mut model = Model::new();
        let mut tracker = EffectTracker::new();
        update(
            Event::StartWorkout {
                at: Utc.with_ymd_and_hms(2026, 3, 12, 17, 30, 0).unwrap(),
            },
            &mut model,
            &mut tracker,
        );
        update(
            Event::AddExercise {
                name: "Squat".to_string(),
                equipment: Equipment::Barbell,
            },
            &mut model,
            &mut tracker,
        );

        let vm = view(&model);
        let bytes = encode_view(&vm).unwrap();
        assert_eq!(decode_view(&bytes).unwrap(), vm);
    }

    #[test]
    fn test_garbage_bytes_report_decode_error() {
        let err = decode_event(b"not json").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("invalid event bytes"));
    }

    #[test]
    fn test_unknown_event_tag_rejected() {
        let err = decode_event(br#"{"type":"warp_speed"}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_encoding_is_tagged_not_positional() {
        let bytes = encode_event(&Event::ChangeTab { tab: Tab::History }).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""type":"change_tab""#));
        assert!(!text.starts_with('['));
    }
}
