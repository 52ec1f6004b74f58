//! Address templates and the DAW address registry
//!
//! Per-track addresses carry a single `:id` placeholder that is filled with
//! the 1-based track id. Global addresses have no placeholder and expand to
//! themselves.

use crate::error::{Result, SurfaceError};

use super::ValueKind;

/// Placeholder token replaced by the track id
pub const ID_PLACEHOLDER: &str = ":id";

/// Expand `template` with a track id.
///
/// Only the first placeholder is replaced. An id of 0 counts as missing.
/// Templates without a placeholder come back unchanged and ignore `id`.
pub fn expand(template: &str, id: Option<u32>) -> Result<String> {
    if !template.contains(ID_PLACEHOLDER) {
        return Ok(template.to_string());
    }

    match id {
        Some(id) if id > 0 => Ok(template.replacen(ID_PLACEHOLDER, &id.to_string(), 1)),
        _ => Err(SurfaceError::MissingIdentifier {
            template: template.to_string(),
        }),
    }
}

/// Every address the surface speaks, keyed by meaning rather than path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DawAddress {
    TrackVolume,
    TrackPan,
    TrackVuMeter,
    TrackName,
    TrackMute,
    TrackSolo,
    TrackRecArm,
    TrackMonitor,
    TracksCount,
    BankSelect,
    BankNext,
    BankPrev,
    Record,
    Play,
    Pause,
    Stop,
    Metronome,
    Repeat,
}

impl DawAddress {
    /// Path pattern, possibly containing `:id`
    pub fn pattern(&self) -> &'static str {
        match self {
            DawAddress::TrackVolume => "/track/:id/volume",
            DawAddress::TrackPan => "/track/:id/pan",
            DawAddress::TrackVuMeter => "/track/:id/vu",
            DawAddress::TrackName => "/track/:id/name",
            DawAddress::TrackMute => "/track/:id/mute",
            DawAddress::TrackSolo => "/track/:id/solo",
            DawAddress::TrackRecArm => "/track/:id/recarm",
            DawAddress::TrackMonitor => "/track/:id/monitor",
            DawAddress::TracksCount => "/device/track/count",
            DawAddress::BankSelect => "/device/track/bank/select",
            DawAddress::BankNext => "/device/track/bank/+",
            DawAddress::BankPrev => "/device/track/bank/-",
            DawAddress::Record => "/record",
            DawAddress::Play => "/play",
            DawAddress::Pause => "/pause",
            DawAddress::Stop => "/stop",
            DawAddress::Metronome => "/click",
            DawAddress::Repeat => "/repeat",
        }
    }

    /// Kind of value carried on this address
    pub fn kind(&self) -> ValueKind {
        match self {
            DawAddress::TrackName => ValueKind::Text,
            DawAddress::TrackMute
            | DawAddress::TrackSolo
            | DawAddress::TrackRecArm
            | DawAddress::Record
            | DawAddress::Play
            | DawAddress::Pause
            | DawAddress::Stop
            | DawAddress::Metronome
            | DawAddress::Repeat => ValueKind::Boolean,
            _ => ValueKind::Number,
        }
    }

    pub fn is_per_track(&self) -> bool {
        self.pattern().contains(ID_PLACEHOLDER)
    }

    /// Concrete path for this address
    pub fn resolve(&self, id: Option<u32>) -> Result<String> {
        expand(self.pattern(), id)
    }

    /// Signal name used when logging outbound traffic
    pub fn signal(&self, id: Option<u32>) -> String {
        let base = match self {
            DawAddress::TrackVolume => "VOLUME",
            DawAddress::TrackPan => "PAN",
            DawAddress::TrackVuMeter => "VU",
            DawAddress::TrackName => "NAME",
            DawAddress::TrackMute => "MUTE",
            DawAddress::TrackSolo => "SOLO",
            DawAddress::TrackRecArm => "RECARM",
            DawAddress::TrackMonitor => "MONITOR",
            DawAddress::TracksCount => "TRACKS_COUNT",
            DawAddress::BankSelect => "BANK_SELECT",
            DawAddress::BankNext => "BANK_NEXT",
            DawAddress::BankPrev => "BANK_PREV",
            DawAddress::Record => "TRANSPORT_RECORD",
            DawAddress::Play => "TRANSPORT_PLAY",
            DawAddress::Pause => "TRANSPORT_PAUSE",
            DawAddress::Stop => "TRANSPORT_STOP",
            DawAddress::Metronome => "METRONOME",
            DawAddress::Repeat => "REPEAT",
        };

        match id {
            Some(id) if self.is_per_track() => format!("TRACK_{}_{}", id, base),
            _ => base.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expand_track_template() {
        assert_eq!(expand("/track/:id/volume", Some(2)).unwrap(), "/track/2/volume");
        assert_eq!(expand("/track/:id/mute", Some(128)).unwrap(), "/track/128/mute");
    }

    #[test]
    fn test_expand_without_placeholder_ignores_id() {
        assert_eq!(expand("/play", Some(7)).unwrap(), "/play");
        assert_eq!(expand("/play", None).unwrap(), "/play");
    }

    #[test]
    fn test_expand_missing_id() {
        let err = expand("/track/:id/pan", None).unwrap_err();
        assert!(matches!(err, SurfaceError::MissingIdentifier { ref template } if template == "/track/:id/pan"));

        // Zero is treated as absent
        assert!(matches!(
            expand("/track/:id/pan", Some(0)),
            Err(SurfaceError::MissingIdentifier { .. })
        ));
    }

    #[test]
    fn test_only_first_placeholder_replaced() {
        assert_eq!(expand("/:id/:id", Some(3)).unwrap(), "/3/:id");
    }

    #[test]
    fn test_registry_kinds() {
        assert_eq!(DawAddress::TrackName.kind(), ValueKind::Text);
        assert_eq!(DawAddress::TrackMonitor.kind(), ValueKind::Number);
        assert_eq!(DawAddress::TrackSolo.kind(), ValueKind::Boolean);
        assert_eq!(DawAddress::Metronome.kind(), ValueKind::Boolean);
        assert_eq!(DawAddress::BankSelect.kind(), ValueKind::Number);
    }

    #[test]
    fn test_resolve_and_signal() {
        assert_eq!(DawAddress::TrackVuMeter.resolve(Some(4)).unwrap(), "/track/4/vu");
        assert_eq!(DawAddress::Metronome.resolve(None).unwrap(), "/click");
        assert!(DawAddress::TrackVolume.resolve(None).is_err());

        assert_eq!(DawAddress::TrackVolume.signal(Some(2)), "TRACK_2_VOLUME");
        assert_eq!(DawAddress::Play.signal(None), "TRANSPORT_PLAY");
        assert_eq!(DawAddress::BankSelect.signal(Some(1)), "BANK_SELECT");
    }

    proptest! {
        #[test]
        fn prop_expand_fills_placeholder(
            prefix in "[a-z/]{0,12}",
            suffix in "[a-z/]{0,12}",
            id in 1u32..=u32::MAX,
        ) {
            let template = format!("{}{}{}", prefix, ID_PLACEHOLDER, suffix);
            let expanded = expand(&template, Some(id)).unwrap();
            prop_assert_eq!(&expanded, &format!("{}{}{}", prefix, id, suffix));
            prop_assert!(!expanded.contains(ID_PLACEHOLDER));
        }

        #[test]
        fn prop_expand_without_placeholder_is_identity(
            template in "/[a-z/+-]{0,20}",
            id in proptest::option::of(any::<u32>()),
        ) {
            prop_assert_eq!(expand(&template, id).unwrap(), template);
        }
    }
}
