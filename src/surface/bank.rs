//! Bank - fixed window of tracks plus the active page cursor
//!
//! `tracks_count` is the number of visible channel slots. The page index is
//! opaque: next/prev only ask the DAW to move, and the bank records the last
//! page it selected or was told about.

use parking_lot::RwLock;
use rosc::OscType;
use std::sync::Arc;
use tracing::{debug, info};

use super::{send_signal, MirrorPolicy, Track};
use crate::error::Result;
use crate::osc::{DawAddress, Dispatcher, OscSender};

pub struct Bank {
    tracks_count: u32,
    default_bank: i32,
    active_bank: Arc<RwLock<i32>>,
    tracks: Vec<Track>,
    sender: Arc<dyn OscSender>,
    dispatcher: Arc<Dispatcher>,
}

impl Bank {
    /// Build a bank with tracks `1..=tracks_count`
    pub fn new(
        tracks_count: u32,
        default_bank: i32,
        policy: MirrorPolicy,
        sender: Arc<dyn OscSender>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        let tracks = (1..=tracks_count)
            .map(|id| Track::new(id, policy, Arc::clone(&sender), Arc::clone(&dispatcher)))
            .collect();

        info!("➡️ Bank created with {} tracks", tracks_count);

        Self {
            tracks_count,
            default_bank,
            active_bank: Arc::new(RwLock::new(default_bank)),
            tracks,
            sender,
            dispatcher,
        }
    }

    /// Select the default page, announce the track count, then start every track.
    ///
    /// The DAW sizes its view from the selection and count before streaming
    /// per-track values, so the order matters.
    pub fn listen(&self) -> Result<()> {
        self.select(self.default_bank)?;
        self.send_track_count()?;

        for track in &self.tracks {
            track.listen()?;
        }

        let active_bank = Arc::clone(&self.active_bank);
        self.dispatcher
            .on_number(DawAddress::BankSelect.resolve(None)?, move |v| {
                debug!("Bank selected by DAW: {}", v);
                *active_bank.write() = v as i32;
            });

        info!("✅ All tracks in bank listening for events from DAW");
        Ok(())
    }

    pub fn send_track_count(&self) -> Result<()> {
        send_signal(
            self.sender.as_ref(),
            DawAddress::TracksCount,
            None,
            OscType::Int(self.tracks_count as i32),
        )
    }

    /// Ask the DAW for the next page
    pub fn next(&self) -> Result<()> {
        send_signal(self.sender.as_ref(), DawAddress::BankNext, None, OscType::Int(1))
    }

    /// Ask the DAW for the previous page
    pub fn prev(&self) -> Result<()> {
        send_signal(self.sender.as_ref(), DawAddress::BankPrev, None, OscType::Int(1))
    }

    /// Select a page and record it as active
    pub fn select(&self, bank: i32) -> Result<()> {
        send_signal(
            self.sender.as_ref(),
            DawAddress::BankSelect,
            None,
            OscType::Int(bank),
        )?;
        *self.active_bank.write() = bank;
        Ok(())
    }

    pub fn tracks_count(&self) -> u32 {
        self.tracks_count
    }

    pub fn default_bank(&self) -> i32 {
        self.default_bank
    }

    pub fn active_bank(&self) -> i32 {
        *self.active_bank.read()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track by 1-based id
    pub fn track(&self, id: u32) -> Option<&Track> {
        id.checked_sub(1)
            .and_then(|index| self.tracks.get(index as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osc::MemorySender;

    fn make_bank(tracks_count: u32) -> (Bank, Arc<MemorySender>, Arc<Dispatcher>) {
        let sender = Arc::new(MemorySender::new());
        let dispatcher = Arc::new(Dispatcher::new());
        let bank = Bank::new(
            tracks_count,
            0,
            MirrorPolicy::Confirmed,
            sender.clone(),
            Arc::clone(&dispatcher),
        );
        (bank, sender, dispatcher)
    }

    #[test]
    fn test_construction_ids() {
        let (bank, sender, _) = make_bank(8);
        let ids: Vec<u32> = bank.tracks().iter().map(Track::id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(bank.tracks_count(), 8);
        assert!(bank.track(0).is_none());
        assert_eq!(bank.track(8).map(Track::id), Some(8));
        assert!(bank.track(9).is_none());

        // Construction is silent on the wire
        assert!(sender.sent().is_empty());
    }

    #[test]
    fn test_select_records_and_sends() {
        let (bank, sender, _) = make_bank(8);
        bank.select(3).unwrap();

        assert_eq!(bank.active_bank(), 3);
        assert_eq!(
            sender.sent(),
            vec![("/device/track/bank/select".to_string(), OscType::Int(3))]
        );
    }

    #[test]
    fn test_next_prev_are_pulses() {
        let (bank, sender, _) = make_bank(4);
        bank.select(2).unwrap();
        sender.take();

        bank.next().unwrap();
        bank.prev().unwrap();

        assert_eq!(
            sender.sent(),
            vec![
                ("/device/track/bank/+".to_string(), OscType::Int(1)),
                ("/device/track/bank/-".to_string(), OscType::Int(1)),
            ]
        );
        // The DAW owns the resulting page
        assert_eq!(bank.active_bank(), 2);
    }

    #[test]
    fn test_listen_order() {
        let (bank, sender, dispatcher) = make_bank(2);
        bank.listen().unwrap();

        assert_eq!(
            sender.sent(),
            vec![
                ("/device/track/bank/select".to_string(), OscType::Int(0)),
                ("/device/track/count".to_string(), OscType::Int(2)),
            ]
        );
        assert_eq!(dispatcher.listener_count("/track/1/volume"), 1);
        assert_eq!(dispatcher.listener_count("/track/2/monitor"), 1);
        assert_eq!(dispatcher.listener_count("/track/3/volume"), 0);
    }

    #[test]
    fn test_inbound_bank_select_is_not_echoed() {
        let (bank, sender, dispatcher) = make_bank(2);
        bank.listen().unwrap();
        sender.take();

        dispatcher
            .dispatch(&rosc::OscMessage {
                addr: "/device/track/bank/select".to_string(),
                args: vec![OscType::Int(5)],
            })
            .unwrap();

        assert_eq!(bank.active_bank(), 5);
        assert!(sender.sent().is_empty());
    }
}
